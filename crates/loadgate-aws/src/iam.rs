//! `PermissionSimulator` backed by IAM `SimulatePrincipalPolicy`.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::debug;

use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::types::Statement;

use loadgate_contracts::{
    error::{LoadgateError, LoadgateResult},
    simulation::{Decision, EvaluationResult, MatchedStatement},
};
use loadgate_core::traits::PermissionSimulator;

pub struct IamPolicySimulator {
    client: aws_sdk_iam::Client,
    runtime: Arc<Runtime>,
}

impl IamPolicySimulator {
    pub fn new(client: aws_sdk_iam::Client, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }
}

fn matched_statement(statement: &Statement) -> MatchedStatement {
    MatchedStatement {
        source_policy_id: statement.source_policy_id().unwrap_or("unknown").to_string(),
        source_policy_type: statement
            .source_policy_type()
            .map(|t| t.as_str().to_string()),
    }
}

impl PermissionSimulator for IamPolicySimulator {
    fn simulate(
        &self,
        principal_arn: &str,
        actions: &[String],
        resources: &[String],
    ) -> LoadgateResult<Vec<EvaluationResult>> {
        let mut results = Vec::new();
        let mut marker: Option<String> = None;

        // The API pages its results; follow markers until the last page.
        loop {
            let request = self
                .client
                .simulate_principal_policy()
                .policy_source_arn(principal_arn)
                .set_action_names(Some(actions.to_vec()))
                .set_resource_arns(Some(resources.to_vec()))
                .set_marker(marker.take());

            let output = self.runtime.block_on(request.send()).map_err(|e| {
                LoadgateError::SimulationFailed {
                    reason: format!("SimulatePrincipalPolicy failed: {}", DisplayErrorContext(&e)),
                }
            })?;

            results.extend(output.evaluation_results().iter().map(|r| EvaluationResult {
                action: r.eval_action_name().to_string(),
                decision: Decision::new(r.eval_decision().as_str()),
                matched_statements: r.matched_statements().iter().map(matched_statement).collect(),
            }));

            match output.marker() {
                Some(next) if output.is_truncated() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        debug!(principal = %principal_arn, results = results.len(), "IAM simulation complete");
        Ok(results)
    }
}
