//! # loadgate-contracts
//!
//! Shared types, configuration, and contracts for the loadgate runtime.
//!
//! All crates in the workspace import from here. No collaborator logic lives
//! in this crate, only data definitions, config validation, and error types.

pub mod config;
pub mod error;
pub mod report;
pub mod simulation;
pub mod storage;
pub mod summary;

#[cfg(test)]
mod tests {
    use super::*;
    use config::{ActionSet, AgentConfig, GraphMode};
    use error::LoadgateError;
    use simulation::{collect_denials, Decision, EvaluationResult, MatchedStatement};
    use summary::{RunSummary, StepName};

    const PRINCIPAL: &str = "arn:aws:iam::123456789012:role/LoadRole";

    // ── AgentConfig ──────────────────────────────────────────────────────────

    #[test]
    fn config_rejects_unknown_mode() {
        for mode in ["cluster", "", "Graph", "DB", "neptune-graph"] {
            let result = AgentConfig::new(PRINCIPAL, "bucket", None, None, mode);
            match result {
                Err(LoadgateError::ConfigError { reason }) => {
                    assert!(reason.contains("'graph' or 'db'"), "unexpected reason: {reason}");
                }
                other => panic!("expected ConfigError for mode {mode:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn config_rejects_empty_principal_and_bucket() {
        assert!(matches!(
            AgentConfig::new("  ", "bucket", None, None, "graph"),
            Err(LoadgateError::ConfigError { .. })
        ));
        assert!(matches!(
            AgentConfig::new(PRINCIPAL, "", None, None, "graph"),
            Err(LoadgateError::ConfigError { .. })
        ));
    }

    #[test]
    fn config_normalizes_prefix() {
        let cfg = AgentConfig::new(PRINCIPAL, "bucket", Some("/a/b/"), None, "db").unwrap();
        assert_eq!(cfg.prefix(), Some("a/b"));

        let cfg = AgentConfig::new(PRINCIPAL, "bucket", Some("//"), None, "db").unwrap();
        assert_eq!(cfg.prefix(), None);

        let cfg = AgentConfig::new(PRINCIPAL, "bucket", None, None, "db").unwrap();
        assert_eq!(cfg.prefix(), None);
    }

    #[test]
    fn config_graph_resources_are_arn_or_wildcard() {
        let arn = "arn:aws:neptune-graph:us-east-1:123456789012:graph/g-abc".to_string();
        let cfg = AgentConfig::new(PRINCIPAL, "bucket", None, Some(arn.clone()), "graph").unwrap();
        assert_eq!(cfg.graph_resources(), vec![arn]);

        let cfg = AgentConfig::new(PRINCIPAL, "bucket", None, None, "graph").unwrap();
        assert_eq!(cfg.graph_resources(), vec!["*".to_string()]);
    }

    #[test]
    fn config_storage_resources_follow_prefix() {
        let cfg = AgentConfig::new(PRINCIPAL, "csvs", Some("neptune/csvs"), None, "graph").unwrap();
        assert_eq!(
            cfg.storage_resources(),
            vec![
                "arn:aws:s3:::csvs".to_string(),
                "arn:aws:s3:::csvs/neptune/csvs/*".to_string(),
            ]
        );

        let cfg = AgentConfig::new(PRINCIPAL, "csvs", None, None, "graph").unwrap();
        assert_eq!(cfg.object_arn(), "arn:aws:s3:::csvs/*");
    }

    // ── ActionSet ────────────────────────────────────────────────────────────

    #[test]
    fn action_set_uses_mode_namespace() {
        let graph = ActionSet::for_mode(GraphMode::Graph);
        assert_eq!(
            graph.graph,
            vec![
                "neptune-graph:ReadDataViaQuery",
                "neptune-graph:WriteDataViaQuery",
                "neptune-graph:DeleteDataViaQuery",
            ]
        );
        assert_eq!(graph.storage, vec!["s3:GetObject", "s3:ListBucket"]);

        let db = ActionSet::for_mode(GraphMode::Db);
        assert!(db.graph.iter().all(|a| a.starts_with("neptune-db:")));
    }

    // ── Denial collection ────────────────────────────────────────────────────

    #[test]
    fn collect_denials_keeps_each_action_once() {
        let mut explicit = EvaluationResult::new("s3:ListBucket", Decision::explicit_deny());
        explicit.matched_statements.push(MatchedStatement {
            source_policy_id: "deny-list".to_string(),
            source_policy_type: Some("role".to_string()),
        });

        let results = vec![
            EvaluationResult::new("s3:GetObject", Decision::allowed()),
            explicit,
            EvaluationResult::new("s3:ListBucket", Decision::implicit_deny()),
            EvaluationResult::new("s3:PutObject", Decision::implicit_deny()),
        ];

        let denials = collect_denials(&results);
        assert_eq!(denials.len(), 2);
        assert_eq!(denials[0].action, "s3:ListBucket");
        assert_eq!(denials[0].decision, Decision::explicit_deny());
        assert_eq!(denials[0].matched_statements.len(), 1);
        assert_eq!(denials[1].action, "s3:PutObject");
    }

    #[test]
    fn decision_only_allowed_is_allowed() {
        assert!(Decision::allowed().is_allowed());
        assert!(!Decision::implicit_deny().is_allowed());
        assert!(!Decision::new("Allowed").is_allowed());
    }

    // ── RunSummary ───────────────────────────────────────────────────────────

    #[test]
    fn fresh_summary_has_identity_ok_and_rest_false() {
        let summary = RunSummary::new(PRINCIPAL);

        let identity = summary.get(StepName::IdentifyPrincipal);
        assert!(identity.ok);
        assert_eq!(identity.principal_arn.as_deref(), Some(PRINCIPAL));

        for step in &StepName::ALL[1..] {
            let report = summary.get(*step);
            assert!(!report.ok, "{step} should start not ok");
            assert!(report.error.is_none());
        }
        assert!(!summary.all_ok());
    }

    #[test]
    fn summary_serializes_as_ordered_map() {
        let mut summary = RunSummary::new(PRINCIPAL);
        summary.set_ok(StepName::CheckGraphPermissions, true);
        summary.set_error(StepName::CheckStoragePermissions, "boom");

        let json = serde_json::to_string(&summary).unwrap();
        let order: Vec<usize> = StepName::ALL
            .iter()
            .map(|s| json.find(s.as_str()).unwrap())
            .collect();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted, "steps must serialize in execution order: {json}");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["check_graph_permissions"]["ok"], true);
        assert_eq!(value["check_storage_permissions"]["error"], "boom");
        assert!(value["generate_inputs"].get("error").is_none());
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_step_failed_display() {
        let err = LoadgateError::StepFailed {
            step: "bulk_load".to_string(),
            reason: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bulk_load"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn error_simulation_failed_display() {
        let err = LoadgateError::SimulationFailed {
            reason: "AccessDenied".to_string(),
        };
        assert!(err.to_string().contains("permission simulation failed"));
    }
}
