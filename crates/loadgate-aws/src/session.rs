//! Shared AWS session: resolved SDK config plus a blocking runtime.
//!
//! The orchestrator is synchronous, so every SDK future is driven to
//! completion on a current-thread tokio runtime owned by the session. All
//! clients built from one session share that runtime.

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::error::DisplayErrorContext;

use loadgate_contracts::error::{LoadgateError, LoadgateResult};

use crate::{iam::IamPolicySimulator, s3::S3ObjectStore};

/// Identity the session's credentials resolve to.
#[derive(Debug, Clone, Serialize)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

/// Options for resolving credentials and region.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Named profile from the shared config files.
    pub profile: Option<String>,
    /// Region override; otherwise the provider chain decides.
    pub region: Option<String>,
}

/// Holds the resolved config and runtime for the lifetime of a run.
pub struct AwsSession {
    runtime: Arc<Runtime>,
    config: SdkConfig,
}

impl AwsSession {
    /// Resolve credentials and region via the default provider chain.
    ///
    /// Credentials themselves are resolved lazily by the SDK on first use,
    /// so a missing profile surfaces as a simulation or storage error.
    pub fn connect(options: &SessionOptions) -> LoadgateResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LoadgateError::config(format!("cannot start AWS runtime: {e}")))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let config = runtime.block_on(loader.load());

        debug!(
            region = ?config.region().map(|r| r.as_ref().to_string()),
            profile = ?options.profile,
            "AWS session ready"
        );

        Ok(Self {
            runtime: Arc::new(runtime),
            config,
        })
    }

    pub fn simulator(&self) -> IamPolicySimulator {
        IamPolicySimulator::new(aws_sdk_iam::Client::new(&self.config), self.runtime.clone())
    }

    pub fn object_store(&self) -> S3ObjectStore {
        S3ObjectStore::new(aws_sdk_s3::Client::new(&self.config), self.runtime.clone())
    }

    /// Ask STS who the session's credentials belong to.
    pub fn caller_identity(&self) -> LoadgateResult<CallerIdentity> {
        let client = aws_sdk_sts::Client::new(&self.config);
        let output = self
            .runtime
            .block_on(client.get_caller_identity().send())
            .map_err(|e| LoadgateError::ConfigError {
                reason: format!("cannot resolve caller identity: {}", DisplayErrorContext(&e)),
            })?;

        Ok(CallerIdentity {
            account: output.account().map(str::to_string),
            arn: output.arn().map(str::to_string),
            user_id: output.user_id().map(str::to_string),
        })
    }
}
