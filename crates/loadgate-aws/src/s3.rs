//! `ObjectStore` backed by S3 `ListObjectsV2`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::DateTime as SmithyDateTime;

use loadgate_contracts::{
    error::{LoadgateError, LoadgateResult},
    storage::ObjectSummary,
};
use loadgate_core::traits::ObjectStore;

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    runtime: Arc<Runtime>,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }
}

pub(crate) fn to_chrono(value: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

impl ObjectStore for S3ObjectStore {
    fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        max_results: i32,
    ) -> LoadgateResult<Vec<ObjectSummary>> {
        let request = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(max_results)
            .set_prefix(prefix.map(str::to_string));

        let output = self.runtime.block_on(request.send()).map_err(|e| {
            LoadgateError::StorageFailed {
                reason: format!("ListObjectsV2 on '{bucket}' failed: {}", DisplayErrorContext(&e)),
            }
        })?;

        Ok(output
            .contents()
            .iter()
            .filter_map(|object| {
                Some(ObjectSummary {
                    key: object.key()?.to_string(),
                    size: object.size(),
                    last_modified: object.last_modified().and_then(to_chrono),
                })
            })
            .collect())
    }
}
