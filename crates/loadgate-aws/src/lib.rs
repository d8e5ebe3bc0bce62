//! # loadgate-aws
//!
//! AWS SDK implementations of the loadgate collaborator traits.
//!
//! - `IamPolicySimulator`: `iam:SimulatePrincipalPolicy`
//! - `S3ObjectStore`: `s3:ListObjectsV2`
//! - `AwsSession::caller_identity`: `sts:GetCallerIdentity`
//!
//! Request signing and credential resolution are left entirely to the SDK.
//!
//! ```rust,ignore
//! use loadgate_aws::{AwsSession, SessionOptions};
//!
//! let session = AwsSession::connect(&SessionOptions::default())?;
//! let simulator = session.simulator();
//! let store = session.object_store();
//! ```

pub mod iam;
pub mod s3;
pub mod session;

pub use iam::IamPolicySimulator;
pub use s3::S3ObjectStore;
pub use session::{AwsSession, CallerIdentity, SessionOptions};
