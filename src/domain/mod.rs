//! Domain models and types for Gitport.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RepositoryId`], [`SpaceId`], [`JobUid`], [`JobGroupId`])
//! - **Domain models** ([`Repository`], [`ExportRequest`], [`JobDefinition`], [`JobProgress`])
//! - **Error types** ([`GitportError`] and the per-collaborator enums)
//! - **Result type alias** ([`Result`])
//!
//! Job identities are derived from numeric ids, never chosen freely:
//!
//! ```rust
//! use gitport::domain::{JobGroupId, JobUid, RepositoryId, SpaceId};
//!
//! assert_eq!(JobUid::for_repository(RepositoryId::new(42)).as_str(), "export_repo_42");
//! assert_eq!(JobGroupId::for_space(SpaceId::new(7)).as_str(), "export_space_7");
//! ```

pub mod errors;
pub mod ids;
pub mod job;
pub mod repository;
pub mod request;
pub mod result;

pub use errors::{CryptoError, DecodingError, EncodingError, GitportError, PushError, RemoteError};
pub use ids::{JobGroupId, JobUid, RepositoryId, SpaceId};
pub use job::{JobDefinition, JobProgress, JobStatus};
pub use repository::{Repository, RepositoryBuilder};
pub use request::{ExportRequest, TargetAccount};
pub use result::Result;
