//! Repository export orchestration
//!
//! - [`codec`] - encrypted, versioned job payloads
//! - [`submitter`] - fan-out of a batch into export jobs
//! - [`saga`] - step sequencing with compensation
//! - [`executor`] - the per-job export handler
//! - [`progress`] - aggregate batch progress
//! - [`coordinator`] - facade wiring the above to a job engine

pub mod codec;
pub mod coordinator;
pub mod executor;
pub mod progress;
pub mod saga;
pub mod submitter;

pub use codec::{PayloadCodec, PAYLOAD_VERSION};
pub use coordinator::{ExporterCollaborators, RepositoryExporter};
pub use executor::{ExportDependencies, ExportExecutor, ExportOutcome, ExportPhase};
pub use progress::{group_progress, summarize, ProgressSummary};
pub use saga::{Saga, SagaFailure, SagaStep};
pub use submitter::{
    BatchSubmitter, EXPORT_JOB_MAX_RETRIES, EXPORT_JOB_TIMEOUT, EXPORT_JOB_TYPE,
};
