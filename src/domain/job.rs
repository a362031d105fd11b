//! Job envelope and progress models
//!
//! These are the types exchanged with the job engine: the definition handed
//! over at submission time and the progress records read back afterwards.

use super::ids::{JobGroupId, JobUid};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A schedulable unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    /// Job identity
    pub uid: JobUid,

    /// Type tag used to route the job to its registered handler
    pub job_type: String,

    /// Number of retries after the first attempt
    pub max_retries: u32,

    /// Wall-clock limit for a single attempt
    pub timeout: Duration,

    /// Opaque payload passed to the handler unchanged
    pub data: String,
}

impl JobDefinition {
    /// Total number of attempts the engine may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted by the engine, not started yet
    Queued,
    /// An attempt is executing
    Running,
    /// Finished successfully
    Succeeded,
    /// Finished with a failure after exhausting its attempts
    Failed,
}

impl JobStatus {
    /// Whether the job has reached a final state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Progress snapshot of one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    /// Job identity (or group identity for the synthetic entry)
    pub uid: String,

    /// Current state
    pub state: JobStatus,

    /// Completion percentage, 0..=100
    pub progress: u8,

    /// Handler result on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Failure message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl JobProgress {
    /// A freshly queued job
    pub fn queued(uid: &JobUid) -> Self {
        Self {
            uid: uid.to_string(),
            state: JobStatus::Queued,
            progress: 0,
            result: None,
            failure: None,
        }
    }

    /// Placeholder reported for a group the engine knows nothing about
    pub fn missing_group(group: &JobGroupId) -> Self {
        Self {
            uid: group.to_string(),
            state: JobStatus::Failed,
            progress: 0,
            result: None,
            failure: Some("no export jobs recorded for group".to_string()),
        }
    }
}
