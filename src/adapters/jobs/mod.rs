//! Background job execution
//!
//! The export orchestrator depends on a job engine only through the traits in
//! this module:
//!
//! - [`JobRegistry`] routes a job type to its [`JobHandler`]
//! - [`JobScheduler`] accepts a batch of [`JobDefinition`]s under one group and
//!   answers group progress queries
//! - [`ProgressReporter`] lets a running handler publish a percentage
//!
//! [`InMemoryJobEngine`] implements all of them on top of tokio tasks.

pub mod memory;

pub use memory::{EngineSettings, InMemoryJobEngine};

use crate::domain::{JobDefinition, JobGroupId, JobProgress, JobUid, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Per-attempt context handed to a job handler
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    job_uid: JobUid,
    attempt: u32,
    cancellation: watch::Receiver<bool>,
}

impl ExecutionContext {
    /// Create a new context
    ///
    /// # Arguments
    ///
    /// * `job_uid` - Identity of the running job
    /// * `attempt` - 1-based attempt number
    /// * `cancellation` - Flips to `true` when the attempt must stop
    pub fn new(job_uid: JobUid, attempt: u32, cancellation: watch::Receiver<bool>) -> Self {
        Self {
            job_uid,
            attempt,
            cancellation,
        }
    }

    /// A context that is never cancelled
    pub fn detached(job_uid: JobUid) -> Self {
        let (_tx, rx) = watch::channel(false);
        Self::new(job_uid, 1, rx)
    }

    /// Identity of the running job
    pub fn job_uid(&self) -> &JobUid {
        &self.job_uid
    }

    /// 1-based attempt number
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.cancellation.borrow()
    }

    /// Resolves once cancellation is requested
    ///
    /// Never resolves if the sending side goes away without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.cancellation.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Sink for progress percentages of a running job
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// Records `percent` (clamped to 100) for the running job
    async fn report(&self, percent: u8);
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

#[async_trait]
impl ProgressReporter for NoopProgress {
    async fn report(&self, _percent: u8) {}
}

/// Work executed by the engine for one job type
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Runs one attempt of a job
    ///
    /// # Arguments
    ///
    /// * `ctx` - Attempt context carrying the cancellation signal
    /// * `data` - Opaque payload from the job definition
    /// * `progress` - Progress sink for this job
    ///
    /// # Returns
    ///
    /// A result string stored on the job record on success
    async fn handle(
        &self,
        ctx: &ExecutionContext,
        data: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<String>;
}

/// Registration of job handlers by type tag
#[async_trait]
pub trait JobRegistry: Send + Sync {
    /// Routes jobs of `job_type` to `handler`
    ///
    /// # Errors
    ///
    /// Returns `GitportError::Scheduler` if the type is already registered
    async fn register(&self, job_type: &str, handler: Arc<dyn JobHandler>) -> Result<()>;
}

/// Batch submission and progress queries
#[async_trait]
pub trait JobScheduler: Send + Sync {
    /// Submits `jobs` under `group`
    ///
    /// # Errors
    ///
    /// Returns `GitportError::Scheduler` if the batch is refused; no job of a
    /// refused batch is started
    async fn run_jobs(&self, group: &JobGroupId, jobs: Vec<JobDefinition>) -> Result<()>;

    /// Progress records of every job submitted under `group`
    ///
    /// Returns an empty list for an unknown group.
    async fn group_progress(&self, group: &JobGroupId) -> Result<Vec<JobProgress>>;
}
