//! Batch submission of export jobs
//!
//! A batch is all-or-nothing at the submission boundary: every request is
//! encoded before the engine sees any job, so one encoding failure submits
//! nothing.

use super::codec::PayloadCodec;
use crate::adapters::jobs::JobScheduler;
use crate::domain::{
    ExportRequest, GitportError, JobDefinition, JobGroupId, JobUid, Repository, Result, SpaceId,
    TargetAccount,
};
use std::sync::Arc;
use std::time::Duration;

/// Type tag of repository export jobs
pub const EXPORT_JOB_TYPE: &str = "repository_export";

/// Retries after the first attempt of an export job
pub const EXPORT_JOB_MAX_RETRIES: u32 = 1;

/// Time limit of one export attempt
pub const EXPORT_JOB_TIMEOUT: Duration = Duration::from_secs(45 * 60);

/// Turns repositories into export jobs and hands them to the engine
#[derive(Clone)]
pub struct BatchSubmitter {
    codec: PayloadCodec,
    scheduler: Arc<dyn JobScheduler>,
}

impl BatchSubmitter {
    /// Create a submitter
    pub fn new(codec: PayloadCodec, scheduler: Arc<dyn JobScheduler>) -> Self {
        Self { codec, scheduler }
    }

    /// Builds one job definition per repository
    ///
    /// # Errors
    ///
    /// Returns `GitportError::Encoding` on the first request that cannot be
    /// encoded
    pub fn build_jobs(
        &self,
        target_account: &TargetAccount,
        repositories: &[Repository],
    ) -> Result<Vec<JobDefinition>> {
        repositories
            .iter()
            .map(|repo| -> Result<JobDefinition> {
                let request = ExportRequest::from_repository(repo, target_account);
                let data = self.codec.encode(&request)?;

                Ok(JobDefinition {
                    uid: JobUid::for_repository(repo.id),
                    job_type: EXPORT_JOB_TYPE.to_string(),
                    max_retries: EXPORT_JOB_MAX_RETRIES,
                    timeout: EXPORT_JOB_TIMEOUT,
                    data,
                })
            })
            .collect()
    }

    /// Submits one export job per repository under the space's job group
    ///
    /// # Arguments
    ///
    /// * `space_id` - Space owning the repositories; names the job group
    /// * `target_account` - Remote account shared by every export
    /// * `repositories` - Repositories to export, must not be empty
    ///
    /// # Returns
    ///
    /// The group identity to query progress with
    ///
    /// # Errors
    ///
    /// Returns `GitportError::Validation` for an empty batch,
    /// `GitportError::Encoding` if a request cannot be encoded, or the
    /// engine's error if it refuses the batch
    pub async fn submit_batch(
        &self,
        space_id: SpaceId,
        target_account: &TargetAccount,
        repositories: &[Repository],
    ) -> Result<JobGroupId> {
        if repositories.is_empty() {
            return Err(GitportError::Validation(
                "no repositories to export".to_string(),
            ));
        }

        let jobs = self.build_jobs(target_account, repositories)?;
        let group = JobGroupId::for_space(space_id);

        tracing::info!(
            group = %group,
            repositories = jobs.len(),
            "Submitting repository export batch"
        );

        self.scheduler.run_jobs(&group, jobs).await?;
        Ok(group)
    }
}
