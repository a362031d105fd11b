//! Aggregate progress of an export batch

use crate::adapters::jobs::JobScheduler;
use crate::domain::{JobGroupId, JobProgress, JobStatus, Result, SpaceId};
use serde::Serialize;

/// Progress of every export job of a space
///
/// Never returns an empty list: when the engine has no record of the group,
/// a single synthetic failed entry named after the group is returned.
///
/// # Errors
///
/// Propagates errors from the engine's progress query
pub async fn group_progress(
    scheduler: &dyn JobScheduler,
    space_id: SpaceId,
) -> Result<Vec<JobProgress>> {
    let group = JobGroupId::for_space(space_id);
    let progress = scheduler.group_progress(&group).await?;

    if progress.is_empty() {
        tracing::debug!(group = %group, "No export jobs recorded for group");
        return Ok(vec![JobProgress::missing_group(&group)]);
    }

    Ok(progress)
}

/// Counts of a progress list by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    /// Jobs considered
    pub total: usize,
    /// Jobs waiting to start
    pub queued: usize,
    /// Jobs running
    pub running: usize,
    /// Jobs finished successfully
    pub succeeded: usize,
    /// Jobs finished with a failure
    pub failed: usize,
}

impl ProgressSummary {
    /// Whether every job reached a terminal state
    pub fn is_complete(&self) -> bool {
        self.queued == 0 && self.running == 0
    }

    /// Whether every job succeeded
    pub fn all_succeeded(&self) -> bool {
        self.total > 0 && self.succeeded == self.total
    }
}

/// Folds a progress list into a [`ProgressSummary`]
pub fn summarize(progress: &[JobProgress]) -> ProgressSummary {
    progress
        .iter()
        .fold(ProgressSummary::default(), |mut summary, entry| {
            summary.total += 1;
            match entry.state {
                JobStatus::Queued => summary.queued += 1,
                JobStatus::Running => summary.running += 1,
                JobStatus::Succeeded => summary.succeeded += 1,
                JobStatus::Failed => summary.failed += 1,
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GitportError, JobDefinition, JobUid};
    use async_trait::async_trait;

    struct FixedScheduler(Vec<JobProgress>);

    #[async_trait]
    impl JobScheduler for FixedScheduler {
        async fn run_jobs(&self, _group: &JobGroupId, _jobs: Vec<JobDefinition>) -> Result<()> {
            Err(GitportError::Scheduler("read only".to_string()))
        }

        async fn group_progress(&self, _group: &JobGroupId) -> Result<Vec<JobProgress>> {
            Ok(self.0.clone())
        }
    }

    fn entry(uid: &str, state: JobStatus) -> JobProgress {
        JobProgress {
            state,
            ..JobProgress::queued(&JobUid::new(uid).unwrap())
        }
    }

    #[tokio::test]
    async fn test_empty_group_yields_single_failed_entry() {
        let progress = group_progress(&FixedScheduler(Vec::new()), SpaceId::new(7))
            .await
            .unwrap();

        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].uid, "export_space_7");
        assert_eq!(progress[0].state, JobStatus::Failed);
        assert_eq!(
            progress[0].failure.as_deref(),
            Some("no export jobs recorded for group")
        );
    }

    #[tokio::test]
    async fn test_known_group_is_passed_through() {
        let records = vec![
            entry("export_repo_1", JobStatus::Succeeded),
            entry("export_repo_2", JobStatus::Running),
        ];
        let progress = group_progress(&FixedScheduler(records.clone()), SpaceId::new(7))
            .await
            .unwrap();

        assert_eq!(progress, records);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[
            entry("a", JobStatus::Succeeded),
            entry("b", JobStatus::Failed),
            entry("c", JobStatus::Running),
            entry("d", JobStatus::Queued),
        ]);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_complete());
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn test_summarize_complete() {
        let summary = summarize(&[
            entry("a", JobStatus::Succeeded),
            entry("b", JobStatus::Succeeded),
        ]);

        assert!(summary.is_complete());
        assert!(summary.all_succeeded());
    }
}
