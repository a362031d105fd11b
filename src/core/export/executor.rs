//! Execution of a single repository export
//!
//! One attempt moves through these phases:
//!
//! ```text
//! Decoding -> ResolvingRepo -> CreatingRemote -> Pushing -> Reconciling -> Done
//! ```
//!
//! Creating the remote repository and pushing to it run as a [`Saga`]: if the
//! push fails for any reason other than an empty source, the remote repository
//! is deleted again. Every attempt that got as far as creating the remote
//! publishes exactly one completion event, whatever its outcome.

use super::codec::PayloadCodec;
use super::saga::{Saga, SagaStep};
use crate::adapters::events::{EventPublisher, EventType};
use crate::adapters::git::{build_push_url, GitOperations};
use crate::adapters::jobs::{ExecutionContext, JobHandler, ProgressReporter};
use crate::adapters::remote::{
    CreateRepositorySpec, RemoteClientFactory, RemoteRepository, RemoteTargetClient,
};
use crate::adapters::store::RepositoryStore;
use crate::domain::{ExportRequest, GitportError, PushError, Repository, Result};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

const CREATE_REMOTE_STEP: &str = "create_remote";
const PUSH_STEP: &str = "push";

/// Progress reported once the local repository is resolved
pub const PROGRESS_RESOLVED: u8 = 10;
/// Progress reported once the remote repository exists
pub const PROGRESS_REMOTE_CREATED: u8 = 40;
/// Progress reported when the export is done
pub const PROGRESS_DONE: u8 = 100;

/// Phase of an export attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    /// Reading the job payload
    Decoding,
    /// Looking up the local repository
    ResolvingRepo,
    /// Creating the remote repository
    CreatingRemote,
    /// Pushing contents
    Pushing,
    /// Deleting the remote repository after a failed push
    Reconciling,
    /// Finished
    Done,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportPhase::Decoding => "decoding",
            ExportPhase::ResolvingRepo => "resolving_repo",
            ExportPhase::CreatingRemote => "creating_remote",
            ExportPhase::Pushing => "pushing",
            ExportPhase::Reconciling => "reconciling",
            ExportPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal outcome of an export attempt
#[derive(Debug)]
pub enum ExportOutcome {
    /// Remote created and contents pushed
    Succeeded,
    /// Remote created; the source had nothing to push
    SucceededEmpty,
    /// The attempt failed
    Failed {
        /// Phase in which the failure happened
        phase: ExportPhase,
        /// Cause of the failure
        error: GitportError,
    },
}

impl ExportOutcome {
    /// Whether the attempt succeeded
    pub fn is_success(&self) -> bool {
        !matches!(self, ExportOutcome::Failed { .. })
    }

    /// Converts the outcome into the job handler result
    pub fn into_result(self) -> Result<String> {
        match self {
            ExportOutcome::Succeeded | ExportOutcome::SucceededEmpty => Ok(String::new()),
            ExportOutcome::Failed { error, .. } => Err(error),
        }
    }

    fn failed(phase: ExportPhase, error: impl Into<GitportError>) -> Self {
        ExportOutcome::Failed {
            phase,
            error: error.into(),
        }
    }
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportOutcome::Succeeded => f.write_str("succeeded"),
            ExportOutcome::SucceededEmpty => f.write_str("succeeded_empty"),
            ExportOutcome::Failed { phase, .. } => write!(f, "failed during {phase}"),
        }
    }
}

/// Collaborators of the export executor
#[derive(Clone)]
pub struct ExportDependencies {
    /// Decodes job payloads
    pub codec: PayloadCodec,
    /// Local repository records
    pub store: Arc<dyn RepositoryStore>,
    /// Builds remote clients per target account
    pub remotes: Arc<dyn RemoteClientFactory>,
    /// Pushes repository contents
    pub git: Arc<dyn GitOperations>,
    /// Completion notifications
    pub events: Arc<dyn EventPublisher>,
}

/// Runs `fut` unless the attempt is cancelled first
async fn unless_cancelled<T, F>(ctx: &ExecutionContext, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if ctx.is_cancelled() {
        return Err(GitportError::Cancelled);
    }

    tokio::select! {
        result = fut => result,
        _ = ctx.cancelled() => Err(GitportError::Cancelled),
    }
}

struct ExportSagaState<'a> {
    exec: &'a ExecutionContext,
    progress: &'a dyn ProgressReporter,
    request: ExportRequest,
    repository: Repository,
    client: Arc<dyn RemoteTargetClient>,
    remote: Option<RemoteRepository>,
    empty_source: bool,
    reconciled: bool,
}

struct CreateRemoteStep;

#[async_trait]
impl<'a> SagaStep<ExportSagaState<'a>> for CreateRemoteStep {
    fn name(&self) -> &'static str {
        CREATE_REMOTE_STEP
    }

    async fn execute(&self, state: &mut ExportSagaState<'a>) -> Result<()> {
        let spec = CreateRepositorySpec::empty(
            &state.repository.uid,
            &state.repository.default_branch,
            &state.repository.description,
            state.repository.is_public,
        );

        let client = Arc::clone(&state.client);
        let remote = unless_cancelled(state.exec, async {
            client.create_repository(&spec).await.map_err(GitportError::from)
        })
        .await?;

        tracing::info!(
            job_uid = %state.exec.job_uid(),
            remote_uid = %remote.identifier,
            remote_id = remote.id,
            "Created remote repository"
        );
        state.remote = Some(remote);
        state.progress.report(PROGRESS_REMOTE_CREATED).await;
        Ok(())
    }

    async fn compensate(&self, state: &mut ExportSagaState<'a>) -> Result<()> {
        let Some(remote) = state.remote.take() else {
            return Ok(());
        };

        tracing::info!(
            job_uid = %state.exec.job_uid(),
            remote_uid = %remote.identifier,
            "Deleting remote repository after failed export"
        );
        state.reconciled = true;
        state.client.delete_repository(&remote.identifier).await?;
        Ok(())
    }
}

struct PushStep {
    git: Arc<dyn GitOperations>,
}

#[async_trait]
impl<'a> SagaStep<ExportSagaState<'a>> for PushStep {
    fn name(&self) -> &'static str {
        PUSH_STEP
    }

    async fn execute(&self, state: &mut ExportSagaState<'a>) -> Result<()> {
        let remote = state.remote.as_ref().ok_or_else(|| {
            GitportError::Other("push attempted without a remote repository".to_string())
        })?;

        let push_url = build_push_url(&remote.git_url, &state.request.target_account.token)?;
        let git_uid = state.repository.git_uid.clone();
        let git = Arc::clone(&self.git);

        let pushed = unless_cancelled(state.exec, async {
            Ok(git.push_to_remote(&git_uid, &push_url).await)
        })
        .await?;

        match pushed {
            Ok(()) => Ok(()),
            Err(PushError::EmptySource(detail)) => {
                tracing::info!(
                    job_uid = %state.exec.job_uid(),
                    detail = %detail,
                    "Source repository is empty, nothing to push"
                );
                state.empty_source = true;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Phase a failed saga run is reported in
///
/// A push failure only counts as reconciling once the remote delete was
/// actually attempted.
fn failure_phase(failed_step: &str, reconciled: bool) -> ExportPhase {
    match failed_step {
        CREATE_REMOTE_STEP => ExportPhase::CreatingRemote,
        _ if reconciled => ExportPhase::Reconciling,
        _ => ExportPhase::Pushing,
    }
}

/// Job handler exporting one repository
#[derive(Clone)]
pub struct ExportExecutor {
    deps: ExportDependencies,
}

impl ExportExecutor {
    /// Create an executor
    pub fn new(deps: ExportDependencies) -> Self {
        Self { deps }
    }

    /// Runs one export attempt
    ///
    /// Never returns an error directly; failures are reported through
    /// [`ExportOutcome::Failed`].
    pub async fn execute(
        &self,
        ctx: &ExecutionContext,
        data: &str,
        progress: &dyn ProgressReporter,
    ) -> ExportOutcome {
        let started = Instant::now();

        let request = match self.deps.codec.decode(data) {
            Ok(request) => request,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to decode export job payload");
                return ExportOutcome::failed(ExportPhase::Decoding, e);
            }
        };

        crate::log_export_start!(ctx.job_uid(), &request.uid);

        let repository =
            match unless_cancelled(ctx, self.deps.store.find_by_id(request.id)).await {
                Ok(repository) => repository,
                Err(e) => {
                    crate::log_error_with_context!(&e, "Failed to resolve local repository");
                    return ExportOutcome::failed(ExportPhase::ResolvingRepo, e);
                }
            };

        let client = match self.deps.remotes.client_for(&request.target_account) {
            Ok(client) => client,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to build remote client");
                return ExportOutcome::failed(ExportPhase::ResolvingRepo, e);
            }
        };

        progress.report(PROGRESS_RESOLVED).await;

        let saga = Saga::new().step(CreateRemoteStep).step(PushStep {
            git: Arc::clone(&self.deps.git),
        });

        let mut state = ExportSagaState {
            exec: ctx,
            progress,
            request,
            repository,
            client,
            remote: None,
            empty_source: false,
            reconciled: false,
        };

        let outcome = match saga.run(&mut state).await {
            Ok(()) if state.empty_source => ExportOutcome::SucceededEmpty,
            Ok(()) => ExportOutcome::Succeeded,
            Err(failure) => {
                let phase = failure_phase(failure.step, state.reconciled);

                crate::log_error_with_context!(&failure.error, "Repository export failed");
                ExportOutcome::Failed {
                    phase,
                    error: failure.error,
                }
            }
        };

        self.notify(&state.repository).await;

        if outcome.is_success() {
            progress.report(PROGRESS_DONE).await;
        }

        crate::log_export_complete!(ctx.job_uid(), &outcome, started.elapsed());
        outcome
    }

    async fn notify(&self, repository: &Repository) {
        let payload = match serde_json::to_value(repository) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    repository_id = %repository.id,
                    error = %e,
                    "Failed to serialize export completion event"
                );
                return;
            }
        };

        if let Err(e) = self
            .deps
            .events
            .publish(
                repository.parent_id,
                EventType::RepositoryExportCompleted,
                payload,
            )
            .await
        {
            tracing::warn!(
                repository_id = %repository.id,
                error = %e,
                "Failed to publish export completion event"
            );
        }
    }
}

#[async_trait]
impl JobHandler for ExportExecutor {
    async fn handle(
        &self,
        ctx: &ExecutionContext,
        data: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<String> {
        self.execute(ctx, data, progress).await.into_result()
    }
}
