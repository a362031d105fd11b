//! Repository exporter facade
//!
//! Wires the payload codec, batch submitter, export executor and progress
//! queries around one job engine.

use super::codec::PayloadCodec;
use super::executor::{ExportDependencies, ExportExecutor};
use super::progress;
use super::submitter::{BatchSubmitter, EXPORT_JOB_TYPE};
use crate::adapters::crypto::Encrypter;
use crate::adapters::events::EventPublisher;
use crate::adapters::git::GitOperations;
use crate::adapters::jobs::{JobRegistry, JobScheduler};
use crate::adapters::remote::RemoteClientFactory;
use crate::adapters::store::RepositoryStore;
use crate::domain::{JobGroupId, JobProgress, Repository, Result, SpaceId, TargetAccount};
use std::sync::Arc;

/// Everything the exporter needs from the outside
#[derive(Clone)]
pub struct ExporterCollaborators {
    /// Payload encryption
    pub encrypter: Arc<dyn Encrypter>,
    /// Job engine accepting batches and answering progress queries
    pub scheduler: Arc<dyn JobScheduler>,
    /// Local repository records
    pub store: Arc<dyn RepositoryStore>,
    /// Remote client construction
    pub remotes: Arc<dyn RemoteClientFactory>,
    /// Git push
    pub git: Arc<dyn GitOperations>,
    /// Completion notifications
    pub events: Arc<dyn EventPublisher>,
}

/// Entry point for exporting repositories
///
/// # Examples
///
/// ```rust,no_run
/// use gitport::core::export::{ExporterCollaborators, RepositoryExporter};
/// use gitport::adapters::jobs::InMemoryJobEngine;
/// use gitport::domain::{Repository, SpaceId, TargetAccount};
///
/// # async fn example(
/// #     collaborators: ExporterCollaborators,
/// #     engine: InMemoryJobEngine,
/// #     account: TargetAccount,
/// #     repos: Vec<Repository>,
/// # ) -> gitport::domain::Result<()> {
/// let exporter = RepositoryExporter::new(collaborators);
/// exporter.register(&engine).await?;
///
/// exporter.run_many(SpaceId::new(7), &account, &repos).await?;
/// let progress = exporter.progress(SpaceId::new(7)).await?;
/// # Ok(())
/// # }
/// ```
pub struct RepositoryExporter {
    executor: Arc<ExportExecutor>,
    submitter: BatchSubmitter,
    scheduler: Arc<dyn JobScheduler>,
}

impl RepositoryExporter {
    /// Create an exporter
    pub fn new(collaborators: ExporterCollaborators) -> Self {
        let codec = PayloadCodec::new(collaborators.encrypter);

        let executor = Arc::new(ExportExecutor::new(ExportDependencies {
            codec: codec.clone(),
            store: collaborators.store,
            remotes: collaborators.remotes,
            git: collaborators.git,
            events: collaborators.events,
        }));

        Self {
            executor,
            submitter: BatchSubmitter::new(codec, Arc::clone(&collaborators.scheduler)),
            scheduler: collaborators.scheduler,
        }
    }

    /// The export job handler
    pub fn executor(&self) -> Arc<ExportExecutor> {
        Arc::clone(&self.executor)
    }

    /// Registers the export handler under `repository_export`
    ///
    /// # Errors
    ///
    /// Returns the registry's error, e.g. when the type is already registered
    pub async fn register(&self, registry: &dyn JobRegistry) -> Result<()> {
        registry
            .register(EXPORT_JOB_TYPE, self.executor.clone())
            .await
    }

    /// Submits one export job per repository
    pub async fn run_many(
        &self,
        space_id: SpaceId,
        target_account: &TargetAccount,
        repositories: &[Repository],
    ) -> Result<JobGroupId> {
        self.submitter
            .submit_batch(space_id, target_account, repositories)
            .await
    }

    /// Progress of the space's export batch
    pub async fn progress(&self, space_id: SpaceId) -> Result<Vec<JobProgress>> {
        progress::group_progress(self.scheduler.as_ref(), space_id).await
    }
}
