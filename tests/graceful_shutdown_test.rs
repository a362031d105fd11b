//! Integration tests for engine shutdown and in-flight job handling
//!
//! These tests verify that:
//! - Shutdown cancels running exports
//! - A cancelled export deletes the remote it created
//! - A job already in flight cannot be submitted again
//! - No new batches are accepted after shutdown

mod common;

use common::*;
use gitport::adapters::jobs::{EngineSettings, InMemoryJobEngine};
use gitport::adapters::store::InMemoryRepositoryStore;
use gitport::core::export::{ExporterCollaborators, RepositoryExporter};
use gitport::domain::{GitportError, JobStatus, SpaceId};
use std::sync::Arc;
use std::time::Duration;

fn setup(git: Arc<FakeGit>, remote: Arc<FakeRemote>) -> (InMemoryJobEngine, RepositoryExporter) {
    let engine = InMemoryJobEngine::new(EngineSettings {
        retry_delay: Duration::from_millis(10),
        cancel_grace: Duration::from_secs(2),
    });

    let exporter = RepositoryExporter::new(ExporterCollaborators {
        encrypter: encrypter(),
        scheduler: Arc::new(engine.clone()),
        store: Arc::new(InMemoryRepositoryStore::with_repositories([svc_a()])),
        remotes: FakeRemoteFactory::new(remote),
        git,
        events: RecordingEvents::new(),
    });

    (engine, exporter)
}

#[tokio::test]
async fn test_shutdown_cancels_push_and_deletes_remote() {
    let git = FakeGit::new(PushBehavior::Hang);
    let remote = FakeRemote::new();
    let (engine, exporter) = setup(git.clone(), remote.clone());
    exporter.register(&engine).await.unwrap();

    exporter
        .run_many(SpaceId::new(SPACE), &account(), &[svc_a()])
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), git.started.notified())
        .await
        .expect("push never started");

    let progress = exporter.progress(SpaceId::new(SPACE)).await.unwrap();
    assert_eq!(progress[0].state, JobStatus::Running);

    engine.shutdown().await;

    let progress = exporter.progress(SpaceId::new(SPACE)).await.unwrap();
    assert_eq!(progress[0].state, JobStatus::Failed);
    assert_eq!(remote.deleted(), vec!["svc-a".to_string()]);
    // shutdown does not retry
    assert_eq!(git.push_calls(), 1);
}

#[tokio::test]
async fn test_in_flight_job_cannot_be_resubmitted() {
    let git = FakeGit::new(PushBehavior::Hang);
    let (engine, exporter) = setup(git.clone(), FakeRemote::new());
    exporter.register(&engine).await.unwrap();

    exporter
        .run_many(SpaceId::new(SPACE), &account(), &[svc_a()])
        .await
        .unwrap();

    let second = exporter
        .run_many(SpaceId::new(SPACE), &account(), &[svc_a()])
        .await;
    assert!(matches!(second, Err(GitportError::Scheduler(_))));

    engine.shutdown().await;
}

#[tokio::test]
async fn test_finished_job_can_be_resubmitted() {
    let (engine, exporter) = setup(FakeGit::new(PushBehavior::Succeed), FakeRemote::new());
    exporter.register(&engine).await.unwrap();

    exporter
        .run_many(SpaceId::new(SPACE), &account(), &[svc_a()])
        .await
        .unwrap();
    engine.wait_idle().await;

    exporter
        .run_many(SpaceId::new(SPACE), &account(), &[svc_a()])
        .await
        .unwrap();
    engine.wait_idle().await;

    let progress = exporter.progress(SpaceId::new(SPACE)).await.unwrap();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].state, JobStatus::Succeeded);
}

#[tokio::test]
async fn test_no_batches_after_shutdown() {
    let (engine, exporter) = setup(FakeGit::new(PushBehavior::Succeed), FakeRemote::new());
    exporter.register(&engine).await.unwrap();

    engine.shutdown().await;

    let result = exporter
        .run_many(SpaceId::new(SPACE), &account(), &[svc_a()])
        .await;
    assert!(matches!(result, Err(GitportError::Scheduler(_))));
}
