//! Shared fakes for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use gitport::adapters::crypto::{AesGcmEncrypter, Encrypter};
use gitport::adapters::events::{EventPublisher, EventType};
use gitport::adapters::git::GitOperations;
use gitport::adapters::remote::{
    CreateRepositorySpec, RemoteClientFactory, RemoteRepository, RemoteTargetClient,
};
use gitport::adapters::store::InMemoryRepositoryStore;
use gitport::config::{secret_string, SecretString};
use gitport::core::export::{ExportDependencies, ExportExecutor, PayloadCodec};
use gitport::domain::{
    ExportRequest, GitportError, PushError, RemoteError, Repository, RepositoryId, Result,
    SpaceId, TargetAccount,
};
use secrecy::ExposeSecret;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const SPACE: i64 = 7;

/// The repository used by the end-to-end scenarios
pub fn svc_a() -> Repository {
    Repository::builder()
        .id(RepositoryId::new(42))
        .parent_id(SpaceId::new(SPACE))
        .uid("svc-a")
        .git_uid("7/svc-a.git")
        .default_branch("main")
        .description("")
        .is_public(true)
        .build()
        .unwrap()
}

pub fn repository(id: i64, uid: &str) -> Repository {
    Repository::builder()
        .id(RepositoryId::new(id))
        .parent_id(SpaceId::new(SPACE))
        .uid(uid)
        .git_uid(format!("{SPACE}/{uid}.git"))
        .build()
        .unwrap()
}

pub fn account() -> TargetAccount {
    TargetAccount::new("acc", "org", "proj", secret_string("pat-123".to_string()))
}

pub fn encrypter() -> Arc<dyn Encrypter> {
    Arc::new(AesGcmEncrypter::from_key(&[7u8; 32]).unwrap())
}

/// Remote host fake recording every call
#[derive(Default)]
pub struct FakeRemote {
    pub created: Mutex<Vec<CreateRepositorySpec>>,
    pub deleted: Mutex<Vec<String>>,
    create_error: Mutex<Option<RemoteError>>,
    delete_error: Mutex<Option<RemoteError>>,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_create(error: RemoteError) -> Arc<Self> {
        let remote = Self::default();
        *remote.create_error.lock().unwrap() = Some(error);
        Arc::new(remote)
    }

    pub fn failing_delete(error: RemoteError) -> Arc<Self> {
        let remote = Self::default();
        *remote.delete_error.lock().unwrap() = Some(error);
        Arc::new(remote)
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteTargetClient for FakeRemote {
    async fn create_repository(
        &self,
        spec: &CreateRepositorySpec,
    ) -> std::result::Result<RemoteRepository, RemoteError> {
        self.created.lock().unwrap().push(spec.clone());
        if let Some(error) = self.create_error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(RemoteRepository {
            id: 1000,
            identifier: spec.identifier.clone(),
            git_url: format!("https://host/{}.git", spec.identifier),
        })
    }

    async fn delete_repository(&self, identifier: &str) -> std::result::Result<(), RemoteError> {
        self.deleted.lock().unwrap().push(identifier.to_string());
        match self.delete_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Hands out the same [`FakeRemote`] for every account
pub struct FakeRemoteFactory {
    pub remote: Arc<FakeRemote>,
    pub accounts: Mutex<Vec<TargetAccount>>,
}

impl FakeRemoteFactory {
    pub fn new(remote: Arc<FakeRemote>) -> Arc<Self> {
        Arc::new(Self {
            remote,
            accounts: Mutex::new(Vec::new()),
        })
    }
}

impl RemoteClientFactory for FakeRemoteFactory {
    fn client_for(
        &self,
        account: &TargetAccount,
    ) -> std::result::Result<Arc<dyn RemoteTargetClient>, RemoteError> {
        self.accounts.lock().unwrap().push(account.clone());
        Ok(self.remote.clone())
    }
}

/// What [`FakeGit`] does when asked to push
#[derive(Debug, Clone)]
pub enum PushBehavior {
    Succeed,
    Empty,
    Fail(String),
    /// Never finishes; signals `started` once entered
    Hang,
}

pub struct FakeGit {
    behavior: PushBehavior,
    pub pushes: Mutex<Vec<(String, String)>>,
    pub started: Notify,
}

impl FakeGit {
    pub fn new(behavior: PushBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            pushes: Mutex::new(Vec::new()),
            started: Notify::new(),
        })
    }

    pub fn push_calls(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }
}

#[async_trait]
impl GitOperations for FakeGit {
    async fn push_to_remote(
        &self,
        git_uid: &str,
        remote_url: &SecretString,
    ) -> std::result::Result<(), PushError> {
        self.pushes.lock().unwrap().push((
            git_uid.to_string(),
            remote_url.expose_secret().as_str().to_string(),
        ));

        match &self.behavior {
            PushBehavior::Succeed => Ok(()),
            PushBehavior::Empty => Err(PushError::EmptySource(format!("{git_uid} has no refs"))),
            PushBehavior::Fail(message) => Err(PushError::Failed(message.clone())),
            PushBehavior::Hang => {
                self.started.notify_one();
                std::future::pending().await
            }
        }
    }
}

/// Event publisher recording every published event
#[derive(Default)]
pub struct RecordingEvents {
    pub events: Mutex<Vec<(SpaceId, EventType, serde_json::Value)>>,
    pub fail: bool,
}

impl RecordingEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn published_ids(&self) -> Vec<i64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, _, payload)| payload["id"].as_i64())
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingEvents {
    async fn publish(
        &self,
        scope: SpaceId,
        event_type: EventType,
        payload: serde_json::Value,
    ) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((scope, event_type, payload));
        if self.fail {
            return Err(GitportError::Notification("bus unavailable".to_string()));
        }
        Ok(())
    }
}

/// Executor wired to fakes
pub struct Harness {
    pub remote: Arc<FakeRemote>,
    pub factory: Arc<FakeRemoteFactory>,
    pub git: Arc<FakeGit>,
    pub events: Arc<RecordingEvents>,
    pub store: Arc<InMemoryRepositoryStore>,
    pub codec: PayloadCodec,
}

impl Harness {
    pub fn new(remote: Arc<FakeRemote>, git: Arc<FakeGit>) -> Self {
        Self::with_events(remote, git, RecordingEvents::new())
    }

    pub fn with_events(
        remote: Arc<FakeRemote>,
        git: Arc<FakeGit>,
        events: Arc<RecordingEvents>,
    ) -> Self {
        Self {
            factory: FakeRemoteFactory::new(remote.clone()),
            remote,
            git,
            events,
            store: Arc::new(InMemoryRepositoryStore::with_repositories([svc_a()])),
            codec: PayloadCodec::new(encrypter()),
        }
    }

    pub fn executor(&self) -> ExportExecutor {
        ExportExecutor::new(ExportDependencies {
            codec: self.codec.clone(),
            store: self.store.clone(),
            remotes: self.factory.clone(),
            git: self.git.clone(),
            events: self.events.clone(),
        })
    }

    pub fn payload_for(&self, repository: &Repository) -> String {
        self.codec
            .encode(&ExportRequest::from_repository(repository, &account()))
            .unwrap()
    }
}

/// Polls `check` until it holds or `timeout` elapses
pub async fn eventually<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
