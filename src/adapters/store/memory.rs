//! Repository store backed by a TOML manifest
//!
//! The manifest lists repositories as an array of tables:
//!
//! ```toml
//! [[repositories]]
//! id = 42
//! parent_id = 7
//! uid = "svc-a"
//! git_uid = "a1b2c3"
//! default_branch = "main"
//! description = "service A"
//! is_public = false
//! ```

use super::RepositoryStore;
use crate::domain::{GitportError, Repository, RepositoryId, Result, SpaceId};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    repositories: Vec<Repository>,
}

/// In-memory [`RepositoryStore`]
#[derive(Debug, Default)]
pub struct InMemoryRepositoryStore {
    repositories: RwLock<BTreeMap<RepositoryId, Repository>>,
}

impl InMemoryRepositoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `repositories`
    pub fn with_repositories(repositories: impl IntoIterator<Item = Repository>) -> Self {
        Self {
            repositories: RwLock::new(repositories.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    /// Parse a manifest from TOML text
    ///
    /// # Errors
    ///
    /// Returns `GitportError::Configuration` on invalid TOML and
    /// `GitportError::Validation` on duplicate ids
    pub fn from_manifest_str(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;

        let mut repositories = BTreeMap::new();
        for repo in manifest.repositories {
            if repo.uid.trim().is_empty() {
                return Err(GitportError::Validation(format!(
                    "repository {} has an empty uid",
                    repo.id
                )));
            }
            if let Some(previous) = repositories.insert(repo.id, repo) {
                return Err(GitportError::Validation(format!(
                    "duplicate repository id {} in manifest",
                    previous.id
                )));
            }
        }

        Ok(Self {
            repositories: RwLock::new(repositories),
        })
    }

    /// Load a manifest file
    pub fn from_manifest(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GitportError::Configuration(format!(
                "Failed to read repository manifest '{}': {e}",
                path.display()
            ))
        })?;

        let store = Self::from_manifest_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded repository manifest");
        Ok(store)
    }

    /// Insert or replace a record
    pub async fn upsert(&self, repository: Repository) {
        self.repositories
            .write()
            .await
            .insert(repository.id, repository);
    }

    /// Remove a record
    pub async fn remove(&self, id: RepositoryId) -> Option<Repository> {
        self.repositories.write().await.remove(&id)
    }
}

#[async_trait]
impl RepositoryStore for InMemoryRepositoryStore {
    async fn find_by_id(&self, id: RepositoryId) -> Result<Repository> {
        self.repositories
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GitportError::RepositoryNotFound(id))
    }

    async fn list_by_space(&self, space: SpaceId) -> Result<Vec<Repository>> {
        Ok(self
            .repositories
            .read()
            .await
            .values()
            .filter(|r| r.parent_id == space)
            .cloned()
            .collect())
    }
}
