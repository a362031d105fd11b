//! Local repository record
//!
//! This module defines the metadata Gitport reads about a repository hosted on
//! the self-hosted instance before exporting it.

use super::ids::{RepositoryId, SpaceId};
use serde::{Deserialize, Serialize};

fn default_branch() -> String {
    "main".to_string()
}

/// A repository as recorded by the local instance
///
/// # Examples
///
/// ```
/// use gitport::domain::repository::RepositoryBuilder;
/// use gitport::domain::ids::{RepositoryId, SpaceId};
///
/// let repo = RepositoryBuilder::new()
///     .id(RepositoryId::new(42))
///     .parent_id(SpaceId::new(7))
///     .uid("svc-a")
///     .git_uid("a1b2c3")
///     .build()
///     .unwrap();
///
/// assert_eq!(repo.default_branch, "main");
/// assert!(!repo.is_public);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric repository id
    pub id: RepositoryId,

    /// Owning space
    pub parent_id: SpaceId,

    /// Unique name within the space
    pub uid: String,

    /// Storage identifier of the bare repository on disk
    pub git_uid: String,

    /// Default branch
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Visibility flag
    #[serde(default)]
    pub is_public: bool,
}

impl Repository {
    /// Creates a new builder for constructing a Repository
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::default()
    }
}

/// Builder for constructing Repository instances
#[derive(Debug, Default)]
pub struct RepositoryBuilder {
    id: Option<RepositoryId>,
    parent_id: Option<SpaceId>,
    uid: Option<String>,
    git_uid: Option<String>,
    default_branch: Option<String>,
    description: Option<String>,
    is_public: bool,
}

impl RepositoryBuilder {
    /// Creates a new RepositoryBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repository id
    pub fn id(mut self, id: RepositoryId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the owning space
    pub fn parent_id(mut self, parent_id: SpaceId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the unique name
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Sets the storage identifier
    pub fn git_uid(mut self, git_uid: impl Into<String>) -> Self {
        self.git_uid = Some(git_uid.into());
        self
    }

    /// Sets the default branch (defaults to `main`)
    pub fn default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    /// Sets the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the visibility flag
    pub fn is_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Builds the Repository
    ///
    /// # Errors
    ///
    /// Returns an error if id, parent_id, uid or git_uid is missing, or if uid
    /// is blank
    pub fn build(self) -> Result<Repository, String> {
        let uid = self.uid.ok_or("uid is required")?;
        if uid.trim().is_empty() {
            return Err("uid cannot be empty".to_string());
        }

        Ok(Repository {
            id: self.id.ok_or("id is required")?,
            parent_id: self.parent_id.ok_or("parent_id is required")?,
            uid,
            git_uid: self.git_uid.ok_or("git_uid is required")?,
            default_branch: self.default_branch.unwrap_or_else(default_branch),
            description: self.description.unwrap_or_default(),
            is_public: self.is_public,
        })
    }
}
