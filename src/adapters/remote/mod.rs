//! Remote hosting target
//!
//! The export executor only needs two operations from the hosting API:
//! create a repository and delete it again. Clients are scoped to one target
//! account, so a [`RemoteClientFactory`] builds them from the credentials
//! carried by each export request.

pub mod http;

pub use http::{HttpRemoteClient, HttpRemoteClientFactory};

use crate::domain::{RemoteError, TargetAccount};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters of a remote repository creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepositorySpec {
    /// Remote unique name
    pub identifier: String,

    /// Default branch
    pub default_branch: String,

    /// Description
    pub description: String,

    /// Visibility
    pub is_public: bool,

    /// Whether the host should seed a README
    pub readme: bool,

    /// License template, empty for none
    pub license: String,

    /// Gitignore template, empty for none
    pub git_ignore: String,
}

impl CreateRepositorySpec {
    /// Spec for an empty repository ready to receive a mirror push
    ///
    /// No README, license or gitignore is seeded so the first push does not
    /// conflict with host-generated commits.
    pub fn empty(
        identifier: impl Into<String>,
        default_branch: impl Into<String>,
        description: impl Into<String>,
        is_public: bool,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            default_branch: default_branch.into(),
            description: description.into(),
            is_public,
            readme: false,
            license: String::new(),
            git_ignore: String::new(),
        }
    }
}

/// Handle on a repository created on the remote host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRepository {
    /// Remote numeric id
    pub id: i64,

    /// Remote unique name, used for deletion
    #[serde(alias = "uid")]
    pub identifier: String,

    /// Clone URL without credentials
    pub git_url: String,
}

/// Hosting API operations used by the export executor
#[async_trait]
pub trait RemoteTargetClient: Send + Sync {
    /// Creates a repository on the remote host
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::AlreadyExists` when the name is taken, or another
    /// `RemoteError` for transport and server failures
    async fn create_repository(
        &self,
        spec: &CreateRepositorySpec,
    ) -> Result<RemoteRepository, RemoteError>;

    /// Deletes a repository from the remote host
    async fn delete_repository(&self, identifier: &str) -> Result<(), RemoteError>;
}

/// Builds remote clients bound to a target account
pub trait RemoteClientFactory: Send + Sync {
    /// Returns a client authenticated as `account`
    fn client_for(
        &self,
        account: &TargetAccount,
    ) -> Result<Arc<dyn RemoteTargetClient>, RemoteError>;
}
