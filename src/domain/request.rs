//! Export request model
//!
//! An [`ExportRequest`] captures one repository's export intent together with
//! the credentials of the remote account it is exported to. It only ever
//! exists in memory or inside the encrypted job payload.

use super::ids::RepositoryId;
use super::repository::Repository;
use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Remote account an export is delivered to
///
/// Shared by every request of one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetAccount {
    /// Remote account identifier
    pub account_id: String,

    /// Remote organization identifier
    pub org_identifier: String,

    /// Remote project identifier
    pub project_identifier: String,

    /// Access token used for the hosting API and as the push password
    pub token: SecretString,
}

impl TargetAccount {
    /// Creates a new TargetAccount
    pub fn new(
        account_id: impl Into<String>,
        org_identifier: impl Into<String>,
        project_identifier: impl Into<String>,
        token: SecretString,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            org_identifier: org_identifier.into(),
            project_identifier: project_identifier.into(),
            token,
        }
    }
}

impl PartialEq for TargetAccount {
    fn eq(&self, other: &Self) -> bool {
        self.account_id == other.account_id
            && self.org_identifier == other.org_identifier
            && self.project_identifier == other.project_identifier
            && self.token.expose_secret() == other.token.expose_secret()
    }
}

/// One repository's export intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Local unique name, reused as the remote name
    pub uid: String,

    /// Local repository id
    pub id: RepositoryId,

    /// Description copied to the remote
    pub description: String,

    /// Visibility copied to the remote
    pub is_public: bool,

    /// Destination account
    pub target_account: TargetAccount,
}

impl ExportRequest {
    /// Merges a live repository record with the shared target account
    pub fn from_repository(repository: &Repository, target_account: &TargetAccount) -> Self {
        Self {
            uid: repository.uid.clone(),
            id: repository.id,
            description: repository.description.clone(),
            is_public: repository.is_public,
            target_account: target_account.clone(),
        }
    }
}
