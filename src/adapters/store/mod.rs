//! Local repository metadata
//!
//! The executor resolves the live repository record at execution time rather
//! than trusting what was captured at submission.

pub mod memory;

pub use memory::InMemoryRepositoryStore;

use crate::domain::{Repository, RepositoryId, Result, SpaceId};
use async_trait::async_trait;

/// Read access to local repository records
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// Looks up a repository by id
    ///
    /// # Errors
    ///
    /// Returns `GitportError::RepositoryNotFound` if no record exists
    async fn find_by_id(&self, id: RepositoryId) -> Result<Repository>;

    /// Lists the repositories of a space, ordered by id
    async fn list_by_space(&self, space: SpaceId) -> Result<Vec<Repository>>;
}
