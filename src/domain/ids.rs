//! Domain identifier types
//!
//! Newtype wrappers for repository, space and job identifiers. Job identities
//! are derived deterministically from the numeric ids so resubmitting the same
//! export always produces the same identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const EXPORT_REPO_JOB_UID: &str = "export_repo_";
const EXPORT_SPACE_JOB_GROUP: &str = "export_space_";

/// Local repository identifier
///
/// # Examples
///
/// ```
/// use gitport::domain::ids::RepositoryId;
///
/// let id: RepositoryId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(i64);

impl RepositoryId {
    /// Creates a new RepositoryId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RepositoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| format!("Invalid repository id '{s}': {e}"))
    }
}

/// Space (repository collection) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(i64);

impl SpaceId {
    /// Creates a new SpaceId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpaceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| format!("Invalid space id '{s}': {e}"))
    }
}

/// Job identity
///
/// The job engine guarantees at most one in-flight execution per identity.
///
/// # Examples
///
/// ```
/// use gitport::domain::ids::{JobUid, RepositoryId};
///
/// let uid = JobUid::for_repository(RepositoryId::new(42));
/// assert_eq!(uid.as_str(), "export_repo_42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobUid(String);

impl JobUid {
    /// Creates a new JobUid from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(JobUid)` if the identity is non-empty, `Err` otherwise
    pub fn new(uid: impl Into<String>) -> Result<Self, String> {
        let uid = uid.into();
        if uid.trim().is_empty() {
            return Err("Job UID cannot be empty".to_string());
        }
        Ok(Self(uid))
    }

    /// Derives the export job identity of a repository
    pub fn for_repository(id: RepositoryId) -> Self {
        Self(format!("{EXPORT_REPO_JOB_UID}{id}"))
    }

    /// Returns the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for JobUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Job group identity
///
/// Correlates all jobs of one batch submission for aggregate progress queries.
///
/// # Examples
///
/// ```
/// use gitport::domain::ids::{JobGroupId, SpaceId};
///
/// let group = JobGroupId::for_space(SpaceId::new(7));
/// assert_eq!(group.as_str(), "export_space_7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobGroupId(String);

impl JobGroupId {
    /// Creates a new JobGroupId from a string
    pub fn new(group: impl Into<String>) -> Result<Self, String> {
        let group = group.into();
        if group.trim().is_empty() {
            return Err("Job group ID cannot be empty".to_string());
        }
        Ok(Self(group))
    }

    /// Derives the export job group of a space
    pub fn for_space(id: SpaceId) -> Self {
        Self(format!("{EXPORT_SPACE_JOB_GROUP}{id}"))
    }

    /// Returns the group identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for JobGroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
