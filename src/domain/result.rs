//! Result type alias for Gitport

use super::errors::GitportError;

/// Result type alias for Gitport operations
///
/// # Examples
///
/// ```
/// use gitport::domain::result::Result;
/// use gitport::domain::errors::GitportError;
///
/// fn require_repositories(count: usize) -> Result<()> {
///     if count == 0 {
///         return Err(GitportError::Validation("no repositories".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(require_repositories(0).is_err());
/// ```
pub type Result<T> = std::result::Result<T, GitportError>;
