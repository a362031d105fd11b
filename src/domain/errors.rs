//! Domain error types
//!
//! This module defines the error hierarchy for Gitport. Errors coming from
//! collaborators (HTTP client, git subprocess, cipher) are converted to strings
//! at the adapter boundary so third-party types never leak into the domain.

use super::ids::RepositoryId;
use thiserror::Error;

/// Main Gitport error type
///
/// This is the primary error type used throughout the application. Job
/// handlers return it to the job engine, which decides whether to retry.
#[derive(Debug, Error)]
pub enum GitportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to build the opaque job payload
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Failed to read back an opaque job payload
    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    /// Local repository record does not exist
    #[error("Repository not found: {0}")]
    RepositoryNotFound(RepositoryId),

    /// Remote hosting target errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Git push errors
    #[error("Push error: {0}")]
    Push(#[from] PushError),

    /// Encryption service errors
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The job engine rejected a request
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Notification bus errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// The running attempt was cancelled (timeout or shutdown)
    #[error("Operation cancelled")]
    Cancelled,

    /// A job attempt exceeded its time limit
    #[error("Job attempt timed out after {0} ms")]
    Timeout(u64),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while packaging an export request into job data
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The request could not be serialized
    #[error("failed to serialize job input: {0}")]
    Serialization(String),

    /// The encryption service refused to encrypt
    #[error("failed to encrypt job input: {0}")]
    Encryption(String),
}

/// Errors raised while unpacking job data
///
/// The variants let callers tell transient key problems (`Decryption`) from
/// corrupted data (`MalformedBase64`, `MalformedPayload`).
#[derive(Debug, Error)]
pub enum DecodingError {
    /// Job data is not valid base64
    #[error("failed to base64 decode job input: {0}")]
    MalformedBase64(String),

    /// Ciphertext could not be decrypted (wrong or rotated key, tampering)
    #[error("failed to decrypt job input: {0}")]
    Decryption(String),

    /// Decrypted text is not a valid payload
    #[error("failed to parse job input: {0}")]
    MalformedPayload(String),

    /// Payload was written by an incompatible version
    #[error("unsupported job input version: {0}")]
    UnsupportedVersion(u32),
}

/// Remote hosting target errors
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Failed to reach the remote hosting API
    #[error("Failed to connect to remote: {0}")]
    ConnectionFailed(String),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A repository with the requested name already exists remotely
    #[error("Remote repository already exists: {0}")]
    AlreadyExists(String),

    /// The remote repository does not exist
    #[error("Remote repository not found: {0}")]
    NotFound(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response from remote: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Git push errors
#[derive(Debug, Error)]
pub enum PushError {
    /// The source repository has nothing to push
    #[error("source repository is empty: {0}")]
    EmptySource(String),

    /// The remote clone URL cannot carry credentials
    #[error("invalid remote URL: {0}")]
    InvalidRemoteUrl(String),

    /// The push itself failed
    #[error("git push failed: {0}")]
    Failed(String),
}

impl PushError {
    /// Whether this outcome means "nothing to transfer" rather than a failure
    pub fn is_empty_source(&self) -> bool {
        matches!(self, PushError::EmptySource(_))
    }
}

/// Encryption service errors
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material is missing or malformed
    #[error("encryption key unavailable: {0}")]
    KeyUnavailable(String),

    /// Encryption failed
    #[error("encryption failed: {0}")]
    EncryptFailed(String),

    /// Decryption failed (wrong key or corrupted data)
    #[error("decryption failed: {0}")]
    DecryptFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for GitportError {
    fn from(err: std::io::Error) -> Self {
        GitportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GitportError {
    fn from(err: serde_json::Error) -> Self {
        GitportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GitportError {
    fn from(err: toml::de::Error) -> Self {
        GitportError::Configuration(format!("TOML parse error: {err}"))
    }
}
