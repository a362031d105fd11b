//! Configuration schema definitions
//!
//! Every section of `gitport.toml` maps onto one struct here. Optional values
//! carry serde defaults; cross-field checks live in each section's `validate`.

use super::secret::SecretString;
use crate::domain::TargetAccount;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
///
/// Maps onto the whole TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote hosting service
    pub remote: RemoteConfig,

    /// Account on the remote host that receives the exports
    pub target: TargetConfig,

    /// Job payload encryption
    pub encryption: EncryptionConfig,

    /// Local git storage
    pub git: GitConfig,

    /// Job engine tuning
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GitportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value found
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.remote.validate()?;
        self.target.validate()?;
        self.encryption.validate()?;
        self.git.validate()?;
        self.jobs.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Remote hosting service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the hosting API, e.g. `https://git.example.com`
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_remote_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl RemoteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("remote.base_url cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("remote.base_url is not a valid URL: {e}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "remote.base_url must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("remote.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Remote account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Account identifier
    pub account_id: String,

    /// Organization identifier
    pub org_identifier: String,

    /// Project identifier
    pub project_identifier: String,

    /// API token, also used as the push password
    pub token: SecretString,
}

impl TargetConfig {
    fn validate(&self) -> Result<(), String> {
        if self.account_id.trim().is_empty() {
            return Err("target.account_id cannot be empty".to_string());
        }
        if self.org_identifier.trim().is_empty() {
            return Err("target.org_identifier cannot be empty".to_string());
        }
        if self.project_identifier.trim().is_empty() {
            return Err("target.project_identifier cannot be empty".to_string());
        }
        if self.token.expose_secret().is_empty() {
            return Err("target.token cannot be empty".to_string());
        }
        Ok(())
    }

    /// The account every export of a run is delivered to
    pub fn to_account(&self) -> TargetAccount {
        TargetAccount::new(
            &self.account_id,
            &self.org_identifier,
            &self.project_identifier,
            self.token.clone(),
        )
    }
}

/// Job payload encryption configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Base64-encoded 256-bit AES key
    pub key: SecretString,
}

impl EncryptionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.key.expose_secret().is_empty() {
            return Err("encryption.key cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Local git storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Directory holding the bare repositories, one per `git_uid`
    pub repos_root: PathBuf,

    /// Git executable
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

impl GitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.repos_root.as_os_str().is_empty() {
            return Err("git.repos_root cannot be empty".to_string());
        }
        if self.git_binary.trim().is_empty() {
            return Err("git.git_binary cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Job engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Delay between a failed attempt and its retry
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// How long a cancelled attempt may take to unwind
    #[serde(default = "default_cancel_grace_seconds")]
    pub cancel_grace_seconds: u64,

    /// Interval at which the CLI polls batch progress
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl JobsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cancel_grace_seconds == 0 {
            return Err("jobs.cancel_grace_seconds must be > 0".to_string());
        }
        if self.poll_interval_ms < 50 {
            return Err("jobs.poll_interval_ms must be >= 50".to_string());
        }
        Ok(())
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay_ms(),
            cancel_grace_seconds: default_cancel_grace_seconds(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_remote_timeout_seconds() -> u64 {
    30
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_cancel_grace_seconds() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_local_path() -> String {
    "/var/log/gitport".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
