//! Configuration management for Gitport.
//!
//! Gitport reads a single TOML file (`gitport.toml` by default) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GITPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gitport::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("gitport.toml")?;
//! println!("Remote: {}", config.remote.base_url);
//! println!("Repositories under: {}", config.git.repos_root.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`RemoteConfig`] - remote hosting API
//! - [`TargetConfig`] - remote account receiving the exports
//! - [`EncryptionConfig`] - job payload key
//! - [`GitConfig`] - local bare repositories
//! - [`JobsConfig`] - job engine tuning
//! - [`LoggingConfig`] - log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [remote]
//! base_url = "https://git.example.com"
//!
//! [target]
//! account_id = "acc-1"
//! org_identifier = "platform"
//! project_identifier = "migration"
//! token = "${GITPORT_REMOTE_TOKEN}"
//!
//! [encryption]
//! key = "${GITPORT_PAYLOAD_KEY}"
//!
//! [git]
//! repos_root = "/srv/git/repositories"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config, ENV_PREFIX};
pub use schema::{
    ApplicationConfig, EncryptionConfig, GitConfig, GitportConfig, JobsConfig, LoggingConfig,
    RemoteConfig, TargetConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
