//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GitportConfig;
use super::secret::secret_string;
use crate::domain::errors::GitportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "GITPORT_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders from the environment
/// 3. Parses the TOML into [`GitportConfig`]
/// 4. Applies `GITPORT_<SECTION>_<KEY>` overrides
/// 5. Validates the result
///
/// # Errors
///
/// Returns `GitportError::Configuration` if the file is missing or unreadable,
/// a referenced variable is unset, the TOML is malformed, or validation fails
///
/// # Examples
///
/// ```no_run
/// use gitport::config::load_config;
///
/// let config = load_config("gitport.toml").expect("Failed to load config");
/// println!("Exporting to {}", config.remote.base_url);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GitportConfig> {
    let contents = read_config_file(path.as_ref())?;
    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
///
/// # Errors
///
/// Same as [`load_config`], minus file access
pub fn parse_config(contents: &str) -> Result<GitportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: GitportConfig = toml::from_str(&contents)
        .map_err(|e| GitportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        GitportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(GitportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        GitportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Substitutes environment variables written as `${VAR_NAME}`
///
/// Comment lines are copied untouched so documented placeholders do not have
/// to be set.
///
/// # Errors
///
/// Lists every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| {
        GitportError::Configuration(format!("Invalid substitution pattern: {}", e))
    })?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(GitportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        GitportError::Configuration(format!(
            "Invalid value '{}' for {}{}",
            value, ENV_PREFIX, key
        ))
    })
}

/// Applies `GITPORT_<SECTION>_<KEY>` environment overrides
///
/// For example `GITPORT_REMOTE_BASE_URL` or `GITPORT_JOBS_RETRY_DELAY_MS`.
/// Unparseable numeric or boolean values are rejected rather than ignored.
fn apply_env_overrides(config: &mut GitportConfig) -> Result<()> {
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Remote
    if let Some(val) = env_override("REMOTE_BASE_URL") {
        config.remote.base_url = val;
    }
    if let Some(val) = env_override("REMOTE_TIMEOUT_SECONDS") {
        config.remote.timeout_seconds = parse_override("REMOTE_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = env_override("REMOTE_TLS_VERIFY") {
        config.remote.tls_verify = parse_override("REMOTE_TLS_VERIFY", &val)?;
    }

    // Target account
    if let Some(val) = env_override("TARGET_ACCOUNT_ID") {
        config.target.account_id = val;
    }
    if let Some(val) = env_override("TARGET_ORG_IDENTIFIER") {
        config.target.org_identifier = val;
    }
    if let Some(val) = env_override("TARGET_PROJECT_IDENTIFIER") {
        config.target.project_identifier = val;
    }
    if let Some(val) = env_override("TARGET_TOKEN") {
        config.target.token = secret_string(val);
    }

    if let Some(val) = env_override("ENCRYPTION_KEY") {
        config.encryption.key = secret_string(val);
    }

    // Git
    if let Some(val) = env_override("GIT_REPOS_ROOT") {
        config.git.repos_root = PathBuf::from(val);
    }
    if let Some(val) = env_override("GIT_GIT_BINARY") {
        config.git.git_binary = val;
    }

    // Jobs
    if let Some(val) = env_override("JOBS_RETRY_DELAY_MS") {
        config.jobs.retry_delay_ms = parse_override("JOBS_RETRY_DELAY_MS", &val)?;
    }
    if let Some(val) = env_override("JOBS_CANCEL_GRACE_SECONDS") {
        config.jobs.cancel_grace_seconds = parse_override("JOBS_CANCEL_GRACE_SECONDS", &val)?;
    }
    if let Some(val) = env_override("JOBS_POLL_INTERVAL_MS") {
        config.jobs.poll_interval_ms = parse_override("JOBS_POLL_INTERVAL_MS", &val)?;
    }

    // Logging
    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
