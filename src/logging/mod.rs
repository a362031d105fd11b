//! Logging and observability
//!
//! Structured logging with:
//! - Console output for operators
//! - JSON log files with rotation
//! - Log level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use gitport::logging::init_logging;
//! use gitport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(space_id = 7, "Export batch submitted");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a repository export attempt
///
/// # Example
///
/// ```no_run
/// use gitport::log_export_start;
/// use gitport::domain::JobUid;
///
/// let job_uid = JobUid::new("export_repo_42").unwrap();
/// log_export_start!(&job_uid, "svc-a");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($job_uid:expr, $repo_uid:expr) => {
        tracing::info!(
            job_uid = %$job_uid,
            repo_uid = %$repo_uid,
            "Starting repository export"
        );
    };
}

/// Log the end of a repository export attempt
///
/// # Example
///
/// ```no_run
/// use gitport::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!("export_repo_42", "succeeded", Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($job_uid:expr, $outcome:expr, $duration:expr) => {
        tracing::info!(
            job_uid = %$job_uid,
            outcome = %$outcome,
            duration_ms = $duration.as_millis() as u64,
            "Repository export finished"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use gitport::log_error_with_context;
/// use gitport::domain::GitportError;
///
/// let error = GitportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use gitport::log_retry_attempt;
///
/// log_retry_attempt!(2, 2, "remote returned 502");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying job"
        );
    };
}
