//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with daily or hourly rotation
//!
//! Tokens, passwords and draft contents are never logged; submission IDs
//! and patient IDs are.
//!
//! # Example
//!
//! ```no_run
//! use intake::logging::init_logging;
//! use intake::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a submit attempt
///
/// # Example
///
/// ```no_run
/// use intake::log_submit_attempt;
/// use intake::domain::SubmissionId;
///
/// let submission_id = SubmissionId::generate();
/// log_submit_attempt!(&submission_id, 2);
/// ```
#[macro_export]
macro_rules! log_submit_attempt {
    ($submission_id:expr, $documents:expr) => {
        tracing::info!(
            submission_id = %$submission_id,
            documents = $documents,
            "Submitting patient intake"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use intake::log_error_with_context;
/// use intake::domain::IntakeError;
///
/// let error = IntakeError::Configuration("Invalid config".to_string());
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

/// Log a document upload
///
/// # Example
///
/// ```no_run
/// use intake::log_upload;
///
/// log_upload!("scan.pdf", "ID", 20_480);
/// ```
#[macro_export]
macro_rules! log_upload {
    ($file_name:expr, $doc_type:expr, $bytes:expr) => {
        tracing::info!(
            file_name = %$file_name,
            doc_type = %$doc_type,
            bytes = $bytes,
            "Uploading document"
        );
    };
}
