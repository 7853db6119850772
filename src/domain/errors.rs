//! Domain error types
//!
//! This module defines the error hierarchy for Intake.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Intake error type
///
/// Blocked submissions (structural errors, server field errors, duplicates)
/// are not errors: they are reported as [`crate::core::intake::SubmitOutcome`]
/// values. This type covers everything that stops an operation outright.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend transport failure on any endpoint other than an expired session
    #[error("{0}")]
    Transport(ApiError),

    /// The session token was rejected (401) or is missing
    ///
    /// Never displayed as a form error. The session controller clears the
    /// token and navigates to the login entry point.
    #[error("Session expired, please sign in again")]
    AuthExpired,

    /// The signed-in role may not perform the operation
    #[error("{0}")]
    NotPermitted(String),

    /// A form edit could not be applied to the draft
    #[error("Invalid value for {path}: {message}")]
    InvalidField { path: String, message: String },

    /// Document upload failed; the draft is left unchanged
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Session persistence errors
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl IntakeError {
    /// Whether the error is the session-expiry signal
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, IntakeError::AuthExpired)
    }

    /// Message suitable for the single error banner under the form
    pub fn banner_message(&self) -> String {
        match self {
            IntakeError::Transport(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Backend API errors
///
/// Errors that occur when talking to the REST backend.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Failed to reach the backend
    #[error("Failed to connect to backend: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Any 401 response
    #[error("Authentication expired")]
    AuthExpired,

    /// Client error (4xx other than 401)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Response had an unexpected status or could not be decoded
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthExpired => Some(401),
            ApiError::ClientError { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// The normalized message shown to the user
    ///
    /// For HTTP errors this is the backend's own message; transport
    /// failures fall back to the transport error text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ClientError { message, .. } | ApiError::ServerError { message, .. } => {
                message.clone()
            }
            ApiError::ConnectionFailed(msg)
            | ApiError::Timeout(msg)
            | ApiError::InvalidResponse(msg) => msg.clone(),
            ApiError::AuthExpired => "Session expired".to_string(),
        }
    }
}

impl From<ApiError> for IntakeError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthExpired => IntakeError::AuthExpired,
            other => IntakeError::Transport(other),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        IntakeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for IntakeError {
    fn from(err: serde_json::Error) -> Self {
        IntakeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for IntakeError {
    fn from(err: toml::de::Error) -> Self {
        IntakeError::Configuration(format!("TOML parse error: {err}"))
    }
}
