//! Result type alias for Intake

use super::errors::IntakeError;

/// Result type alias for Intake operations
///
/// # Examples
///
/// ```
/// use intake::domain::result::Result;
/// use intake::domain::errors::IntakeError;
///
/// fn failing_function() -> Result<()> {
///     Err(IntakeError::Session("no session file".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, IntakeError>;
