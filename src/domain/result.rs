//! Result type alias for the exporter
//!
//! This module provides a convenient Result type alias that uses AppError
//! as the error type.

use super::errors::AppError;

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use vrma_batch::domain::result::Result;
/// use vrma_batch::domain::errors::AppError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AppError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AppError>;
