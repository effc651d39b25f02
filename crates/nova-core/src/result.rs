//! Convenience result type alias for Nova.

use crate::error::AppError;

/// A specialized `Result` type for Nova operations.
pub type AppResult<T> = Result<T, AppError>;
