//! Convenience result type alias for TickGate.

use crate::error::AppError;

/// A specialized `Result` type for TickGate operations.
pub type AppResult<T> = Result<T, AppError>;
