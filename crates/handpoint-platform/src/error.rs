//! Common error types for handpoint-platform.

use handpoint_core::SinkError;
use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("injection failed: {0}")]
    InjectionFailed(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("source error: {0}")]
    Source(String),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

impl From<PlatformError> for SinkError {
    fn from(e: PlatformError) -> Self {
        SinkError::Failed(e.to_string())
    }
}
