//! Error types for climate-atlas operations.

use thiserror::Error;

/// Result type alias using ClimError.
pub type ClimResult<T> = Result<T, ClimError>;

/// Primary error type for catalog and analysis operations.
#[derive(Debug, Error)]
pub enum ClimError {
    // === Analysis Errors ===
    #[error("Dimension not found: {0}")]
    DimensionNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // === Catalog Errors ===
    #[error("Catalog endpoint returned status {status}")]
    RemoteUnavailable { status: u16 },

    #[error("Catalog endpoint unreachable: {0}")]
    RemoteUnreachable(String),

    #[error("Malformed payload: {0}")]
    ParseError(String),

    // === Resource Errors ===
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ClimError {
    fn from(err: serde_json::Error) -> Self {
        ClimError::ParseError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_unavailable_carries_status() {
        let err = ClimError::RemoteUnavailable { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_json_error_maps_to_parse_error() {
        let bad: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: ClimError = bad.unwrap_err().into();
        assert!(matches!(err, ClimError::ParseError(_)));
    }
}
