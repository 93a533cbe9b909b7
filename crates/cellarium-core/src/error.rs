//! Error types for cellarium.

use thiserror::Error;

/// Result type alias using cellarium's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for browse/marshalling operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata query service failed. Propagated unchanged; this layer
    /// adds no retries or fallbacks.
    #[error("Query service error: {0}")]
    Query(String),

    /// The share directory collaborator failed. Propagated unchanged.
    #[error("Share directory error: {0}")]
    Share(String),

    /// Single-experimenter lookup matched zero or multiple rows.
    #[error("Experimenter not found: {0}")]
    ExperimenterNotFound(i64),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A projection row did not have the expected shape.
    #[error("Row decode error: {0}")]
    Decode(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_query() {
        let err = Error::Query("session expired".to_string());
        assert_eq!(err.to_string(), "Query service error: session expired");
    }

    #[test]
    fn test_error_display_share() {
        let err = Error::Share("share service unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "Share directory error: share service unavailable"
        );
    }

    #[test]
    fn test_error_display_experimenter_not_found() {
        let err = Error::ExperimenterNotFound(42);
        assert_eq!(err.to_string(), "Experimenter not found: 42");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_decode() {
        let err = Error::Decode("missing column ownerId".to_string());
        assert_eq!(err.to_string(), "Row decode error: missing column ownerId");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("negative limit".to_string());
        assert_eq!(err.to_string(), "Invalid input: negative limit");
    }

    #[test]
    fn test_error_display_internal() {
        let err = Error::Internal("unexpected state".to_string());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        let result = get_result();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::ExperimenterNotFound(7);
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("ExperimenterNotFound"));
    }
}
