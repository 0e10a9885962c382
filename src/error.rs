use thiserror::Error;

/// Error type covering every fallible surface of the crate.
///
/// The analytics functions themselves are total and never fail; errors come
/// from the simulator (input validation) and the history store (I/O and
/// serialization).
#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InsightsError {
    /// Create a simulation error
    pub fn simulation<S: Into<String>>(msg: S) -> Self {
        Self::Simulation(msg.into())
    }

    /// Create a history error
    pub fn history<S: Into<String>>(msg: S) -> Self {
        Self::History(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a record not found error
    pub fn record_not_found<S: Into<String>>(id: S) -> Self {
        Self::RecordNotFound(id.into())
    }
}

/// Convenient result type for the crate
pub type Result<T> = std::result::Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation_helpers() {
        let sim_err = InsightsError::simulation("negative rate");
        match sim_err {
            InsightsError::Simulation(msg) => assert_eq!(msg, "negative rate"),
            _ => panic!("Expected Simulation error"),
        }

        let history_err = InsightsError::history("storage unavailable");
        match history_err {
            InsightsError::History(msg) => assert_eq!(msg, "storage unavailable"),
            _ => panic!("Expected History error"),
        }

        let not_found = InsightsError::record_not_found("rec-123");
        match not_found {
            InsightsError::RecordNotFound(id) => assert_eq!(id, "rec-123"),
            _ => panic!("Expected RecordNotFound error"),
        }
    }

    #[test]
    fn test_error_type_conversions() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: InsightsError = io_error.into();
        assert!(matches!(err, InsightsError::Io(_)));

        let json_error = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: InsightsError = json_error.into();
        assert!(matches!(err, InsightsError::Serialization(_)));
    }

    #[test]
    fn test_error_display_messages() {
        let errors = vec![
            (
                InsightsError::Simulation("period must be positive".to_string()),
                "Simulation error: period must be positive",
            ),
            (
                InsightsError::History("write failed".to_string()),
                "History error: write failed",
            ),
            (
                InsightsError::RecordNotFound("abc".to_string()),
                "Record not found: abc",
            ),
            (
                InsightsError::InvalidInput("bad value".to_string()),
                "Invalid input: bad value",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }
}
