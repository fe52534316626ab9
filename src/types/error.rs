use thiserror::Error;

/// gridcal error types
#[derive(Error, Debug)]
pub enum GridcalError {
    /// Failed to parse an event source or config file
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Event record with missing or unparsable dates
    #[error("invalid event {id}: {reason}")]
    InvalidEvent { id: String, reason: String },

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for gridcal
pub type Result<T> = std::result::Result<T, GridcalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridcalError::Parse("invalid json".into());
        assert_eq!(err.to_string(), "parse error: invalid json");
    }

    #[test]
    fn test_invalid_event_display() {
        let err = GridcalError::InvalidEvent {
            id: "evt-1".into(),
            reason: "missing start".into(),
        };
        assert_eq!(err.to_string(), "invalid event evt-1: missing start");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GridcalError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
