use thiserror::Error;

/// Main error type for misinfo-kg
#[derive(Error, Debug)]
pub enum KgError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required input column is absent from the header row
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    /// A label or subject cell is missing entirely
    #[error("Row {row}: field '{field}' has no value")]
    EmptyField { row: usize, field: &'static str },

    /// dominant_topic is present but not numeric
    #[error("Row {row}: dominant_topic '{value}' is not an integer")]
    InvalidTopic { row: usize, value: String },

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using KgError
pub type Result<T> = std::result::Result<T, KgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KgError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let kg_err: KgError = io_err.into();
        assert!(matches!(kg_err, KgError::Io(_)));
    }

    #[test]
    fn test_missing_column_names_column() {
        let err = KgError::MissingColumn {
            column: "label".to_string(),
            path: "results.csv".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'label'"));
        assert!(msg.contains("results.csv"));
    }

    #[test]
    fn test_invalid_topic_names_row() {
        let err = KgError::InvalidTopic { row: 7, value: "abc".to_string() };
        assert_eq!(err.to_string(), "Row 7: dominant_topic 'abc' is not an integer");
    }
}
