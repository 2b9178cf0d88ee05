//! Custom error types for get-papers-list.
//!
//! All library functions return `Result<T, PapersError>`. A malformed upstream
//! document surfaces as [`PapersError::Parse`] (or the underlying XML/JSON
//! error) and ends the run; there is no partial-result path.

use thiserror::Error;

/// Main error type for get-papers-list operations.
#[derive(Debug, Error)]
pub enum PapersError {
    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream service answered with a non-success status or an error payload
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code (0 when the error came inside a 200 payload)
        code: i32,
        /// Error message
        message: String,
    },

    /// Upstream document is missing expected structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// XML syntax error in the record payload
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using `PapersError`
pub type Result<T> = std::result::Result<T, PapersError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| PapersError::Parse(msg.to_string()))
    }
}
