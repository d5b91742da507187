//! Advisor errors.

use thiserror::Error;

/// Result type for advisor operations.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Errors that can occur while building a recommendation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// The catalog has no profile for this system type / complexity grade pair.
    #[error("Unknown system configuration: {system} / {grade}")]
    UnknownSystemConfiguration { system: String, grade: String },

    /// Quantity is zero, negative or not an integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Controller model not present in the catalog.
    #[error("Unknown controller model: {0}")]
    UnknownController(String),

    /// Catalog tables are inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A textual request could not be parsed.
    #[error("Malformed request on line {line}: {text:?}")]
    MalformedRequest { line: usize, text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AdvisorError::UnknownSystemConfiguration {
            system: "vav".into(),
            grade: "verySimple".into(),
        };
        assert!(err.to_string().contains("vav / verySimple"));

        let err = AdvisorError::MalformedRequest {
            line: 3,
            text: "ahu".into(),
        };
        assert_eq!(err.to_string(), "Malformed request on line 3: \"ahu\"");
    }
}
