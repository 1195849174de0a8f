//! Error types for the portfolio page runtime
//!
//! Runtime misses on the page itself (unknown modal id, unknown project,
//! absent contact form) are not errors; they are silent no-ops. The variants
//! below cover configuration problems and host failures only.

/// Errors that can occur while configuring or mounting the page runtime
#[derive(Debug, Clone, PartialEq)]
pub enum FolioError {
    /// Visibility threshold outside `[0.0, 1.0]` or not finite
    InvalidThreshold(f64),

    /// The reveal coordinator was configured without any selectors
    EmptySelectors,

    /// Slideshow interval of zero milliseconds
    InvalidInterval,

    /// Configuration document could not be parsed
    Config(String),

    /// The browser host rejected a DOM operation
    Dom(String),
}

impl std::fmt::Display for FolioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold(value) => {
                write!(f, "visibility threshold {} is outside [0, 1]", value)
            }
            Self::EmptySelectors => write!(f, "reveal selector list is empty"),
            Self::InvalidInterval => write!(f, "slideshow interval must be non-zero"),
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Dom(msg) => write!(f, "dom error: {}", msg),
        }
    }
}

impl std::error::Error for FolioError {}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for page runtime operations
pub type FolioResult<T> = Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FolioError::InvalidThreshold(1.5);
        assert_eq!(err.to_string(), "visibility threshold 1.5 is outside [0, 1]");

        let err = FolioError::EmptySelectors;
        assert_eq!(err.to_string(), "reveal selector list is empty");

        let err = FolioError::InvalidInterval;
        assert_eq!(err.to_string(), "slideshow interval must be non-zero");

        let err = FolioError::Dom("querySelectorAll failed".to_string());
        assert_eq!(err.to_string(), "dom error: querySelectorAll failed");
    }

    #[test]
    fn test_json_error_converts_to_config() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: FolioError = parse.unwrap_err().into();
        assert!(matches!(err, FolioError::Config(_)));
    }
}
