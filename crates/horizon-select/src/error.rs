//! Error types for Horizon Select.
//!
//! The selection engine itself is total: selecting, removing, filtering and
//! toggling never fail. Errors only arise at the edges, when loading a
//! configuration or compiling a search pattern.

use std::path::PathBuf;

/// Result type alias for Horizon Select operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or matching.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read a configuration file.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file extension is not recognized.
    #[error("Unsupported configuration format for '{path}' (expected .json or .toml)")]
    UnsupportedFormat {
        /// The file whose extension was rejected.
        path: PathBuf,
    },

    /// JSON configuration could not be parsed.
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The search pattern could not be compiled.
    #[error("Failed to build search pattern for '{search}': {source}")]
    Pattern {
        /// The search text the pattern was built from.
        search: String,
        /// The regex compilation failure.
        #[source]
        source: regex::Error,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create a pattern error.
    pub fn pattern(search: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            search: search.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_display() {
        let err = Error::io(
            "missing.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to read configuration 'missing.toml': not found"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = Error::unsupported_format("options.yaml");
        assert!(err.to_string().contains("options.yaml"));
    }

    #[test]
    fn test_pattern_error_fields() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = Error::pattern("(", source);
        match &err {
            Error::Pattern { search, .. } => assert_eq!(search, "("),
            other => panic!("expected a pattern error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("Failed to build search pattern for '('"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
