//! Error handling for texguard
//!
//! The analysis engine itself never fails: malformed markup degrades to
//! best-effort elements. This error type covers the surfaces around it:
//! caller-supplied element lists, file access and serialization.

use std::fmt;

/// texguard error type
#[derive(Debug, Clone)]
pub enum GuardError {
    /// Invalid input - e.g. elements that do not fit the text they claim to span
    InvalidInput { message: String },
    /// IO error (for file operations)
    IoError {
        message: String,
        path: Option<String>,
    },
    /// Serialization error (JSON output, WASM values)
    Serialization { message: String },
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            GuardError::IoError { message, path } => {
                if let Some(p) = path {
                    write!(f, "IO error on '{}': {}", p, message)
                } else {
                    write!(f, "IO error: {}", message)
                }
            }
            GuardError::Serialization { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for GuardError {}

impl From<std::io::Error> for GuardError {
    fn from(err: std::io::Error) -> Self {
        GuardError::IoError {
            message: err.to_string(),
            path: None,
        }
    }
}

#[cfg(feature = "cli")]
impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        GuardError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for texguard operations
pub type GuardResult<T> = Result<T, GuardError>;

// Convenience constructors for errors
impl GuardError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GuardError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn io_at(err: std::io::Error, path: impl Into<String>) -> Self {
        GuardError::IoError {
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        GuardError::Serialization {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = GuardError::invalid("element 0 is out of range");
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_io_error_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let msg = GuardError::io_at(io, "paper.tex").to_string();
        assert!(msg.contains("paper.tex"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GuardError = io.into();
        assert!(matches!(err, GuardError::IoError { path: None, .. }));
    }

    #[test]
    fn test_serialization_display() {
        let err = GuardError::serialization("bad value");
        assert_eq!(err.to_string(), "Serialization error: bad value");
    }
}
