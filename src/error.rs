use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpsRipError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("No EPS files found in {directory}")]
    NoEpsFiles {
        directory: String,
        searched_extensions: Vec<String>,
    },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for EpsRipError {
    fn user_message(&self) -> String {
        match self {
            EpsRipError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            EpsRipError::InvalidPath { path } => {
                format!("Invalid source path: {}", path)
            }
            EpsRipError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            EpsRipError::NoEpsFiles {
                directory,
                searched_extensions,
            } => {
                format!(
                    "No EPS files (extensions: {}) found in {}",
                    searched_extensions.join(", "),
                    directory
                )
            }
            EpsRipError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            EpsRipError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present."
                    .to_string(),
            ),
            EpsRipError::InvalidPath { .. } => Some(
                "Verify the source directory exists and points at a directory, not a file."
                    .to_string(),
            ),
            EpsRipError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the source and output directories."
                    .to_string(),
            ),
            EpsRipError::NoEpsFiles { .. } => Some(
                "Point epsrip at a directory containing EPS files, or widen the search with --formats or --max-depth."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for EpsRipError {
    fn from(error: toml::de::Error) -> Self {
        EpsRipError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EpsRipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = EpsRipError::NoEpsFiles {
            directory: "./art".to_string(),
            searched_extensions: vec!["eps".to_string(), "epsf".to_string()],
        };
        assert!(error.user_message().contains("No EPS files"));
        assert!(error.user_message().contains("eps, epsf"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = EpsRipError::from(io_error);
        assert!(matches!(error, EpsRipError::Io(_)));
        assert!(error.suggestion().is_none());
    }

    #[test]
    fn test_cancelled_message() {
        let error = EpsRipError::Cancelled;
        assert!(error.user_message().contains("cancelled"));
    }
}
