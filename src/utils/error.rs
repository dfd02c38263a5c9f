use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Server responded with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("File not found: {path}")]
    MissingFile { path: String },
}

impl AssistError {
    /// Short message suitable for printing to a terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            AssistError::ApiError(e) if e.is_timeout() => {
                "The upload request timed out.".to_string()
            }
            AssistError::ApiError(e) if e.is_connect() => {
                "Could not connect to the upload endpoint.".to_string()
            }
            AssistError::ApiError(_) => "The upload request failed.".to_string(),
            AssistError::HttpStatus { status, .. } => {
                format!("The server rejected the upload (HTTP {}).", status)
            }
            AssistError::MissingFile { path } => format!("Cannot read file '{}'.", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let err = AssistError::HttpStatus {
            status: 403,
            body: "CSRF verification failed".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "The server rejected the upload (HTTP 403)."
        );
        assert!(err.to_string().contains("CSRF verification failed"));
    }

    #[test]
    fn test_config_error_falls_back_to_display() {
        let err = AssistError::InvalidConfigValueError {
            field: "submit.endpoint".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        assert_eq!(err.user_friendly_message(), err.to_string());
    }
}
