use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Summary endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid summary URL: {0}")]
    Url(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the next scheduled poll may succeed where this one failed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Http(_) | AppError::Io(_) => true,
            AppError::Status { status, .. } => *status >= 500 || *status == 404,
            AppError::Json(_) => true,
            AppError::Url(_) | AppError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = AppError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Summary endpoint returned 503: unavailable"
        );
        assert!(err.is_transient());
    }

    #[test]
    fn test_config_error_not_transient() {
        let err = AppError::Config("bad interval".to_string());
        assert!(!err.is_transient());
        assert!(err.to_string().contains("bad interval"));
    }

    #[test]
    fn test_json_error_from() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Json(_)));
    }
}
