use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReporterError {
    /// Message suitable for showing inside the report window.
    ///
    /// I/O and internal details are logged, the user only sees a short summary.
    pub fn user_message(&self) -> String {
        match self {
            ReporterError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                "A file could not be read".to_string()
            }
            ReporterError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                "The report could not be prepared".to_string()
            }
            ReporterError::Validation(msg) => msg.clone(),
            ReporterError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                "The reporter is not configured correctly".to_string()
            }
            ReporterError::ExternalServiceError(msg) => {
                tracing::error!("External service error: {}", msg);
                "The report could not be sent. Check your connection and try again".to_string()
            }
            ReporterError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An unexpected error occurred".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ReporterError>;
