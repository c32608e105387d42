use shared::HistoryId;
use std::time::Duration;

use crate::config::Messages;

/// Local, synchronous rejection of an image before it becomes an upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("file too large: {size} bytes, the maximum is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("unreadable image")]
    UnreadableImage,
}

/// Why a submit was refused. The messages are shown inline next to the
/// submit button, one per unmet condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("Select a plant type first.")]
    NoPlantSelected,
    #[error("Upload a plant photo to start the diagnosis.")]
    NoImage,
    #[error("Wait for the image upload to finish.")]
    UploadInProgress,
    #[error("A diagnosis is already in progress.")]
    AlreadyInProgress,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("undecodable response body: {0}")]
    InvalidBody(String),
}

/// The service answered, but not with a usable diagnosis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("diagnosis rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("malformed prediction payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("invalid history identifier: {0:?}")]
    InvalidId(String),
    #[error("history record {0} not found")]
    NotFound(HistoryId),
    #[error("history lookup failed: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagnosisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl DiagnosisError {
    /// Text for the inline alert: the provider's own message when it sent
    /// one, otherwise the configured fallback for the failure class.
    pub fn user_message(&self, messages: &Messages) -> String {
        let provided = match self {
            Self::Transport(TransportError::Status { message, .. })
            | Self::Service(ServiceError::Rejected { message, .. }) => message.as_deref(),
            _ => None,
        };

        match provided.map(str::trim).filter(|m| !m.is_empty()) {
            Some(message) => message.to_string(),
            None => match self {
                Self::Transport(_) => messages.request_failed.clone(),
                Self::Service(_) => messages.prediction_failed.clone(),
                other => other.to_string(),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
