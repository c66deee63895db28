pub use reqwest::StatusCode;
use shared::domain::PostId;
use thiserror::Error;

use crate::dashboard::Action;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Coarse failure taxonomy surfaced to whoever renders notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network unreachable, DNS, TLS, timeouts.
    Transport,
    /// The service answered with a non-success status.
    Http,
    /// The body could not be decoded into the expected shape.
    Shape,
    /// Refused locally before any request was issued.
    Local,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{operation} failed with HTTP {status}")]
    Http {
        operation: &'static str,
        status: StatusCode,
    },
    #[error("{operation} returned an unexpected body: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("generator returned no post")]
    EmptyGenerateResponse,
    #[error("post {0} is not loaded")]
    UnknownPost(PostId),
    #[error("post {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: PostId,
        from: shared::domain::PostStatus,
        to: shared::domain::PostStatus,
    },
    #[error("no post is being edited")]
    NotEditing,
    #[error("{0} is already in progress")]
    ActionInFlight(Action),
    #[error("action declined by user")]
    Declined,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("session storage error: {0}")]
    SessionIo(#[from] std::io::Error),
    #[error("session file is malformed: {0}")]
    SessionFormat(#[from] serde_json::Error),
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Transport(_) => FailureKind::Transport,
            ClientError::Http { .. } => FailureKind::Http,
            ClientError::Decode { .. } | ClientError::EmptyGenerateResponse => FailureKind::Shape,
            ClientError::EmptyTopic
            | ClientError::UnknownPost(_)
            | ClientError::InvalidTransition { .. }
            | ClientError::NotEditing
            | ClientError::ActionInFlight(_)
            | ClientError::Declined
            | ClientError::InvalidConfig(_)
            | ClientError::SessionIo(_)
            | ClientError::SessionFormat(_) => FailureKind::Local,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}
