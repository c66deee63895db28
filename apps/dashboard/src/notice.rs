//! Blocking user notices for failed commands.

use std::fmt;

use client_core::{ClientError, FailureKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Notice {
    category: NoticeCategory,
    message: String,
}

impl Notice {
    pub fn from_error(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        let category = match err.downcast_ref::<ClientError>() {
            Some(client_err) => classify_client_error(client_err),
            None => classify_message(&message),
        };
        Self { category, message }
    }

    pub fn category(&self) -> NoticeCategory {
        self.category
    }

    /// Process exit status: 2 means sign in again, 3 means the service was unreachable.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            NoticeCategory::Auth => 2,
            NoticeCategory::Transport => 3,
            NoticeCategory::Validation | NoticeCategory::Unknown => 1,
        }
    }
}

fn classify_client_error(err: &ClientError) -> NoticeCategory {
    if err.is_unauthorized() {
        return NoticeCategory::Auth;
    }
    match err.kind() {
        FailureKind::Transport => NoticeCategory::Transport,
        FailureKind::Local | FailureKind::Shape => NoticeCategory::Validation,
        FailureKind::Http => NoticeCategory::Unknown,
    }
}

fn classify_message(message: &str) -> NoticeCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("401")
        || lower.contains("403")
        || lower.contains("unauthorized")
        || lower.contains("forbidden")
        || lower.contains("not signed in")
    {
        NoticeCategory::Auth
    } else if lower.contains("invalid") || lower.contains("missing") || lower.contains("malformed")
    {
        NoticeCategory::Validation
    } else if lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("unreachable")
        || lower.contains("dns")
    {
        NoticeCategory::Transport
    } else {
        NoticeCategory::Unknown
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            NoticeCategory::Auth => write!(
                f,
                "Not authorized: {}. Run `trendflow login` and retry.",
                self.message
            ),
            NoticeCategory::Transport => write!(
                f,
                "Service unreachable: {}. Check the API URL and network.",
                self.message
            ),
            NoticeCategory::Validation => write!(f, "Error: {}", self.message),
            NoticeCategory::Unknown => write!(f, "Request failed: {}", self.message),
        }
    }
}
