//! Client library for the TrendFlow content service: typed HTTP access,
//! wire mapping, and the review-and-publish session state built on top.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod mapper;
pub mod news;
pub mod review;
pub mod session;
pub mod store;
pub mod types;

pub use api::{ApiClient, BlogApi};
pub use config::{load_config, ClientConfig};
pub use dashboard::{
    Action, AlwaysConfirm, ConfirmGate, Dashboard, DashboardEvent, SaveOutcome,
};
pub use error::{ClientError, FailureKind, Result};
pub use news::NewsPager;
pub use review::ReviewWorkflow;
pub use session::{BearerToken, Session, SessionStore};
pub use store::PostStore;
pub use types::{BlogPost, PostPatch};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
