use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Backend post identifier. The service hands out either strings or integers
/// depending on the storage it runs against, so both are accepted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => PostId(value),
            RawId::Number(value) => PostId(value.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    NeedsReview,
    Approved,
    Published,
    Archived,
}

impl PostStatus {
    pub const ALL: [PostStatus; 5] = [
        PostStatus::Draft,
        PostStatus::NeedsReview,
        PostStatus::Approved,
        PostStatus::Published,
        PostStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::NeedsReview => "needs_review",
            PostStatus::Approved => "approved",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }

    /// Posts still waiting on a human decision.
    pub fn is_pending_review(self) -> bool {
        matches!(self, PostStatus::Draft | PostStatus::NeedsReview)
    }

    fn rank(self) -> u8 {
        match self {
            PostStatus::Draft => 0,
            PostStatus::NeedsReview => 1,
            PostStatus::Approved => 2,
            PostStatus::Published => 3,
            PostStatus::Archived => 4,
        }
    }

    /// Workflow only moves forward; archiving is reachable from anywhere.
    pub fn can_advance_to(self, next: PostStatus) -> bool {
        next == PostStatus::Archived || (self != PostStatus::Archived && next.rank() >= self.rank())
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

impl FromStr for PostStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// External platforms a reviewed draft can be published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Devto,
    Hashnode,
}

impl Platform {
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Devto => "Dev.to",
            Platform::Hashnode => "Hashnode",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Dashboard,
    Published,
    News,
    Analytics,
    Settings,
}

impl Tab {
    /// Tabs that render from their own data source instead of the post list.
    pub fn bypasses_posts(self) -> bool {
        matches!(self, Tab::News | Tab::Analytics | Tab::Settings)
    }

    pub fn shows(self, status: PostStatus) -> bool {
        match self {
            Tab::Dashboard => status.is_pending_review(),
            Tab::Published => status == PostStatus::Published,
            Tab::News | Tab::Analytics | Tab::Settings => false,
        }
    }
}
