use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PostId;

/// Post object as stored by the content service. Everything except the id is
/// optional because drafts come back at varying stages of completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendPost {
    pub id: PostId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_markdown: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub viral_score: Option<i64>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub reading_time_min: Option<i64>,
    #[serde(default)]
    pub seo_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub critique_notes: Option<String>,
    #[serde(default)]
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Sparse update body for `PUT /posts/:id`. Absent fields are left as-is by
/// the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viral_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critique_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

impl BackendPostPatch {
    pub fn is_empty(&self) -> bool {
        self == &BackendPostPatch::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
}

/// The generator has returned both a bare object and a one-element array for
/// `data` across releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedData {
    Many(Vec<BackendPost>),
    One(Box<BackendPost>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub data: GeneratedData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStats {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub reactions: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl ArticleStats {
    /// Chart label: titles longer than `max_chars` are cut and suffixed with `...`.
    pub fn short_title(&self, max_chars: usize) -> String {
        if self.title.chars().count() > max_chars {
            let head: String = self.title.chars().take(max_chars).collect();
            format!("{head}...")
        } else {
            self.title.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsTotals {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub reactions: u64,
    #[serde(default)]
    pub comments: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsData {
    #[serde(default)]
    pub devto: Vec<ArticleStats>,
    #[serde(default)]
    pub hashnode: Vec<ArticleStats>,
    #[serde(default)]
    pub totals: AnalyticsTotals,
}

impl AnalyticsData {
    pub fn recomputed_totals(&self) -> AnalyticsTotals {
        self.devto
            .iter()
            .chain(self.hashnode.iter())
            .fold(AnalyticsTotals::default(), |acc, article| AnalyticsTotals {
                views: acc.views + article.views,
                reactions: acc.reactions + article.reactions,
                comments: acc.comments + article.comments,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(default)]
    pub summary: String,
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewsItem {
    pub fn published_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsQuery {
    pub topic: String,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub devto_configured: bool,
    #[serde(default)]
    pub hashnode_configured: bool,
    #[serde(default)]
    pub devto_api_key: Option<String>,
    #[serde(default)]
    pub hashnode_token: Option<String>,
    #[serde(default)]
    pub hashnode_pub_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devto_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashnode_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashnode_pub_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAuthRequest {
    pub credential: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: UserProfile,
}
