//! Translation between the content service's post objects and [`BlogPost`].

use chrono::{DateTime, Utc};
use shared::{
    domain::{PostId, PostStatus, Sentiment},
    protocol::{BackendPost, BackendPostPatch, GeneratedData},
};
use tracing::warn;

use crate::types::{BlogPost, PostPatch};

const DEFAULT_AUTHOR: &str = "AI Agent";
const DEFAULT_CATEGORY: &str = "Tech";
const MAX_VIRAL_SCORE: i64 = 100;

pub fn placeholder_image_url(id: &PostId) -> String {
    format!("https://picsum.photos/seed/{id}/800/600")
}

pub fn from_backend(raw: BackendPost) -> BlogPost {
    let status = match raw.status.as_deref() {
        None => PostStatus::Draft,
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(post_id = %raw.id, status = value, "unknown post status, treating as draft");
            PostStatus::Draft
        }),
    };
    let sentiment = raw
        .sentiment
        .as_deref()
        .and_then(|value| value.parse::<Sentiment>().ok())
        .unwrap_or_default();
    let created_at = raw.created_at.as_deref().and_then(|value| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    });
    let meta_description = raw.meta_description.unwrap_or_default();
    let seo_keywords = raw.seo_keywords.unwrap_or_default();

    BlogPost {
        image_url: placeholder_image_url(&raw.id),
        title: raw.title.unwrap_or_default(),
        excerpt: meta_description.clone(),
        content: raw.content_markdown.unwrap_or_default(),
        author: DEFAULT_AUTHOR.to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        viral_score: raw.viral_score.unwrap_or(0).clamp(0, MAX_VIRAL_SCORE) as u8,
        sentiment,
        target_audience: raw.target_audience.unwrap_or_default(),
        reading_time_min: raw
            .reading_time_min
            .unwrap_or(0)
            .clamp(0, i64::from(u32::MAX)) as u32,
        tags: seo_keywords.clone(),
        seo_keywords,
        meta_description,
        image_prompt: raw.image_prompt.unwrap_or_default(),
        critique_notes: raw.critique_notes.unwrap_or_default(),
        status,
        created_at,
        id: raw.id,
    }
}

fn truthy_text(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Sparse backend patch. Only fields that are present and truthy survive:
/// `0`, `""` and an empty keyword list are dropped, never sent as a clear.
pub fn to_backend(patch: &PostPatch) -> BackendPostPatch {
    BackendPostPatch {
        title: truthy_text(&patch.title),
        content_markdown: truthy_text(&patch.content),
        status: patch.status.map(|status| status.as_str().to_string()),
        viral_score: patch.viral_score.filter(|v| *v != 0).map(i64::from),
        sentiment: patch.sentiment.map(|s| s.as_str().to_string()),
        target_audience: truthy_text(&patch.target_audience),
        reading_time_min: patch.reading_time_min.filter(|v| *v != 0).map(i64::from),
        seo_keywords: patch.seo_keywords.as_ref().filter(|v| !v.is_empty()).cloned(),
        meta_description: truthy_text(&patch.meta_description),
        critique_notes: truthy_text(&patch.critique_notes),
        image_prompt: truthy_text(&patch.image_prompt),
    }
}

/// Collapses the generator's object-or-array `data` into a single post.
pub fn normalize_generated(data: GeneratedData) -> Option<BackendPost> {
    match data {
        GeneratedData::One(post) => Some(*post),
        GeneratedData::Many(posts) => posts.into_iter().next(),
    }
}

#[cfg(test)]
#[path = "tests/mapper_tests.rs"]
mod tests;
