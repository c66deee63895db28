use chrono::{DateTime, Utc};
use shared::domain::{PostId, PostStatus, Sentiment};

/// Client-side view of a post, with every optional backend field resolved to a
/// concrete default by [`crate::mapper::from_backend`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub image_url: String,

    pub viral_score: u8,
    pub sentiment: Sentiment,
    pub target_audience: String,
    pub reading_time_min: u32,

    pub seo_keywords: Vec<String>,
    pub meta_description: String,
    pub image_prompt: String,

    pub critique_notes: String,

    pub status: PostStatus,
    pub created_at: Option<DateTime<Utc>>,
    /// Mirrors `seo_keywords`; older screens still read tags.
    pub tags: Vec<String>,
}

/// Partial update in client field names. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
    pub viral_score: Option<u8>,
    pub sentiment: Option<Sentiment>,
    pub target_audience: Option<String>,
    pub reading_time_min: Option<u32>,
    pub seo_keywords: Option<Vec<String>>,
    pub meta_description: Option<String>,
    pub critique_notes: Option<String>,
    pub image_prompt: Option<String>,
}

fn changed<T: Clone + PartialEq>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

impl PostPatch {
    /// Fields of `edited` that differ from `original`.
    pub fn between(original: &BlogPost, edited: &BlogPost) -> Self {
        Self {
            title: changed(&original.title, &edited.title),
            content: changed(&original.content, &edited.content),
            status: changed(&original.status, &edited.status),
            viral_score: changed(&original.viral_score, &edited.viral_score),
            sentiment: changed(&original.sentiment, &edited.sentiment),
            target_audience: changed(&original.target_audience, &edited.target_audience),
            reading_time_min: changed(&original.reading_time_min, &edited.reading_time_min),
            seo_keywords: changed(&original.seo_keywords, &edited.seo_keywords),
            meta_description: changed(&original.meta_description, &edited.meta_description),
            critique_notes: changed(&original.critique_notes, &edited.critique_notes),
            image_prompt: changed(&original.image_prompt, &edited.image_prompt),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &PostPatch::default()
    }

    /// Local merge used after the service acknowledged the same patch.
    pub fn apply_to(&self, post: &mut BlogPost) {
        if let Some(v) = &self.title {
            post.title = v.clone();
        }
        if let Some(v) = &self.content {
            post.content = v.clone();
        }
        if let Some(v) = self.status {
            post.status = v;
        }
        if let Some(v) = self.viral_score {
            post.viral_score = v;
        }
        if let Some(v) = self.sentiment {
            post.sentiment = v;
        }
        if let Some(v) = &self.target_audience {
            post.target_audience = v.clone();
        }
        if let Some(v) = self.reading_time_min {
            post.reading_time_min = v;
        }
        if let Some(v) = &self.seo_keywords {
            post.seo_keywords = v.clone();
            post.tags = v.clone();
        }
        if let Some(v) = &self.meta_description {
            post.meta_description = v.clone();
            post.excerpt = v.clone();
        }
        if let Some(v) = &self.critique_notes {
            post.critique_notes = v.clone();
        }
        if let Some(v) = &self.image_prompt {
            post.image_prompt = v.clone();
        }
    }
}
