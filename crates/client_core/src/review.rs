//! Editor state for reviewing a single draft. The working copy is detached
//! from the store until a save succeeds.

use crate::{
    error::{ClientError, Result},
    types::{BlogPost, PostPatch},
};

/// Length of a Google result snippet; longer descriptions get truncated there.
pub const META_DESCRIPTION_LIMIT: usize = 160;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReviewWorkflow {
    #[default]
    Idle,
    Editing {
        original: BlogPost,
        working: BlogPost,
    },
}

impl ReviewWorkflow {
    pub fn begin(&mut self, post: &BlogPost) {
        *self = ReviewWorkflow::Editing {
            original: post.clone(),
            working: post.clone(),
        };
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, ReviewWorkflow::Editing { .. })
    }

    pub fn working(&self) -> Option<&BlogPost> {
        match self {
            ReviewWorkflow::Editing { working, .. } => Some(working),
            ReviewWorkflow::Idle => None,
        }
    }

    pub fn working_mut(&mut self) -> Result<&mut BlogPost> {
        match self {
            ReviewWorkflow::Editing { working, .. } => Ok(working),
            ReviewWorkflow::Idle => Err(ClientError::NotEditing),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.working_mut()?.title = title.into();
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Result<()> {
        self.working_mut()?.content = content.into();
        Ok(())
    }

    pub fn set_excerpt(&mut self, excerpt: impl Into<String>) -> Result<()> {
        self.working_mut()?.excerpt = excerpt.into();
        Ok(())
    }

    /// The excerpt is derived from the meta description, so both move together.
    pub fn set_meta_description(&mut self, description: impl Into<String>) -> Result<()> {
        let working = self.working_mut()?;
        working.meta_description = description.into();
        working.excerpt = working.meta_description.clone();
        Ok(())
    }

    pub fn set_target_audience(&mut self, audience: impl Into<String>) -> Result<()> {
        self.working_mut()?.target_audience = audience.into();
        Ok(())
    }

    pub fn set_image_prompt(&mut self, prompt: impl Into<String>) -> Result<()> {
        self.working_mut()?.image_prompt = prompt.into();
        Ok(())
    }

    pub fn set_critique_notes(&mut self, notes: impl Into<String>) -> Result<()> {
        self.working_mut()?.critique_notes = notes.into();
        Ok(())
    }

    /// `"AI, Tech , Future"` -> `["AI", "Tech", "Future"]`.
    pub fn set_keywords_csv(&mut self, csv: &str) -> Result<()> {
        let keywords: Vec<String> = csv
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect();
        let working = self.working_mut()?;
        working.tags = keywords.clone();
        working.seo_keywords = keywords;
        Ok(())
    }

    pub fn meta_description_len(&self) -> usize {
        self.working()
            .map(|post| post.meta_description.chars().count())
            .unwrap_or(0)
    }

    pub fn pending_patch(&self) -> Result<PostPatch> {
        match self {
            ReviewWorkflow::Editing { original, working } => {
                Ok(PostPatch::between(original, working))
            }
            ReviewWorkflow::Idle => Err(ClientError::NotEditing),
        }
    }

    /// Ends the session and hands the working copy back to the caller.
    pub fn finish(&mut self) -> Result<BlogPost> {
        match std::mem::take(self) {
            ReviewWorkflow::Editing { working, .. } => Ok(working),
            ReviewWorkflow::Idle => Err(ClientError::NotEditing),
        }
    }

    pub fn cancel(&mut self) -> Option<BlogPost> {
        match std::mem::take(self) {
            ReviewWorkflow::Editing { working, .. } => Some(working),
            ReviewWorkflow::Idle => None,
        }
    }
}
