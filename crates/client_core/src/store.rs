use shared::domain::{PostId, PostStatus, Tab};

use crate::{
    error::{ClientError, Result},
    types::BlogPost,
};

/// Authoritative in-memory post list for the session. Newest first.
#[derive(Debug, Default, Clone)]
pub struct PostStore {
    posts: Vec<BlogPost>,
}

impl PostStore {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self { posts }
    }

    pub fn replace_all(&mut self, posts: Vec<BlogPost>) {
        self.posts = posts;
    }

    pub fn prepend(&mut self, post: BlogPost) {
        self.posts.insert(0, post);
    }

    pub fn get(&self, id: &PostId) -> Option<&BlogPost> {
        self.posts.iter().find(|post| &post.id == id)
    }

    fn get_mut(&mut self, id: &PostId) -> Result<&mut BlogPost> {
        self.posts
            .iter_mut()
            .find(|post| &post.id == id)
            .ok_or_else(|| ClientError::UnknownPost(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn all(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn visible(&self, tab: Tab) -> Vec<&BlogPost> {
        if tab.bypasses_posts() {
            return Vec::new();
        }
        self.posts
            .iter()
            .filter(|post| tab.shows(post.status))
            .collect()
    }

    pub fn set_status(&mut self, id: &PostId, next: PostStatus) -> Result<()> {
        self.check_transition(id, next)?;
        self.get_mut(id)?.status = next;
        Ok(())
    }

    pub fn mark_published(&mut self, id: &PostId) -> Result<()> {
        self.set_status(id, PostStatus::Published)
    }

    /// Swaps in `post` for the entry with the same id. A status the stored
    /// entry cannot advance to is dropped in favor of the stored one.
    pub fn replace(&mut self, mut post: BlogPost) -> Result<()> {
        let slot = self.get_mut(&post.id)?;
        if !slot.status.can_advance_to(post.status) {
            post.status = slot.status;
        }
        *slot = post;
        Ok(())
    }

    /// Refuses `next` when the stored entry cannot move there.
    pub fn check_transition(&self, id: &PostId, next: PostStatus) -> Result<()> {
        let current = self
            .get(id)
            .ok_or_else(|| ClientError::UnknownPost(id.clone()))?
            .status;
        if current.can_advance_to(next) {
            Ok(())
        } else {
            Err(ClientError::InvalidTransition {
                id: id.clone(),
                from: current,
                to: next,
            })
        }
    }

    pub fn remove(&mut self, id: &PostId) -> Option<BlogPost> {
        let index = self.posts.iter().position(|post| &post.id == id)?;
        Some(self.posts.remove(index))
    }
}
