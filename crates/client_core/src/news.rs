use shared::protocol::NewsItem;

/// Items revealed per "load more" step.
pub const NEWS_PAGE_SIZE: usize = 9;
/// Batch fetched up front so paging never waits on the network.
pub const NEWS_BATCH_LIMIT: u32 = 50;
pub const DEFAULT_NEWS_TOPIC: &str = "Technology";

/// Client-side paging over one fetched news batch.
#[derive(Debug, Clone, Default)]
pub struct NewsPager {
    items: Vec<NewsItem>,
    visible: usize,
}

impl NewsPager {
    pub fn new(items: Vec<NewsItem>) -> Self {
        let visible = NEWS_PAGE_SIZE.min(items.len());
        Self { items, visible }
    }

    pub fn visible(&self) -> &[NewsItem] {
        &self.items[..self.visible]
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.items.len()
    }

    pub fn load_more(&mut self) -> &[NewsItem] {
        let start = self.visible;
        self.visible = (self.visible + NEWS_PAGE_SIZE).min(self.items.len());
        &self.items[start..self.visible]
    }

    /// One-based page; pages past the end are empty.
    pub fn page(&self, page: usize) -> &[NewsItem] {
        let start = page.saturating_sub(1).saturating_mul(NEWS_PAGE_SIZE);
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + NEWS_PAGE_SIZE).min(self.items.len());
        &self.items[start..end]
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }
}
