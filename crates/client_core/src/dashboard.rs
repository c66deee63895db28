//! Session controller: owns the post store, the active tab and the review
//! workflow, and gates each user action so only one request per action is
//! outstanding. Local state changes only after the remote call succeeded.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use shared::{
    domain::{Platform, PostId, Tab},
    protocol::{AnalyticsData, NewsItem, PublishResponse, SettingsUpdate, UserSettings},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

use crate::{
    api::BlogApi,
    error::{ClientError, FailureKind, Result},
    review::ReviewWorkflow,
    store::PostStore,
    types::{BlogPost, PostPatch},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    LoadPosts,
    Generate,
    Save,
    Update(PostId),
    Publish(PostId),
    Delete(PostId),
    UpdateSettings,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::LoadPosts => f.write_str("loading posts"),
            Action::Generate => f.write_str("generating a draft"),
            Action::Save => f.write_str("saving the draft"),
            Action::Update(id) => write!(f, "updating post {id}"),
            Action::Publish(id) => write!(f, "publishing post {id}"),
            Action::Delete(id) => write!(f, "deleting post {id}"),
            Action::UpdateSettings => f.write_str("saving settings"),
        }
    }
}

/// Explicit user confirmation required before destructive actions.
pub trait ConfirmGate: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct AlwaysConfirm;

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    PostsLoaded {
        count: usize,
    },
    PostGenerated {
        id: PostId,
    },
    PostPublished {
        id: PostId,
        platform: Platform,
        url: String,
    },
    PostRejected {
        id: PostId,
    },
    PostSaved {
        id: PostId,
    },
    EditCancelled {
        id: PostId,
    },
    StaleSaveDropped {
        id: PostId,
        ticket: u64,
    },
    SettingsSaved,
    Failed {
        action: Action,
        kind: FailureKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Applied(BlogPost),
    /// The service accepted the save but a newer edit of the same post began
    /// meanwhile, so the response was not applied locally.
    Stale { id: PostId, ticket: u64 },
}

#[derive(Default)]
struct DashboardState {
    store: PostStore,
    tab: Tab,
    review: ReviewWorkflow,
    next_ticket: u64,
    latest_ticket: HashMap<PostId, u64>,
    editing_ticket: Option<u64>,
}

struct InFlightGuard<'a> {
    set: &'a StdMutex<HashSet<Action>>,
    action: Action,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.action);
    }
}

pub struct Dashboard {
    api: Arc<dyn BlogApi>,
    inner: Mutex<DashboardState>,
    in_flight: StdMutex<HashSet<Action>>,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            inner: Mutex::new(DashboardState::default()),
            in_flight: StdMutex::new(HashSet::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn is_in_flight(&self, action: &Action) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(action)
    }

    fn claim(&self, action: Action) -> Result<InFlightGuard<'_>> {
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(action.clone());
        if !inserted {
            return Err(self.fail(action.clone(), ClientError::ActionInFlight(action)));
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            action,
        })
    }

    fn emit(&self, event: DashboardEvent) {
        let _ = self.events.send(event);
    }

    fn fail(&self, action: Action, err: ClientError) -> ClientError {
        error!(%action, error = %err, "dashboard action failed");
        self.emit(DashboardEvent::Failed {
            action,
            kind: err.kind(),
            message: err.to_string(),
        });
        err
    }

    pub async fn set_tab(&self, tab: Tab) {
        self.inner.lock().await.tab = tab;
    }

    pub async fn tab(&self) -> Tab {
        self.inner.lock().await.tab
    }

    pub async fn visible_posts(&self) -> Vec<BlogPost> {
        let guard = self.inner.lock().await;
        guard
            .store
            .visible(guard.tab)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn posts(&self) -> Vec<BlogPost> {
        self.inner.lock().await.store.all().to_vec()
    }

    pub async fn post(&self, id: &PostId) -> Option<BlogPost> {
        self.inner.lock().await.store.get(id).cloned()
    }

    async fn require_post(&self, action: &Action, id: &PostId) -> Result<BlogPost> {
        match self.post(id).await {
            Some(post) => Ok(post),
            None => Err(self.fail(action.clone(), ClientError::UnknownPost(id.clone()))),
        }
    }

    pub async fn load_posts(&self) -> Result<usize> {
        let _flight = self.claim(Action::LoadPosts)?;
        let posts = match self.api.get_posts().await {
            Ok(posts) => posts,
            Err(err) => return Err(self.fail(Action::LoadPosts, err)),
        };
        let count = posts.len();
        self.inner.lock().await.store.replace_all(posts);
        info!(count, "posts loaded");
        self.emit(DashboardEvent::PostsLoaded { count });
        Ok(count)
    }

    pub async fn generate(&self, topic: &str) -> Result<BlogPost> {
        if topic.trim().is_empty() {
            return Err(self.fail(Action::Generate, ClientError::EmptyTopic));
        }
        let _flight = self.claim(Action::Generate)?;
        let post = match self.api.generate_post(topic).await {
            Ok(post) => post,
            Err(err) => return Err(self.fail(Action::Generate, err)),
        };
        self.inner.lock().await.store.prepend(post.clone());
        info!(post_id = %post.id, topic = topic.trim(), "draft generated");
        self.emit(DashboardEvent::PostGenerated {
            id: post.id.clone(),
        });
        Ok(post)
    }

    pub async fn approve(&self, id: &PostId, platform: Platform) -> Result<PublishResponse> {
        let action = Action::Publish(id.clone());
        self.require_post(&action, id).await?;
        let _flight = self.claim(action.clone())?;
        let published = match self.api.publish(id, platform).await {
            Ok(published) => published,
            Err(err) => return Err(self.fail(action, err)),
        };

        if let Err(err) = self.inner.lock().await.store.mark_published(id) {
            warn!(post_id = %id, error = %err, "published remotely but local status not updated");
        }
        info!(post_id = %id, %platform, url = %published.url, "post published");
        self.emit(DashboardEvent::PostPublished {
            id: id.clone(),
            platform,
            url: published.url.clone(),
        });
        Ok(published)
    }

    pub async fn reject(&self, id: &PostId, gate: &dyn ConfirmGate) -> Result<()> {
        let action = Action::Delete(id.clone());
        let post = self.require_post(&action, id).await?;
        if !gate.confirm(&format!(
            "Reject and delete the draft \"{}\"? This cannot be undone.",
            post.title
        )) {
            info!(post_id = %id, "rejection declined");
            return Err(ClientError::Declined);
        }

        let _flight = self.claim(action.clone())?;
        if let Err(err) = self.api.delete_post(id).await {
            return Err(self.fail(action, err));
        }

        {
            let mut guard = self.inner.lock().await;
            guard.store.remove(id);
            if guard.review.working().is_some_and(|working| &working.id == id) {
                guard.review.cancel();
                guard.editing_ticket = None;
            }
            guard.latest_ticket.remove(id);
        }
        info!(post_id = %id, "draft rejected");
        self.emit(DashboardEvent::PostRejected { id: id.clone() });
        Ok(())
    }

    /// Sends `patch` and merges it into the local copy once acknowledged; the
    /// service does not echo the updated post. A backward status move is
    /// refused before any request.
    pub async fn patch_post(&self, id: &PostId, patch: &PostPatch) -> Result<()> {
        let action = Action::Update(id.clone());
        self.require_post(&action, id).await?;
        if let Some(next) = patch.status {
            let checked = self.inner.lock().await.store.check_transition(id, next);
            if let Err(err) = checked {
                return Err(self.fail(action, err));
            }
        }
        let _flight = self.claim(action.clone())?;
        if let Err(err) = self.api.update_post(id, patch).await {
            return Err(self.fail(action, err));
        }

        let mut guard = self.inner.lock().await;
        let mut post = guard
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::UnknownPost(id.clone()))?;
        patch.apply_to(&mut post);
        guard.store.replace(post)
    }

    pub async fn begin_edit(&self, id: &PostId) -> Result<BlogPost> {
        let mut guard = self.inner.lock().await;
        let post = guard
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::UnknownPost(id.clone()))?;

        guard.next_ticket += 1;
        let ticket = guard.next_ticket;
        guard.latest_ticket.insert(id.clone(), ticket);
        guard.editing_ticket = Some(ticket);
        guard.review.begin(&post);
        Ok(post)
    }

    pub async fn edit<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut ReviewWorkflow) -> Result<()>,
    {
        let mut guard = self.inner.lock().await;
        if !guard.review.is_editing() {
            return Err(ClientError::NotEditing);
        }
        apply(&mut guard.review)
    }

    pub async fn working_copy(&self) -> Option<BlogPost> {
        self.inner.lock().await.review.working().cloned()
    }

    pub async fn save_edit(&self) -> Result<SaveOutcome> {
        let _flight = self.claim(Action::Save)?;
        let snapshot = {
            let guard = self.inner.lock().await;
            match (
                guard.review.working().cloned(),
                guard.review.pending_patch(),
                guard.editing_ticket,
            ) {
                (Some(working), Ok(patch), Some(ticket)) => Some((working, patch, ticket)),
                _ => None,
            }
        };
        let Some((working, patch, ticket)) = snapshot else {
            return Err(self.fail(Action::Save, ClientError::NotEditing));
        };
        let id = working.id.clone();

        // Review stays in Editing on failure so nothing typed is lost.
        if let Err(err) = self.api.update_post(&id, &patch).await {
            return Err(self.fail(Action::Save, err));
        }

        let mut guard = self.inner.lock().await;
        if guard.latest_ticket.get(&id) != Some(&ticket) {
            warn!(post_id = %id, ticket, "dropping stale save response");
            self.emit(DashboardEvent::StaleSaveDropped {
                id: id.clone(),
                ticket,
            });
            return Ok(SaveOutcome::Stale { id, ticket });
        }

        guard.store.replace(working.clone())?;
        if guard.editing_ticket == Some(ticket) {
            guard.review.finish()?;
            guard.editing_ticket = None;
        }
        drop(guard);

        info!(post_id = %id, "draft saved");
        self.emit(DashboardEvent::PostSaved { id });
        Ok(SaveOutcome::Applied(working))
    }

    pub async fn cancel_edit(&self) -> bool {
        let mut guard = self.inner.lock().await;
        guard.editing_ticket = None;
        match guard.review.cancel() {
            Some(discarded) => {
                drop(guard);
                self.emit(DashboardEvent::EditCancelled { id: discarded.id });
                true
            }
            None => false,
        }
    }

    pub async fn news(&self, topic: &str, limit: u32) -> Result<Vec<NewsItem>> {
        self.api.get_news(topic, limit).await.inspect_err(|err| {
            error!(topic, limit, error = %err, "failed to load news");
        })
    }

    pub async fn analytics(&self) -> Result<AnalyticsData> {
        self.api.get_analytics().await.inspect_err(|err| {
            error!(error = %err, "failed to load analytics");
        })
    }

    pub async fn settings(&self) -> Result<UserSettings> {
        self.api.get_settings().await.inspect_err(|err| {
            error!(error = %err, "failed to load settings");
        })
    }

    pub async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        let _flight = self.claim(Action::UpdateSettings)?;
        match self.api.update_settings(update).await {
            Ok(()) => {
                info!("settings saved");
                self.emit(DashboardEvent::SettingsSaved);
                Ok(())
            }
            Err(err) => Err(self.fail(Action::UpdateSettings, err)),
        }
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
