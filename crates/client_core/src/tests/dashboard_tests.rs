use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::PostStatus,
    protocol::{AnalyticsTotals, BackendPost},
};
use tokio::sync::Notify;

use super::*;
use crate::mapper::from_backend;

fn post(id: &str, status: PostStatus) -> BlogPost {
    from_backend(BackendPost {
        id: PostId::new(id),
        title: Some(format!("Post {id}")),
        status: Some(status.as_str().to_string()),
        ..BackendPost::default()
    })
}

fn http_error(operation: &'static str) -> ClientError {
    ClientError::Http {
        operation,
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    GetPosts,
    Generate(String),
    Update(PostId, PostPatch),
    Delete(PostId),
    Publish(PostId, Platform),
    UpdateSettings(SettingsUpdate),
}

#[derive(Default)]
struct ScriptedApi {
    posts: Vec<BlogPost>,
    generated: Option<BlogPost>,
    fail_publish: bool,
    fail_delete: bool,
    fail_update: bool,
    /// When set, update and generate park until notified.
    gate: Option<Arc<Notify>>,
    calls: StdMutex<Vec<Call>>,
}

impl ScriptedApi {
    fn record(&self, call: Call) {
        self.calls.lock().expect("calls").push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls").clone()
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl BlogApi for ScriptedApi {
    async fn get_posts(&self) -> Result<Vec<BlogPost>> {
        self.record(Call::GetPosts);
        Ok(self.posts.clone())
    }

    async fn generate_post(&self, topic: &str) -> Result<BlogPost> {
        self.record(Call::Generate(topic.to_string()));
        self.wait_gate().await;
        self.generated
            .clone()
            .ok_or(ClientError::EmptyGenerateResponse)
    }

    async fn update_post(&self, id: &PostId, patch: &PostPatch) -> Result<()> {
        self.record(Call::Update(id.clone(), patch.clone()));
        self.wait_gate().await;
        if self.fail_update {
            return Err(http_error("update post"));
        }
        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<()> {
        self.record(Call::Delete(id.clone()));
        if self.fail_delete {
            return Err(http_error("delete post"));
        }
        Ok(())
    }

    async fn publish(&self, id: &PostId, platform: Platform) -> Result<PublishResponse> {
        self.record(Call::Publish(id.clone(), platform));
        if self.fail_publish {
            return Err(http_error("publish"));
        }
        Ok(PublishResponse {
            url: format!("https://dev.to/me/{id}"),
        })
    }

    async fn get_analytics(&self) -> Result<AnalyticsData> {
        Ok(AnalyticsData {
            totals: AnalyticsTotals {
                views: 3,
                reactions: 2,
                comments: 1,
            },
            ..AnalyticsData::default()
        })
    }

    async fn get_settings(&self) -> Result<UserSettings> {
        Ok(UserSettings {
            devto_configured: true,
            ..UserSettings::default()
        })
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        self.record(Call::UpdateSettings(update.clone()));
        Ok(())
    }

    async fn get_news(&self, _topic: &str, _limit: u32) -> Result<Vec<NewsItem>> {
        Ok(Vec::new())
    }
}

struct Decline;

impl ConfirmGate for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

async fn loaded(api: ScriptedApi) -> (Arc<ScriptedApi>, Dashboard) {
    let api = Arc::new(api);
    let dashboard = Dashboard::new(api.clone());
    dashboard.load_posts().await.expect("load");
    (api, dashboard)
}

fn seeded() -> ScriptedApi {
    ScriptedApi {
        posts: vec![
            post("1", PostStatus::NeedsReview),
            post("2", PostStatus::Draft),
            post("3", PostStatus::Published),
        ],
        ..ScriptedApi::default()
    }
}

fn ids(posts: &[BlogPost]) -> Vec<&str> {
    posts.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn load_replaces_store_and_filters_by_tab() {
    let (_api, dashboard) = loaded(seeded()).await;

    assert_eq!(dashboard.tab().await, Tab::Dashboard);
    assert_eq!(ids(&dashboard.visible_posts().await), vec!["1", "2"]);

    dashboard.set_tab(Tab::Published).await;
    assert_eq!(ids(&dashboard.visible_posts().await), vec!["3"]);

    dashboard.set_tab(Tab::Analytics).await;
    assert!(dashboard.visible_posts().await.is_empty());
    assert_eq!(dashboard.posts().await.len(), 3);
}

#[tokio::test]
async fn approve_publishes_and_moves_only_that_post() {
    let (api, dashboard) = loaded(seeded()).await;
    let mut events = dashboard.subscribe();

    let published = dashboard
        .approve(&PostId::new("1"), Platform::Devto)
        .await
        .expect("approve");

    assert_eq!(published.url, "https://dev.to/me/1");
    let posts = dashboard.posts().await;
    assert_eq!(posts[0].status, PostStatus::Published);
    assert_eq!(posts[1].status, PostStatus::Draft);
    assert_eq!(ids(&dashboard.visible_posts().await), vec!["2"]);
    assert!(api
        .calls()
        .contains(&Call::Publish(PostId::new("1"), Platform::Devto)));
    assert_eq!(
        events.recv().await.expect("event"),
        DashboardEvent::PostPublished {
            id: PostId::new("1"),
            platform: Platform::Devto,
            url: "https://dev.to/me/1".into(),
        }
    );
}

#[tokio::test]
async fn failed_publish_leaves_status_untouched() {
    let (_api, dashboard) = loaded(ScriptedApi {
        fail_publish: true,
        ..seeded()
    })
    .await;
    let mut events = dashboard.subscribe();

    let err = dashboard
        .approve(&PostId::new("1"), Platform::Hashnode)
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), FailureKind::Http);
    assert_eq!(
        dashboard.post(&PostId::new("1")).await.map(|p| p.status),
        Some(PostStatus::NeedsReview)
    );
    assert!(matches!(
        events.recv().await.expect("event"),
        DashboardEvent::Failed {
            action: Action::Publish(_),
            kind: FailureKind::Http,
            ..
        }
    ));
    assert!(!dashboard.is_in_flight(&Action::Publish(PostId::new("1"))));
}

#[tokio::test]
async fn approve_unknown_post_sends_nothing() {
    let (api, dashboard) = loaded(seeded()).await;
    let err = dashboard
        .approve(&PostId::new("ghost"), Platform::Devto)
        .await
        .expect_err("unknown");
    assert!(matches!(err, ClientError::UnknownPost(_)));
    assert_eq!(api.calls(), vec![Call::GetPosts]);
}

#[tokio::test]
async fn reject_removes_post_after_delete() {
    let (api, dashboard) = loaded(seeded()).await;

    dashboard
        .reject(&PostId::new("2"), &AlwaysConfirm)
        .await
        .expect("reject");

    assert_eq!(ids(&dashboard.posts().await), vec!["1", "3"]);
    assert!(api.calls().contains(&Call::Delete(PostId::new("2"))));
}

#[tokio::test]
async fn failed_reject_keeps_post() {
    let (_api, dashboard) = loaded(ScriptedApi {
        fail_delete: true,
        ..seeded()
    })
    .await;

    let err = dashboard
        .reject(&PostId::new("2"), &AlwaysConfirm)
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), FailureKind::Http);
    assert_eq!(dashboard.posts().await.len(), 3);
}

#[tokio::test]
async fn declined_reject_sends_no_request() {
    let (api, dashboard) = loaded(seeded()).await;

    let err = dashboard
        .reject(&PostId::new("2"), &Decline)
        .await
        .expect_err("declined");

    assert!(matches!(err, ClientError::Declined));
    assert_eq!(api.calls(), vec![Call::GetPosts]);
    assert_eq!(dashboard.posts().await.len(), 3);
}

#[tokio::test]
async fn reject_of_edited_post_ends_the_review() {
    let (_api, dashboard) = loaded(seeded()).await;
    dashboard.begin_edit(&PostId::new("2")).await.expect("edit");

    dashboard
        .reject(&PostId::new("2"), &AlwaysConfirm)
        .await
        .expect("reject");

    assert!(dashboard.working_copy().await.is_none());
}

#[tokio::test]
async fn generated_post_goes_to_the_front() {
    let (api, dashboard) = loaded(ScriptedApi {
        generated: Some(post("42", PostStatus::Draft)),
        ..seeded()
    })
    .await;

    let created = dashboard.generate("AI").await.expect("generate");

    assert_eq!(created.id.as_str(), "42");
    assert_eq!(ids(&dashboard.posts().await), vec!["42", "1", "2", "3"]);
    assert_eq!(dashboard.visible_posts().await[0].id.as_str(), "42");
    assert!(api.calls().contains(&Call::Generate("AI".into())));
}

#[tokio::test]
async fn blank_topic_is_refused_locally() {
    let (api, dashboard) = loaded(seeded()).await;
    let err = dashboard.generate("  ").await.expect_err("empty");
    assert!(matches!(err, ClientError::EmptyTopic));
    assert_eq!(api.calls(), vec![Call::GetPosts]);
}

#[tokio::test]
async fn second_generate_while_first_pending_is_refused() {
    let gate = Arc::new(Notify::new());
    let (api, dashboard) = loaded(ScriptedApi {
        generated: Some(post("42", PostStatus::Draft)),
        gate: Some(gate.clone()),
        ..seeded()
    })
    .await;
    let dashboard = Arc::new(dashboard);

    let first = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.generate("AI").await }
    });
    while !dashboard.is_in_flight(&Action::Generate) {
        tokio::task::yield_now().await;
    }

    let err = dashboard.generate("Rust").await.expect_err("in flight");
    assert!(matches!(err, ClientError::ActionInFlight(Action::Generate)));

    gate.notify_one();
    first.await.expect("join").expect("first generate");
    assert!(!dashboard.is_in_flight(&Action::Generate));
    let generates = api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Generate(_)))
        .count();
    assert_eq!(generates, 1);
}

#[tokio::test]
async fn save_sends_only_the_changed_title() {
    let (api, dashboard) = loaded(seeded()).await;
    let id = PostId::new("1");
    dashboard.begin_edit(&id).await.expect("edit");
    dashboard
        .edit(|review| review.set_title("Sharper title"))
        .await
        .expect("set title");

    let outcome = dashboard.save_edit().await.expect("save");

    let expected_patch = PostPatch {
        title: Some("Sharper title".into()),
        ..PostPatch::default()
    };
    assert!(api.calls().contains(&Call::Update(id.clone(), expected_patch)));
    assert!(matches!(outcome, SaveOutcome::Applied(ref saved) if saved.title == "Sharper title"));
    assert_eq!(
        dashboard.post(&id).await.map(|p| p.title),
        Some("Sharper title".to_string())
    );
    assert!(dashboard.working_copy().await.is_none());
}

#[tokio::test]
async fn failed_save_keeps_the_edit_open() {
    let (_api, dashboard) = loaded(ScriptedApi {
        fail_update: true,
        ..seeded()
    })
    .await;
    let id = PostId::new("1");
    dashboard.begin_edit(&id).await.expect("edit");
    dashboard
        .edit(|review| review.set_content("new body"))
        .await
        .expect("content");

    let err = dashboard.save_edit().await.expect_err("must fail");

    assert_eq!(err.kind(), FailureKind::Http);
    assert_eq!(
        dashboard.working_copy().await.map(|p| p.content),
        Some("new body".to_string())
    );
    assert_eq!(
        dashboard.post(&id).await.map(|p| p.content),
        Some(String::new())
    );
}

#[tokio::test]
async fn cancel_discards_edits() {
    let (api, dashboard) = loaded(seeded()).await;
    let id = PostId::new("2");
    let before = dashboard.post(&id).await;
    dashboard.begin_edit(&id).await.expect("edit");
    dashboard
        .edit(|review| review.set_title("Throwaway"))
        .await
        .expect("title");

    assert!(dashboard.cancel_edit().await);
    assert!(!dashboard.cancel_edit().await);
    assert_eq!(dashboard.post(&id).await, before);
    assert_eq!(api.calls(), vec![Call::GetPosts]);
    assert!(matches!(
        dashboard.save_edit().await,
        Err(ClientError::NotEditing)
    ));
}

#[tokio::test]
async fn save_overtaken_by_newer_edit_is_dropped() {
    let gate = Arc::new(Notify::new());
    let (_api, dashboard) = loaded(ScriptedApi {
        gate: Some(gate.clone()),
        ..seeded()
    })
    .await;
    let dashboard = Arc::new(dashboard);
    let id = PostId::new("1");

    dashboard.begin_edit(&id).await.expect("edit");
    dashboard
        .edit(|review| review.set_title("First attempt"))
        .await
        .expect("title");

    let pending = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.save_edit().await }
    });
    while !dashboard.is_in_flight(&Action::Save) {
        tokio::task::yield_now().await;
    }

    dashboard.begin_edit(&id).await.expect("re-edit");
    gate.notify_one();
    let outcome = pending.await.expect("join").expect("save");

    assert!(matches!(outcome, SaveOutcome::Stale { ref id, ticket: 1 } if id.as_str() == "1"));
    assert_eq!(
        dashboard.post(&id).await.map(|p| p.title),
        Some("Post 1".to_string())
    );
    assert!(dashboard.working_copy().await.is_some());
}

#[tokio::test]
async fn patch_post_merges_after_acknowledgement() {
    let (api, dashboard) = loaded(seeded()).await;
    let id = PostId::new("2");
    let patch = PostPatch {
        status: Some(PostStatus::NeedsReview),
        viral_score: Some(77),
        ..PostPatch::default()
    };

    dashboard.patch_post(&id, &patch).await.expect("patch");

    let updated = dashboard.post(&id).await.expect("post");
    assert_eq!(updated.status, PostStatus::NeedsReview);
    assert_eq!(updated.viral_score, 77);
    assert!(api.calls().contains(&Call::Update(id, patch)));
}

#[tokio::test]
async fn settings_round_trip_through_the_api() {
    let (api, dashboard) = loaded(seeded()).await;
    assert!(dashboard.settings().await.expect("settings").devto_configured);
    assert_eq!(dashboard.analytics().await.expect("analytics").totals.views, 3);

    let update = SettingsUpdate {
        devto_api_key: Some("key".into()),
        ..SettingsUpdate::default()
    };
    let mut events = dashboard.subscribe();
    dashboard.update_settings(&update).await.expect("update");
    assert!(api.calls().contains(&Call::UpdateSettings(update)));
    assert_eq!(
        events.recv().await.expect("event"),
        DashboardEvent::SettingsSaved
    );
}

#[tokio::test]
async fn save_after_approve_keeps_post_published() {
    let (api, dashboard) = loaded(seeded()).await;
    let id = PostId::new("1");
    dashboard.begin_edit(&id).await.expect("edit");
    dashboard
        .edit(|review| review.set_title("Edited while publishing"))
        .await
        .expect("title");

    dashboard
        .approve(&id, Platform::Devto)
        .await
        .expect("approve");
    let outcome = dashboard.save_edit().await.expect("save");

    let stored = dashboard.post(&id).await.expect("post");
    assert_eq!(stored.status, PostStatus::Published);
    assert_eq!(stored.title, "Edited while publishing");
    assert!(matches!(outcome, SaveOutcome::Applied(_)));
    assert!(api.calls().contains(&Call::Update(
        id,
        PostPatch {
            title: Some("Edited while publishing".into()),
            ..PostPatch::default()
        }
    )));
}

#[tokio::test]
async fn backward_status_patch_is_refused_before_sending() {
    let (api, dashboard) = loaded(seeded()).await;
    let mut events = dashboard.subscribe();
    let id = PostId::new("3");

    let err = dashboard
        .patch_post(
            &id,
            &PostPatch {
                status: Some(PostStatus::Draft),
                ..PostPatch::default()
            },
        )
        .await
        .expect_err("must refuse");

    assert!(matches!(
        err,
        ClientError::InvalidTransition {
            from: PostStatus::Published,
            to: PostStatus::Draft,
            ..
        }
    ));
    assert_eq!(
        dashboard.post(&id).await.map(|p| p.status),
        Some(PostStatus::Published)
    );
    assert_eq!(api.calls(), vec![Call::GetPosts]);
    assert!(matches!(
        events.recv().await.expect("event"),
        DashboardEvent::Failed {
            action: Action::Update(_),
            kind: FailureKind::Local,
            ..
        }
    ));
}

#[tokio::test]
async fn in_flight_refusal_is_broadcast() {
    let gate = Arc::new(Notify::new());
    let (_api, dashboard) = loaded(ScriptedApi {
        generated: Some(post("42", PostStatus::Draft)),
        gate: Some(gate.clone()),
        ..seeded()
    })
    .await;
    let dashboard = Arc::new(dashboard);
    let mut events = dashboard.subscribe();

    let first = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.generate("AI").await }
    });
    while !dashboard.is_in_flight(&Action::Generate) {
        tokio::task::yield_now().await;
    }
    dashboard.generate("Rust").await.expect_err("in flight");

    assert_eq!(
        events.recv().await.expect("event"),
        DashboardEvent::Failed {
            action: Action::Generate,
            kind: FailureKind::Local,
            message: "generating a draft is already in progress".into(),
        }
    );
    gate.notify_one();
    first.await.expect("join").expect("first generate");
}

#[tokio::test]
async fn local_refusals_are_broadcast() {
    let (_api, dashboard) = loaded(seeded()).await;
    let mut events = dashboard.subscribe();

    dashboard.generate(" ").await.expect_err("blank");
    dashboard
        .reject(&PostId::new("ghost"), &AlwaysConfirm)
        .await
        .expect_err("unknown");
    dashboard.save_edit().await.expect_err("not editing");

    let mut actions = Vec::new();
    for _ in 0..3 {
        match events.recv().await.expect("event") {
            DashboardEvent::Failed { action, kind, .. } => {
                assert_eq!(kind, FailureKind::Local);
                actions.push(action);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        actions,
        vec![
            Action::Generate,
            Action::Delete(PostId::new("ghost")),
            Action::Save
        ]
    );
}

#[tokio::test]
async fn meta_description_edit_refreshes_excerpt() {
    let (_api, dashboard) = loaded(seeded()).await;
    let id = PostId::new("2");
    dashboard.begin_edit(&id).await.expect("edit");
    dashboard
        .edit(|review| review.set_meta_description("Fresh summary"))
        .await
        .expect("meta");
    dashboard.save_edit().await.expect("save");

    let stored = dashboard.post(&id).await.expect("post");
    assert_eq!(stored.meta_description, "Fresh summary");
    assert_eq!(stored.excerpt, "Fresh summary");
}
