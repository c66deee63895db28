use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Platform, PostId},
    protocol::{
        AnalyticsData, AuthResponse, BackendPost, GenerateRequest, GenerateResponse,
        GoogleAuthRequest, NewsItem, NewsQuery, PublishResponse, SettingsUpdate, UserSettings,
    },
};
use tracing::{debug, info};

use crate::{
    config::ClientConfig,
    error::{ClientError, Result},
    mapper::{from_backend, normalize_generated, to_backend},
    session::BearerToken,
    types::{BlogPost, PostPatch},
};

/// Remote operations the dashboard depends on. [`ApiClient`] is the HTTP
/// implementation; tests substitute scripted doubles.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn get_posts(&self) -> Result<Vec<BlogPost>>;
    async fn generate_post(&self, topic: &str) -> Result<BlogPost>;
    async fn update_post(&self, id: &PostId, patch: &PostPatch) -> Result<()>;
    async fn delete_post(&self, id: &PostId) -> Result<()>;
    async fn publish(&self, id: &PostId, platform: Platform) -> Result<PublishResponse>;
    async fn get_analytics(&self) -> Result<AnalyticsData>;
    async fn get_settings(&self) -> Result<UserSettings>;
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()>;
    async fn get_news(&self, topic: &str, limit: u32) -> Result<Vec<NewsItem>>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<BearerToken>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, token: Option<BearerToken>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            token,
        })
    }

    pub fn with_token(&self, token: Option<BearerToken>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response> {
        debug!(operation, "sending request");
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            debug!(operation, %status, "request rejected");
            return Err(ClientError::Http { operation, status });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        self.send(operation, request)
            .await?
            .json()
            .await
            .map_err(|source| ClientError::Decode { operation, source })
    }

    /// Exchanges a Google ID token for a service session. The returned token is
    /// not installed; build a new client with [`ApiClient::with_token`].
    pub async fn login_with_google(&self, credential: &str) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .send_json(
                "login",
                self.http
                    .post(self.url("/auth/google"))
                    .json(&GoogleAuthRequest {
                        credential: credential.to_string(),
                    }),
            )
            .await?;
        info!(user = %response.user.email, "signed in");
        Ok(response)
    }

    pub async fn publish_to_devto(&self, id: &PostId) -> Result<PublishResponse> {
        self.send_json(
            "publish to Dev.to",
            self.http.post(self.url(&format!("/posts/{id}/publish"))),
        )
        .await
    }

    pub async fn publish_to_hashnode(&self, id: &PostId) -> Result<PublishResponse> {
        self.send_json(
            "publish to Hashnode",
            self.http
                .post(self.url(&format!("/posts/{id}/publish/hashnode"))),
        )
        .await
    }
}

#[async_trait]
impl BlogApi for ApiClient {
    async fn get_posts(&self) -> Result<Vec<BlogPost>> {
        let posts: Vec<BackendPost> = self
            .send_json("fetch posts", self.http.get(self.url("/posts")))
            .await?;
        Ok(posts.into_iter().map(from_backend).collect())
    }

    async fn generate_post(&self, topic: &str) -> Result<BlogPost> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ClientError::EmptyTopic);
        }
        let response: GenerateResponse = self
            .send_json(
                "generate post",
                self.http
                    .post(self.url("/generate-pro-blog"))
                    .json(&GenerateRequest {
                        topic: topic.to_string(),
                    }),
            )
            .await?;
        if let Some(message) = &response.message {
            info!(status = ?response.status, message, "generator note");
        }
        normalize_generated(response.data)
            .map(from_backend)
            .ok_or(ClientError::EmptyGenerateResponse)
    }

    async fn update_post(&self, id: &PostId, patch: &PostPatch) -> Result<()> {
        self.send(
            "update post",
            self.http
                .put(self.url(&format!("/posts/{id}")))
                .json(&to_backend(patch)),
        )
        .await?;
        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<()> {
        self.send(
            "delete post",
            self.http.delete(self.url(&format!("/posts/{id}"))),
        )
        .await?;
        Ok(())
    }

    async fn publish(&self, id: &PostId, platform: Platform) -> Result<PublishResponse> {
        match platform {
            Platform::Devto => self.publish_to_devto(id).await,
            Platform::Hashnode => self.publish_to_hashnode(id).await,
        }
    }

    async fn get_analytics(&self) -> Result<AnalyticsData> {
        self.send_json("fetch analytics", self.http.get(self.url("/analytics")))
            .await
    }

    async fn get_settings(&self) -> Result<UserSettings> {
        self.send_json("fetch settings", self.http.get(self.url("/user/settings")))
            .await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        self.send(
            "update settings",
            self.http.put(self.url("/user/settings")).json(update),
        )
        .await?;
        Ok(())
    }

    async fn get_news(&self, topic: &str, limit: u32) -> Result<Vec<NewsItem>> {
        self.send_json(
            "fetch news",
            self.http.get(self.url("/news")).query(&NewsQuery {
                topic: topic.to_string(),
                limit,
            }),
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
