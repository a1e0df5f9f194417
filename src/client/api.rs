//! Backend REST API Client
//!
//! Typed wrappers for every endpoint the views use. Mutating requests carry
//! the CSRF token obtained by the session bootstrap.

use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;

use super::error::{ClientError, ClientResult};
use super::session::{CsrfSession, CSRF_HEADER};
use super::transport::{ApiRequest, ApiResponse, FormPart, HttpTransport, Transport};
use crate::config::ClientConfig;
use crate::models::{
    AccountProfile, AvatarFile, BookmarkedPosts, CategoryComparison, CategorySplit,
    CsrfTokenResponse, LeaderboardEntry, MetricsSnapshot, MutationAck, NewPlan, Plan, Post,
    Range, SportCategory, TrendSeries, UserSummary, WorkoutEntry, WorkoutKind,
};

/// Backend API client shared by all controllers
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: CsrfSession,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            session: CsrfSession::new(),
        }
    }

    /// Create a client sending over HTTP to the configured backend
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn session(&self) -> &CsrfSession {
        &self.session
    }

    /// Fetch the CSRF token unless a previous call already tried
    pub async fn bootstrap_session(&self) -> Option<String> {
        self.session
            .bootstrap(|| async {
                match self.request_csrf_token().await {
                    Ok(token) => {
                        tracing::info!("CSRF token installed");
                        Some(token)
                    }
                    Err(e) => {
                        tracing::warn!("Failed to fetch CSRF token: {}", e);
                        None
                    }
                }
            })
            .await
            .map(str::to_string)
    }

    async fn request_csrf_token(&self) -> ClientResult<String> {
        let response = self
            .transport
            .send(ApiRequest::get("/api/csrf-token"))
            .await?
            .error_for_status()?;
        let body: CsrfTokenResponse = response.json()?;
        Ok(body.csrf_token)
    }

    async fn send(&self, mut request: ApiRequest) -> ClientResult<ApiResponse> {
        if request.method.is_mutating() {
            if let Some(token) = self.bootstrap_session().await {
                request = request.header(CSRF_HEADER, token);
            }
        }

        tracing::debug!(method = ?request.method, path = %request.path_and_query(), "sending request");
        self.transport.send(request).await
    }

    async fn get_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        self.send(request).await?.error_for_status()?.json()
    }

    /// Send a mutating request and require `{success: true}` back
    async fn post_ack(&self, request: ApiRequest) -> ClientResult<()> {
        let response = self.send(request).await?;
        Self::require_ack(response)
    }

    fn require_ack(response: ApiResponse) -> ClientResult<()> {
        let ack: MutationAck = response.error_for_status()?.json()?;
        if ack.success {
            Ok(())
        } else {
            Err(ClientError::Rejected(
                ack.error
                    .unwrap_or_else(|| "request was not accepted".to_string()),
            ))
        }
    }

    // ============================================
    // Session & account
    // ============================================

    /// Start a session; bad credentials come back as `Rejected` with the
    /// server's message
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        let request = ApiRequest::post("/api/login")
            .json(json!({ "username": username, "password": password }));
        let response = self.send(request).await?;

        if response.status == 401 {
            return Err(ClientError::Rejected(response.error_message()));
        }
        Self::require_ack(response)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.post_ack(ApiRequest::post("/api/logout")).await
    }

    pub async fn users(&self) -> ClientResult<Vec<UserSummary>> {
        self.get_json(ApiRequest::get("/api/users")).await
    }

    pub async fn account_info(&self) -> ClientResult<AccountProfile> {
        self.get_json(ApiRequest::get("/api/account/info")).await
    }

    /// Multipart profile update; `avatar` must already be validated
    pub async fn edit_account(
        &self,
        nickname: &str,
        address: &str,
        avatar: Option<&AvatarFile>,
    ) -> ClientResult<()> {
        let mut parts = vec![
            FormPart::text("nickname", nickname),
            FormPart::text("address", address),
        ];
        if let Some(file) = avatar {
            parts.push(FormPart::File {
                name: "avatar".to_string(),
                file_name: file.file_name.clone(),
                mime: file.mime.clone(),
                bytes: file.bytes.clone(),
            });
        }

        self.post_ack(ApiRequest::post("/api/account/edit").multipart(parts))
            .await
    }

    // ============================================
    // Dashboard
    // ============================================

    fn record_request(path: &str, range: Range, user_id: Option<u64>) -> ApiRequest {
        let request = ApiRequest::get(path).query("range", range);
        match user_id {
            Some(id) => request.query("user_id", id),
            None => request,
        }
    }

    pub async fn record_metrics(
        &self,
        range: Range,
        user_id: Option<u64>,
    ) -> ClientResult<MetricsSnapshot> {
        self.get_json(Self::record_request("/api/record/metrics", range, user_id))
            .await
    }

    pub async fn record_trend(
        &self,
        range: Range,
        user_id: Option<u64>,
    ) -> ClientResult<TrendSeries> {
        self.get_json(Self::record_request("/api/record/trend", range, user_id))
            .await
    }

    pub async fn record_category_split(
        &self,
        range: Range,
        user_id: Option<u64>,
    ) -> ClientResult<CategorySplit> {
        self.get_json(Self::record_request(
            "/api/record/aeroAnaerobic",
            range,
            user_id,
        ))
        .await
    }

    pub async fn record_category_comparison(
        &self,
        range: Range,
        user_id: Option<u64>,
    ) -> ClientResult<CategoryComparison> {
        self.get_json(Self::record_request(
            "/api/record/categoryComparison",
            range,
            user_id,
        ))
        .await
    }

    /// Global ranking; takes no user
    pub async fn leaderboard(&self, range: Range) -> ClientResult<Vec<LeaderboardEntry>> {
        self.get_json(Self::record_request("/api/record/leaderboard", range, None))
            .await
    }

    // ============================================
    // Social feed
    // ============================================

    pub async fn posts(&self) -> ClientResult<Vec<Post>> {
        self.get_json(ApiRequest::get("/api/posts")).await
    }

    /// Current user's bookmarked posts
    ///
    /// A 401 carrying `{error}` is reported as `LoginRequired`, not as an error.
    pub async fn bookmarked_posts(&self) -> ClientResult<BookmarkedPosts> {
        let response = self.send(ApiRequest::get("/api/posts/bookmarked")).await?;

        if response.status == 401 {
            return Ok(response
                .json::<BookmarkedPosts>()
                .unwrap_or(BookmarkedPosts::LoginRequired {
                    error: "Unauthorized".to_string(),
                }));
        }

        response.error_for_status()?.json()
    }

    pub async fn create_post(&self, content: &str) -> ClientResult<()> {
        self.post_ack(ApiRequest::post("/api/posts").json(json!({ "content": content })))
            .await
    }

    pub async fn add_comment(&self, post_id: u64, text: &str) -> ClientResult<()> {
        let path = format!("/api/posts/{}/comments", post_id);
        self.post_ack(ApiRequest::post(path).json(json!({ "text": text })))
            .await
    }

    /// Flip the caller's like on a post
    pub async fn toggle_like(&self, post_id: u64) -> ClientResult<()> {
        self.post_ack(ApiRequest::post(format!("/api/posts/{}/like", post_id)))
            .await
    }

    /// Flip the caller's bookmark on a post
    pub async fn toggle_bookmark(&self, post_id: u64) -> ClientResult<()> {
        self.post_ack(ApiRequest::post(format!("/api/posts/{}/bookmark", post_id)))
            .await
    }

    // ============================================
    // Plans & workouts
    // ============================================

    pub async fn plans(&self) -> ClientResult<Vec<Plan>> {
        self.get_json(ApiRequest::get("/api/my_plan")).await
    }

    pub async fn create_plan(&self, plan: &NewPlan) -> ClientResult<()> {
        let body = serde_json::to_value(plan)?;
        self.post_ack(ApiRequest::post("/api/my_plan").json(body))
            .await
    }

    pub async fn sport_categories(&self) -> ClientResult<Vec<SportCategory>> {
        self.get_json(ApiRequest::get("/api/sport_categories")).await
    }

    /// Record a workout for today; `entry` must already be validated
    pub async fn log_workout(&self, entry: &WorkoutEntry) -> ClientResult<()> {
        let mut parts = vec![
            FormPart::text("activity", entry.activity.trim()),
            FormPart::text("duration", entry.whole_minutes().to_string()),
            FormPart::text("calories", entry.calories.to_string()),
        ];
        if entry.kind == WorkoutKind::Strength {
            parts.push(FormPart::text(
                "difficulty",
                entry.difficulty.unwrap_or(1).to_string(),
            ));
        }

        self.post_ack(ApiRequest::post(entry.kind.endpoint()).multipart(parts))
            .await
    }
}
