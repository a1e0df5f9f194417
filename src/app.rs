//! Application Root
//!
//! Owns one controller per page, all sharing a single `ApiClient` and host
//! `Surface`. Switching tabs triggers the loader of the page being entered.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::{ApiClient, ClientResult};
use crate::config::Config;
use crate::pages::{
    AccountController, DashboardController, FeedController, FeedSource, PlanController, Tab,
    TabState, WorkoutController,
};
use crate::view::Surface;

pub struct App {
    api: Arc<ApiClient>,
    tabs: RwLock<TabState>,
    pub dashboard: DashboardController,
    pub feed: FeedController,
    pub bookmarks: FeedController,
    pub account: AccountController,
    pub plans: PlanController,
    pub workout: WorkoutController,
}

impl App {
    pub fn new(api: Arc<ApiClient>, surface: Arc<dyn Surface>, config: &Config) -> Self {
        let routes = &config.routes;

        Self {
            dashboard: DashboardController::new(api.clone(), surface.clone(), routes),
            feed: FeedController::new(api.clone(), surface.clone(), FeedSource::All),
            bookmarks: FeedController::new(api.clone(), surface.clone(), FeedSource::Bookmarked),
            account: AccountController::new(api.clone(), surface.clone(), &config.account, routes),
            plans: PlanController::new(api.clone(), surface.clone(), routes),
            workout: WorkoutController::new(api.clone(), surface, routes),
            tabs: RwLock::new(TabState::default()),
            api,
        }
    }

    /// Build the app over the HTTP transport described by `config`
    pub fn from_config(surface: Arc<dyn Surface>, config: &Config) -> ClientResult<Self> {
        let api = Arc::new(ApiClient::from_config(&config.client)?);
        Ok(Self::new(api, surface, config))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn active_tab(&self) -> Option<Tab> {
        self.tabs.read().await.active()
    }

    /// Page-ready sequence: session bootstrap, then the user selector
    pub async fn start(&self) {
        if self.api.bootstrap_session().await.is_none() {
            tracing::warn!("continuing without a CSRF token");
        }

        if self.dashboard.load_users().await.is_ok() && self.active_tab().await == Some(Tab::Record)
        {
            self.dashboard.load().await;
        }
    }

    /// Activate the tab named `label` and run its loader
    ///
    /// Loader failures have already been reported through the surface.
    pub async fn switch_tab(&self, label: &str) -> Option<Tab> {
        let tab = self.tabs.write().await.select(label);

        match tab {
            Some(Tab::Record) => {
                self.dashboard.load().await;
            }
            Some(Tab::Social) => {
                let _ = self.feed.load().await;
            }
            Some(Tab::Bookmarks) => {
                let _ = self.bookmarks.load().await;
            }
            Some(Tab::Plan) => {
                let _ = tokio::join!(self.plans.load_categories(), self.plans.load_plans());
            }
            Some(Tab::Account) => {
                let _ = self.account.show_main().await;
            }
            Some(Tab::Workout) => {}
            None => tracing::debug!(label, "no tab matches"),
        }

        tab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::testing::{MockTransport, RecordingSurface};
    use serde_json::json;

    fn app() -> (Arc<MockTransport>, Arc<RecordingSurface>, App) {
        let mock = Arc::new(MockTransport::new());
        mock.reply_json(Method::Get, "/api/csrf-token", 200, json!({"csrf_token": "tok"}));
        let surface = Arc::new(RecordingSurface::new());
        let api = Arc::new(ApiClient::new(mock.clone()));
        let app = App::new(api, surface.clone(), &Config::default());
        (mock, surface, app)
    }

    #[tokio::test]
    async fn test_start_bootstraps_and_loads_users() {
        let (mock, _surface, app) = app();
        mock.reply_json(
            Method::Get,
            "/api/users",
            200,
            json!([{"id": 3, "username": "amy"}, {"id": 5, "username": "bo"}]),
        );

        app.start().await;

        assert_eq!(mock.count(Method::Get, "/api/csrf-token"), 1);
        assert_eq!(app.dashboard.selection().await.user_id, Some(3));
        // no tab active yet, so nothing else loads
        assert_eq!(mock.api_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_record_tab_loads_dashboard() {
        let (mock, _surface, app) = app();

        assert_eq!(app.switch_tab(" RECORD").await, Some(Tab::Record));

        for path in [
            "/api/record/metrics",
            "/api/record/trend",
            "/api/record/aeroAnaerobic",
            "/api/record/categoryComparison",
            "/api/record/leaderboard",
        ] {
            assert_eq!(mock.count(Method::Get, path), 1, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_social_and_bookmarks_tabs() {
        let (mock, _surface, app) = app();
        mock.reply_json(Method::Get, "/api/posts", 200, json!([]));
        mock.reply_json(Method::Get, "/api/posts/bookmarked", 200, json!([]));

        app.switch_tab("social").await;
        app.switch_tab("bookmarks").await;

        assert_eq!(mock.count(Method::Get, "/api/posts"), 1);
        assert_eq!(mock.count(Method::Get, "/api/posts/bookmarked"), 1);
        assert_eq!(app.active_tab().await, Some(Tab::Bookmarks));
    }

    #[tokio::test]
    async fn test_plan_tab_loads_both_lists() {
        let (mock, _surface, app) = app();
        mock.reply_json(Method::Get, "/api/my_plan", 200, json!([]));
        mock.reply_json(Method::Get, "/api/sport_categories", 200, json!([]));

        app.switch_tab("plan").await;

        assert_eq!(mock.count(Method::Get, "/api/my_plan"), 1);
        assert_eq!(mock.count(Method::Get, "/api/sport_categories"), 1);
    }

    #[tokio::test]
    async fn test_unknown_tab_loads_nothing() {
        let (mock, surface, app) = app();
        app.switch_tab("social").await;
        let before = mock.requests().len();

        assert_eq!(app.switch_tab("leaderboards").await, None);

        assert_eq!(app.active_tab().await, None);
        assert_eq!(mock.requests().len(), before);
        // the social load hit an unscripted path
        assert_eq!(surface.alerts().len(), 1);
    }
}
