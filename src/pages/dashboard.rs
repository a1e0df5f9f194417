//! Dashboard Page
//!
//! Record tab: summary metrics, three charts and the leaderboard, all scoped
//! by the selected range and user.
//!
//! Every load fires five independent fetches concurrently. Each one updates
//! only its own region when it completes. Loads are numbered; a response from
//! a load that has since been superseded is dropped instead of applied.

use futures_util::future::join5;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ActionResult;
use crate::client::{ApiClient, ClientError, ClientResult};
use crate::config::RouteConfig;
use crate::models::{LeaderboardEntry, MetricsSnapshot, Range, UserSummary};
use crate::view::{Chart, Surface};

/// Rows shown while the leaderboard is collapsed
const COLLAPSED_ROWS: usize = 3;

/// Range and user the dashboard is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub range: Range,
    pub user_id: Option<u64>,
}

/// Everything the record tab displays
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub users: Vec<UserSummary>,
    pub metrics: Option<MetricsSnapshot>,
    pub trend: Chart,
    pub split: Chart,
    pub comparison: Chart,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub leaderboard_collapsed: bool,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            metrics: None,
            trend: Chart::line(),
            split: Chart::doughnut(),
            comparison: Chart::radar(),
            leaderboard: Vec::new(),
            leaderboard_collapsed: true,
        }
    }
}

impl DashboardView {
    /// Leaderboard rows currently shown
    pub fn visible_leaderboard(&self) -> &[LeaderboardEntry] {
        if self.leaderboard_collapsed {
            let end = self.leaderboard.len().min(COLLAPSED_ROWS);
            &self.leaderboard[..end]
        } else {
            &self.leaderboard
        }
    }

    /// Caption of the collapse/expand button
    pub fn leaderboard_toggle_label(&self) -> &'static str {
        if self.leaderboard_collapsed {
            "Show All Rankings"
        } else {
            "Show Top 3 Only"
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(m) = &self.metrics {
            writeln!(f, "Streak:      {} days", m.current_streak)?;
            writeln!(f, "Calories:    {}", m.total_calories)?;
            writeln!(f, "Hours:       {}", m.total_hours)?;
            writeln!(f, "Percentile:  {}%", m.percentile)?;
            writeln!(f)?;
        }

        writeln!(f, "Trend (hours)")?;
        write!(f, "{}", self.trend)?;
        writeln!(f)?;
        writeln!(f, "Aerobic / Anaerobic")?;
        write!(f, "{}", self.split)?;
        writeln!(f)?;
        writeln!(f, "Category comparison")?;
        write!(f, "{}", self.comparison)?;
        writeln!(f)?;

        writeln!(f, "{:<6} {:<20} {:>10} {:>8}", "Rank", "User", "Calories", "Hours")?;
        writeln!(f, "{}", "-".repeat(47))?;
        for entry in self.visible_leaderboard() {
            writeln!(
                f,
                "{:<6} {:<20} {:>10} {:>8}",
                entry.rank, entry.username, entry.total_calories, entry.total_hours
            )?;
        }
        if self.leaderboard.len() > COLLAPSED_ROWS {
            writeln!(f, "[{}]", self.leaderboard_toggle_label())?;
        }
        Ok(())
    }
}

/// Loader and state owner for the record tab
pub struct DashboardController {
    api: Arc<ApiClient>,
    surface: Arc<dyn Surface>,
    home_route: String,
    selection: RwLock<Selection>,
    view: RwLock<DashboardView>,
    generation: AtomicU64,
}

impl DashboardController {
    pub fn new(api: Arc<ApiClient>, surface: Arc<dyn Surface>, routes: &RouteConfig) -> Self {
        Self {
            api,
            surface,
            home_route: routes.home.clone(),
            selection: RwLock::new(Selection::default()),
            view: RwLock::new(DashboardView::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn selection(&self) -> Selection {
        *self.selection.read().await
    }

    /// Snapshot of the current view state
    pub async fn view(&self) -> DashboardView {
        self.view.read().await.clone()
    }

    /// Number of the most recent load
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Change the selection without loading
    pub async fn select(&self, range: Range, user_id: Option<u64>) {
        *self.selection.write().await = Selection { range, user_id };
    }

    /// Switch range and reload everything
    pub async fn set_range(&self, range: Range) -> u64 {
        self.selection.write().await.range = range;
        self.load().await
    }

    /// Switch user and reload everything
    pub async fn set_user(&self, user_id: u64) -> u64 {
        self.selection.write().await.user_id = Some(user_id);
        self.load().await
    }

    /// Flip the leaderboard between top 3 and all rows; returns the new
    /// collapsed state
    pub async fn toggle_leaderboard(&self) -> bool {
        let mut view = self.view.write().await;
        view.leaderboard_collapsed = !view.leaderboard_collapsed;
        view.leaderboard_collapsed
    }

    /// Fill the user selector, selecting the first user if none is selected
    pub async fn load_users(&self) -> ActionResult<()> {
        let users = self.api.users().await.map_err(|e| {
            tracing::warn!("Failed to load users: {}", e);
            e
        })?;

        let first = users.first().map(|u| u.id);
        tracing::debug!(count = users.len(), "users loaded");
        self.view.write().await.users = users;

        let mut selection = self.selection.write().await;
        if selection.user_id.is_none() {
            selection.user_id = first;
        }
        Ok(())
    }

    /// Reload all five regions for the current selection
    ///
    /// Returns the number assigned to this load.
    pub async fn load(&self) -> u64 {
        let selection = *self.selection.read().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::info!(
            generation,
            range = %selection.range,
            user_id = ?selection.user_id,
            "loading dashboard"
        );

        join5(
            self.load_metrics(generation, selection),
            self.load_trend(generation, selection),
            self.load_split(generation, selection),
            self.load_comparison(generation, selection),
            self.load_leaderboard(generation, selection),
        )
        .await;

        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    async fn apply<T>(
        &self,
        generation: u64,
        region: &'static str,
        result: ClientResult<T>,
        update: impl FnOnce(&mut DashboardView, T),
    ) {
        if !self.is_current(generation) {
            tracing::debug!(region, generation, "discarding stale response");
            return;
        }

        match result {
            Ok(value) => {
                let mut view = self.view.write().await;
                // a newer load may have started while waiting for the lock
                if !self.is_current(generation) {
                    tracing::debug!(region, generation, "discarding stale response");
                    return;
                }
                update(&mut view, value);
            }
            Err(e) => {
                tracing::warn!(region, "Dashboard fetch failed: {}", e);
            }
        }
    }

    async fn load_metrics(&self, generation: u64, selection: Selection) {
        let result = self
            .api
            .record_metrics(selection.range, selection.user_id)
            .await;

        if let Err(ClientError::Unauthorized) = &result {
            if self.is_current(generation) {
                self.surface.alert("Please login first");
                self.surface.navigate(&self.home_route);
            }
            return;
        }

        self.apply(generation, "metrics", result, |view, metrics| {
            view.metrics = Some(metrics);
        })
        .await;
    }

    async fn load_trend(&self, generation: u64, selection: Selection) {
        let result = self
            .api
            .record_trend(selection.range, selection.user_id)
            .await;

        self.apply(generation, "trend", result, |view, series| {
            view.trend.set_labels(series.labels);
            view.trend.set_data(0, series.you);
            view.trend.set_data(1, series.average);
            view.trend.update();
        })
        .await;
    }

    async fn load_split(&self, generation: u64, selection: Selection) {
        let result = self
            .api
            .record_category_split(selection.range, selection.user_id)
            .await;

        self.apply(generation, "split", result, |view, split| {
            view.split.set_data(0, vec![split.aerobic, split.anaerobic]);
            view.split.update();
        })
        .await;
    }

    async fn load_comparison(&self, generation: u64, selection: Selection) {
        let result = self
            .api
            .record_category_comparison(selection.range, selection.user_id)
            .await;

        self.apply(generation, "comparison", result, |view, comparison| {
            view.comparison.set_labels(comparison.categories);
            view.comparison.set_data(0, comparison.you);
            view.comparison.set_data(1, comparison.average);
            view.comparison.update();
        })
        .await;
    }

    async fn load_leaderboard(&self, generation: u64, selection: Selection) {
        let result = self.api.leaderboard(selection.range).await;

        self.apply(generation, "leaderboard", result, |view, entries| {
            view.leaderboard = entries;
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::testing::{MockTransport, RecordingSurface};
    use serde_json::json;
    use std::time::Duration;

    const ENDPOINTS: [&str; 5] = [
        "/api/record/metrics",
        "/api/record/trend",
        "/api/record/aeroAnaerobic",
        "/api/record/categoryComparison",
        "/api/record/leaderboard",
    ];

    fn script_dashboard(mock: &MockTransport) {
        mock.reply_json(
            Method::Get,
            "/api/record/metrics",
            200,
            json!({"current_streak": 4, "total_calories": 1520.5, "total_hours": 6.5, "percentile": 75}),
        );
        mock.reply_json(
            Method::Get,
            "/api/record/trend",
            200,
            json!({"labels": ["05-01", "05-02"], "you": [1.0, 0.5], "average": [0.8, 0.7]}),
        );
        mock.reply_json(
            Method::Get,
            "/api/record/aeroAnaerobic",
            200,
            json!({"aerobic": 3.5, "anaerobic": 1.0}),
        );
        mock.reply_json(
            Method::Get,
            "/api/record/categoryComparison",
            200,
            json!({"categories": ["Running", "Yoga"], "you": [3.0, 1.0], "average": [2.0, 2.0]}),
        );
        mock.reply_json(
            Method::Get,
            "/api/record/leaderboard",
            200,
            json!([
                {"rank": 1, "username": "amy", "total_calories": 900.0, "total_hours": 4.0},
                {"rank": 2, "username": "bo", "total_calories": 700.0, "total_hours": 3.5},
                {"rank": 3, "username": "cy", "total_calories": 500.0, "total_hours": 2.0},
                {"rank": 4, "username": "di", "total_calories": 100.0, "total_hours": 0.5}
            ]),
        );
    }

    fn controller(mock: &Arc<MockTransport>) -> (DashboardController, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::new());
        let api = Arc::new(ApiClient::new(mock.clone()));
        let controller = DashboardController::new(api, surface.clone(), &RouteConfig::default());
        (controller, surface)
    }

    #[tokio::test]
    async fn test_load_issues_five_fetches() {
        let mock = Arc::new(MockTransport::new());
        script_dashboard(&mock);
        let (dashboard, _surface) = controller(&mock);

        dashboard.select(Range::Week, Some(3)).await;
        dashboard.load().await;

        assert_eq!(mock.requests().len(), 5);
        for path in ENDPOINTS {
            let requests = mock.requests_to(Method::Get, path);
            assert_eq!(requests.len(), 1, "{}", path);
            assert_eq!(requests[0].query_value("range"), Some("week"));
            let expected_user = if path.ends_with("leaderboard") { None } else { Some("3") };
            assert_eq!(requests[0].query_value("user_id"), expected_user);
        }

        let view = dashboard.view().await;
        assert_eq!(view.metrics.as_ref().map(|m| m.percentile), Some(75));
        assert_eq!(view.trend.labels, vec!["05-01", "05-02"]);
        assert_eq!(view.trend.datasets[1].data, vec![0.8, 0.7]);
        assert_eq!(view.split.datasets[0].data, vec![3.5, 1.0]);
        assert_eq!(view.comparison.labels, vec!["Running", "Yoga"]);
        assert_eq!(view.leaderboard.len(), 4);
        assert_eq!(view.trend.redraws(), 1);
    }

    #[tokio::test]
    async fn test_user_change_reissues_with_same_range() {
        let mock = Arc::new(MockTransport::new());
        script_dashboard(&mock);
        let (dashboard, _surface) = controller(&mock);

        dashboard.select(Range::Week, Some(3)).await;
        dashboard.load().await;
        dashboard.set_user(5).await;

        assert_eq!(mock.requests().len(), 10);
        for path in ENDPOINTS {
            let requests = mock.requests_to(Method::Get, path);
            assert_eq!(requests.len(), 2);
            assert_eq!(requests[1].query_value("range"), Some("week"));
            if !path.ends_with("leaderboard") {
                assert_eq!(requests[1].query_value("user_id"), Some("5"));
            }
        }
    }

    #[tokio::test]
    async fn test_range_change_keeps_user() {
        let mock = Arc::new(MockTransport::new());
        script_dashboard(&mock);
        let (dashboard, _surface) = controller(&mock);

        dashboard.select(Range::Week, Some(3)).await;
        dashboard.set_range(Range::Month).await;

        let trend = &mock.requests_to(Method::Get, "/api/record/trend")[0];
        assert_eq!(trend.query_value("range"), Some("month"));
        assert_eq!(trend.query_value("user_id"), Some("3"));
    }

    #[tokio::test]
    async fn test_metrics_unauthorized_redirects_home() {
        let mock = Arc::new(MockTransport::new());
        script_dashboard(&mock);
        mock.reply_json(Method::Get, "/api/record/metrics", 401, json!({"error": "Unauthorized"}));
        let (dashboard, surface) = controller(&mock);

        // the 401 reply was queued behind the 200 one
        dashboard.load().await;
        dashboard.load().await;

        assert_eq!(surface.alerts(), vec!["Please login first".to_string()]);
        assert_eq!(surface.navigations(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn test_other_unauthorized_is_silent() {
        let mock = Arc::new(MockTransport::new());
        script_dashboard(&mock);
        let (dashboard, surface) = controller(&mock);
        mock.reply_json(Method::Get, "/api/record/trend", 401, json!({"error": "Unauthorized"}));

        dashboard.load().await;
        dashboard.load().await;

        assert!(surface.alerts().is_empty());
        assert!(surface.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_independent() {
        let mock = Arc::new(MockTransport::new());
        mock.reply_fail(Method::Get, "/api/record/trend");
        mock.reply_json(
            Method::Get,
            "/api/record/aeroAnaerobic",
            200,
            json!({"aerobic": 2.0, "anaerobic": 2.0}),
        );
        let (dashboard, surface) = controller(&mock);

        dashboard.load().await;

        let view = dashboard.view().await;
        assert!(view.trend.labels.is_empty());
        assert_eq!(view.trend.redraws(), 0);
        assert_eq!(view.split.datasets[0].data, vec![2.0, 2.0]);
        assert!(view.metrics.is_none());
        assert!(surface.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_discarded() {
        let mock = Arc::new(MockTransport::new());
        mock.reply_json_delayed(
            Method::Get,
            "/api/record/trend",
            200,
            json!({"labels": ["old"], "you": [9.0], "average": [9.0]}),
            Duration::from_millis(50),
        );
        mock.reply_json(
            Method::Get,
            "/api/record/trend",
            200,
            json!({"labels": ["new"], "you": [1.0], "average": [1.0]}),
        );
        script_dashboard(&mock);
        let (dashboard, _surface) = controller(&mock);

        dashboard.select(Range::Week, Some(3)).await;
        let (first, second) = tokio::join!(dashboard.load(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            dashboard.set_user(5).await
        });

        assert_eq!((first, second), (1, 2));
        let view = dashboard.view().await;
        assert_eq!(view.trend.labels, vec!["new"]);
        assert_eq!(view.trend.datasets[0].data, vec![1.0]);
        assert_eq!(view.trend.redraws(), 1);
    }

    #[tokio::test]
    async fn test_superseded_while_waiting_for_view_lock() {
        let mock = Arc::new(MockTransport::new());
        script_dashboard(&mock);
        let (dashboard, _surface) = controller(&mock);
        let dash = &dashboard;

        let guard = dashboard.view.write().await;
        let (generation, _) = tokio::join!(dash.load(), async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            dash.generation.fetch_add(1, Ordering::SeqCst);
            drop(guard);
        });

        assert_eq!(generation, 1);
        let view = dashboard.view().await;
        assert!(view.metrics.is_none());
        assert!(view.leaderboard.is_empty());
        assert_eq!(view.trend.redraws(), 0);
    }

    #[tokio::test]
    async fn test_load_users_selects_first() {
        let mock = Arc::new(MockTransport::new());
        mock.reply_json(
            Method::Get,
            "/api/users",
            200,
            json!([{"id": 3, "username": "amy"}, {"id": 5, "username": "bo"}]),
        );
        let (dashboard, _surface) = controller(&mock);

        dashboard.load_users().await.unwrap();
        assert_eq!(dashboard.selection().await.user_id, Some(3));
        assert_eq!(dashboard.view().await.users.len(), 2);

        dashboard.select(Range::Month, Some(5)).await;
        dashboard.load_users().await.unwrap();
        assert_eq!(dashboard.selection().await.user_id, Some(5));
    }

    #[tokio::test]
    async fn test_leaderboard_collapse() {
        let mock = Arc::new(MockTransport::new());
        script_dashboard(&mock);
        let (dashboard, _surface) = controller(&mock);
        dashboard.load().await;

        let view = dashboard.view().await;
        assert_eq!(view.visible_leaderboard().len(), 3);
        assert_eq!(view.leaderboard_toggle_label(), "Show All Rankings");

        assert!(!dashboard.toggle_leaderboard().await);
        let view = dashboard.view().await;
        assert_eq!(view.visible_leaderboard().len(), 4);
        assert_eq!(view.leaderboard_toggle_label(), "Show Top 3 Only");
    }
}
