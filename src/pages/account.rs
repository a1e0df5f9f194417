//! Account Page
//!
//! Three mutually exclusive views over the current user's profile. The
//! avatar shown everywhere is the configured local asset; the server's
//! avatar URL is never displayed.

use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ActionResult;
use crate::client::ApiClient;
use crate::config::{AccountConfig, RouteConfig};
use crate::models::{AccountProfile, AvatarFile};
use crate::view::Surface;

const NOT_SET: &str = "Not set";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountView {
    #[default]
    Main,
    Detail,
    Edit,
}

/// Profile fields as displayed on the detail view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileDetail {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub address: String,
    pub coins: u64,
}

impl ProfileDetail {
    fn from_profile(profile: &AccountProfile) -> Self {
        Self {
            username: profile.username.clone(),
            nickname: display_or_placeholder(profile.nickname.as_deref()),
            email: display_or_placeholder(profile.email.as_deref()),
            address: display_or_placeholder(profile.address.as_deref()),
            coins: profile.coins.unwrap_or(0),
        }
    }
}

fn display_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_SET.to_string(),
    }
}

/// Editable values, seeded from what the detail view shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditForm {
    pub avatar_preview: String,
    pub username: String,
    pub coins: u64,
    pub nickname: String,
    pub address: String,
    pub avatar: Option<AvatarFile>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountState {
    pub view: AccountView,
    pub main_username: String,
    pub avatar: String,
    pub detail: ProfileDetail,
    pub form: EditForm,
}

pub struct AccountController {
    api: Arc<ApiClient>,
    surface: Arc<dyn Surface>,
    home_route: String,
    max_avatar_bytes: u64,
    state: RwLock<AccountState>,
}

impl AccountController {
    pub fn new(
        api: Arc<ApiClient>,
        surface: Arc<dyn Surface>,
        account: &AccountConfig,
        routes: &RouteConfig,
    ) -> Self {
        let state = AccountState {
            avatar: account.avatar_asset.clone(),
            ..AccountState::default()
        };

        Self {
            api,
            surface,
            home_route: routes.home.clone(),
            max_avatar_bytes: account.max_avatar_bytes,
            state: RwLock::new(state),
        }
    }

    pub async fn state(&self) -> AccountState {
        self.state.read().await.clone()
    }

    pub async fn show_main(&self) -> ActionResult<()> {
        let profile = match self.api.account_info().await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!("Error loading account info: {}", e);
                self.surface.alert("Failed to load user information.");
                return Err(e.into());
            }
        };

        let mut state = self.state.write().await;
        state.main_username = profile.username;
        state.view = AccountView::Main;
        Ok(())
    }

    pub async fn show_detail(&self) -> ActionResult<()> {
        let profile = match self.api.account_info().await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!("Error loading user details: {}", e);
                self.surface.alert("Failed to load user information.");
                return Err(e.into());
            }
        };

        let mut state = self.state.write().await;
        state.detail = ProfileDetail::from_profile(&profile);
        state.main_username = profile.username;
        state.view = AccountView::Detail;
        Ok(())
    }

    /// Open the edit form seeded from the displayed values
    pub async fn show_edit(&self) {
        let mut state = self.state.write().await;
        let detail = state.detail.clone();
        let seed = |value: &str| {
            if value == NOT_SET {
                String::new()
            } else {
                value.to_string()
            }
        };

        state.form = EditForm {
            avatar_preview: state.avatar.clone(),
            username: detail.username.clone(),
            coins: detail.coins,
            nickname: seed(&detail.nickname),
            address: seed(&detail.address),
            avatar: None,
        };
        state.view = AccountView::Edit;
    }

    /// Stage a new avatar for the next submit
    ///
    /// A rejected file clears any staged avatar and restores the preview.
    pub async fn select_avatar(&self, file: AvatarFile) -> ActionResult<()> {
        let mut state = self.state.write().await;

        if let Err(e) = file.validate(self.max_avatar_bytes) {
            tracing::debug!(file = %file.file_name, mime = %file.mime, size = file.size(), "avatar rejected");
            self.surface.alert(&e.to_string());
            state.form.avatar = None;
            state.form.avatar_preview = state.avatar.clone();
            return Err(e.into());
        }

        state.form.avatar_preview = file.data_url();
        state.form.avatar = Some(file);
        Ok(())
    }

    pub async fn submit_edit(&self, nickname: &str, address: &str) -> ActionResult<()> {
        let avatar = {
            let mut state = self.state.write().await;
            state.form.nickname = nickname.to_string();
            state.form.address = address.to_string();
            state.form.avatar.clone()
        };

        match self.api.edit_account(nickname, address, avatar.as_ref()).await {
            Ok(()) => {
                tracing::info!(avatar = avatar.is_some(), "account updated");
                self.surface.alert("Information updated successfully.");
                self.show_detail().await
            }
            Err(e) => {
                tracing::error!("Error updating information: {}", e);
                self.surface.alert("Failed to update information.");
                Err(e.into())
            }
        }
    }

    pub async fn logout(&self) -> ActionResult<()> {
        match self.api.logout().await {
            Ok(()) => {
                tracing::info!("logged out");
                self.surface.navigate(&self.home_route);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Logout error: {}", e);
                self.surface.alert("Logout failed.");
                Err(e.into())
            }
        }
    }
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.view {
            AccountView::Main => {
                writeln!(f, "[{}] {}", self.avatar, self.main_username)
            }
            AccountView::Detail => {
                writeln!(f, "[{}]", self.avatar)?;
                writeln!(f, "Username: {}", self.detail.username)?;
                writeln!(f, "Nickname: {}", self.detail.nickname)?;
                writeln!(f, "Email:    {}", self.detail.email)?;
                writeln!(f, "Address:  {}", self.detail.address)?;
                writeln!(f, "Coins:    {}", self.detail.coins)
            }
            AccountView::Edit => {
                let preview = match &self.form.avatar {
                    Some(file) => file.file_name.as_str(),
                    None => self.form.avatar_preview.as_str(),
                };
                writeln!(f, "[{}]", preview)?;
                writeln!(f, "Username: {}", self.form.username)?;
                writeln!(f, "Coins:    {}", self.form.coins)?;
                writeln!(f, "Nickname: {}", self.form.nickname)?;
                writeln!(f, "Address:  {}", self.form.address)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Method, RequestBody};
    use crate::testing::{MockTransport, RecordingSurface};
    use serde_json::json;

    fn setup() -> (Arc<MockTransport>, Arc<RecordingSurface>, AccountController) {
        let mock = Arc::new(MockTransport::new());
        mock.reply_json(Method::Get, "/api/csrf-token", 200, json!({"csrf_token": "tok"}));
        let surface = Arc::new(RecordingSurface::new());
        let api = Arc::new(ApiClient::new(mock.clone()));
        let controller = AccountController::new(
            api,
            surface.clone(),
            &AccountConfig::default(),
            &RouteConfig::default(),
        );
        (mock, surface, controller)
    }

    fn profile() -> serde_json::Value {
        json!({
            "username": "amy",
            "nickname": "Ames",
            "email": "amy@example.com",
            "address": "",
            "avatar": "/static/uploads/amy.png"
        })
    }

    #[tokio::test]
    async fn test_detail_fills_placeholders() {
        let (mock, _surface, account) = setup();
        mock.reply_json(Method::Get, "/api/account/info", 200, profile());

        account.show_detail().await.unwrap();

        let state = account.state().await;
        assert_eq!(state.view, AccountView::Detail);
        assert_eq!(state.main_username, "amy");
        assert_eq!(state.detail.nickname, "Ames");
        assert_eq!(state.detail.address, "Not set");
        assert_eq!(state.detail.coins, 0);
        assert_eq!(state.avatar, "profile_pic.jpg");
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_view() {
        let (mock, surface, account) = setup();
        mock.reply_json(Method::Get, "/api/account/info", 500, json!({"error": "boom"}));

        assert!(account.show_detail().await.is_err());

        assert_eq!(account.state().await.view, AccountView::Main);
        assert_eq!(surface.alerts(), vec!["Failed to load user information.".to_string()]);
    }

    #[tokio::test]
    async fn test_main_failure_alerts_and_keeps_view() {
        let (mock, surface, account) = setup();
        mock.reply_json(Method::Get, "/api/account/info", 200, profile());
        mock.reply_json(Method::Get, "/api/account/info", 500, json!({"error": "boom"}));
        account.show_detail().await.unwrap();

        assert!(account.show_main().await.is_err());

        let state = account.state().await;
        assert_eq!(state.view, AccountView::Detail);
        assert_eq!(state.main_username, "amy");
        assert_eq!(surface.alerts(), vec!["Failed to load user information.".to_string()]);
    }

    #[tokio::test]
    async fn test_edit_seeds_from_detail_without_fetch() {
        let (mock, _surface, account) = setup();
        mock.reply_json(Method::Get, "/api/account/info", 200, profile());
        account.show_detail().await.unwrap();

        account.show_edit().await;

        assert_eq!(mock.count(Method::Get, "/api/account/info"), 1);
        let state = account.state().await;
        assert_eq!(state.view, AccountView::Edit);
        assert_eq!(state.form.nickname, "Ames");
        assert_eq!(state.form.address, "");
        assert_eq!(state.form.avatar_preview, "profile_pic.jpg");
    }

    #[tokio::test]
    async fn test_bad_avatar_clears_selection() {
        let (mock, surface, account) = setup();
        account.show_edit().await;
        account
            .select_avatar(AvatarFile::new("a.png", "image/png", vec![0x89, 0x50]))
            .await
            .unwrap();
        assert!(account.state().await.form.avatar_preview.starts_with("data:image/png;base64,"));

        let gif = AvatarFile::new("a.gif", "image/gif", vec![0; 10]);
        assert!(account.select_avatar(gif).await.unwrap_err().is_validation());

        let big = AvatarFile::new("big.jpg", "image/jpeg", vec![0; 5 * 1024 * 1024 + 1]);
        assert!(account.select_avatar(big).await.is_err());

        let state = account.state().await;
        assert!(state.form.avatar.is_none());
        assert_eq!(state.form.avatar_preview, "profile_pic.jpg");
        assert_eq!(
            surface.alerts(),
            vec![
                "Only JPG/PNG formats are allowed.".to_string(),
                "File size cannot exceed 5MB.".to_string(),
            ]
        );
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_reloads_detail() {
        let (mock, surface, account) = setup();
        mock.reply_json(Method::Get, "/api/account/info", 200, profile());
        mock.reply_json(Method::Post, "/api/account/edit", 200, json!({"success": true}));
        account.show_edit().await;
        account
            .select_avatar(AvatarFile::new("me.jpg", "image/jpeg", vec![0xff, 0xd8]))
            .await
            .unwrap();

        account.submit_edit("Ames", "Perth").await.unwrap();

        let edit = &mock.requests_to(Method::Post, "/api/account/edit")[0];
        let RequestBody::Multipart(parts) = &edit.body else {
            panic!("expected multipart");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(mock.count(Method::Get, "/api/account/info"), 1);
        assert_eq!(account.state().await.view, AccountView::Detail);
        assert_eq!(surface.alerts(), vec!["Information updated successfully.".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_failure_stays_on_edit() {
        let (mock, surface, account) = setup();
        mock.reply_json(Method::Post, "/api/account/edit", 200, json!({"success": false}));
        account.show_edit().await;

        assert!(account.submit_edit("x", "y").await.is_err());

        assert_eq!(account.state().await.view, AccountView::Edit);
        assert_eq!(surface.alerts(), vec!["Failed to update information.".to_string()]);
        assert_eq!(mock.count(Method::Get, "/api/account/info"), 0);
    }

    #[tokio::test]
    async fn test_logout_navigates_home() {
        let (mock, surface, account) = setup();
        mock.reply_json(Method::Post, "/api/logout", 200, json!({"success": true}));

        account.logout().await.unwrap();

        assert_eq!(surface.navigations(), vec!["/".to_string()]);
        assert!(surface.alerts().is_empty());
    }
}
