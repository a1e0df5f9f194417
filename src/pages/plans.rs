//! Plan Page
//!
//! Plan list, activity categories, and the create-plan modal.

use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ActionResult;
use crate::client::{ApiClient, ClientError};
use crate::config::RouteConfig;
use crate::models::{Plan, PlanForm, SportCategory};
use crate::view::Surface;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanState {
    pub categories: Vec<SportCategory>,
    pub plans: Vec<Plan>,
    pub modal_open: bool,
    pub form: PlanForm,
}

pub struct PlanController {
    api: Arc<ApiClient>,
    surface: Arc<dyn Surface>,
    login_route: String,
    state: RwLock<PlanState>,
}

impl PlanController {
    pub fn new(api: Arc<ApiClient>, surface: Arc<dyn Surface>, routes: &RouteConfig) -> Self {
        Self {
            api,
            surface,
            login_route: routes.login.clone(),
            state: RwLock::new(PlanState::default()),
        }
    }

    pub async fn state(&self) -> PlanState {
        self.state.read().await.clone()
    }

    /// Fill the activity selector
    pub async fn load_categories(&self) -> ActionResult<()> {
        match self.api.sport_categories().await {
            Ok(categories) => {
                self.state.write().await.categories = categories;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error loading sport categories: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn load_plans(&self) -> ActionResult<()> {
        match self.api.plans().await {
            Ok(plans) => {
                tracing::debug!(count = plans.len(), "plans loaded");
                self.state.write().await.plans = plans;
                Ok(())
            }
            Err(ClientError::Unauthorized) => {
                tracing::warn!("plans need a session");
                self.state.write().await.plans.clear();
                Err(ClientError::Unauthorized.into())
            }
            Err(e) => {
                tracing::warn!("Error loading plans: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn open_modal(&self) {
        self.state.write().await.modal_open = true;
    }

    /// Hide the modal and reset the form
    pub async fn close_modal(&self) {
        let mut state = self.state.write().await;
        state.modal_open = false;
        state.form = PlanForm::default();
    }

    pub async fn submit(&self, form: PlanForm) -> ActionResult<()> {
        self.state.write().await.form = form.clone();

        let plan = form.validate().map_err(|e| {
            self.surface.alert(&e.to_string());
            e
        })?;

        match self.api.create_plan(&plan).await {
            Ok(()) => {
                tracing::info!(activity = %plan.activity, "plan saved");
                self.surface.alert("Plan saved successfully!");
                self.close_modal().await;
                if let Err(e) = self.load_plans().await {
                    tracing::debug!("plan list not refreshed after save: {}", e);
                }
                Ok(())
            }
            Err(ClientError::Unauthorized) => {
                self.surface.alert("Please login first.");
                self.surface.navigate(&self.login_route);
                Err(ClientError::Unauthorized.into())
            }
            Err(e) => {
                tracing::error!("Error saving plan: {}", e);
                self.surface.alert("Failed to save plan.");
                Err(e.into())
            }
        }
    }
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.plans.is_empty() {
            return writeln!(f, "No plans yet.");
        }
        for plan in &self.plans {
            writeln!(f, "{:<16} {} -> {}", plan.activity, plan.start_time, plan.end_time)?;
        }
        Ok(())
    }
}
