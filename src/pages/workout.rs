//! Workout logging

use std::sync::Arc;

use super::ActionResult;
use crate::client::{ApiClient, ClientError};
use crate::config::RouteConfig;
use crate::models::WorkoutEntry;
use crate::view::Surface;

pub struct WorkoutController {
    api: Arc<ApiClient>,
    surface: Arc<dyn Surface>,
    login_route: String,
}

impl WorkoutController {
    pub fn new(api: Arc<ApiClient>, surface: Arc<dyn Surface>, routes: &RouteConfig) -> Self {
        Self {
            api,
            surface,
            login_route: routes.login.clone(),
        }
    }

    /// Record one cardio or strength session for today
    pub async fn log(&self, entry: &WorkoutEntry) -> ActionResult<()> {
        entry.validate().map_err(|e| {
            self.surface.alert(&e.to_string());
            e
        })?;

        match self.api.log_workout(entry).await {
            Ok(()) => {
                tracing::info!(kind = ?entry.kind, activity = %entry.activity, "workout logged");
                self.surface.alert("Workout logged!");
                Ok(())
            }
            Err(ClientError::Unauthorized) => {
                self.surface.alert("Please login first.");
                self.surface.navigate(&self.login_route);
                Err(ClientError::Unauthorized.into())
            }
            Err(e) => {
                tracing::error!("Error logging workout: {}", e);
                self.surface.alert("Failed to log workout.");
                Err(e.into())
            }
        }
    }
}
