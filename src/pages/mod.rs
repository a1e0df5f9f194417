//! Page Controllers
//!
//! One controller per view. Each owns its view state, calls the backend
//! through the shared `ApiClient`, and reports failures to the user through
//! the host `Surface` before returning them.
//!
//! ## Data Flow
//!
//! 1. A user action reaches a controller method
//! 2. Validation runs first; a failure alerts and stops
//! 3. One or more fetches are issued
//! 4. The affected region is rebuilt from the responses

mod account;
mod dashboard;
mod feed;
mod plans;
mod tabs;
mod workout;

pub use account::{AccountController, AccountState, AccountView, EditForm, ProfileDetail};
pub use dashboard::{DashboardController, DashboardView, Selection};
pub use feed::{FeedController, FeedSource};
pub use plans::{PlanController, PlanState};
pub use tabs::{Tab, TabState};
pub use workout::WorkoutController;

use thiserror::Error;

use crate::client::ClientError;
use crate::models::ValidationError;

/// Why a user action did not complete
///
/// By the time a controller returns this, the user has already been told.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ActionError {
    /// Whether the action stopped before any request was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, ActionError::Validation(_))
    }
}

/// Result type for controller actions
pub type ActionResult<T> = Result<T, ActionError>;
