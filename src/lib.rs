//! # Stride
//!
//! Client data-sync layer for a social fitness tracker.
//!
//! Each page of the app (record dashboard, social feed, bookmarks, plans,
//! workout logging, account) has a controller that fetches from the backend
//! REST API, keeps its own view state, and reports failures to the host
//! through a [`view::Surface`].
//!
//! ## Modules
//!
//! - [`client`]: HTTP transport, CSRF session, typed endpoint wrappers
//! - [`models`]: response view-models and client-side validation
//! - [`pages`]: one controller per page
//! - [`view`]: host surface trait, chart state, post rendering
//! - [`app`]: composition root and tab switching
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stride::{App, Config, TerminalSurface};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let app = App::from_config(Arc::new(TerminalSurface::new()), &config)?;
//!
//!     app.start().await;
//!     app.switch_tab("record").await;
//!     println!("{}", app.dashboard.view().await);
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod models;
pub mod pages;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::App;

pub use client::{ApiClient, ClientError, ClientResult, HttpTransport, Transport};

pub use config::{Config, ConfigError, LoggingConfig};

pub use models::{Range, ValidationError};

pub use pages::{ActionError, ActionResult, FeedSource, Tab};

pub use view::{Surface, TerminalSurface};
