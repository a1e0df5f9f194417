//! Host Surface
//!
//! The two things a controller asks of the host UI: show a blocking alert,
//! and navigate away.

use std::sync::Mutex;

/// Host UI capabilities used by the controllers
pub trait Surface: Send + Sync {
    /// Show a message the user must acknowledge
    fn alert(&self, message: &str);

    /// Leave the current page for `route`
    fn navigate(&self, route: &str);
}

/// Surface for the terminal host: alerts go to stderr
#[derive(Debug, Default)]
pub struct TerminalSurface {
    navigations: Mutex<Vec<String>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent navigation request, if any
    pub fn last_navigation(&self) -> Option<String> {
        self.navigations
            .lock()
            .ok()
            .and_then(|routes| routes.last().cloned())
    }
}

impl Surface for TerminalSurface {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "alert");
        eprintln!("! {}", message);
    }

    fn navigate(&self, route: &str) {
        tracing::info!(route, "navigation requested");
        eprintln!("-> {}", route);
        if let Ok(mut routes) = self.navigations.lock() {
            routes.push(route.to_string());
        }
    }
}
