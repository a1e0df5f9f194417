//! CSRF Session Bootstrap
//!
//! The token is fetched at most once per process. Whatever the first attempt
//! produced (a token or nothing) is what every later mutating request uses.

use tokio::sync::OnceCell;

/// Header carrying the CSRF token on mutating requests
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Holds the outcome of the one-time token fetch
#[derive(Debug, Default)]
pub struct CsrfSession {
    token: OnceCell<Option<String>>,
}

impl CsrfSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fetch` the first time only; later calls reuse its outcome
    pub async fn bootstrap<F, Fut>(&self, fetch: F) -> Option<&str>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Option<String>>,
    {
        self.token.get_or_init(fetch).await.as_deref()
    }

    /// Whether the one-time fetch has already run
    pub fn is_bootstrapped(&self) -> bool {
        self.token.initialized()
    }

    /// Token obtained at bootstrap, if any
    pub fn token(&self) -> Option<&str> {
        self.token.get().and_then(|t| t.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_bootstrap_runs_once() {
        let session = CsrfSession::new();
        let calls = AtomicUsize::new(0);

        let first = session
            .bootstrap(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Some("abc".to_string())
            })
            .await;
        assert_eq!(first, Some("abc"));

        let second = session
            .bootstrap(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Some("other".to_string())
            })
            .await;
        assert_eq!(second, Some("abc"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_bootstrap_is_not_retried() {
        let session = CsrfSession::new();
        assert!(!session.is_bootstrapped());

        assert_eq!(session.bootstrap(|| async { None }).await, None);
        assert!(session.is_bootstrapped());

        let again = session
            .bootstrap(|| async { Some("late".to_string()) })
            .await;
        assert_eq!(again, None);
        assert_eq!(session.token(), None);
    }
}
