//! Feed Page
//!
//! Social feed and the read-only bookmarks view. Mutations never patch the
//! list locally: on success the whole list is fetched again and the view is
//! rebuilt from that response.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::ActionResult;
use crate::client::{ApiClient, ClientResult};
use crate::models::validation::{validate_comment, validate_post_content};
use crate::models::BookmarkedPosts;
use crate::view::{render_posts, FeedView, RenderMode, Surface};

/// Which list a feed controller shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// Every post, with actions and comment composers
    All,
    /// Current user's bookmarks, read-only
    Bookmarked,
}

impl FeedSource {
    pub fn render_mode(&self) -> RenderMode {
        match self {
            FeedSource::All => RenderMode::Interactive,
            FeedSource::Bookmarked => RenderMode::ReadOnly,
        }
    }

    fn empty_message(&self) -> &'static str {
        match self {
            FeedSource::All => "No posts yet.",
            FeedSource::Bookmarked => "No bookmarks yet.",
        }
    }
}

pub struct FeedController {
    api: Arc<ApiClient>,
    surface: Arc<dyn Surface>,
    source: FeedSource,
    view: RwLock<FeedView>,
}

impl FeedController {
    pub fn new(api: Arc<ApiClient>, surface: Arc<dyn Surface>, source: FeedSource) -> Self {
        Self {
            api,
            surface,
            source,
            view: RwLock::new(FeedView::default()),
        }
    }

    pub fn source(&self) -> FeedSource {
        self.source
    }

    pub async fn view(&self) -> FeedView {
        self.view.read().await.clone()
    }

    /// Fetch the list and rebuild the view from it
    pub async fn load(&self) -> ActionResult<()> {
        let view = match self.source {
            FeedSource::All => self.api.posts().await.map(|posts| {
                if posts.is_empty() {
                    FeedView::Placeholder(self.source.empty_message().to_string())
                } else {
                    FeedView::Posts(render_posts(&posts, self.source.render_mode()))
                }
            }),
            FeedSource::Bookmarked => self.api.bookmarked_posts().await.map(|result| match result {
                BookmarkedPosts::LoginRequired { error } => {
                    tracing::debug!(error, "bookmarks need a session");
                    FeedView::Placeholder("Please log in first.".to_string())
                }
                BookmarkedPosts::Posts(posts) if posts.is_empty() => {
                    FeedView::Placeholder(self.source.empty_message().to_string())
                }
                BookmarkedPosts::Posts(posts) => {
                    FeedView::Posts(render_posts(&posts, self.source.render_mode()))
                }
            }),
        };

        match view {
            Ok(view) => {
                tracing::debug!(source = ?self.source, posts = view.cards().len(), "feed rendered");
                *self.view.write().await = view;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading posts: {}", e);
                self.surface
                    .alert("Failed to load posts. Please try again later.");
                Err(e.into())
            }
        }
    }

    pub async fn create_post(&self, content: &str) -> ActionResult<()> {
        let content = validate_post_content(content).map_err(|e| {
            self.surface.alert(&e.to_string());
            e
        })?;

        let result = self.api.create_post(&content).await;
        self.refresh_after(result, "create post", "Failed to create post. Please try again later.")
            .await
    }

    /// Submit the composer text of `post_id`; blank text never leaves the client
    pub async fn submit_comment(&self, post_id: u64, text: &str) -> ActionResult<()> {
        validate_comment(text).map_err(|e| {
            self.surface.alert(&e.to_string());
            e
        })?;

        let result = self.api.add_comment(post_id, text).await;
        self.refresh_after(
            result,
            "submit comment",
            "Failed to submit comment. Please try again later.",
        )
        .await
    }

    pub async fn toggle_like(&self, post_id: u64) -> ActionResult<()> {
        let result = self.api.toggle_like(post_id).await;
        self.refresh_after(result, "like/unlike post", "Failed to update like. Please try again later.")
            .await
    }

    pub async fn toggle_bookmark(&self, post_id: u64) -> ActionResult<()> {
        let result = self.api.toggle_bookmark(post_id).await;
        self.refresh_after(
            result,
            "bookmark/unbookmark post",
            "Failed to update bookmark. Please try again later.",
        )
        .await
    }

    /// Reload the full list once after a successful mutation
    async fn refresh_after(
        &self,
        result: ClientResult<()>,
        action: &str,
        failure: &str,
    ) -> ActionResult<()> {
        match result {
            Ok(()) => {
                tracing::info!(action, "mutation accepted, reloading feed");
                self.load().await
            }
            Err(e) => {
                tracing::error!(action, "Mutation failed: {}", e);
                self.surface.alert(failure);
                Err(e.into())
            }
        }
    }
}
