//! Post Rendering
//!
//! One render function serves both the social feed and the read-only
//! bookmarks view.

use std::fmt;

use crate::models::Post;

const BOOKMARKED_ICON: &str = "🔖";
const UNBOOKMARKED_ICON: &str = "📑";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Actions are bound and each card gets a comment composer
    Interactive,
    ReadOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentLine {
    pub author: String,
    pub text: String,
}

/// One-line comment input; Enter submits to `post_id`
#[derive(Debug, Clone, PartialEq)]
pub struct Composer {
    pub post_id: u64,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub post_id: u64,
    pub author: String,
    pub timestamp: String,
    pub content: String,
    pub likes: u64,
    pub liked: bool,
    pub comment_count: usize,
    pub bookmarks: u64,
    pub bookmarked: bool,
    /// Like and bookmark affordances trigger the toggle endpoints
    pub actions_enabled: bool,
    pub comments: Vec<CommentLine>,
    pub composer: Option<Composer>,
}

impl PostCard {
    pub fn bookmark_icon(&self) -> &'static str {
        if self.bookmarked {
            BOOKMARKED_ICON
        } else {
            UNBOOKMARKED_ICON
        }
    }
}

/// Render every post in server order
pub fn render_posts(posts: &[Post], mode: RenderMode) -> Vec<PostCard> {
    let interactive = mode == RenderMode::Interactive;

    posts
        .iter()
        .map(|post| PostCard {
            post_id: post.id,
            author: post.username.clone(),
            timestamp: post.timestamp.clone(),
            content: post.content.clone(),
            likes: post.likes,
            liked: post.is_liked,
            comment_count: post.comments.len(),
            bookmarks: post.bookmarks,
            bookmarked: post.is_bookmarked,
            actions_enabled: interactive,
            comments: post
                .comments
                .iter()
                .map(|c| CommentLine {
                    author: c.username.clone(),
                    text: c.text.clone(),
                })
                .collect(),
            composer: interactive.then_some(Composer {
                post_id: post.id,
                placeholder: "Add a comment...",
            }),
        })
        .collect()
}

/// Feed region contents
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedView {
    #[default]
    Unloaded,
    Posts(Vec<PostCard>),
    /// A message shown instead of a list
    Placeholder(String),
}

impl FeedView {
    pub fn cards(&self) -> &[PostCard] {
        match self {
            FeedView::Posts(cards) => cards,
            _ => &[],
        }
    }
}

impl fmt::Display for PostCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}  {}", self.post_id, self.author, self.timestamp)?;
        writeln!(f, "  {}", self.content)?;
        writeln!(
            f,
            "  ❤️ {}   💬 {}   {} {}",
            self.likes,
            self.comment_count,
            self.bookmark_icon(),
            self.bookmarks
        )?;
        for comment in &self.comments {
            writeln!(f, "    {}: {}", comment.author, comment.text)?;
        }
        if let Some(composer) = &self.composer {
            writeln!(f, "    [{}]", composer.placeholder)?;
        }
        Ok(())
    }
}

impl fmt::Display for FeedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedView::Unloaded => Ok(()),
            FeedView::Placeholder(message) => writeln!(f, "{}", message),
            FeedView::Posts(cards) => {
                for card in cards {
                    writeln!(f, "{}", card)?;
                }
                Ok(())
            }
        }
    }
}
