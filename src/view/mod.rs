//! View Layer
//!
//! Host surface trait, chart state, and the shared post renderer.

mod chart;
mod feed;
mod surface;

pub use chart::{Chart, ChartKind, Dataset};
pub use feed::{render_posts, CommentLine, Composer, FeedView, PostCard, RenderMode};
pub use surface::{Surface, TerminalSurface};
