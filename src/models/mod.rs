//! Data Model
//!
//! Transient view-models decoded from backend responses, plus the
//! client-side validation that gates every mutating action.

mod types;
pub mod validation;

pub use types::{
    AccountProfile, BookmarkedPosts, CategoryComparison, CategorySplit, Comment,
    CsrfTokenResponse, LeaderboardEntry, MetricsSnapshot, MutationAck, Plan, Post, Range,
    SportCategory, TrendSeries, UserSummary,
};
pub use validation::{
    AvatarFile, NewPlan, PlanForm, ValidationError, WorkoutEntry, WorkoutKind,
    ALLOWED_AVATAR_TYPES,
};
