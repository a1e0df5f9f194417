//! View-Model Types
//!
//! Entities exchanged with the backend. Every value here is rebuilt from the
//! latest response and never patched locally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validation::ValidationError;

// ============================================
// Dashboard
// ============================================

/// Time window scoping dashboard queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Range {
    #[default]
    Week,
    Month,
}

impl Range {
    /// Query-string value for this range
    pub fn as_str(&self) -> &'static str {
        match self {
            Range::Week => "week",
            Range::Month => "month",
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Range {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Range::Week),
            "month" => Ok(Range::Month),
            _ => Err(ValidationError::InvalidRange(s.to_string())),
        }
    }
}

/// Entry in the dashboard user selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: u64,
    pub username: String,
}

/// Summary numbers for one (range, user) query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub current_streak: u32,
    pub total_calories: f64,
    pub total_hours: f64,
    pub percentile: u32,
}

/// Daily hours, you vs. the average user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub you: Vec<f64>,
    pub average: Vec<f64>,
}

/// Aerobic vs. anaerobic split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySplit {
    pub aerobic: f64,
    pub anaerobic: f64,
}

/// Per-category comparison for the radar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub categories: Vec<String>,
    pub you: Vec<f64>,
    pub average: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub total_calories: f64,
    pub total_hours: f64,
}

// ============================================
// Social feed
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    pub text: String,
}

/// A post as reported by the server, with the caller's membership flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub username: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u64,
    pub bookmarks: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Response of the bookmarked-posts endpoint
///
/// An unauthenticated caller gets `{error: ...}` instead of a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BookmarkedPosts {
    Posts(Vec<Post>),
    LoginRequired { error: String },
}

// ============================================
// Plans
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub activity: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
}

// ============================================
// Account
// ============================================

/// Current user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coins: Option<u64>,
    /// Server avatar URL. Not used for display.
    #[serde(default)]
    pub avatar: Option<String>,
}

// ============================================
// Wire envelopes
// ============================================

#[derive(Debug, Clone, Deserialize)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// `{success, error}` body returned by mutating endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
