//! Client-Side Validation
//!
//! Checks that run before any request is issued. A failure here means the
//! action stops locally; the message is what the user sees.

use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDateTime;
use std::path::Path;
use thiserror::Error;

/// MIME types accepted for avatar uploads
pub const ALLOWED_AVATAR_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

const MIB: u64 = 1024 * 1024;

/// Input rejected before reaching the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("Content cannot be empty!")]
    EmptyPost,

    #[error("Only JPG/PNG formats are allowed.")]
    UnsupportedAvatarType(String),

    #[error("File size cannot exceed {}MB.", .limit / MIB)]
    AvatarTooLarge { size: u64, limit: u64 },

    #[error("Please fill in all fields.")]
    MissingPlanFields,

    #[error("Invalid time format.")]
    MalformedTime(String),

    #[error("End time must be after start time.")]
    PlanEndsBeforeStart,

    #[error("Unknown range '{0}', expected 'week' or 'month'")]
    InvalidRange(String),

    #[error("Invalid workout: {0}")]
    InvalidWorkout(String),
}

// ============================================
// Feed
// ============================================

/// Reject empty or whitespace-only comments
pub fn validate_comment(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(())
}

/// Trim post content, rejecting it if nothing remains
pub fn validate_post_content(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPost);
    }
    Ok(trimmed.to_string())
}

// ============================================
// Avatar upload
// ============================================

/// A file picked for upload as the account avatar
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl AvatarFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, sniffing its MIME type from the content
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let mime = tree_magic_mini::from_u8(&bytes).to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "avatar".to_string());

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check type and size against the upload policy
    pub fn validate(&self, max_bytes: u64) -> Result<(), ValidationError> {
        if !ALLOWED_AVATAR_TYPES.contains(&self.mime.as_str()) {
            return Err(ValidationError::UnsupportedAvatarType(self.mime.clone()));
        }
        if self.size() > max_bytes {
            return Err(ValidationError::AvatarTooLarge {
                size: self.size(),
                limit: max_bytes,
            });
        }
        Ok(())
    }

    /// Inline `data:` URL used as the edit-form preview
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

// ============================================
// Plans
// ============================================

/// Raw values of the plan creation form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanForm {
    pub activity: String,
    pub start_time: String,
    pub end_time: String,
}

/// A plan that passed client-side validation
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NewPlan {
    pub activity: String,
    pub start_time: String,
    pub end_time: String,
}

impl PlanForm {
    pub fn new(
        activity: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            activity: activity.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Validate into a plan ready for submission
    pub fn validate(&self) -> Result<NewPlan, ValidationError> {
        let activity = self.activity.trim();
        let start = self.start_time.trim();
        let end = self.end_time.trim();

        if activity.is_empty() || start.is_empty() || end.is_empty() {
            return Err(ValidationError::MissingPlanFields);
        }

        if parse_plan_time(start)? >= parse_plan_time(end)? {
            return Err(ValidationError::PlanEndsBeforeStart);
        }

        Ok(NewPlan {
            activity: activity.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        })
    }
}

/// Parse a `datetime-local` style value, with or without seconds
pub fn parse_plan_time(value: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ValidationError::MalformedTime(value.to_string()))
}

// ============================================
// Workout logging
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutKind {
    Cardio,
    Strength,
}

impl WorkoutKind {
    /// Endpoint receiving this kind of log
    pub fn endpoint(&self) -> &'static str {
        match self {
            WorkoutKind::Cardio => "/api/log_cardio",
            WorkoutKind::Strength => "/api/log_strength",
        }
    }
}

/// One workout session to record for today
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEntry {
    pub kind: WorkoutKind,
    pub activity: String,
    pub duration_min: f64,
    pub calories: f64,
    /// Strength only, 1..=5; the backend assumes 1 when absent
    pub difficulty: Option<u8>,
}

impl WorkoutEntry {
    /// Duration as sent to the backend, rounded to whole minutes
    pub fn whole_minutes(&self) -> i64 {
        self.duration_min.round() as i64
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.activity.trim().is_empty() {
            return Err(ValidationError::InvalidWorkout(
                "activity is required".to_string(),
            ));
        }
        if !self.duration_min.is_finite() || self.whole_minutes() < 1 {
            return Err(ValidationError::InvalidWorkout(
                "duration must be at least one minute".to_string(),
            ));
        }
        if !self.calories.is_finite() || self.calories < 0.0 {
            return Err(ValidationError::InvalidWorkout(
                "calories cannot be negative".to_string(),
            ));
        }
        if self.kind == WorkoutKind::Strength {
            if let Some(level) = self.difficulty {
                if !(1..=5).contains(&level) {
                    return Err(ValidationError::InvalidWorkout(format!(
                        "difficulty {} is outside 1-5",
                        level
                    )));
                }
            }
        }
        Ok(())
    }
}
