//! Content item domain model.
//!
//! Posts and submissions are two parallel collections with identical shape;
//! `ContentKind` selects which one an operation targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two content collections on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Submission,
}

impl ContentKind {
    /// Converts to the URL/database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::Submission => "submissions",
        }
    }

    /// Parses from the URL string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "posts" => Some(ContentKind::Post),
            "submissions" => Some(ContentKind::Submission),
            _ => None,
        }
    }
}

/// A member-submitted post or submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    /// The author.
    pub user_id: Uuid,
    pub submission_date: DateTime<Utc>,
    /// `None` = pending review, `Some(true)` = approved, `Some(false)` = rejected.
    pub approved: Option<bool>,
    pub stars_received: i32,
    /// Set exactly once when approval points are credited; guards against
    /// a duplicate approval call awarding points twice.
    pub points_awarded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn is_approved(&self) -> bool {
        self.approved == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_round_trip() {
        assert_eq!(ContentKind::parse("posts"), Some(ContentKind::Post));
        assert_eq!(
            ContentKind::parse("submissions"),
            Some(ContentKind::Submission)
        );
        assert_eq!(ContentKind::parse("comments"), None);
        assert_eq!(ContentKind::Post.as_str(), "posts");
        assert_eq!(ContentKind::Submission.as_str(), "submissions");
    }

    #[test]
    fn test_approved_tri_state() {
        let mut item = ContentItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            submission_date: Utc::now(),
            approved: None,
            stars_received: 0,
            points_awarded_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!item.is_approved());
        item.approved = Some(false);
        assert!(!item.is_approved());
        item.approved = Some(true);
        assert!(item.is_approved());
    }
}
