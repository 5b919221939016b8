//! User profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a member's reputation profile.
///
/// `score` and `starred_submissions` mutate only through the scoring engine
/// and the star ledger; the score is clamped and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub score: i64,
    /// Content item ids this user currently has starred. Stored as an array;
    /// membership is what matters, order is irrelevant.
    pub starred_submissions: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Whether this user currently has the given content item starred.
    pub fn has_starred(&self, content_item_id: Uuid) -> bool {
        self.starred_submissions.contains(&content_item_id)
    }
}
