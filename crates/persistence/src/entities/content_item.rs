//! Content item entity (database row mapping).
//!
//! Posts and submissions share this shape; the repository picks the table.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::ContentItem;

/// Database row mapping for the posts and submissions tables.
#[derive(Debug, Clone, FromRow)]
pub struct ContentItemEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub submission_date: DateTime<Utc>,
    pub approved: Option<bool>,
    pub stars_received: i32,
    pub points_awarded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentItemEntity> for ContentItem {
    fn from(entity: ContentItemEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            submission_date: entity.submission_date,
            approved: entity.approved,
            stars_received: entity.stars_received,
            points_awarded_at: entity.points_awarded_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
