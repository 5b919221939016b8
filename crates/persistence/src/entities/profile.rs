//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::UserProfile;

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub user_id: Uuid,
    pub score: i64,
    pub starred_submissions: Vec<Uuid>, // SQLx maps UUID[] to Vec<Uuid>
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for UserProfile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            user_id: entity.user_id,
            score: entity.score,
            starred_submissions: entity.starred_submissions,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
