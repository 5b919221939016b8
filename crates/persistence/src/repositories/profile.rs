//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for user profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by user id.
    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_user_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT * FROM profiles WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch a profile, creating an empty one if the user has none yet.
    /// Uses ON CONFLICT to handle concurrent first awards.
    pub async fn find_or_create(&self, user_id: Uuid) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("find_or_create_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (user_id, score, starred_submissions)
            VALUES ($1, 0, '{}')
            ON CONFLICT (user_id) DO UPDATE SET
                user_id = profiles.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a signed score delta atomically, clamped at zero.
    /// Returns the new score, or `None` if the profile does not exist.
    pub async fn adjust_score(
        &self,
        user_id: Uuid,
        delta: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let timer = QueryTimer::new("adjust_profile_score");
        let result: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE profiles
            SET score = GREATEST(score + $2, 0),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING score
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();
        Ok(result.map(|row| row.0))
    }

    /// Replace the user's starred set.
    /// Returns the number of rows updated (0 or 1).
    pub async fn set_starred_submissions(
        &self,
        user_id: Uuid,
        starred: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_profile_starred_submissions");
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET starred_submissions = $2,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(starred)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
