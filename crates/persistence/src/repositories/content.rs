//! Content repository for database operations.
//!
//! Posts and submissions live in two parallel tables with identical shape;
//! every query here is parameterized by `ContentKind`, which selects the
//! table. The kind is a closed enum, so interpolating its table name into
//! SQL is safe.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ContentItemEntity;
use crate::metrics::QueryTimer;
use domain::models::ContentKind;

/// Repository for post and submission database operations.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    /// Creates a new ContentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending content item.
    pub async fn create(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        submission_date: DateTime<Utc>,
    ) -> Result<ContentItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_content_item");
        let sql = format!(
            r#"
            INSERT INTO {} (user_id, submission_date)
            VALUES ($1, $2)
            RETURNING *
            "#,
            kind.as_str()
        );
        let result = sqlx::query_as::<_, ContentItemEntity>(&sql)
            .bind(user_id)
            .bind(submission_date)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a content item by id.
    pub async fn find_by_id(
        &self,
        kind: ContentKind,
        item_id: Uuid,
    ) -> Result<Option<ContentItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_content_item_by_id");
        let sql = format!("SELECT * FROM {} WHERE id = $1", kind.as_str());
        let result = sqlx::query_as::<_, ContentItemEntity>(&sql)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Record a review decision (approve or reject).
    pub async fn set_review(
        &self,
        kind: ContentKind,
        item_id: Uuid,
        approved: bool,
    ) -> Result<Option<ContentItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_content_review");
        let sql = format!(
            r#"
            UPDATE {} SET approved = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
            kind.as_str()
        );
        let result = sqlx::query_as::<_, ContentItemEntity>(&sql)
            .bind(item_id)
            .bind(approved)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Set the points-awarded marker if it is not already set.
    ///
    /// Returns `true` when this call won the check-and-set, `false` when
    /// points were already awarded (duplicate approval call). This is the
    /// idempotency guard for approval scoring.
    pub async fn mark_points_awarded(
        &self,
        kind: ContentKind,
        item_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_content_points_awarded");
        let sql = format!(
            r#"
            UPDATE {} SET points_awarded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND points_awarded_at IS NULL
            "#,
            kind.as_str()
        );
        let result = sqlx::query(&sql).bind(item_id).execute(&self.pool).await?;
        timer.record();
        Ok(result.rows_affected() == 1)
    }

    /// Apply a star-count delta atomically, clamped at zero.
    ///
    /// An atomic increment/decrement rather than read-modify-write, so two
    /// concurrent toggles on the same item cannot lose an update. Returns
    /// the new count, or `None` if the item does not exist.
    pub async fn adjust_stars(
        &self,
        kind: ContentKind,
        item_id: Uuid,
        delta: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let timer = QueryTimer::new("adjust_content_stars");
        let sql = format!(
            r#"
            UPDATE {} SET stars_received = GREATEST(stars_received + $2, 0),
                          updated_at = NOW()
            WHERE id = $1
            RETURNING stars_received
            "#,
            kind.as_str()
        );
        let result: Option<(i32,)> = sqlx::query_as(&sql)
            .bind(item_id)
            .bind(delta)
            .fetch_optional(&self.pool)
            .await?;
        timer.record();
        Ok(result.map(|row| row.0))
    }

    /// Delete a content item.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, kind: ContentKind, item_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_content_item");
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.as_str());
        let result = sqlx::query(&sql).bind(item_id).execute(&self.pool).await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
