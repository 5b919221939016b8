//! Event repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

/// Input for creating an event row.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub anchor_date: DateTime<Utc>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub bonus_points: i32,
    pub is_recurring: bool,
    pub recurring_interval_days: Option<i32>,
    pub recurring_end_date: Option<DateTime<Utc>>,
    pub show_notification: bool,
    pub notification_message: Option<String>,
    pub parent_event_id: Option<Uuid>,
}

/// Input for a partial event update. `None` fields are preserved.
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub anchor_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub bonus_points: Option<i32>,
    pub is_recurring: Option<bool>,
    pub recurring_interval_days: Option<i32>,
    pub recurring_end_date: Option<DateTime<Utc>>,
    pub show_notification: Option<bool>,
    pub notification_message: Option<String>,
}

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event (parent definition or materialized child).
    pub async fn create(&self, input: NewEvent) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (name, description, anchor_date, start_time, end_time,
                                bonus_points, is_recurring, recurring_interval_days,
                                recurring_end_date, show_notification, notification_message,
                                parent_event_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.anchor_date)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .bind(input.bonus_points)
        .bind(input.is_recurring)
        .bind(input.recurring_interval_days)
        .bind(input.recurring_end_date)
        .bind(input.show_notification)
        .bind(&input.notification_message)
        .bind(input.parent_event_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by id.
    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT * FROM events WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all parent event definitions (children excluded).
    ///
    /// This is the input set for every activation evaluation.
    pub async fn list_parents(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_parent_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT * FROM events
            WHERE parent_event_id IS NULL
            ORDER BY anchor_date, created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List materialized child instances of a parent with an anchor date on
    /// or after the given day, earliest first.
    pub async fn list_children_from(
        &self,
        parent_event_id: Uuid,
        from: NaiveDate,
    ) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_event_children_from");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT * FROM events
            WHERE parent_event_id = $1 AND anchor_date >= $2
            ORDER BY anchor_date
            "#,
        )
        .bind(parent_event_id)
        .bind(from.and_time(chrono::NaiveTime::MIN).and_utc())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The anchor date of a parent's latest materialized child, if any.
    pub async fn latest_child_anchor(
        &self,
        parent_event_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        let timer = QueryTimer::new("latest_event_child_anchor");
        let result: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            SELECT anchor_date FROM events
            WHERE parent_event_id = $1
            ORDER BY anchor_date DESC
            LIMIT 1
            "#,
        )
        .bind(parent_event_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();
        Ok(result.map(|row| row.0))
    }

    /// Delete child instances older than the cutoff.
    /// Returns the number of rows deleted.
    pub async fn delete_children_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event_children_before");
        let result = sqlx::query(
            r#"
            DELETE FROM events
            WHERE parent_event_id IS NOT NULL AND anchor_date < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Update an event (partial update). Only provided fields are changed.
    pub async fn update(
        &self,
        event_id: Uuid,
        input: UpdateEvent,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                anchor_date = COALESCE($4, anchor_date),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                bonus_points = COALESCE($7, bonus_points),
                is_recurring = COALESCE($8, is_recurring),
                recurring_interval_days = COALESCE($9, recurring_interval_days),
                recurring_end_date = COALESCE($10, recurring_end_date),
                show_notification = COALESCE($11, show_notification),
                notification_message = COALESCE($12, notification_message),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.anchor_date)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.bonus_points)
        .bind(input.is_recurring)
        .bind(input.recurring_interval_days)
        .bind(input.recurring_end_date)
        .bind(input.show_notification)
        .bind(input.notification_message)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event and any materialized children.
    /// Returns the number of rows deleted.
    pub async fn delete(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query(
            r#"
            DELETE FROM events WHERE id = $1 OR parent_event_id = $1
            "#,
        )
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_repository_creation() {
        // This test verifies the EventRepository can be created
        // Actual database tests are integration tests
    }
}
