//! Recurring event instance maintenance job.
//!
//! Activation is computed on the fly from parent definitions; materialized
//! child instances exist only so admin screens can list upcoming
//! occurrences. This job keeps a rolling window of future children per
//! recurring parent and prunes old ones. It is idempotent, and a failure on
//! one parent does not abort the rest of the batch.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use sqlx::PgPool;
use tracing::{info, warn};

use domain::models::SpecialEvent;
use domain::services::activation;
use persistence::entities::EventEntity;
use persistence::repositories::{EventRepository, NewEvent};

use super::scheduler::{Job, JobFrequency};

/// Background job maintaining materialized occurrences of recurring events.
pub struct EventInstancesJob {
    repo: EventRepository,
    min_future_instances: usize,
    retention_days: u32,
    timezone: Tz,
}

impl EventInstancesJob {
    /// Create a new instance maintenance job.
    pub fn new(
        pool: PgPool,
        min_future_instances: usize,
        retention_days: u32,
        timezone: Tz,
    ) -> Self {
        Self {
            repo: EventRepository::new(pool),
            min_future_instances,
            retention_days,
            timezone,
        }
    }

    /// Top up future children of one recurring parent.
    /// Returns the number of instances created.
    async fn top_up(&self, entity: &EventEntity) -> Result<usize, sqlx::Error> {
        let parent: SpecialEvent = entity.clone().into();
        let today = Utc::now().with_timezone(&self.timezone).date_naive();

        let existing = self.repo.list_children_from(parent.id, today).await?.len();
        if existing >= self.min_future_instances {
            return Ok(0);
        }

        // Continue from the latest materialized instance, or from the
        // anchor when none exist yet.
        let resume_from = match self.repo.latest_child_anchor(parent.id).await? {
            Some(latest) => latest.with_timezone(&self.timezone).date_naive(),
            None => parent.anchor_date.with_timezone(&self.timezone).date_naive(),
        };
        let mut cursor = catch_up_cursor(resume_from, today);

        let mut created = 0;
        while existing + created < self.min_future_instances {
            // Stops early when recurring_end_date is exceeded.
            let Some(next) = activation::next_occurrence_after(&parent, cursor, self.timezone)
            else {
                break;
            };

            self.repo
                .create(NewEvent {
                    name: entity.name.clone(),
                    description: entity.description.clone(),
                    anchor_date: next.and_time(NaiveTime::MIN).and_utc(),
                    start_time: entity.start_time.clone(),
                    end_time: entity.end_time.clone(),
                    bonus_points: entity.bonus_points,
                    is_recurring: false,
                    recurring_interval_days: None,
                    recurring_end_date: None,
                    show_notification: false,
                    notification_message: None,
                    parent_event_id: Some(parent.id),
                })
                .await?;

            cursor = next;
            created += 1;
        }

        Ok(created)
    }
}

/// After a scheduler outage the latest materialized child can be far in the
/// past. Resuming there would spend the whole top-up budget on dates behind
/// `today`; jump the cursor so the first generated occurrence lands on or
/// after `today` and every created row counts toward the future window.
fn catch_up_cursor(resume_from: NaiveDate, today: NaiveDate) -> NaiveDate {
    if resume_from < today {
        today - Duration::days(1)
    } else {
        resume_from
    }
}

#[async_trait::async_trait]
impl Job for EventInstancesJob {
    fn name(&self) -> &'static str {
        "event_instances"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let parents = self
            .repo
            .list_parents()
            .await
            .map_err(|e| format!("Failed to list parent events: {}", e))?;

        let mut created = 0;
        for parent in parents.iter().filter(|p| p.is_recurring) {
            match self.top_up(parent).await {
                Ok(count) => created += count,
                Err(err) => {
                    // Partial progress is acceptable; keep going.
                    warn!(
                        parent_id = %parent.id,
                        error = %err,
                        "Failed to top up event instances"
                    );
                }
            }
        }

        let cutoff = Utc::now() - Duration::days(i64::from(self.retention_days));
        let pruned = match self.repo.delete_children_before(cutoff).await {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "Failed to prune old event instances");
                0
            }
        };

        info!(
            created = created,
            pruned = pruned,
            retention_days = self.retention_days,
            "Event instance maintenance completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn weekly_parent(anchor: &str) -> SpecialEvent {
        SpecialEvent {
            id: Uuid::new_v4(),
            name: "Weekly double-up".to_string(),
            description: String::new(),
            anchor_date: format!("{anchor}T00:00:00Z").parse().unwrap(),
            start_time: None,
            end_time: None,
            bonus_points: 20,
            is_recurring: true,
            recurring_interval_days: Some(7),
            recurring_end_date: None,
            show_notification: false,
            notification_message: None,
            parent_event_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_catch_up_cursor_jumps_over_missed_occurrences() {
        // Stale cursor jumps to just before today.
        assert_eq!(
            catch_up_cursor(date("2024-01-08"), date("2024-03-01")),
            date("2024-02-29")
        );
        // A current or future cursor is left alone.
        assert_eq!(
            catch_up_cursor(date("2024-03-01"), date("2024-03-01")),
            date("2024-03-01")
        );
        assert_eq!(
            catch_up_cursor(date("2024-03-05"), date("2024-03-01")),
            date("2024-03-05")
        );
    }

    #[test]
    fn test_first_generated_occurrence_not_behind_today() {
        // Last materialized child is weeks stale; the first date generated
        // after catch-up must land on the recurrence lattice on or after
        // today, so a single run fills the future window.
        let parent = weekly_parent("2024-01-01");
        let today = date("2024-03-01");

        let cursor = catch_up_cursor(date("2024-01-08"), today);
        let next = activation::next_occurrence_after(&parent, cursor, Tz::UTC).unwrap();
        assert!(next >= today);
        assert_eq!(next, date("2024-03-04"));
    }
}
