//! Approval scoring service.
//!
//! Credits `base_points + active event bonus` to an author's cumulative
//! score when their content item is approved. The points-awarded marker on
//! the content row makes crediting idempotent: a duplicate approval call
//! (admin double-click, retried request) is a no-op.

use chrono_tz::Tz;
use persistence::repositories::{ContentRepository, EventRepository, ProfileRepository};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use domain::models::{ContentItem, ContentKind, SpecialEvent};
use domain::services::scoring;

use crate::middleware::metrics::record_points_awarded;

/// Errors that can occur while crediting approval points.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Service computing and persisting approval point awards.
pub struct ScoringService {
    content_repo: ContentRepository,
    event_repo: EventRepository,
    profile_repo: ProfileRepository,
    base_points: i64,
    timezone: Tz,
}

impl ScoringService {
    /// Create a new ScoringService.
    pub fn new(pool: PgPool, base_points: i64, timezone: Tz) -> Self {
        Self {
            content_repo: ContentRepository::new(pool.clone()),
            event_repo: EventRepository::new(pool.clone()),
            profile_repo: ProfileRepository::new(pool),
            base_points,
            timezone,
        }
    }

    /// Credit points for an approved content item.
    ///
    /// Returns the author's new score, or `None` when points were already
    /// awarded for this item. A failing event lookup degrades to a zero
    /// bonus; a failing score write is a hard error (the approval itself is
    /// not rolled back by this service — documented policy).
    pub async fn award_approval_points(
        &self,
        kind: ContentKind,
        item: &ContentItem,
    ) -> Result<Option<i64>, ScoringError> {
        let first_award = self.content_repo.mark_points_awarded(kind, item.id).await?;
        if !first_award {
            info!(
                item_id = %item.id,
                "Points already awarded for this item, skipping"
            );
            return Ok(None);
        }

        let bonus = self.bonus_for(item).await;
        let total = scoring::approval_award(self.base_points, bonus);

        self.profile_repo.find_or_create(item.user_id).await?;
        let new_score = self
            .profile_repo
            .adjust_score(item.user_id, total)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        record_points_awarded(total);
        info!(
            user_id = %item.user_id,
            item_id = %item.id,
            base_points = self.base_points,
            bonus = bonus,
            new_score = new_score,
            "Approval points awarded"
        );
        Ok(Some(new_score))
    }

    /// Bonus from the event active on the item's submission date.
    ///
    /// Event lookup failure must never block awarding base points, so it is
    /// logged and treated as "no bonus".
    async fn bonus_for(&self, item: &ContentItem) -> i64 {
        match self.event_repo.list_parents().await {
            Ok(rows) => {
                let events: Vec<SpecialEvent> = rows.into_iter().map(Into::into).collect();
                let date = item
                    .submission_date
                    .with_timezone(&self.timezone)
                    .date_naive();
                scoring::bonus_for_date(&events, date, self.timezone)
            }
            Err(err) => {
                warn!(
                    item_id = %item.id,
                    error = %err,
                    "Active event lookup failed, awarding base points only"
                );
                0
            }
        }
    }
}
