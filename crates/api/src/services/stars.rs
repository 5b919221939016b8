//! Star ledger service.
//!
//! Toggles one user's star on one content item. Three records change: the
//! item's counter, the author's score, and the acting user's starred set.
//! The writes happen in that fixed order without a surrounding transaction;
//! the counter uses an atomic clamped increment, and a failure partway
//! through is reported to the caller even though earlier writes committed
//! (the client is expected to re-fetch rather than trust its optimistic
//! update).

use persistence::repositories::{ContentRepository, ProfileRepository};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::{ContentItem, ContentKind, UserProfile};
use domain::services::stars::{plan_toggle, StarPlanError};

use crate::middleware::metrics::record_star_toggled;

/// Errors from a star toggle. Validation variants carry the user-facing
/// reason and guarantee nothing was written.
#[derive(Debug, Error)]
pub enum StarError {
    #[error("Content item not found")]
    ContentNotFound,

    #[error("{0}")]
    Rejected(#[from] StarPlanError),

    #[error("Your profile could not be found")]
    ProfileNotFound,

    /// A write failed after earlier steps may have committed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of one star toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarToggleOutcome {
    /// True when the toggle added a star.
    pub starred: bool,
    /// The item's star count after the toggle.
    pub stars_received: i32,
    /// The author's score after the toggle, when it could be updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_score: Option<i64>,
}

/// Service maintaining the star ledger.
pub struct StarService {
    content_repo: ContentRepository,
    profile_repo: ProfileRepository,
    points_per_star: i64,
}

impl StarService {
    /// Create a new StarService.
    pub fn new(pool: PgPool, points_per_star: i64) -> Self {
        Self {
            content_repo: ContentRepository::new(pool.clone()),
            profile_repo: ProfileRepository::new(pool),
            points_per_star,
        }
    }

    /// Toggle `acting_user`'s star on a content item.
    pub async fn toggle_star(
        &self,
        acting_user: Uuid,
        kind: ContentKind,
        item_id: Uuid,
    ) -> Result<StarToggleOutcome, StarError> {
        let item: ContentItem = self
            .content_repo
            .find_by_id(kind, item_id)
            .await?
            .ok_or(StarError::ContentNotFound)?
            .into();

        let profile: UserProfile = self
            .profile_repo
            .find_by_user_id(acting_user)
            .await?
            .ok_or(StarError::ProfileNotFound)?
            .into();

        let plan = plan_toggle(&profile, &item, self.points_per_star)?;

        // Step 1: the item's counter. Atomic and clamped at the storage
        // layer, so concurrent toggles on the same item cannot lose updates.
        let stars_received = self
            .content_repo
            .adjust_stars(kind, item_id, plan.stars_delta)
            .await?
            .ok_or(StarError::ContentNotFound)?;

        // Step 2: the author's score. A missing or unreachable author
        // profile skips this write without failing the toggle; the star and
        // counter change still stand.
        let author_score = match self
            .profile_repo
            .adjust_score(item.user_id, plan.author_score_delta)
            .await
        {
            Ok(Some(score)) => Some(score),
            Ok(None) => {
                warn!(
                    author_id = %item.user_id,
                    item_id = %item_id,
                    "Author profile missing, star recorded without score change"
                );
                None
            }
            Err(err) => {
                warn!(
                    author_id = %item.user_id,
                    item_id = %item_id,
                    error = %err,
                    "Author score update failed, star recorded without score change"
                );
                None
            }
        };

        // Step 3: the acting user's starred set. A failure here is reported
        // even though steps 1-2 committed.
        let rows = self
            .profile_repo
            .set_starred_submissions(acting_user, &plan.updated_starred)
            .await?;
        if rows == 0 {
            return Err(StarError::ProfileNotFound);
        }

        record_star_toggled(plan.starred);
        info!(
            acting_user = %acting_user,
            item_id = %item_id,
            starred = plan.starred,
            stars_received = stars_received,
            "Star toggled"
        );

        Ok(StarToggleOutcome {
            starred: plan.starred,
            stars_received,
            author_score,
        })
    }
}
