//! Star toggle planning.
//!
//! Toggling a star touches three records (content counter, author score,
//! acting user's starred set). The decision — add or remove, which deltas,
//! the updated set — is computed here as a pure function; the API layer
//! performs the writes in their fixed order.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{ContentItem, UserProfile};

/// Why a star toggle was rejected. These are user-facing reasons; nothing is
/// written when planning fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StarPlanError {
    #[error("Only approved content can be starred")]
    ContentNotApproved,

    #[error("You cannot star your own content")]
    SelfStar,
}

/// The planned effect of one star toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarPlan {
    /// True when this toggle adds a star, false when it removes one.
    pub starred: bool,
    /// +1 or -1, applied atomically (and clamped) at the storage layer.
    pub stars_delta: i32,
    /// The counter value expected after the write, clamped at zero.
    pub expected_stars_received: i32,
    /// Signed score change for the item's author.
    pub author_score_delta: i64,
    /// The acting user's starred set after the toggle.
    pub updated_starred: Vec<Uuid>,
}

/// Plan a star toggle by `acting_user` on `item`.
///
/// Symmetric and idempotent as a pair: planning twice from the resulting
/// state returns to the original counts and membership.
pub fn plan_toggle(
    acting_user: &UserProfile,
    item: &ContentItem,
    points_per_star: i64,
) -> Result<StarPlan, StarPlanError> {
    if !item.is_approved() {
        return Err(StarPlanError::ContentNotApproved);
    }
    if acting_user.user_id == item.user_id {
        return Err(StarPlanError::SelfStar);
    }

    let already_starred = acting_user.has_starred(item.id);

    if already_starred {
        let updated_starred = acting_user
            .starred_submissions
            .iter()
            .copied()
            .filter(|id| *id != item.id)
            .collect();
        Ok(StarPlan {
            starred: false,
            stars_delta: -1,
            expected_stars_received: (item.stars_received - 1).max(0),
            author_score_delta: -points_per_star,
            updated_starred,
        })
    } else {
        let mut updated_starred = acting_user.starred_submissions.clone();
        updated_starred.push(item.id);
        Ok(StarPlan {
            starred: true,
            stars_delta: 1,
            expected_stars_received: item.stars_received + 1,
            author_score_delta: points_per_star,
            updated_starred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring;
    use chrono::Utc;

    const POINTS_PER_STAR: i64 = 10;

    fn profile(user_id: Uuid, starred: Vec<Uuid>) -> UserProfile {
        UserProfile {
            user_id,
            score: 100,
            starred_submissions: starred,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn approved_item(author: Uuid, stars: i32) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            user_id: author,
            submission_date: Utc::now(),
            approved: Some(true),
            stars_received: stars,
            points_awarded_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_star() {
        let author = Uuid::new_v4();
        let item = approved_item(author, 3);
        let acting = profile(Uuid::new_v4(), vec![]);

        let plan = plan_toggle(&acting, &item, POINTS_PER_STAR).unwrap();
        assert!(plan.starred);
        assert_eq!(plan.stars_delta, 1);
        assert_eq!(plan.expected_stars_received, 4);
        assert_eq!(plan.author_score_delta, 10);
        assert_eq!(plan.updated_starred, vec![item.id]);
    }

    #[test]
    fn test_remove_star() {
        let author = Uuid::new_v4();
        let item = approved_item(author, 4);
        let other = Uuid::new_v4();
        let acting = profile(Uuid::new_v4(), vec![other, item.id]);

        let plan = plan_toggle(&acting, &item, POINTS_PER_STAR).unwrap();
        assert!(!plan.starred);
        assert_eq!(plan.stars_delta, -1);
        assert_eq!(plan.expected_stars_received, 3);
        assert_eq!(plan.author_score_delta, -10);
        assert_eq!(plan.updated_starred, vec![other]);
    }

    #[test]
    fn test_double_toggle_round_trips() {
        let author = Uuid::new_v4();
        let mut item = approved_item(author, 3);
        let mut acting = profile(Uuid::new_v4(), vec![]);

        let add = plan_toggle(&acting, &item, POINTS_PER_STAR).unwrap();
        item.stars_received = add.expected_stars_received;
        acting.starred_submissions = add.updated_starred;

        let remove = plan_toggle(&acting, &item, POINTS_PER_STAR).unwrap();
        assert_eq!(remove.expected_stars_received, 3);
        assert!(remove.updated_starred.is_empty());
        // Net author score change is zero.
        assert_eq!(add.author_score_delta + remove.author_score_delta, 0);
    }

    #[test]
    fn test_removal_clamps_counter_at_zero() {
        let author = Uuid::new_v4();
        let mut item = approved_item(author, 0);
        let acting = profile(Uuid::new_v4(), vec![item.id]);

        // Counter already drifted to zero (known consistency gap); removal
        // must not plan a negative count.
        item.stars_received = 0;
        let plan = plan_toggle(&acting, &item, POINTS_PER_STAR).unwrap();
        assert_eq!(plan.expected_stars_received, 0);
    }

    #[test]
    fn test_self_star_rejected() {
        let author = Uuid::new_v4();
        let item = approved_item(author, 3);
        let acting = profile(author, vec![]);

        assert_eq!(
            plan_toggle(&acting, &item, POINTS_PER_STAR),
            Err(StarPlanError::SelfStar)
        );
    }

    #[test]
    fn test_unapproved_content_rejected() {
        let author = Uuid::new_v4();
        let acting = profile(Uuid::new_v4(), vec![]);

        let mut pending = approved_item(author, 0);
        pending.approved = None;
        assert_eq!(
            plan_toggle(&acting, &pending, POINTS_PER_STAR),
            Err(StarPlanError::ContentNotApproved)
        );

        let mut rejected = approved_item(author, 0);
        rejected.approved = Some(false);
        assert_eq!(
            plan_toggle(&acting, &rejected, POINTS_PER_STAR),
            Err(StarPlanError::ContentNotApproved)
        );
    }

    #[test]
    fn test_score_delta_uses_configured_points() {
        let author = Uuid::new_v4();
        let item = approved_item(author, 0);
        let acting = profile(Uuid::new_v4(), vec![]);

        let plan = plan_toggle(&acting, &item, 25).unwrap();
        assert_eq!(plan.author_score_delta, 25);
    }

    #[test]
    fn test_scoring_clamp_used_for_author() {
        // Repeated unstars can push a drifted score toward negative; the
        // clamp holds it at zero.
        assert_eq!(scoring::apply_delta(5, -POINTS_PER_STAR), 0);
    }
}
