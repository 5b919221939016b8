//! Approval scoring math.
//!
//! The point award for an approved content item is `base_points` plus the
//! bonus of the event active on its submission date, if any. The I/O side
//! (idempotency marker, profile update) lives in the API layer; this module
//! is the pure part.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::models::SpecialEvent;
use crate::services::selection;

/// Bonus points contributed by the active event on `date`, or 0.
pub fn bonus_for_date(events: &[SpecialEvent], date: NaiveDate, tz: Tz) -> i64 {
    selection::pick_event_for_date(events, date, tz)
        .map(|event| i64::from(event.bonus_points))
        .unwrap_or(0)
}

/// Total points for one approval.
pub fn approval_award(base_points: i64, bonus: i64) -> i64 {
    base_points + bonus
}

/// Clamped score update; a score never goes negative.
pub fn apply_delta(score: i64, delta: i64) -> i64 {
    (score + delta).max(0)
}
