//! Active event selection.
//!
//! Every caller that needs "the active event" goes through these two
//! functions; activation is never recomputed per call site.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::models::SpecialEvent;
use crate::services::activation;

/// Pick the single highest-priority event active on `date`.
///
/// Date-only check (no time-of-day), because scoring evaluates a past
/// submission date, not "now". An exact non-recurring date match wins over a
/// recurrence match; among equals the first encountered is returned. Child
/// events never participate.
pub fn pick_event_for_date<'a>(
    events: &'a [SpecialEvent],
    date: NaiveDate,
    tz: Tz,
) -> Option<&'a SpecialEvent> {
    let mut recurring_match: Option<&SpecialEvent> = None;

    for event in events.iter().filter(|e| e.is_parent()) {
        if !activation::active_on_date(event, date, tz) {
            continue;
        }
        if !event.is_recurring {
            return Some(event);
        }
        recurring_match.get_or_insert(event);
    }

    recurring_match
}

/// Events whose notification banner should be shown right now.
///
/// Full date + time-of-day check; input order is preserved.
pub fn active_notifications<'a>(
    events: &'a [SpecialEvent],
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<&'a SpecialEvent> {
    events
        .iter()
        .filter(|e| e.is_parent() && e.show_notification)
        .filter(|e| activation::evaluate(e, now, tz).active_now)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::TimeOfDay;
    use uuid::Uuid;

    fn event(anchor: &str, recurring: Option<i32>) -> SpecialEvent {
        SpecialEvent {
            id: Uuid::new_v4(),
            name: "Event".to_string(),
            description: String::new(),
            anchor_date: format!("{anchor}T00:00:00Z").parse().unwrap(),
            start_time: None,
            end_time: None,
            bonus_points: 10,
            is_recurring: recurring.is_some(),
            recurring_interval_days: recurring,
            recurring_end_date: None,
            show_notification: false,
            notification_message: None,
            parent_event_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_pick_none_when_nothing_active() {
        let events = vec![event("2024-01-01", None), event("2024-02-01", Some(7))];
        assert!(pick_event_for_date(&events, date("2024-01-02"), Tz::UTC).is_none());
    }

    #[test]
    fn test_exact_match_beats_recurring_match() {
        // The recurring event also lands on 2024-01-15, but the exact
        // non-recurring match takes precedence regardless of input order.
        let recurring = event("2024-01-01", Some(7));
        let exact = event("2024-01-15", None);
        let events = vec![recurring.clone(), exact.clone()];
        let picked = pick_event_for_date(&events, date("2024-01-15"), Tz::UTC).unwrap();
        assert_eq!(picked.id, exact.id);

        let events = vec![exact.clone(), recurring];
        let picked = pick_event_for_date(&events, date("2024-01-15"), Tz::UTC).unwrap();
        assert_eq!(picked.id, exact.id);
    }

    #[test]
    fn test_first_encountered_wins_among_recurring() {
        let first = event("2024-01-01", Some(7));
        let second = event("2024-01-08", Some(7));
        let events = vec![first.clone(), second];
        let picked = pick_event_for_date(&events, date("2024-01-15"), Tz::UTC).unwrap();
        assert_eq!(picked.id, first.id);
    }

    #[test]
    fn test_children_never_selected() {
        let mut child = event("2024-01-15", None);
        child.parent_event_id = Some(Uuid::new_v4());
        let events = vec![child];
        assert!(pick_event_for_date(&events, date("2024-01-15"), Tz::UTC).is_none());
    }

    #[test]
    fn test_notifications_require_flag_and_active_now() {
        let mut shown = event("2024-01-15", None);
        shown.show_notification = true;
        shown.notification_message = Some("Double points today!".to_string());

        let mut hidden = event("2024-01-15", None);
        hidden.show_notification = false;

        let mut windowed = event("2024-01-15", None);
        windowed.show_notification = true;
        windowed.start_time = TimeOfDay::parse("18:00");

        let events = vec![shown.clone(), hidden, windowed];
        let now = "2024-01-15T12:00:00Z".parse().unwrap();
        let active = active_notifications(&events, now, Tz::UTC);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, shown.id);
    }

    #[test]
    fn test_notifications_stable_order() {
        let mut a = event("2024-01-15", None);
        a.show_notification = true;
        let mut b = event("2024-01-15", None);
        b.show_notification = true;

        let events = vec![a.clone(), b.clone()];
        let now = "2024-01-15T12:00:00Z".parse().unwrap();
        let active = active_notifications(&events, now, Tz::UTC);
        assert_eq!(
            active.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );
    }
}
