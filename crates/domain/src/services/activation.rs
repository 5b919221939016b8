//! Event activation evaluation.
//!
//! Decides, for any instant in any timezone, whether a special event is
//! active *today* (calendar-date match, accounting for fixed-day-interval
//! recurrence) and active *right now* (additionally inside the optional
//! time-of-day window). There is exactly one evaluation path, parameterized
//! by timezone; "use the server clock" is just `Tz::UTC` (or the configured
//! zone), not a separate implementation.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::SpecialEvent;

/// The result of evaluating an event against an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// The event occurs on the instant's calendar date in the given timezone.
    pub active_today: bool,
    /// `active_today`, and the instant's wall-clock time falls within the
    /// event's time-of-day window (both bounds inclusive).
    pub active_now: bool,
}

impl Activation {
    const INACTIVE: Activation = Activation {
        active_today: false,
        active_now: false,
    };
}

/// Evaluate full date + time-of-day activation for an instant.
pub fn evaluate(event: &SpecialEvent, now: DateTime<Utc>, tz: Tz) -> Activation {
    let local = now.with_timezone(&tz);
    if !active_on_date(event, local.date_naive(), tz) {
        return Activation::INACTIVE;
    }

    let now_minutes = (local.hour() * 60 + local.minute()) as u16;
    let after_start = event
        .start_time
        .map_or(true, |start| now_minutes >= start.minutes());
    let before_end = event
        .end_time
        .map_or(true, |end| now_minutes <= end.minutes());

    Activation {
        active_today: true,
        active_now: after_start && before_end,
    }
}

/// Date-only activation check.
///
/// Used by scoring, which evaluates a past submission date rather than "now"
/// and must therefore ignore the time-of-day window.
pub fn active_on_date(event: &SpecialEvent, date: NaiveDate, tz: Tz) -> bool {
    let anchor = event.anchor_date.with_timezone(&tz).date_naive();

    if !event.is_recurring {
        return date == anchor;
    }
    if date < anchor {
        return false;
    }
    if let Some(end) = event.recurring_end_date {
        if date > end.with_timezone(&tz).date_naive() {
            return false;
        }
    }
    // Interval < 1 is rejected at creation time; an event carrying one
    // anyway never activates.
    let interval = match event.recurring_interval_days {
        Some(interval) if interval >= 1 => i64::from(interval),
        _ => return false,
    };

    (date - anchor).num_days() % interval == 0
}

/// The earliest occurrence of a recurring event strictly after `after`.
///
/// Returns `None` for non-recurring events, events with an invalid interval,
/// and when the next occurrence would fall past `recurring_end_date`.
pub fn next_occurrence_after(event: &SpecialEvent, after: NaiveDate, tz: Tz) -> Option<NaiveDate> {
    if !event.is_recurring {
        return None;
    }
    let interval = match event.recurring_interval_days {
        Some(interval) if interval >= 1 => i64::from(interval),
        _ => return None,
    };

    let anchor = event.anchor_date.with_timezone(&tz).date_naive();
    let next = if after < anchor {
        anchor
    } else {
        let elapsed = (after - anchor).num_days();
        let steps = elapsed / interval + 1;
        anchor.checked_add_signed(chrono::Duration::days(steps * interval))?
    };

    if let Some(end) = event.recurring_end_date {
        if next > end.with_timezone(&tz).date_naive() {
            return None;
        }
    }
    Some(next)
}

/// Occurrence dates of an event on or after `from`, capped at `max`.
///
/// For a non-recurring event this is the anchor date (if not yet past); for a
/// recurring one it walks the interval lattice until the end date or the cap.
pub fn upcoming_occurrences(
    event: &SpecialEvent,
    from: NaiveDate,
    tz: Tz,
    max: usize,
) -> Vec<NaiveDate> {
    if !event.is_recurring {
        let anchor = event.anchor_date.with_timezone(&tz).date_naive();
        return if anchor >= from && max > 0 {
            vec![anchor]
        } else {
            Vec::new()
        };
    }

    let mut occurrences = Vec::new();
    let mut cursor = if active_on_date(event, from, tz) {
        Some(from)
    } else {
        next_occurrence_after(event, from, tz)
    };
    while let Some(date) = cursor {
        if occurrences.len() >= max {
            break;
        }
        occurrences.push(date);
        cursor = next_occurrence_after(event, date, tz);
    }
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::TimeOfDay;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn event(anchor: &str) -> SpecialEvent {
        SpecialEvent {
            id: Uuid::new_v4(),
            name: "Double points day".to_string(),
            description: String::new(),
            anchor_date: Utc
                .from_utc_datetime(&format!("{anchor}T00:00:00").parse().unwrap()),
            start_time: None,
            end_time: None,
            bonus_points: 20,
            is_recurring: false,
            recurring_interval_days: None,
            recurring_end_date: None,
            show_notification: false,
            notification_message: None,
            parent_event_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn recurring(anchor: &str, interval: i32) -> SpecialEvent {
        let mut e = event(anchor);
        e.is_recurring = true;
        e.recurring_interval_days = Some(interval);
        e
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_non_recurring_active_only_on_anchor_date() {
        let e = event("2024-03-10");
        assert!(active_on_date(&e, date("2024-03-10"), Tz::UTC));
        assert!(!active_on_date(&e, date("2024-03-09"), Tz::UTC));
        assert!(!active_on_date(&e, date("2024-03-11"), Tz::UTC));
    }

    #[test]
    fn test_recurring_interval_lattice() {
        let e = recurring("2024-01-01", 7);
        for k in 0..6 {
            let on = date("2024-01-01") + chrono::Duration::days(k * 7);
            assert!(active_on_date(&e, on, Tz::UTC), "k = {k}");
            for j in 1..7 {
                let between = on + chrono::Duration::days(j);
                assert!(!active_on_date(&e, between, Tz::UTC), "k = {k}, j = {j}");
            }
        }
    }

    #[test]
    fn test_recurring_inactive_before_anchor() {
        let e = recurring("2024-01-08", 7);
        assert!(!active_on_date(&e, date("2024-01-01"), Tz::UTC));
        assert!(!active_on_date(&e, date("2024-01-07"), Tz::UTC));
        assert!(active_on_date(&e, date("2024-01-08"), Tz::UTC));
    }

    #[test]
    fn test_recurring_respects_end_date() {
        let mut e = recurring("2024-01-01", 7);
        e.recurring_end_date = Some(instant("2024-01-20T00:00:00Z"));
        assert!(active_on_date(&e, date("2024-01-15"), Tz::UTC));
        // 2024-01-22 lands on the lattice but is past the end date.
        assert!(!active_on_date(&e, date("2024-01-22"), Tz::UTC));
    }

    #[test]
    fn test_invalid_interval_never_activates() {
        let mut e = recurring("2024-01-01", 7);
        e.recurring_interval_days = Some(0);
        assert!(!active_on_date(&e, date("2024-01-01"), Tz::UTC));
        e.recurring_interval_days = None;
        assert!(!active_on_date(&e, date("2024-01-01"), Tz::UTC));
    }

    #[test]
    fn test_time_window_boundaries_inclusive() {
        let mut e = event("2024-03-10");
        e.start_time = TimeOfDay::parse("09:00");
        e.end_time = TimeOfDay::parse("17:00");

        let cases = [
            ("2024-03-10T08:59:00Z", false),
            ("2024-03-10T09:00:00Z", true),
            ("2024-03-10T12:30:00Z", true),
            ("2024-03-10T17:00:59Z", true),
            ("2024-03-10T17:01:00Z", false),
        ];
        for (at, expected) in cases {
            let activation = evaluate(&e, instant(at), Tz::UTC);
            assert!(activation.active_today, "{at}");
            assert_eq!(activation.active_now, expected, "{at}");
        }
    }

    #[test]
    fn test_start_only_window_open_until_midnight() {
        let mut e = event("2024-03-10");
        e.start_time = TimeOfDay::parse("18:00");

        assert!(!evaluate(&e, instant("2024-03-10T17:59:00Z"), Tz::UTC).active_now);
        assert!(evaluate(&e, instant("2024-03-10T18:00:00Z"), Tz::UTC).active_now);
        assert!(evaluate(&e, instant("2024-03-10T23:59:00Z"), Tz::UTC).active_now);
        // Past local midnight the date no longer matches.
        let next_day = evaluate(&e, instant("2024-03-11T00:01:00Z"), Tz::UTC);
        assert!(!next_day.active_today);
        assert!(!next_day.active_now);
    }

    #[test]
    fn test_no_window_means_active_all_day() {
        let e = event("2024-03-10");
        let activation = evaluate(&e, instant("2024-03-10T00:00:00Z"), Tz::UTC);
        assert!(activation.active_today && activation.active_now);
        let activation = evaluate(&e, instant("2024-03-10T23:59:59Z"), Tz::UTC);
        assert!(activation.active_today && activation.active_now);
    }

    #[test]
    fn test_inactive_day_short_circuits_time_window() {
        let mut e = event("2024-03-10");
        e.start_time = TimeOfDay::parse("00:00");
        e.end_time = TimeOfDay::parse("23:59");
        let activation = evaluate(&e, instant("2024-03-11T12:00:00Z"), Tz::UTC);
        assert_eq!(activation, Activation::INACTIVE);
    }

    #[test]
    fn test_timezone_shifts_calendar_date() {
        // 2024-03-09 23:30 UTC is already 2024-03-10 in Tokyo.
        let e = event("2024-03-10");
        let at = instant("2024-03-09T23:30:00Z");
        assert!(!evaluate(&e, at, Tz::UTC).active_today);
        assert!(evaluate(&e, at, chrono_tz::Asia::Tokyo).active_today);
    }

    #[test]
    fn test_server_clock_and_caller_timezone_agree_on_equivalent_input() {
        // The same instant evaluated in two zones with the same local date
        // must produce the same answer; there is only one code path.
        let e = recurring("2024-01-01", 3);
        let at = instant("2024-01-04T10:00:00Z");
        let utc = evaluate(&e, at, Tz::UTC);
        let london = evaluate(&e, at, chrono_tz::Europe::London);
        assert_eq!(utc, london);
    }

    #[test]
    fn test_next_occurrence_after() {
        let e = recurring("2024-01-01", 7);
        assert_eq!(
            next_occurrence_after(&e, date("2023-12-25"), Tz::UTC),
            Some(date("2024-01-01"))
        );
        assert_eq!(
            next_occurrence_after(&e, date("2024-01-01"), Tz::UTC),
            Some(date("2024-01-08"))
        );
        assert_eq!(
            next_occurrence_after(&e, date("2024-01-02"), Tz::UTC),
            Some(date("2024-01-08"))
        );
        assert_eq!(next_occurrence_after(&event("2024-01-01"), date("2023-12-01"), Tz::UTC), None);
    }

    #[test]
    fn test_next_occurrence_stops_at_end_date() {
        let mut e = recurring("2024-01-01", 7);
        e.recurring_end_date = Some(instant("2024-01-10T00:00:00Z"));
        assert_eq!(
            next_occurrence_after(&e, date("2024-01-01"), Tz::UTC),
            Some(date("2024-01-08"))
        );
        assert_eq!(next_occurrence_after(&e, date("2024-01-08"), Tz::UTC), None);
    }

    #[test]
    fn test_upcoming_occurrences_capped() {
        let e = recurring("2024-01-01", 7);
        let occurrences = upcoming_occurrences(&e, date("2024-01-01"), Tz::UTC, 3);
        assert_eq!(
            occurrences,
            vec![date("2024-01-01"), date("2024-01-08"), date("2024-01-15")]
        );
    }

    #[test]
    fn test_upcoming_occurrences_from_between_dates() {
        let e = recurring("2024-01-01", 7);
        let occurrences = upcoming_occurrences(&e, date("2024-01-03"), Tz::UTC, 2);
        assert_eq!(occurrences, vec![date("2024-01-08"), date("2024-01-15")]);
    }

    #[test]
    fn test_upcoming_occurrences_non_recurring() {
        let e = event("2024-05-01");
        assert_eq!(
            upcoming_occurrences(&e, date("2024-04-01"), Tz::UTC, 6),
            vec![date("2024-05-01")]
        );
        assert!(upcoming_occurrences(&e, date("2024-05-02"), Tz::UTC, 6).is_empty());
    }
}
