//! Special event domain model.
//!
//! A special event multiplies the points awarded for activity on certain
//! dates. Events may recur on a fixed day interval and may be restricted to a
//! time-of-day window; while active they can also surface a site-wide
//! notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A wall-clock time-of-day bound, stored as minutes since midnight.
///
/// Serializes as an `"HH:MM"` 24-hour string, which is also the persisted
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Parse an `"HH:MM"` string. Returns `None` for malformed input.
    pub fn parse(value: &str) -> Option<Self> {
        shared::validation::parse_time_of_day(value)
            .ok()
            .map(TimeOfDay)
    }

    /// Minutes since local midnight (0..=1439).
    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom("time must be in HH:MM 24-hour format"))
    }
}

/// Represents a special event definition.
///
/// A "parent" event (`parent_event_id == None`) is the user-authored
/// definition; a child is a materialized future occurrence of a recurring
/// parent kept only for listing screens. Only parents participate in
/// activation evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialEvent {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Calendar date the event starts on, stored as UTC midnight.
    pub anchor_date: DateTime<Utc>,
    /// Optional lower time-of-day bound (inclusive) in the evaluation timezone.
    pub start_time: Option<TimeOfDay>,
    /// Optional upper time-of-day bound (inclusive) in the evaluation timezone.
    pub end_time: Option<TimeOfDay>,
    pub bonus_points: i32,
    pub is_recurring: bool,
    /// Days between occurrences; present and >= 1 when `is_recurring`.
    pub recurring_interval_days: Option<i32>,
    /// Date after which recurrence stops.
    pub recurring_end_date: Option<DateTime<Utc>>,
    pub show_notification: bool,
    pub notification_message: Option<String>,
    pub parent_event_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpecialEvent {
    /// Whether this is a parent definition rather than a materialized child.
    pub fn is_parent(&self) -> bool {
        self.parent_event_id.is_none()
    }
}

/// Request payload for creating a special event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    #[serde(default)]
    pub description: String,

    pub anchor_date: DateTime<Utc>,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub start_time: Option<String>,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub end_time: Option<String>,

    #[validate(range(min = 0, message = "Bonus points must be non-negative"))]
    #[serde(default)]
    pub bonus_points: i32,

    #[serde(default)]
    pub is_recurring: bool,

    #[validate(custom(function = "shared::validation::validate_interval_days"))]
    pub recurring_interval_days: Option<i32>,

    pub recurring_end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub show_notification: bool,

    pub notification_message: Option<String>,
}

impl CreateEventRequest {
    /// Cross-field check that `validator` cannot express: a recurring event
    /// must carry an interval.
    pub fn recurrence_is_consistent(&self) -> bool {
        !self.is_recurring || self.recurring_interval_days.is_some()
    }
}

/// Request payload for updating a special event (partial).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub anchor_date: Option<DateTime<Utc>>,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub start_time: Option<String>,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub end_time: Option<String>,

    #[validate(range(min = 0, message = "Bonus points must be non-negative"))]
    pub bonus_points: Option<i32>,

    pub is_recurring: Option<bool>,

    #[validate(custom(function = "shared::validation::validate_interval_days"))]
    pub recurring_interval_days: Option<i32>,

    pub recurring_end_date: Option<DateTime<Utc>>,

    pub show_notification: Option<bool>,

    pub notification_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_parse_and_display() {
        let t = TimeOfDay::parse("09:05").unwrap();
        assert_eq!(t.minutes(), 545);
        assert_eq!(t.to_string(), "09:05");

        assert!(TimeOfDay::parse("25:00").is_none());
        assert!(TimeOfDay::parse("not a time").is_none());
    }

    #[test]
    fn test_time_of_day_ordering() {
        let morning = TimeOfDay::parse("09:00").unwrap();
        let evening = TimeOfDay::parse("17:00").unwrap();
        assert!(morning < evening);
    }

    #[test]
    fn test_time_of_day_serde_round_trip() {
        let t = TimeOfDay::parse("17:30").unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"17:30\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_recurrence_consistency() {
        let request: CreateEventRequest = serde_json::from_str(
            r#"{"name": "Double points", "anchorDate": "2024-01-01T00:00:00Z", "isRecurring": true}"#,
        )
        .unwrap();
        assert!(!request.recurrence_is_consistent());

        let request: CreateEventRequest = serde_json::from_str(
            r#"{"name": "Double points", "anchorDate": "2024-01-01T00:00:00Z",
                "isRecurring": true, "recurringIntervalDays": 7}"#,
        )
        .unwrap();
        assert!(request.recurrence_is_consistent());
    }
}
