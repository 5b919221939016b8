//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::event::TimeOfDay;
use domain::models::SpecialEvent;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for SpecialEvent {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            anchor_date: entity.anchor_date,
            // Bounds are validated at the edge; a legacy malformed value is
            // dropped rather than wedging evaluation.
            start_time: entity.start_time.as_deref().and_then(TimeOfDay::parse),
            end_time: entity.end_time.as_deref().and_then(TimeOfDay::parse),
            bonus_points: entity.bonus_points,
            is_recurring: entity.is_recurring,
            recurring_interval_days: entity.recurring_interval_days,
            recurring_end_date: entity.recurring_end_date,
            show_notification: entity.show_notification,
            notification_message: entity.notification_message,
            parent_event_id: entity.parent_event_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event_entity() -> EventEntity {
        EventEntity {
            id: Uuid::new_v4(),
            name: "Anniversary week".to_string(),
            description: "Double points all week".to_string(),
            anchor_date: "2024-06-01T00:00:00Z".parse().unwrap(),
            start_time: Some("09:00".to_string()),
            end_time: Some("17:00".to_string()),
            bonus_points: 25,
            is_recurring: true,
            recurring_interval_days: Some(7),
            recurring_end_date: None,
            show_notification: true,
            notification_message: Some("It's anniversary week!".to_string()),
            parent_event_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_event_entity_to_domain() {
        let entity = create_test_event_entity();
        let event: SpecialEvent = entity.clone().into();

        assert_eq!(event.id, entity.id);
        assert_eq!(event.start_time.unwrap().minutes(), 540);
        assert_eq!(event.end_time.unwrap().minutes(), 1020);
        assert_eq!(event.bonus_points, 25);
        assert!(event.is_parent());
    }

    #[test]
    fn test_malformed_time_bound_dropped() {
        let mut entity = create_test_event_entity();
        entity.start_time = Some("not-a-time".to_string());
        let event: SpecialEvent = entity.into();
        assert!(event.start_time.is_none());
        assert!(event.end_time.is_some());
    }
}
