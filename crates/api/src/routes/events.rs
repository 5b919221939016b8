//! Special event admin endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::event::{CreateEventRequest, UpdateEventRequest};
use domain::models::SpecialEvent;
use persistence::repositories::{EventRepository, NewEvent, UpdateEvent};

use crate::app::AppState;
use crate::error::{validation_message, ApiError};

/// Create a new special event.
///
/// POST /api/v1/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<SpecialEvent>), ApiError> {
    request.validate().map_err(|e| validation_message(&e))?;
    if !request.recurrence_is_consistent() {
        return Err(ApiError::Validation(
            "A recurring event requires a recurrence interval".to_string(),
        ));
    }

    let repo = EventRepository::new(state.pool.clone());
    let entity = repo
        .create(NewEvent {
            name: request.name,
            description: request.description,
            anchor_date: request.anchor_date,
            start_time: request.start_time,
            end_time: request.end_time,
            bonus_points: request.bonus_points,
            is_recurring: request.is_recurring,
            recurring_interval_days: request.recurring_interval_days,
            recurring_end_date: request.recurring_end_date,
            show_notification: request.show_notification,
            notification_message: request.notification_message,
            parent_event_id: None,
        })
        .await?;

    let event: SpecialEvent = entity.into();
    info!(event_id = %event.id, name = %event.name, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// List all parent event definitions.
///
/// GET /api/v1/admin/events
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpecialEvent>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events: Vec<SpecialEvent> = repo
        .list_parents()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(events))
}

/// Fetch one event.
///
/// GET /api/v1/admin/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<SpecialEvent>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
    Ok(Json(entity.into()))
}

/// Update an event (partial).
///
/// PATCH /api/v1/admin/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<SpecialEvent>, ApiError> {
    request.validate().map_err(|e| validation_message(&e))?;

    let repo = EventRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    // The merged row must still be consistent: recurring implies interval.
    let will_recur = request.is_recurring.unwrap_or(existing.is_recurring);
    let will_have_interval = request
        .recurring_interval_days
        .or(existing.recurring_interval_days)
        .is_some();
    if will_recur && !will_have_interval {
        return Err(ApiError::Validation(
            "A recurring event requires a recurrence interval".to_string(),
        ));
    }

    let entity = repo
        .update(
            event_id,
            UpdateEvent {
                name: request.name,
                description: request.description,
                anchor_date: request.anchor_date,
                start_time: request.start_time,
                end_time: request.end_time,
                bonus_points: request.bonus_points,
                is_recurring: request.is_recurring,
                recurring_interval_days: request.recurring_interval_days,
                recurring_end_date: request.recurring_end_date,
                show_notification: request.show_notification,
                notification_message: request.notification_message,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let event: SpecialEvent = entity.into();
    info!(event_id = %event.id, "Event updated");
    Ok(Json(event))
}

/// Delete an event and its materialized occurrences.
///
/// DELETE /api/v1/admin/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let deleted = repo.delete(event_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }
    info!(event_id = %event_id, rows = deleted, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct OccurrencesQuery {
    /// IANA timezone for "today"; defaults to the scoring timezone.
    pub timezone: Option<String>,
}

/// One materialized upcoming occurrence.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceResponse {
    pub id: Uuid,
    pub date: chrono::NaiveDate,
}

/// List upcoming materialized occurrences of a recurring event.
///
/// GET /api/v1/admin/events/:event_id/occurrences
pub async fn list_occurrences(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<OccurrencesQuery>,
) -> Result<Json<Vec<OccurrenceResponse>>, ApiError> {
    let tz = match &query.timezone {
        Some(raw) => shared::validation::parse_timezone(raw)
            .map_err(|_| ApiError::Validation(format!("Unknown timezone: {}", raw)))?,
        None => state.config.scoring_timezone(),
    };

    let repo = EventRepository::new(state.pool.clone());
    // Ensure the parent exists before listing.
    repo.find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let today = Utc::now().with_timezone(&tz).date_naive();
    let occurrences = repo
        .list_children_from(event_id, today)
        .await?
        .into_iter()
        .map(|child| OccurrenceResponse {
            id: child.id,
            date: child.anchor_date.with_timezone(&tz).date_naive(),
        })
        .collect();
    Ok(Json(occurrences))
}
