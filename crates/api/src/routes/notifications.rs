//! Active event notification endpoint handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::SpecialEvent;
use domain::services::selection;
use persistence::repositories::EventRepository;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    /// IANA timezone for the activation clock; defaults to the scoring
    /// timezone.
    pub timezone: Option<String>,
}

/// One event banner the client should display right now.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub event_id: Uuid,
    pub name: String,
    pub message: String,
    pub bonus_points: i32,
}

impl From<&SpecialEvent> for NotificationResponse {
    fn from(event: &SpecialEvent) -> Self {
        Self {
            event_id: event.id,
            name: event.name.clone(),
            message: event
                .notification_message
                .clone()
                .unwrap_or_else(|| event.name.clone()),
            bonus_points: event.bonus_points,
        }
    }
}

/// List events whose notification window covers the current instant.
///
/// GET /api/v1/notifications/active
pub async fn active_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let tz = match &query.timezone {
        Some(raw) => shared::validation::parse_timezone(raw)
            .map_err(|_| ApiError::Validation(format!("Unknown timezone: {}", raw)))?,
        None => state.config.scoring_timezone(),
    };

    let repo = EventRepository::new(state.pool.clone());
    let events: Vec<SpecialEvent> = repo
        .list_parents()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let active = selection::active_notifications(&events, Utc::now(), tz)
        .into_iter()
        .map(NotificationResponse::from)
        .collect();
    Ok(Json(active))
}
