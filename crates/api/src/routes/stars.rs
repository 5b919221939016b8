//! Star toggle endpoint handler.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use domain::models::ContentKind;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::services::stars::{StarError, StarToggleOutcome};
use crate::services::StarService;

/// Toggle the caller's star on a content item.
///
/// POST /api/v1/content/:kind/:item_id/star
pub async fn toggle_star(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((kind, item_id)): Path<(String, Uuid)>,
) -> Result<Json<StarToggleOutcome>, ApiError> {
    let kind = ContentKind::parse(&kind)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown content collection: {}", kind)))?;

    let service = StarService::new(state.pool.clone(), state.config.scoring.points_per_star);
    let outcome = service
        .toggle_star(identity.user_id, kind, item_id)
        .await
        .map_err(|err| match err {
            StarError::ContentNotFound => ApiError::NotFound("Content item not found".into()),
            StarError::ProfileNotFound => {
                ApiError::NotFound("Your profile could not be found".into())
            }
            StarError::Rejected(reason) => ApiError::Validation(reason.to_string()),
            StarError::Database(e) => e.into(),
        })?;

    Ok(Json(outcome))
}
