//! Content item endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use domain::models::{ContentItem, ContentKind};
use persistence::repositories::ContentRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::services::ScoringService;

fn parse_kind(kind: &str) -> Result<ContentKind, ApiError> {
    ContentKind::parse(kind)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown content collection: {}", kind)))
}

/// Create a pending content item authored by the caller.
///
/// POST /api/v1/content/:kind
pub async fn create_content(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(kind): Path<String>,
) -> Result<(StatusCode, Json<ContentItem>), ApiError> {
    let kind = parse_kind(&kind)?;

    let repo = ContentRepository::new(state.pool.clone());
    let entity = repo.create(kind, identity.user_id, Utc::now()).await?;

    let item: ContentItem = entity.into();
    info!(
        item_id = %item.id,
        user_id = %item.user_id,
        kind = kind.as_str(),
        "Content item created"
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// Fetch one content item.
///
/// GET /api/v1/content/:kind/:item_id
pub async fn get_content(
    State(state): State<AppState>,
    Path((kind, item_id)): Path<(String, Uuid)>,
) -> Result<Json<ContentItem>, ApiError> {
    let kind = parse_kind(&kind)?;
    let repo = ContentRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(kind, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Content item not found".to_string()))?;
    Ok(Json(entity.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub approve: bool,
}

/// Review outcome, including the author's new score when approval points
/// were credited by this call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_new_score: Option<i64>,
}

/// Approve or reject a content item.
///
/// POST /api/v1/admin/content/:kind/:item_id/review
///
/// An approval credits points exactly once; repeating the call is a no-op
/// for scoring. When crediting fails the approval itself stays committed
/// and the error is surfaced to the caller.
pub async fn review_content(
    State(state): State<AppState>,
    Path((kind, item_id)): Path<(String, Uuid)>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let kind = parse_kind(&kind)?;

    let repo = ContentRepository::new(state.pool.clone());
    let entity = repo
        .set_review(kind, item_id, request.approve)
        .await?
        .ok_or_else(|| ApiError::NotFound("Content item not found".to_string()))?;
    let item: ContentItem = entity.into();

    info!(
        item_id = %item.id,
        kind = kind.as_str(),
        approved = request.approve,
        "Content item reviewed"
    );

    let author_new_score = if request.approve {
        let scoring = ScoringService::new(
            state.pool.clone(),
            state.config.scoring.base_points,
            state.config.scoring_timezone(),
        );
        scoring
            .award_approval_points(kind, &item)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to award points: {}", e)))?
    } else {
        None
    };

    Ok(Json(ReviewResponse {
        item,
        author_new_score,
    }))
}

/// Delete a content item (author or admin).
///
/// DELETE /api/v1/content/:kind/:item_id
pub async fn delete_content(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((kind, item_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;

    let repo = ContentRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(kind, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Content item not found".to_string()))?;

    if entity.user_id != identity.user_id && !identity.is_admin {
        return Err(ApiError::Forbidden(
            "Only the author or an admin can delete this item".to_string(),
        ));
    }

    repo.delete(kind, item_id).await?;
    info!(item_id = %item_id, kind = kind.as_str(), "Content item deleted");
    Ok(StatusCode::NO_CONTENT)
}
