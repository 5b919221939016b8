//! User profile endpoint handlers.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use domain::models::UserProfile;
use persistence::repositories::ProfileRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Identity;

/// Fetch a user's profile.
///
/// GET /api/v1/profiles/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    let entity = repo
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;
    Ok(Json(entity.into()))
}

/// Fetch (or lazily create) the caller's own profile.
///
/// GET /api/v1/profiles/me
pub async fn get_own_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserProfile>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    let entity = repo.find_or_create(identity.user_id).await?;
    Ok(Json(entity.into()))
}
