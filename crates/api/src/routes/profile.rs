//! Profile self-service routes, available to any authenticated user.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, guard, middleware::AuthUser};
use flowmetric_db::UserRepository;
use flowmetric_db::repositories::user::UpdateProfileInput;

/// Creates the profile router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).patch(update_profile))
        .route("/profile/avatar", put(update_avatar))
}

/// Avatar URL payload. `null` clears the avatar.
#[derive(Debug, Deserialize)]
struct AvatarPayload {
    avatar_url: Option<String>,
}

/// GET /profile - The caller's own user row.
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = guard::current_user(&state, &auth).await?;
    Ok(Json(user))
}

/// PATCH /profile - Update the caller's own profile fields.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::current_user(&state, &auth).await?;
    let repo = UserRepository::new((*state.db).clone());
    let user = repo.update_profile(auth.user_id(), payload).await?;

    info!(user_id = %auth.user_id(), "Profile updated");
    Ok(Json(user))
}

/// PUT `/profile/avatar` - Replace or clear the caller's avatar.
async fn update_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AvatarPayload>,
) -> Result<impl IntoResponse, ApiError> {
    guard::current_user(&state, &auth).await?;
    let repo = UserRepository::new((*state.db).clone());
    let user = repo.update_avatar(auth.user_id(), payload.avatar_url).await?;
    Ok(Json(user))
}
