//! Subscription plan routes (admin portal).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard, middleware::AuthUser};
use flowmetric_db::entities::sea_orm_active_enums::UserRole;
use flowmetric_db::repositories::subscription_plan::{CreatePlanInput, UpdatePlanInput};
use flowmetric_db::SubscriptionPlanRepository;

/// Creates the plans router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/{plan_id}", get(get_plan).patch(update_plan))
}

/// GET /plans - List all subscription plans.
async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = SubscriptionPlanRepository::new((*state.db).clone());
    let plans = repo.list().await?;
    Ok(Json(plans))
}

/// POST /plans - Create a subscription plan.
async fn create_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePlanInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = SubscriptionPlanRepository::new((*state.db).clone());
    let plan = repo.create(payload).await?;

    info!(plan_id = %plan.id, created_by = %auth.user_id(), "Subscription plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET `/plans/{plan_id}` - Get one subscription plan.
async fn get_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = SubscriptionPlanRepository::new((*state.db).clone());
    let plan = repo
        .find_by_id(plan_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subscription plan not found"))?;
    Ok(Json(plan))
}

/// PATCH `/plans/{plan_id}` - Update a subscription plan.
async fn update_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<UpdatePlanInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = SubscriptionPlanRepository::new((*state.db).clone());
    let plan = repo.update(plan_id, payload).await?;

    info!(plan_id = %plan_id, updated_by = %auth.user_id(), "Subscription plan updated");
    Ok(Json(plan))
}
