//! Workflow routes (admin portal).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard, middleware::AuthUser};
use flowmetric_db::WorkflowRepository;
use flowmetric_db::entities::sea_orm_active_enums::UserRole;
use flowmetric_db::repositories::workflow::CreateWorkflowInput;

/// Creates the workflows router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workflows", post(create_workflow))
        .route("/companies/{company_id}/workflows", get(list_workflows))
}

/// POST /workflows - Register a tracked workflow for a company.
async fn create_workflow(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateWorkflowInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = WorkflowRepository::new((*state.db).clone());
    let workflow = repo.create(payload).await?;

    info!(workflow_id = %workflow.id, created_by = %auth.user_id(), "Workflow created");
    Ok((StatusCode::CREATED, Json(workflow)))
}

/// GET `/companies/{company_id}/workflows` - A company's workflows with stats.
async fn list_workflows(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = WorkflowRepository::new((*state.db).clone());
    let workflows = repo.list_by_company(company_id).await?;
    Ok(Json(workflows))
}
