//! Company management routes (admin portal).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard, middleware::AuthUser};
use flowmetric_db::repositories::company::{
    CompanyUserInput, CreateCompanyInput, SeAssignmentInput, UpdateCompanyDetailsInput,
    UpdateCompanyInput,
};
use flowmetric_db::{CompanyRepository, entities::sea_orm_active_enums::UserRole};

/// Creates the companies router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/dashboard-metrics", get(dashboard_metrics))
        .route("/companies/{company_id}", get(get_company).patch(update_company))
        .route("/companies/{company_id}/details", get(get_company_details))
        .route("/companies/{company_id}/details", put(update_company_details))
        .route("/companies/{company_id}/departments", post(add_department))
        .route(
            "/companies/{company_id}/departments/{department_id}",
            patch(update_department).delete(remove_department),
        )
        .route("/companies/{company_id}/users", post(add_user))
        .route(
            "/companies/{company_id}/users/{user_id}",
            patch(update_user).delete(remove_user),
        )
        .route("/companies/{company_id}/se-assignments", post(assign_se))
        .route(
            "/companies/{company_id}/se-assignments/{user_id}",
            patch(update_se_assignment).delete(unassign_se),
        )
}

/// Department name payload.
#[derive(Debug, Deserialize)]
struct DepartmentPayload {
    name: String,
}

/// SE assignment flag payload.
#[derive(Debug, Deserialize)]
struct SeAssignmentPayload {
    is_primary: bool,
}

/// GET /companies - List all companies.
async fn list_companies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let companies = repo.list().await?;
    Ok(Json(companies))
}

/// POST /companies - Create a company with departments, users, and SEs.
async fn create_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCompanyInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let details = repo.create_with_details(payload).await?;

    info!(
        company_id = %details.company.id,
        domain = %details.company.domain,
        created_by = %auth.user_id(),
        "Company created"
    );
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET `/companies/dashboard-metrics` - Aggregate metrics for the admin portal.
async fn dashboard_metrics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin, UserRole::Se]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let metrics = repo.dashboard_metrics().await?;
    Ok(Json(metrics))
}

/// GET `/companies/{company_id}` - Get a company row.
async fn get_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let company = repo
        .find_by_id(company_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;
    Ok(Json(company))
}

/// GET `/companies/{company_id}/details` - Full aggregate view.
async fn get_company_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let details = repo.find_with_details(company_id).await?;
    Ok(Json(details))
}

/// PATCH `/companies/{company_id}` - Update scalar company fields.
async fn update_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let company = repo.update(company_id, payload).await?;

    info!(company_id = %company_id, updated_by = %auth.user_id(), "Company updated");
    Ok(Json(company))
}

/// PUT `/companies/{company_id}/details` - Replace the company aggregate.
///
/// Departments and users carry explicit existing/new tags; persisted rows
/// omitted from the payload are deleted.
async fn update_company_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyDetailsInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let details = repo.update_with_details(company_id, payload).await?;

    info!(company_id = %company_id, updated_by = %auth.user_id(), "Company aggregate updated");
    Ok(Json(details))
}

/// POST `/companies/{company_id}/departments` - Add a department.
async fn add_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let department = repo.add_department(company_id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// PATCH `/companies/{company_id}/departments/{department_id}` - Rename a department.
async fn update_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, department_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let department = repo
        .update_department(company_id, department_id, &payload.name)
        .await?;
    Ok(Json(department))
}

/// DELETE `/companies/{company_id}/departments/{department_id}` - Remove an empty department.
async fn remove_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, department_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    repo.remove_department(company_id, department_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/companies/{company_id}/users` - Add a client user.
async fn add_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<CompanyUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let user = repo.add_user(company_id, payload).await?;

    info!(company_id = %company_id, user_id = %user.id, "Company user added");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PATCH `/companies/{company_id}/users/{user_id}` - Update a client user.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CompanyUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let user = repo.update_user(company_id, user_id, payload).await?;
    Ok(Json(user))
}

/// DELETE `/companies/{company_id}/users/{user_id}` - Remove a client user.
async fn remove_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    repo.remove_user(company_id, user_id).await?;

    info!(company_id = %company_id, user_id = %user_id, removed_by = %auth.user_id(), "Company user removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/companies/{company_id}/se-assignments` - Assign a Solutions Engineer.
async fn assign_se(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<SeAssignmentInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let assignment = repo.assign_se(company_id, payload).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// PATCH `/companies/{company_id}/se-assignments/{user_id}` - Toggle the primary flag.
async fn update_se_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SeAssignmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let assignment = repo
        .update_se_assignment(company_id, user_id, payload.is_primary)
        .await?;
    Ok(Json(assignment))
}

/// DELETE `/companies/{company_id}/se-assignments/{user_id}` - Unassign an SE.
async fn unassign_se(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    repo.unassign_se(company_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
