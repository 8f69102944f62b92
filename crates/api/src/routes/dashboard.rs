//! Dashboard routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard, middleware::AuthUser};
use flowmetric_core::metrics::TimeRange;
use flowmetric_db::DashboardRepository;
use flowmetric_db::entities::sea_orm_active_enums::{ExecutionStatus, UserRole};
use flowmetric_db::repositories::dashboard::ExecutionLogFilter;
use flowmetric_shared::types::PageRequest;

/// Creates the dashboard router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/admin", get(admin_dashboard))
        .route("/dashboard/client/{company_id}", get(client_dashboard))
        .route("/dashboard/executions", get(execution_logs))
        .route("/dashboard/roi/{company_id}", get(workflow_roi))
}

/// Reporting window query parameter.
#[derive(Debug, Deserialize)]
struct RangeQuery {
    #[serde(default)]
    range: TimeRange,
}

/// Query parameters for the execution log.
#[derive(Debug, Deserialize)]
struct ExecutionLogQuery {
    company_id: Option<Uuid>,
    status: Option<ExecutionStatus>,
    page: Option<u32>,
    per_page: Option<u32>,
}

/// GET `/dashboard/admin?range=` - Platform-wide rollup.
async fn admin_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin, UserRole::Se]).await?;
    let repo = DashboardRepository::new((*state.db).clone());
    let dashboard = repo.admin_dashboard(query.range).await?;
    Ok(Json(dashboard))
}

/// GET `/dashboard/client/{company_id}?range=` - Company-scoped rollup.
async fn client_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = DashboardRepository::new((*state.db).clone());
    let dashboard = repo.client_dashboard(company_id, query.range).await?;
    Ok(Json(dashboard))
}

/// GET `/dashboard/executions` - Paginated execution log.
async fn execution_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExecutionLogQuery>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin, UserRole::Se]).await?;

    let defaults = PageRequest::default();
    let filter = ExecutionLogFilter {
        company_id: query.company_id,
        status: query.status,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let repo = DashboardRepository::new((*state.db).clone());
    let logs = repo.execution_logs(&filter, &page).await?;
    Ok(Json(logs))
}

/// GET `/dashboard/roi/{company_id}` - Per-workflow ROI rollups.
async fn workflow_roi(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = DashboardRepository::new((*state.db).clone());
    let roi = repo.workflow_roi(company_id).await?;
    Ok(Json(roi))
}
