//! Platform user administration routes (admin portal).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard, middleware::AuthUser};
use flowmetric_db::entities::sea_orm_active_enums::UserRole;
use flowmetric_db::repositories::user::{CreateUserInput, UpdateUserInput, UserFilter};
use flowmetric_db::{CompanyRepository, UserRepository};
use flowmetric_shared::types::PageRequest;

/// Creates the users router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/companies", get(list_companies_for_users))
        .route("/users/solutions-engineers", get(list_solutions_engineers))
        .route("/users/{user_id}", patch(update_user).delete(delete_user))
}

/// Query parameters for the user list.
///
/// Kept flat because `Query` cannot round-trip flattened numeric fields.
#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    role: Option<UserRole>,
    company_id: Option<Uuid>,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl ListUsersQuery {
    fn split(self) -> (UserFilter, PageRequest) {
        let defaults = PageRequest::default();
        (
            UserFilter {
                role: self.role,
                company_id: self.company_id,
            },
            PageRequest {
                page: self.page.unwrap_or(defaults.page),
                per_page: self.per_page.unwrap_or(defaults.per_page),
            },
        )
    }
}

/// GET /users - Paginated user list with role/company filters.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let (filter, page) = query.split();
    let repo = UserRepository::new((*state.db).clone());
    let users = repo.list(&filter, &page).await?;
    Ok(Json(users))
}

/// POST /users - Create a platform user.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = UserRepository::new((*state.db).clone());
    let user = repo.create(payload).await?;

    info!(user_id = %user.id, created_by = %auth.user_id(), "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET `/users/companies` - Company list for the user form dropdown.
async fn list_companies_for_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = CompanyRepository::new((*state.db).clone());
    let companies = repo.list().await?;
    Ok(Json(companies))
}

/// GET `/users/solutions-engineers` - SE list for the assignment dropdown.
async fn list_solutions_engineers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = UserRepository::new((*state.db).clone());
    let engineers = repo.list_solutions_engineers().await?;
    Ok(Json(engineers))
}

/// PATCH `/users/{user_id}` - Update a platform user.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    let repo = UserRepository::new((*state.db).clone());
    let user = repo.update(user_id, payload).await?;
    Ok(Json(user))
}

/// DELETE `/users/{user_id}` - Delete a platform user.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_role(&state, &auth, &[UserRole::Admin]).await?;
    if user_id == auth.user_id() {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    let repo = UserRepository::new((*state.db).clone());
    repo.delete(user_id).await?;

    info!(user_id = %user_id, deleted_by = %auth.user_id(), "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
