//! Service credential routes.
//!
//! Secrets never leave the server unmasked; every read path returns
//! [`MaskedCredential`] values.

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
use flowmetric_db::CredentialRepository;
use flowmetric_db::entities::sea_orm_active_enums::ServiceType;
use flowmetric_db::repositories::credential::{CredentialInput, MaskedCredential};

/// Creates the credentials router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/credentials", get(list_credentials))
        .route(
            "/companies/{company_id}/credentials/{service}",
            get(get_credential).put(upsert_credential).delete(delete_credential),
        )
        .route(
            "/companies/{company_id}/credentials/{service}/test",
            post(test_credential),
        )
}

/// GET `/companies/{company_id}/credentials` - List stored credentials, masked.
async fn list_credentials(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<MaskedCredential>>, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = CredentialRepository::new((*state.db).clone());
    let credentials = repo.list_for_company(company_id).await?;
    Ok(Json(credentials))
}

/// GET `/companies/{company_id}/credentials/{service}` - One credential, masked.
async fn get_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, service)): Path<(Uuid, ServiceType)>,
) -> Result<Json<MaskedCredential>, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = CredentialRepository::new((*state.db).clone());
    let credential = repo
        .find_by_service(company_id, service)
        .await?
        .ok_or_else(|| ApiError::not_found("No credential stored for this service"))?;
    Ok(Json(credential))
}

/// PUT `/companies/{company_id}/credentials/{service}` - Create or replace a credential.
async fn upsert_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, service)): Path<(Uuid, ServiceType)>,
    Json(payload): Json<CredentialInput>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = CredentialRepository::new((*state.db).clone());
    let credential = repo.upsert(company_id, service, payload).await?;

    info!(company_id = %company_id, service = ?service, updated_by = %auth.user_id(), "Credential stored");
    Ok(Json(credential))
}

/// DELETE `/companies/{company_id}/credentials/{service}` - Remove a credential.
async fn delete_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, service)): Path<(Uuid, ServiceType)>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = CredentialRepository::new((*state.db).clone());
    repo.delete(company_id, service).await?;

    info!(company_id = %company_id, service = ?service, removed_by = %auth.user_id(), "Credential removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/companies/{company_id}/credentials/{service}/test` - Validate stored fields.
async fn test_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, service)): Path<(Uuid, ServiceType)>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_company_access(&state, &auth, company_id).await?;
    let repo = CredentialRepository::new((*state.db).clone());
    let result = repo.test_connection(company_id, service).await?;
    Ok(Json(result))
}
