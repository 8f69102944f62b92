//! Role guards.
//!
//! Tokens prove identity only. Every protected handler re-derives the
//! caller's role and active flag from the `users` table here, so a role
//! change or deactivation takes effect on the next request rather than at
//! token expiry.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use flowmetric_db::entities::{company_se_assignments, sea_orm_active_enums::UserRole, users};

/// Loads the caller's user row, rejecting deleted or deactivated accounts.
pub async fn current_user(state: &AppState, auth: &AuthUser) -> Result<users::Model, ApiError> {
    let user = users::Entity::find_by_id(auth.user_id())
        .one(&*state.db)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User account no longer exists"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("User account is deactivated"));
    }
    Ok(user)
}

/// Loads the caller and checks their role against the allowed set.
pub async fn require_role(
    state: &AppState,
    auth: &AuthUser,
    allowed: &[UserRole],
) -> Result<users::Model, ApiError> {
    let user = current_user(state, auth).await?;
    if !allowed.contains(&user.role) {
        return Err(ApiError::forbidden(
            "You do not have permission to access this resource",
        ));
    }
    Ok(user)
}

/// Checks that the caller may act on the given company.
///
/// Admins see every company, SEs only their assigned companies, and clients
/// only their own.
pub async fn require_company_access(
    state: &AppState,
    auth: &AuthUser,
    company_id: Uuid,
) -> Result<users::Model, ApiError> {
    let user = current_user(state, auth).await?;
    match user.role {
        UserRole::Admin => Ok(user),
        UserRole::Se => {
            let assigned = company_se_assignments::Entity::find()
                .filter(company_se_assignments::Column::CompanyId.eq(company_id))
                .filter(company_se_assignments::Column::UserId.eq(user.id))
                .one(&*state.db)
                .await?
                .is_some();
            if assigned {
                Ok(user)
            } else {
                Err(ApiError::forbidden(
                    "You are not assigned to this company",
                ))
            }
        }
        UserRole::Client => {
            if user.company_id == Some(company_id) {
                Ok(user)
            } else {
                Err(ApiError::forbidden(
                    "You do not have access to this company",
                ))
            }
        }
    }
}
