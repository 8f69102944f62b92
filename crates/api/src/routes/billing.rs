//! Billing routes.
//!
//! Readable by admins, assigned SEs, and the company's own users; client
//! callers need the billing access flag on every billing route, the
//! overview included. Only admins and flagged clients may replace the
//! payment method.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, put},
};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard, middleware::AuthUser};
use flowmetric_db::entities::sea_orm_active_enums::UserRole;
use flowmetric_db::repositories::billing::PaymentMethodInput;
use flowmetric_db::BillingRepository;
use flowmetric_shared::types::PageRequest;

/// Creates the billing router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/billing/overview", get(billing_overview))
        .route("/companies/{company_id}/billing/invoices", get(list_invoices))
        .route("/companies/{company_id}/billing/usage", get(usage_details))
        .route(
            "/companies/{company_id}/billing/payment-method",
            put(upsert_payment_method),
        )
}

/// Rejects client callers without the billing access flag.
fn check_billing_access(user: &flowmetric_db::entities::users::Model) -> Result<(), ApiError> {
    if user.role == UserRole::Client && !user.billing_access {
        return Err(ApiError::forbidden(
            "You do not have access to billing for this company",
        ));
    }
    Ok(())
}

/// Rejects SE callers on billing writes; their company access is read-only
/// here.
fn check_billing_write(user: &flowmetric_db::entities::users::Model) -> Result<(), ApiError> {
    check_billing_access(user)?;
    if user.role == UserRole::Se {
        return Err(ApiError::forbidden(
            "Solutions engineers cannot modify billing information",
        ));
    }
    Ok(())
}

/// GET `/companies/{company_id}/billing/overview` - Plan, usage, invoices, payment method.
async fn billing_overview(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = guard::require_company_access(&state, &auth, company_id).await?;
    check_billing_access(&user)?;

    let repo = BillingRepository::new((*state.db).clone());
    let overview = repo.billing_overview(company_id).await?;
    Ok(Json(overview))
}

/// GET `/companies/{company_id}/billing/invoices` - Paginated invoice history.
async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = guard::require_company_access(&state, &auth, company_id).await?;
    check_billing_access(&user)?;

    let repo = BillingRepository::new((*state.db).clone());
    let invoices = repo.invoices_page(company_id, &page).await?;
    Ok(Json(invoices))
}

/// GET `/companies/{company_id}/billing/usage` - Recent monthly usage rows.
async fn usage_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = guard::require_company_access(&state, &auth, company_id).await?;
    check_billing_access(&user)?;

    let repo = BillingRepository::new((*state.db).clone());
    let usage = repo.usage_details(company_id).await?;
    Ok(Json(usage))
}

/// PUT `/companies/{company_id}/billing/payment-method` - Replace the payment method.
async fn upsert_payment_method(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<PaymentMethodInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = guard::require_company_access(&state, &auth, company_id).await?;
    check_billing_write(&user)?;

    let repo = BillingRepository::new((*state.db).clone());
    let method = repo.upsert_payment_method(company_id, payload).await?;

    info!(company_id = %company_id, updated_by = %auth.user_id(), "Payment method updated");
    Ok(Json(method))
}

#[cfg(test)]
mod tests {
    use flowmetric_db::entities::users;

    use super::*;

    fn user_with_role(role: UserRole, billing_access: bool) -> users::Model {
        let now = chrono::Utc::now().into();
        users::Model {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: None,
            avatar_url: None,
            role,
            company_id: None,
            department_id: None,
            is_active: true,
            email_notifications: true,
            billing_access,
            admin_access: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_client_without_flag_is_rejected() {
        let user = user_with_role(UserRole::Client, false);
        assert!(check_billing_access(&user).is_err());
    }

    #[test]
    fn test_client_with_flag_can_read_and_write() {
        let user = user_with_role(UserRole::Client, true);
        assert!(check_billing_access(&user).is_ok());
        assert!(check_billing_write(&user).is_ok());
    }

    #[test]
    fn test_se_can_read_but_not_write() {
        let user = user_with_role(UserRole::Se, false);
        assert!(check_billing_access(&user).is_ok());
        assert!(check_billing_write(&user).is_err());
    }

    #[test]
    fn test_admin_can_read_and_write() {
        let user = user_with_role(UserRole::Admin, false);
        assert!(check_billing_access(&user).is_ok());
        assert!(check_billing_write(&user).is_ok());
    }
}
