//! HTTP error responses.
//!
//! Every repository error converts into an [`ApiError`], which renders the
//! `{"error": <code>, "message": <text>}` envelope. Handlers return
//! `Result<_, ApiError>` and use `?` instead of matching status codes inline.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;

use flowmetric_db::repositories::billing::BillingError;
use flowmetric_db::repositories::company::CompanyError;
use flowmetric_db::repositories::credential::CredentialError;
use flowmetric_db::repositories::dashboard::DashboardError;
use flowmetric_db::repositories::subscription_plan::PlanError;
use flowmetric_db::repositories::user::UserError;
use flowmetric_db::repositories::workflow::WorkflowError;
use flowmetric_shared::AppError;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(AppError);

impl ApiError {
    /// 403 with the given message.
    #[must_use]
    pub fn forbidden(message: &str) -> Self {
        Self(AppError::Forbidden(message.to_string()))
    }

    /// 404 with the given message.
    #[must_use]
    pub fn not_found(message: &str) -> Self {
        Self(AppError::NotFound(message.to_string()))
    }

    /// 400 with the given message.
    #[must_use]
    pub fn validation(message: &str) -> Self {
        Self(AppError::Validation(message.to_string()))
    }

    /// 401 with the given message.
    #[must_use]
    pub fn unauthorized(message: &str) -> Self {
        Self(AppError::Unauthorized(message.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self.0, AppError::Database(_) | AppError::Internal(_)) {
            tracing::error!(error = %self.0, "Request failed");
        }
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({
            "error": self.0.error_code(),
            "message": self.0.message(),
        }));
        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<CompanyError> for ApiError {
    fn from(err: CompanyError) -> Self {
        let app = match &err {
            CompanyError::NotFound => AppError::NotFound(err.to_string()),
            CompanyError::DomainTaken
            | CompanyError::EmailTaken(_)
            | CompanyError::DuplicateAssignment
            | CompanyError::DepartmentNameTaken
            | CompanyError::DepartmentHasUsers => AppError::Conflict(err.to_string()),
            CompanyError::Payload(_)
            | CompanyError::InvalidSolutionsEngineer
            | CompanyError::UnknownDepartment(_)
            | CompanyError::UnknownRow(_) => AppError::Validation(err.to_string()),
            CompanyError::Db(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let app = match &err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::EmailTaken(_) => AppError::Conflict(err.to_string()),
            UserError::MissingCompany => AppError::Validation(err.to_string()),
            UserError::Db(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        let app = match &err {
            BillingError::NotFound => AppError::NotFound(err.to_string()),
            BillingError::Db(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        let app = match &err {
            PlanError::NotFound => AppError::NotFound(err.to_string()),
            PlanError::NameTaken => AppError::Conflict(err.to_string()),
            PlanError::Db(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        let app = match &err {
            CredentialError::NotFound => AppError::NotFound(err.to_string()),
            CredentialError::Incomplete(_) => AppError::Validation(err.to_string()),
            CredentialError::Db(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let app = match &err {
            WorkflowError::NotFound => AppError::NotFound(err.to_string()),
            WorkflowError::Db(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        let app = match &err {
            DashboardError::NotFound => AppError::NotFound(err.to_string()),
            DashboardError::Db(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_conflict_maps_to_409() {
        let err = ApiError::from(CompanyError::DomainTaken);
        assert_eq!(err.0.status_code(), 409);
        assert_eq!(err.0.error_code(), "conflict");
    }

    #[test]
    fn test_unknown_row_maps_to_400() {
        let err = ApiError::from(CompanyError::UnknownRow(uuid::Uuid::new_v4()));
        assert_eq!(err.0.status_code(), 400);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(UserError::NotFound);
        assert_eq!(err.0.status_code(), 404);
        assert_eq!(err.0.error_code(), "not_found");
    }
}
