//! Credential repository.
//!
//! Stores per-company integration secrets. Reads always return masked
//! values; the clear text never crosses the repository boundary.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use flowmetric_core::credentials::mask_secret;

use crate::entities::{credentials, sea_orm_active_enums::ServiceType};

/// Errors raised by credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Credential row missing.
    #[error("Credential not found")]
    NotFound,

    /// Required fields missing for the connection test.
    #[error("Credential is missing required fields: {0}")]
    Incomplete(String),

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// A stored credential with secrets masked.
#[derive(Debug, Clone, Serialize)]
pub struct MaskedCredential {
    /// Credential id.
    pub id: Uuid,
    /// Owning company.
    pub company_id: Uuid,
    /// External service.
    pub service: ServiceType,
    /// Masked API key.
    pub api_key: String,
    /// Masked API secret, if stored.
    pub api_secret: Option<String>,
    /// Base URL (not a secret).
    pub base_url: Option<String>,
    /// Last update timestamp.
    pub updated_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<credentials::Model> for MaskedCredential {
    fn from(model: credentials::Model) -> Self {
        Self {
            id: model.id,
            company_id: model.company_id,
            service: model.service,
            api_key: mask_secret(&model.api_key),
            api_secret: model.api_secret.as_deref().map(mask_secret),
            base_url: model.base_url,
            updated_at: model.updated_at,
        }
    }
}

/// Input for storing a credential.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialInput {
    /// API key (clear text, stored server-side only).
    pub api_key: String,
    /// Optional API secret.
    pub api_secret: Option<String>,
    /// Optional base URL for custom APIs.
    pub base_url: Option<String>,
}

/// Result of a stubbed connection test.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionTest {
    /// Service that was checked.
    pub service: ServiceType,
    /// Whether the stored fields pass the shape check.
    pub ok: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// Credential repository.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    db: DatabaseConnection,
}

impl CredentialRepository {
    /// Creates a new credential repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a company's credentials, masked.
    pub async fn list_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<MaskedCredential>, DbErr> {
        let rows = credentials::Entity::find()
            .filter(credentials::Column::CompanyId.eq(company_id))
            .order_by_asc(credentials::Column::Service)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(MaskedCredential::from).collect())
    }

    /// Finds one credential by service, masked.
    pub async fn find_by_service(
        &self,
        company_id: Uuid,
        service: ServiceType,
    ) -> Result<Option<MaskedCredential>, DbErr> {
        Ok(self
            .find_row(company_id, service)
            .await?
            .map(MaskedCredential::from))
    }

    /// Creates or replaces the credential for (company, service).
    pub async fn upsert(
        &self,
        company_id: Uuid,
        service: ServiceType,
        input: CredentialInput,
    ) -> Result<MaskedCredential, CredentialError> {
        let now = Utc::now().into();
        let model = match self.find_row(company_id, service).await? {
            Some(existing) => {
                let mut active: credentials::ActiveModel = existing.into();
                active.api_key = Set(input.api_key);
                active.api_secret = Set(input.api_secret);
                active.base_url = Set(input.base_url);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                credentials::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    company_id: Set(company_id),
                    service: Set(service),
                    api_key: Set(input.api_key),
                    api_secret: Set(input.api_secret),
                    base_url: Set(input.base_url),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await?
            }
        };

        tracing::info!(company_id = %company_id, service = ?service, "Credential stored");
        Ok(model.into())
    }

    /// Deletes the credential for (company, service).
    pub async fn delete(
        &self,
        company_id: Uuid,
        service: ServiceType,
    ) -> Result<(), CredentialError> {
        let result = credentials::Entity::delete_many()
            .filter(credentials::Column::CompanyId.eq(company_id))
            .filter(credentials::Column::Service.eq(service))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CredentialError::NotFound);
        }
        Ok(())
    }

    /// Stubbed connectivity check: verifies the stored fields have the shape
    /// the service needs. No network probe is made.
    pub async fn test_connection(
        &self,
        company_id: Uuid,
        service: ServiceType,
    ) -> Result<ConnectionTest, CredentialError> {
        let row = self
            .find_row(company_id, service)
            .await?
            .ok_or(CredentialError::NotFound)?;

        let mut missing = Vec::new();
        if row.api_key.trim().is_empty() {
            missing.push("api_key");
        }
        if service == ServiceType::CustomApi && row.base_url.as_deref().is_none_or(str::is_empty) {
            missing.push("base_url");
        }

        if missing.is_empty() {
            Ok(ConnectionTest {
                service,
                ok: true,
                message: "Stored credential fields look valid".to_string(),
            })
        } else {
            Err(CredentialError::Incomplete(missing.join(", ")))
        }
    }

    async fn find_row(
        &self,
        company_id: Uuid,
        service: ServiceType,
    ) -> Result<Option<credentials::Model>, DbErr> {
        credentials::Entity::find()
            .filter(credentials::Column::CompanyId.eq(company_id))
            .filter(credentials::Column::Service.eq(service))
            .one(&self.db)
            .await
    }
}
