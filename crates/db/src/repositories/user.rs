//! User repository for database operations.
//!
//! Covers platform-level user administration (admin, SE, and client users)
//! and the per-request role lookup used by the API guard.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use flowmetric_core::validation::normalize_email;
use flowmetric_shared::types::{PageRequest, PageResponse};

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Errors raised by user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// User row missing.
    #[error("User not found")]
    NotFound,

    /// Another user already owns this email.
    #[error("A user with email {0} already exists")]
    EmailTaken(String),

    /// Client users must belong to a company.
    #[error("Client users must belong to a company")]
    MissingCompany,

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Filters for the admin user list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    /// Restrict to one role.
    pub role: Option<UserRole>,
    /// Restrict to one company.
    pub company_id: Option<Uuid>,
}

/// Input for creating a user from the admin portal.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    /// Email, globally unique (case-insensitive).
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Platform role.
    pub role: UserRole,
    /// Company, required for client users.
    pub company_id: Option<Uuid>,
    /// Optional department (client users only).
    pub department_id: Option<Uuid>,
}

/// Input for updating a user from the admin portal.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserInput {
    /// New email.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New phone number.
    pub phone: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Input for profile self-service updates.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileInput {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New phone number.
    pub phone: Option<Option<String>>,
    /// New notification preference.
    pub email_notifications: Option<bool>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
    }

    /// Lists users with optional role/company filters, paginated.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<users::Model>, DbErr> {
        let mut query = users::Entity::find().order_by_desc(users::Column::CreatedAt);
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(users::Column::CompanyId.eq(company_id));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.zero_based()).await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists all solutions engineers.
    pub async fn list_solutions_engineers(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Se))
            .order_by_asc(users::Column::LastName)
            .all(&self.db)
            .await
    }

    /// Creates a user.
    ///
    /// Admin and SE users are created active; client users stay inactive
    /// until invited, matching the company-aggregate flow.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let email = normalize_email(&input.email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(UserError::EmailTaken(email));
        }
        if input.role == UserRole::Client && input.company_id.is_none() {
            return Err(UserError::MissingCompany);
        }

        let now = Utc::now().into();
        let is_active = input.role != UserRole::Client;
        let (company_id, department_id) = if input.role == UserRole::Client {
            (input.company_id, input.department_id)
        } else {
            (None, None)
        };

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            phone: Set(input.phone),
            avatar_url: Set(None),
            role: Set(input.role),
            company_id: Set(company_id),
            department_id: Set(department_id),
            is_active: Set(is_active),
            email_notifications: Set(true),
            billing_access: Set(false),
            admin_access: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "User created");
        Ok(user)
    }

    /// Updates a user from the admin portal.
    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound)?;

        if let Some(email) = &input.email {
            let email = normalize_email(email);
            if email != user.email && self.find_by_email(&email).await?.is_some() {
                return Err(UserError::EmailTaken(email));
            }
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(email) = input.email {
            active.email = Set(normalize_email(&email));
        }
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a user.
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    /// Updates the caller's own profile fields.
    pub async fn update_profile(
        &self,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound)?;

        let mut active: users::ActiveModel = user.into();
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(email_notifications) = input.email_notifications {
            active.email_notifications = Set(email_notifications);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Replaces the caller's avatar URL.
    pub async fn update_avatar(
        &self,
        id: Uuid,
        avatar_url: Option<String>,
    ) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound)?;

        let mut active: users::ActiveModel = user.into();
        active.avatar_url = Set(avatar_url);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
