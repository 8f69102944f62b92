//! Company repository for database operations.
//!
//! The company aggregate (company + departments + client users + SE
//! assignments) is always written as one transactional unit: any failure
//! rolls the whole operation back, so a partial company is never visible.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use flowmetric_core::metrics::placeholder::{placeholder_monthly_revenue, placeholder_node_count};
use flowmetric_core::metrics::success_rate;
use flowmetric_core::reconcile::{self, ReconcileError, RowPatch};
use flowmetric_core::validation::{
    CompanyPayloadError, normalize_email, validate_department_names, validate_se_user_ids,
    validate_user_emails,
};

use crate::entities::{
    companies, company_se_assignments, departments, sea_orm_active_enums::ExecutionStatus,
    sea_orm_active_enums::UserRole, subscription_plans, users, workflow_executions, workflows,
};

/// Errors raised by company operations.
#[derive(Debug, Error)]
pub enum CompanyError {
    /// Company row missing.
    #[error("Company not found")]
    NotFound,

    /// Another company already uses this domain.
    #[error("A company with this domain already exists")]
    DomainTaken,

    /// A submitted email already belongs to another user.
    #[error("A user with email {0} already exists")]
    EmailTaken(String),

    /// Cross-field payload validation failed.
    #[error(transparent)]
    Payload(#[from] CompanyPayloadError),

    /// A submitted SE user id does not reference a user with the `se` role.
    #[error("One or more selected users are not valid Solutions Engineers")]
    InvalidSolutionsEngineer,

    /// The SE is already assigned to this company.
    #[error("This Solutions Engineer is already assigned to the company")]
    DuplicateAssignment,

    /// A department with this name already exists in the company.
    #[error("A department with this name already exists")]
    DepartmentNameTaken,

    /// The department still has users assigned.
    #[error("Department has users assigned and cannot be removed")]
    DepartmentHasUsers,

    /// A user referenced an unknown department name.
    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    /// The payload referenced a persisted row that does not exist.
    #[error("Row {0} does not exist on this company")]
    UnknownRow(Uuid),

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl From<ReconcileError> for CompanyError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::UnknownRow(id) => Self::UnknownRow(id),
        }
    }
}

/// A department row in a company submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentInput {
    /// Department name, unique within the company.
    pub name: String,
}

/// A client-user row in a company submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyUserInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email, globally unique (case-insensitive).
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Department resolved by name within the same submission.
    pub department_name: Option<String>,
    /// Whether the user receives email notifications.
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    /// Whether the user can see billing pages.
    #[serde(default)]
    pub billing_access: bool,
    /// Whether the user can manage company settings.
    #[serde(default)]
    pub admin_access: bool,
}

fn default_true() -> bool {
    true
}

/// One SE assignment in a company submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeAssignmentInput {
    /// The SE user to assign.
    pub user_id: Uuid,
    /// Whether this SE is the primary contact.
    #[serde(default)]
    pub is_primary: bool,
}

/// Input for creating a company aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompanyInput {
    /// Company display name.
    pub name: String,
    /// Globally unique domain.
    pub domain: String,
    /// Optional industry label.
    pub industry: Option<String>,
    /// Optional subscription plan reference.
    pub subscription_plan_id: Option<Uuid>,
    /// Departments to create.
    #[serde(default)]
    pub departments: Vec<DepartmentInput>,
    /// Client users to create (inactive until invited).
    #[serde(default)]
    pub users: Vec<CompanyUserInput>,
    /// Solutions engineers to assign.
    #[serde(default)]
    pub solutions_engineers: Vec<SeAssignmentInput>,
}

/// Input for the full aggregate update.
///
/// Departments and users carry explicit existing/new tags; persisted rows
/// absent from the lists are deleted. SE assignments are replaced wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompanyDetailsInput {
    /// Company display name.
    pub name: String,
    /// Globally unique domain.
    pub domain: String,
    /// Optional industry label.
    pub industry: Option<String>,
    /// Optional subscription plan reference.
    pub subscription_plan_id: Option<Uuid>,
    /// Desired department collection.
    #[serde(default)]
    pub departments: Vec<RowPatch<DepartmentInput>>,
    /// Desired client-user collection.
    #[serde(default)]
    pub users: Vec<RowPatch<CompanyUserInput>>,
    /// Desired SE assignment set.
    #[serde(default)]
    pub solutions_engineers: Vec<SeAssignmentInput>,
}

/// Input for scalar company updates.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompanyInput {
    /// New display name.
    pub name: Option<String>,
    /// New domain (uniqueness re-checked when it changes).
    pub domain: Option<String>,
    /// New industry label.
    pub industry: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New subscription plan reference.
    pub subscription_plan_id: Option<Option<Uuid>>,
}

/// A company with its nested collections.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetails {
    /// The company row.
    pub company: companies::Model,
    /// Its departments.
    pub departments: Vec<departments::Model>,
    /// Its client users.
    pub users: Vec<users::Model>,
    /// SE assignments with the assigned user rows.
    pub solutions_engineers: Vec<SeAssignmentDetails>,
    /// The referenced subscription plan, if any.
    pub subscription_plan: Option<subscription_plans::Model>,
}

/// One SE assignment joined with the SE's user row.
#[derive(Debug, Clone, Serialize)]
pub struct SeAssignmentDetails {
    /// The assignment row.
    pub assignment: company_se_assignments::Model,
    /// The assigned SE.
    pub user: users::Model,
}

/// Aggregate metrics across all companies for the admin portal.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDashboardMetrics {
    /// Total client users across all companies.
    pub total_users: u64,
    /// Active workflows across all companies.
    pub active_workflows: u64,
    /// Zero-safe rounded success percentage.
    pub success_rate: u8,
    /// Placeholder revenue figure (executions x 125), not real billing data.
    pub monthly_revenue: rust_decimal::Decimal,
    /// Per-company cards.
    pub companies: Vec<CompanyCard>,
}

/// One company row on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyCard {
    /// Company id.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Client user count.
    pub users: u64,
    /// Workflow count.
    pub workflows: u64,
    /// Execution count.
    pub executions: u64,
    /// Placeholder revenue figure, not real billing data.
    pub revenue: rust_decimal::Decimal,
    /// Placeholder node count, randomly generated.
    pub nodes: u32,
}

/// Company repository for CRUD and aggregate operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all companies, newest first.
    pub async fn list(&self) -> Result<Vec<companies::Model>, DbErr> {
        use sea_orm::QueryOrder;
        companies::Entity::find()
            .order_by_desc(companies::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds a company by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads a company with departments, users, SE assignments, and plan.
    pub async fn find_with_details(&self, id: Uuid) -> Result<CompanyDetails, CompanyError> {
        let company = self.find_by_id(id).await?.ok_or(CompanyError::NotFound)?;

        let departments = departments::Entity::find()
            .filter(departments::Column::CompanyId.eq(id))
            .all(&self.db)
            .await?;

        let users = users::Entity::find()
            .filter(users::Column::CompanyId.eq(id))
            .all(&self.db)
            .await?;

        let solutions_engineers = company_se_assignments::Entity::find()
            .filter(company_se_assignments::Column::CompanyId.eq(id))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(assignment, user)| {
                user.map(|user| SeAssignmentDetails { assignment, user })
            })
            .collect();

        let subscription_plan = match company.subscription_plan_id {
            Some(plan_id) => {
                subscription_plans::Entity::find_by_id(plan_id)
                    .one(&self.db)
                    .await?
            }
            None => None,
        };

        Ok(CompanyDetails {
            company,
            departments,
            users,
            solutions_engineers,
            subscription_plan,
        })
    }

    /// Creates a company aggregate in one transaction.
    ///
    /// Validation order: payload-level uniqueness, then domain availability,
    /// then email availability, then SE role checks. All writes happen inside
    /// the transaction; any failure rolls back the whole aggregate.
    pub async fn create_with_details(
        &self,
        input: CreateCompanyInput,
    ) -> Result<CompanyDetails, CompanyError> {
        validate_department_names(input.departments.iter().map(|d| d.name.as_str()))?;
        validate_user_emails(input.users.iter().map(|u| u.email.as_str()))?;
        validate_se_user_ids(input.solutions_engineers.iter().map(|se| se.user_id))?;

        if self.domain_exists(&input.domain, None).await? {
            return Err(CompanyError::DomainTaken);
        }
        self.check_emails_available(input.users.iter().map(|u| u.email.as_str()), &[])
            .await?;
        self.check_solutions_engineers(&input.solutions_engineers)
            .await?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let company_id = Uuid::new_v4();

        let company = companies::ActiveModel {
            id: Set(company_id),
            name: Set(input.name),
            domain: Set(input.domain),
            industry: Set(input.industry),
            is_active: Set(true),
            subscription_plan_id: Set(input.subscription_plan_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let department_ids =
            insert_departments(&txn, company_id, &input.departments).await?;

        for user in &input.users {
            insert_company_user(&txn, company_id, user, &department_ids).await?;
        }

        for se in &input.solutions_engineers {
            insert_se_assignment(&txn, company_id, se).await?;
        }

        txn.commit().await?;

        tracing::info!(company_id = %company.id, domain = %company.domain, "Company created");
        self.find_with_details(company.id).await
    }

    /// Updates a company aggregate in one transaction.
    ///
    /// Departments and users are reconciled against the payload tags; rows
    /// absent from the payload are deleted. SE assignments are fully replaced
    /// (delete-all-then-recreate); concurrent SE edits from two sessions will
    /// clobber each other, which matches the product's current behavior.
    #[allow(clippy::too_many_lines)]
    pub async fn update_with_details(
        &self,
        id: Uuid,
        input: UpdateCompanyDetailsInput,
    ) -> Result<CompanyDetails, CompanyError> {
        let company = self.find_by_id(id).await?.ok_or(CompanyError::NotFound)?;

        validate_department_names(input.departments.iter().map(|d| d.data().name.as_str()))?;
        validate_user_emails(input.users.iter().map(|u| u.data().email.as_str()))?;
        validate_se_user_ids(input.solutions_engineers.iter().map(|se| se.user_id))?;

        if company.domain != input.domain && self.domain_exists(&input.domain, Some(id)).await? {
            return Err(CompanyError::DomainTaken);
        }

        // Renamed existing rows keep their own email; only other users conflict.
        let keep_ids: Vec<Uuid> = input.users.iter().filter_map(RowPatch::existing_id).collect();
        self.check_emails_available(
            input.users.iter().map(|u| u.data().email.as_str()),
            &keep_ids,
        )
        .await?;
        self.check_solutions_engineers(&input.solutions_engineers)
            .await?;

        let existing_departments = departments::Entity::find()
            .filter(departments::Column::CompanyId.eq(id))
            .all(&self.db)
            .await?;
        let existing_users = users::Entity::find()
            .filter(users::Column::CompanyId.eq(id))
            .all(&self.db)
            .await?;

        let department_plan = reconcile::plan(
            &existing_departments.iter().map(|d| d.id).collect::<Vec<_>>(),
            input.departments,
        )?;
        let user_plan = reconcile::plan(
            &existing_users.iter().map(|u| u.id).collect::<Vec<_>>(),
            input.users,
        )?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let mut active: companies::ActiveModel = company.into();
        active.name = Set(input.name);
        active.domain = Set(input.domain);
        active.industry = Set(input.industry);
        active.subscription_plan_id = Set(input.subscription_plan_id);
        active.updated_at = Set(now);
        let company = active.update(&txn).await?;

        // Departments first so user rows can resolve names to ids.
        let mut department_ids: HashMap<String, Uuid> = HashMap::new();
        for (dept_id, data) in department_plan.update {
            let mut active: departments::ActiveModel = departments::ActiveModel {
                id: Set(dept_id),
                ..Default::default()
            };
            active.name = Set(data.name.clone());
            active.updated_at = Set(now);
            departments::Entity::update(active).exec(&txn).await?;
            department_ids.insert(data.name.trim().to_lowercase(), dept_id);
        }
        for data in &department_plan.insert {
            let dept_id = Uuid::new_v4();
            departments::ActiveModel {
                id: Set(dept_id),
                company_id: Set(id),
                name: Set(data.name.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;
            department_ids.insert(data.name.trim().to_lowercase(), dept_id);
        }

        for user_id in user_plan.delete {
            users::Entity::delete_by_id(user_id).exec(&txn).await?;
        }
        for (user_id, data) in user_plan.update {
            let department_id = resolve_department(&data, &department_ids)?;
            let mut active = users::ActiveModel {
                id: Set(user_id),
                ..Default::default()
            };
            active.first_name = Set(data.first_name);
            active.last_name = Set(data.last_name);
            active.email = Set(normalize_email(&data.email));
            active.phone = Set(data.phone);
            active.department_id = Set(department_id);
            active.email_notifications = Set(data.email_notifications);
            active.billing_access = Set(data.billing_access);
            active.admin_access = Set(data.admin_access);
            active.updated_at = Set(now);
            users::Entity::update(active).exec(&txn).await?;
        }
        for data in user_plan.insert {
            insert_company_user(&txn, id, &data, &department_ids).await?;
        }

        // users.department_id is ON DELETE SET NULL, so removing departments
        // after the user pass cannot orphan a surviving row.
        for dept_id in department_plan.delete {
            departments::Entity::delete_by_id(dept_id).exec(&txn).await?;
        }

        // Full replace keeps the update idempotent at the cost of racing
        // concurrent assignment edits.
        company_se_assignments::Entity::delete_many()
            .filter(company_se_assignments::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?;
        for se in &input.solutions_engineers {
            insert_se_assignment(&txn, id, se).await?;
        }

        txn.commit().await?;

        tracing::info!(company_id = %id, "Company aggregate updated");
        self.find_with_details(company.id).await
    }

    /// Updates scalar company fields.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        let company = self.find_by_id(id).await?.ok_or(CompanyError::NotFound)?;

        if let Some(domain) = &input.domain {
            if *domain != company.domain && self.domain_exists(domain, Some(id)).await? {
                return Err(CompanyError::DomainTaken);
            }
        }

        let mut active: companies::ActiveModel = company.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(domain) = input.domain {
            active.domain = Set(domain);
        }
        if let Some(industry) = input.industry {
            active.industry = Set(industry);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(plan_id) = input.subscription_plan_id {
            active.subscription_plan_id = Set(plan_id);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Adds a department to a company.
    pub async fn add_department(
        &self,
        company_id: Uuid,
        name: &str,
    ) -> Result<departments::Model, CompanyError> {
        self.find_by_id(company_id)
            .await?
            .ok_or(CompanyError::NotFound)?;
        if self.department_name_exists(company_id, name, None).await? {
            return Err(CompanyError::DepartmentNameTaken);
        }

        let now = Utc::now().into();
        Ok(departments::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?)
    }

    /// Renames a department.
    pub async fn update_department(
        &self,
        company_id: Uuid,
        department_id: Uuid,
        name: &str,
    ) -> Result<departments::Model, CompanyError> {
        let department = self
            .find_department(company_id, department_id)
            .await?
            .ok_or(CompanyError::NotFound)?;
        if self
            .department_name_exists(company_id, name, Some(department_id))
            .await?
        {
            return Err(CompanyError::DepartmentNameTaken);
        }

        let mut active: departments::ActiveModel = department.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Removes a department that has no assigned users.
    pub async fn remove_department(
        &self,
        company_id: Uuid,
        department_id: Uuid,
    ) -> Result<(), CompanyError> {
        let department = self
            .find_department(company_id, department_id)
            .await?
            .ok_or(CompanyError::NotFound)?;

        let assigned = users::Entity::find()
            .filter(users::Column::DepartmentId.eq(department_id))
            .count(&self.db)
            .await?;
        if assigned > 0 {
            return Err(CompanyError::DepartmentHasUsers);
        }

        departments::Entity::delete_by_id(department.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Adds a client user to a company.
    pub async fn add_user(
        &self,
        company_id: Uuid,
        input: CompanyUserInput,
    ) -> Result<users::Model, CompanyError> {
        self.find_by_id(company_id)
            .await?
            .ok_or(CompanyError::NotFound)?;
        self.check_emails_available([input.email.as_str()], &[])
            .await?;

        let department_ids = self.department_name_map(company_id).await?;
        let txn = self.db.begin().await?;
        let user = insert_company_user(&txn, company_id, &input, &department_ids).await?;
        txn.commit().await?;
        Ok(user)
    }

    /// Updates a client user on a company.
    pub async fn update_user(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        input: CompanyUserInput,
    ) -> Result<users::Model, CompanyError> {
        let user = users::Entity::find_by_id(user_id)
            .filter(users::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(CompanyError::NotFound)?;
        self.check_emails_available([input.email.as_str()], &[user_id])
            .await?;

        let department_ids = self.department_name_map(company_id).await?;
        let department_id = resolve_department(&input, &department_ids)?;

        let mut active: users::ActiveModel = user.into();
        active.first_name = Set(input.first_name);
        active.last_name = Set(input.last_name);
        active.email = Set(normalize_email(&input.email));
        active.phone = Set(input.phone);
        active.department_id = Set(department_id);
        active.email_notifications = Set(input.email_notifications);
        active.billing_access = Set(input.billing_access);
        active.admin_access = Set(input.admin_access);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Removes a client user from a company.
    pub async fn remove_user(&self, company_id: Uuid, user_id: Uuid) -> Result<(), CompanyError> {
        let user = users::Entity::find_by_id(user_id)
            .filter(users::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(CompanyError::NotFound)?;

        users::Entity::delete_by_id(user.id).exec(&self.db).await?;
        Ok(())
    }

    /// Assigns a solutions engineer to a company.
    pub async fn assign_se(
        &self,
        company_id: Uuid,
        input: SeAssignmentInput,
    ) -> Result<company_se_assignments::Model, CompanyError> {
        self.find_by_id(company_id)
            .await?
            .ok_or(CompanyError::NotFound)?;
        self.check_solutions_engineers(std::slice::from_ref(&input))
            .await?;

        let existing = company_se_assignments::Entity::find()
            .filter(company_se_assignments::Column::CompanyId.eq(company_id))
            .filter(company_se_assignments::Column::UserId.eq(input.user_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(CompanyError::DuplicateAssignment);
        }

        let txn = self.db.begin().await?;
        let assignment = insert_se_assignment(&txn, company_id, &input).await?;
        txn.commit().await?;
        Ok(assignment)
    }

    /// Removes an SE assignment.
    pub async fn unassign_se(&self, company_id: Uuid, user_id: Uuid) -> Result<(), CompanyError> {
        let deleted = company_se_assignments::Entity::delete_many()
            .filter(company_se_assignments::Column::CompanyId.eq(company_id))
            .filter(company_se_assignments::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(CompanyError::NotFound);
        }
        Ok(())
    }

    /// Updates the primary flag on an SE assignment.
    pub async fn update_se_assignment(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        is_primary: bool,
    ) -> Result<company_se_assignments::Model, CompanyError> {
        let assignment = company_se_assignments::Entity::find()
            .filter(company_se_assignments::Column::CompanyId.eq(company_id))
            .filter(company_se_assignments::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(CompanyError::NotFound)?;

        let mut active: company_se_assignments::ActiveModel = assignment.into();
        active.is_primary = Set(is_primary);
        Ok(active.update(&self.db).await?)
    }

    /// Admin dashboard rollup across all companies.
    ///
    /// Revenue and node counts are placeholder figures, not billing data.
    pub async fn dashboard_metrics(&self) -> Result<CompanyDashboardMetrics, DbErr> {
        let total_users = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Client))
            .count(&self.db)
            .await?;
        let active_workflows = workflows::Entity::find()
            .filter(workflows::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        let total_executions = workflow_executions::Entity::find().count(&self.db).await?;
        let successful_executions = workflow_executions::Entity::find()
            .filter(workflow_executions::Column::Status.eq(ExecutionStatus::Completed))
            .count(&self.db)
            .await?;

        let mut cards = Vec::new();
        for company in self.list().await? {
            let users = users::Entity::find()
                .filter(users::Column::CompanyId.eq(company.id))
                .count(&self.db)
                .await?;
            let workflow_count = workflows::Entity::find()
                .filter(workflows::Column::CompanyId.eq(company.id))
                .count(&self.db)
                .await?;
            let executions = workflow_executions::Entity::find()
                .inner_join(workflows::Entity)
                .filter(workflows::Column::CompanyId.eq(company.id))
                .count(&self.db)
                .await?;

            cards.push(CompanyCard {
                id: company.id,
                name: company.name,
                users,
                workflows: workflow_count,
                executions,
                revenue: placeholder_monthly_revenue(executions),
                nodes: placeholder_node_count(),
            });
        }

        Ok(CompanyDashboardMetrics {
            total_users,
            active_workflows,
            success_rate: success_rate(successful_executions, total_executions),
            monthly_revenue: placeholder_monthly_revenue(total_executions),
            companies: cards,
        })
    }

    async fn domain_exists(&self, domain: &str, exclude: Option<Uuid>) -> Result<bool, DbErr> {
        let mut query =
            companies::Entity::find().filter(companies::Column::Domain.eq(domain));
        if let Some(id) = exclude {
            query = query.filter(companies::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    async fn department_name_exists(
        &self,
        company_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let existing = departments::Entity::find()
            .filter(departments::Column::CompanyId.eq(company_id))
            .all(&self.db)
            .await?;
        let wanted = name.trim().to_lowercase();
        Ok(existing
            .iter()
            .any(|d| Some(d.id) != exclude && d.name.trim().to_lowercase() == wanted))
    }

    async fn department_name_map(
        &self,
        company_id: Uuid,
    ) -> Result<HashMap<String, Uuid>, DbErr> {
        let existing = departments::Entity::find()
            .filter(departments::Column::CompanyId.eq(company_id))
            .all(&self.db)
            .await?;
        Ok(existing
            .into_iter()
            .map(|d| (d.name.trim().to_lowercase(), d.id))
            .collect())
    }

    /// Fails with `EmailTaken` when any email belongs to a user outside
    /// `allow_ids` (the rows being renamed in the same payload).
    async fn check_emails_available<'a>(
        &self,
        emails: impl IntoIterator<Item = &'a str>,
        allow_ids: &[Uuid],
    ) -> Result<(), CompanyError> {
        let normalized: Vec<String> = emails.into_iter().map(normalize_email).collect();
        if normalized.is_empty() {
            return Ok(());
        }

        let taken = users::Entity::find()
            .filter(users::Column::Email.is_in(normalized))
            .all(&self.db)
            .await?;
        if let Some(user) = taken.iter().find(|u| !allow_ids.contains(&u.id)) {
            return Err(CompanyError::EmailTaken(user.email.clone()));
        }
        Ok(())
    }

    /// Every referenced user must exist and carry the `se` role.
    async fn check_solutions_engineers(
        &self,
        assignments: &[SeAssignmentInput],
    ) -> Result<(), CompanyError> {
        if assignments.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = assignments.iter().map(|se| se.user_id).collect();
        let valid = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.clone()))
            .filter(users::Column::Role.eq(UserRole::Se))
            .count(&self.db)
            .await?;
        if valid != ids.len() as u64 {
            return Err(CompanyError::InvalidSolutionsEngineer);
        }
        Ok(())
    }

    async fn find_department(
        &self,
        company_id: Uuid,
        department_id: Uuid,
    ) -> Result<Option<departments::Model>, DbErr> {
        departments::Entity::find_by_id(department_id)
            .filter(departments::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
    }
}

/// Inserts the departments of a new aggregate, returning the name-to-id map
/// used to resolve user rows.
async fn insert_departments(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    departments_input: &[DepartmentInput],
) -> Result<HashMap<String, Uuid>, CompanyError> {
    let now = Utc::now().into();
    let mut map = HashMap::new();
    for dept in departments_input {
        let dept_id = Uuid::new_v4();
        departments::ActiveModel {
            id: Set(dept_id),
            company_id: Set(company_id),
            name: Set(dept.name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;
        map.insert(dept.name.trim().to_lowercase(), dept_id);
    }
    Ok(map)
}

/// Inserts one client user. Role is forced to `client` and the account stays
/// inactive until the user is invited.
async fn insert_company_user(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    input: &CompanyUserInput,
    department_ids: &HashMap<String, Uuid>,
) -> Result<users::Model, CompanyError> {
    let department_id = resolve_department(input, department_ids)?;
    let now = Utc::now().into();

    Ok(users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(normalize_email(&input.email)),
        first_name: Set(input.first_name.clone()),
        last_name: Set(input.last_name.clone()),
        phone: Set(input.phone.clone()),
        avatar_url: Set(None),
        role: Set(UserRole::Client),
        company_id: Set(Some(company_id)),
        department_id: Set(department_id),
        is_active: Set(false),
        email_notifications: Set(input.email_notifications),
        billing_access: Set(input.billing_access),
        admin_access: Set(input.admin_access),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?)
}

async fn insert_se_assignment(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    input: &SeAssignmentInput,
) -> Result<company_se_assignments::Model, CompanyError> {
    Ok(company_se_assignments::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        user_id: Set(input.user_id),
        is_primary: Set(input.is_primary),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?)
}

fn resolve_department(
    input: &CompanyUserInput,
    department_ids: &HashMap<String, Uuid>,
) -> Result<Option<Uuid>, CompanyError> {
    match &input.department_name {
        Some(name) => department_ids
            .get(&name.trim().to_lowercase())
            .copied()
            .map(Some)
            .ok_or_else(|| CompanyError::UnknownDepartment(name.clone())),
        None => Ok(None),
    }
}
