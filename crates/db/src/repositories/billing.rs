//! Billing repository.
//!
//! Assembles the per-company billing view model for the client portal and
//! manages invoices, usage rollups, and the company payment method.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use flowmetric_core::billing::plan_base_price;
use flowmetric_core::metrics::placeholder::{
    PLACEHOLDER_SE_HOURS, PLACEHOLDER_STORAGE_GB, placeholder_renewal_date,
};
use flowmetric_shared::types::{PageRequest, PageResponse};

use crate::entities::{billing_usage, companies, invoices, payment_methods, subscription_plans};

/// Errors raised by billing operations.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Company row missing.
    #[error("Company not found")]
    NotFound,

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Subscription plan summary on the billing overview.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    /// Plan id.
    pub id: Uuid,
    /// Plan name.
    pub name: String,
    /// Resolved monthly base price.
    pub monthly_price: Decimal,
}

/// Current-month usage on the billing overview.
///
/// All fields are zero when no usage row exists for the month yet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageSummary {
    /// Executions billed as API calls this month.
    pub api_calls: i32,
    /// Minutes of manual work saved.
    pub time_saved_mins: i32,
    /// Cost savings attributed to automation.
    pub cost_savings: Decimal,
    /// Amount billed for the month.
    pub billed_amount: Decimal,
}

/// Per-company billing view model.
#[derive(Debug, Clone, Serialize)]
pub struct BillingOverview {
    /// Company id.
    pub company_id: Uuid,
    /// The company's plan, if one is attached.
    pub plan: Option<PlanSummary>,
    /// Current-month usage (zeroed when no row exists).
    pub current_month: UsageSummary,
    /// Placeholder SE support hours, not real metering.
    pub se_hours: u32,
    /// Placeholder storage usage in GB, not real metering.
    pub storage_gb: u32,
    /// Placeholder renewal date: company creation plus one year.
    pub renewal_date: chrono::DateTime<Utc>,
    /// Three most recent invoices.
    pub recent_invoices: Vec<invoices::Model>,
    /// The company's payment method, if stored.
    pub payment_method: Option<payment_methods::Model>,
}

/// Input for replacing a company's payment method.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodInput {
    /// Card brand (visa, mastercard, ...).
    pub card_brand: String,
    /// Last four digits.
    pub last4: String,
    /// Expiry month.
    pub exp_month: i16,
    /// Expiry year.
    pub exp_year: i16,
}

/// Billing repository.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
}

impl BillingRepository {
    /// Creates a new billing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assembles the billing overview for a company.
    pub async fn billing_overview(&self, company_id: Uuid) -> Result<BillingOverview, BillingError> {
        let company = companies::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(BillingError::NotFound)?;

        let plan = match company.subscription_plan_id {
            Some(plan_id) => subscription_plans::Entity::find_by_id(plan_id)
                .one(&self.db)
                .await?
                .map(|plan| PlanSummary {
                    id: plan.id,
                    name: plan.name,
                    monthly_price: plan_base_price(plan.pricing_model.into(), plan.cap_amount),
                }),
            None => None,
        };

        let now = Utc::now();
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let current_month = self
            .usage_row(company_id, now.month() as i16, now.year() as i16)
            .await?
            .map_or_else(UsageSummary::default, |row| UsageSummary {
                api_calls: row.execution_count,
                time_saved_mins: row.time_saved_mins,
                cost_savings: row.cost_savings,
                billed_amount: row.billed_amount,
            });

        let recent_invoices = invoices::Entity::find()
            .filter(invoices::Column::CompanyId.eq(company_id))
            .order_by_desc(invoices::Column::CreatedAt)
            .limit(3)
            .all(&self.db)
            .await?;

        let payment_method = payment_methods::Entity::find()
            .filter(payment_methods::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?;

        Ok(BillingOverview {
            company_id,
            plan,
            current_month,
            se_hours: PLACEHOLDER_SE_HOURS,
            storage_gb: PLACEHOLDER_STORAGE_GB,
            renewal_date: placeholder_renewal_date(company.created_at.to_utc()),
            recent_invoices,
            payment_method,
        })
    }

    /// Lists a company's invoices newest first, paginated.
    pub async fn invoices_page(
        &self,
        company_id: Uuid,
        page: &PageRequest,
    ) -> Result<PageResponse<invoices::Model>, DbErr> {
        let paginator = invoices::Entity::find()
            .filter(invoices::Column::CompanyId.eq(company_id))
            .order_by_desc(invoices::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let data = paginator
            .fetch_page(page.zero_based())
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Returns the twelve most recent monthly usage rows for a company.
    pub async fn usage_details(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<billing_usage::Model>, DbErr> {
        billing_usage::Entity::find()
            .filter(billing_usage::Column::CompanyId.eq(company_id))
            .order_by_desc(billing_usage::Column::Year)
            .order_by_desc(billing_usage::Column::Month)
            .limit(12)
            .all(&self.db)
            .await
    }

    /// Creates or replaces the company's single payment method.
    pub async fn upsert_payment_method(
        &self,
        company_id: Uuid,
        input: PaymentMethodInput,
    ) -> Result<payment_methods::Model, BillingError> {
        companies::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(BillingError::NotFound)?;

        let now = Utc::now().into();
        let existing = payment_methods::Entity::find()
            .filter(payment_methods::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(method) => {
                let mut active: payment_methods::ActiveModel = method.into();
                active.card_brand = Set(input.card_brand);
                active.last4 = Set(input.last4);
                active.exp_month = Set(input.exp_month);
                active.exp_year = Set(input.exp_year);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                payment_methods::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    company_id: Set(company_id),
                    card_brand: Set(input.card_brand),
                    last4: Set(input.last4),
                    exp_month: Set(input.exp_month),
                    exp_year: Set(input.exp_year),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await?
            }
        };

        Ok(model)
    }

    async fn usage_row(
        &self,
        company_id: Uuid,
        month: i16,
        year: i16,
    ) -> Result<Option<billing_usage::Model>, DbErr> {
        billing_usage::Entity::find()
            .filter(billing_usage::Column::CompanyId.eq(company_id))
            .filter(billing_usage::Column::Month.eq(month))
            .filter(billing_usage::Column::Year.eq(year))
            .one(&self.db)
            .await
    }
}
