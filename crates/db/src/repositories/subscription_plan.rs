//! Subscription plan repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{
    sea_orm_active_enums::{BillingCadence, ContractUnit, PricingModel},
    subscription_plans,
};

/// Errors raised by subscription plan operations.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Plan row missing.
    #[error("Subscription plan not found")]
    NotFound,

    /// Another plan already uses this name.
    #[error("A subscription plan with this name already exists")]
    NameTaken,

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Input for creating a subscription plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanInput {
    /// Globally unique plan name.
    pub name: String,
    /// Pricing model.
    pub pricing_model: PricingModel,
    /// Contract length in `contract_unit` units.
    pub contract_length: i32,
    /// Contract length unit.
    pub contract_unit: ContractUnit,
    /// Billing cadence.
    pub billing_cadence: BillingCadence,
    /// One-time setup fee.
    #[serde(default)]
    pub setup_fee: Decimal,
    /// Prepayment percentage of the contract value.
    #[serde(default)]
    pub prepayment_pct: Decimal,
    /// Monthly cap amount for flat-rate/tiered plans.
    pub cap_amount: Option<Decimal>,
    /// Overage rate beyond the cap.
    pub overage_rate: Option<Decimal>,
}

/// Input for updating a subscription plan.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlanInput {
    /// New name.
    pub name: Option<String>,
    /// New pricing model.
    pub pricing_model: Option<PricingModel>,
    /// New contract length.
    pub contract_length: Option<i32>,
    /// New contract unit.
    pub contract_unit: Option<ContractUnit>,
    /// New billing cadence.
    pub billing_cadence: Option<BillingCadence>,
    /// New setup fee.
    pub setup_fee: Option<Decimal>,
    /// New prepayment percentage.
    pub prepayment_pct: Option<Decimal>,
    /// New cap amount.
    pub cap_amount: Option<Option<Decimal>>,
    /// New overage rate.
    pub overage_rate: Option<Option<Decimal>>,
}

/// Subscription plan repository.
#[derive(Debug, Clone)]
pub struct SubscriptionPlanRepository {
    db: DatabaseConnection,
}

impl SubscriptionPlanRepository {
    /// Creates a new subscription plan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all plans by name.
    pub async fn list(&self) -> Result<Vec<subscription_plans::Model>, DbErr> {
        subscription_plans::Entity::find()
            .order_by_asc(subscription_plans::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a plan by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<subscription_plans::Model>, DbErr> {
        subscription_plans::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a plan.
    pub async fn create(
        &self,
        input: CreatePlanInput,
    ) -> Result<subscription_plans::Model, PlanError> {
        if self.name_exists(&input.name, None).await? {
            return Err(PlanError::NameTaken);
        }

        let now = Utc::now().into();
        let plan = subscription_plans::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            pricing_model: Set(input.pricing_model),
            contract_length: Set(input.contract_length),
            contract_unit: Set(input.contract_unit),
            billing_cadence: Set(input.billing_cadence),
            setup_fee: Set(input.setup_fee),
            prepayment_pct: Set(input.prepayment_pct),
            cap_amount: Set(input.cap_amount),
            overage_rate: Set(input.overage_rate),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(plan_id = %plan.id, name = %plan.name, "Subscription plan created");
        Ok(plan)
    }

    /// Updates a plan.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePlanInput,
    ) -> Result<subscription_plans::Model, PlanError> {
        let plan = self.find_by_id(id).await?.ok_or(PlanError::NotFound)?;

        if let Some(name) = &input.name {
            if *name != plan.name && self.name_exists(name, Some(id)).await? {
                return Err(PlanError::NameTaken);
            }
        }

        let mut active: subscription_plans::ActiveModel = plan.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(pricing_model) = input.pricing_model {
            active.pricing_model = Set(pricing_model);
        }
        if let Some(contract_length) = input.contract_length {
            active.contract_length = Set(contract_length);
        }
        if let Some(contract_unit) = input.contract_unit {
            active.contract_unit = Set(contract_unit);
        }
        if let Some(billing_cadence) = input.billing_cadence {
            active.billing_cadence = Set(billing_cadence);
        }
        if let Some(setup_fee) = input.setup_fee {
            active.setup_fee = Set(setup_fee);
        }
        if let Some(prepayment_pct) = input.prepayment_pct {
            active.prepayment_pct = Set(prepayment_pct);
        }
        if let Some(cap_amount) = input.cap_amount {
            active.cap_amount = Set(cap_amount);
        }
        if let Some(overage_rate) = input.overage_rate {
            active.overage_rate = Set(overage_rate);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    async fn name_exists(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, DbErr> {
        let mut query = subscription_plans::Entity::find()
            .filter(subscription_plans::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(subscription_plans::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}
