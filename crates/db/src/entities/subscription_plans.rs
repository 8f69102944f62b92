//! `SeaORM` Entity for the subscription_plans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{BillingCadence, ContractUnit, PricingModel};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub pricing_model: PricingModel,
    pub contract_length: i32,
    pub contract_unit: ContractUnit,
    pub billing_cadence: BillingCadence,
    pub setup_fee: Decimal,
    /// Prepayment share of the contract value, as a percentage.
    pub prepayment_pct: Decimal,
    pub cap_amount: Option<Decimal>,
    pub overage_rate: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::companies::Entity")]
    Companies,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
