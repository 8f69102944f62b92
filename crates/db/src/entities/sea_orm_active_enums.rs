//! Database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform-wide user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Internal platform administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Solutions engineer supporting client companies.
    #[sea_orm(string_value = "se")]
    Se,
    /// Company-scoped client user.
    #[sea_orm(string_value = "client")]
    Client,
}

/// Outcome of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "execution_status")]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Run finished successfully.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Run failed.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Run is still in progress.
    #[sea_orm(string_value = "running")]
    Running,
    /// Run was cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Not yet sent to the company.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Sent and awaiting payment.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Paid in full.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Past its due date.
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

/// How a subscription plan charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "pricing_model")]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// Fixed monthly price.
    #[sea_orm(string_value = "flat_rate")]
    FlatRate,
    /// Tiered pricing.
    #[sea_orm(string_value = "tiered")]
    Tiered,
    /// Billed from metered usage.
    #[sea_orm(string_value = "usage_based")]
    UsageBased,
}

impl From<PricingModel> for flowmetric_core::billing::PricingModel {
    fn from(model: PricingModel) -> Self {
        match model {
            PricingModel::FlatRate => Self::FlatRate,
            PricingModel::Tiered => Self::Tiered,
            PricingModel::UsageBased => Self::UsageBased,
        }
    }
}

/// Unit of a plan's contract length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_unit")]
#[serde(rename_all = "lowercase")]
pub enum ContractUnit {
    /// Contract length measured in months.
    #[sea_orm(string_value = "months")]
    Months,
    /// Contract length measured in years.
    #[sea_orm(string_value = "years")]
    Years,
}

/// Billing cadence of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "billing_cadence")]
#[serde(rename_all = "lowercase")]
pub enum BillingCadence {
    /// Billed every month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Billed every quarter.
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    /// Billed once a year.
    #[sea_orm(string_value = "annual")]
    Annual,
}

/// External service a credential authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "service_type")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Slack workspace integration.
    #[sea_orm(string_value = "slack")]
    Slack,
    /// Gmail integration.
    #[sea_orm(string_value = "gmail")]
    Gmail,
    /// Salesforce integration.
    #[sea_orm(string_value = "salesforce")]
    Salesforce,
    /// HubSpot integration.
    #[sea_orm(string_value = "hubspot")]
    Hubspot,
    /// Customer-provided HTTP API.
    #[sea_orm(string_value = "custom_api")]
    CustomApi,
}
