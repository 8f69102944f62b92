//! `SeaORM` entity definitions.

pub mod billing_usage;
pub mod companies;
pub mod company_se_assignments;
pub mod credentials;
pub mod departments;
pub mod invoices;
pub mod payment_methods;
pub mod sea_orm_active_enums;
pub mod subscription_plans;
pub mod users;
pub mod workflow_executions;
pub mod workflows;
