//! Repository layer.
//!
//! Each repository owns the queries for one aggregate and returns a typed
//! error enum so the HTTP layer can map failures to status codes without
//! string matching.

pub mod billing;
pub mod company;
pub mod credential;
pub mod dashboard;
pub mod subscription_plan;
pub mod user;
pub mod workflow;

pub use billing::{BillingError, BillingOverview, BillingRepository, PaymentMethodInput};
pub use company::{
    CompanyError, CompanyRepository, CompanyUserInput, CreateCompanyInput, DepartmentInput,
    SeAssignmentInput, UpdateCompanyDetailsInput, UpdateCompanyInput,
};
pub use credential::{CredentialError, CredentialInput, CredentialRepository, MaskedCredential};
pub use dashboard::{DashboardError, DashboardRepository, ExecutionLogFilter};
pub use subscription_plan::{CreatePlanInput, PlanError, SubscriptionPlanRepository, UpdatePlanInput};
pub use user::{CreateUserInput, UpdateProfileInput, UpdateUserInput, UserError, UserRepository};
pub use workflow::{CreateWorkflowInput, WorkflowError, WorkflowRepository};
