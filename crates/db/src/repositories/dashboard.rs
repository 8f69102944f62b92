//! Dashboard repository.
//!
//! Read-only rollups consumed by the admin and client dashboard pages. Both
//! portals share these queries so the numbers cannot drift between surfaces.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use flowmetric_core::metrics::{TimeRange, success_rate};
use flowmetric_shared::types::{PageRequest, PageResponse};

use crate::entities::{
    companies, sea_orm_active_enums::ExecutionStatus, workflow_executions, workflows,
};
use crate::repositories::workflow::WorkflowWithStats;

/// Errors raised by dashboard queries.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Company row missing.
    #[error("Company not found")]
    NotFound,

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Execution rollup shared by both dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionMetrics {
    /// Executions in the selected range.
    pub total_executions: u64,
    /// Completed executions in the selected range.
    pub successful_executions: u64,
    /// Zero-safe rounded success percentage.
    pub success_rate: u8,
    /// Total minutes of manual work saved.
    pub time_saved_mins: i64,
    /// Total cost savings attributed to automation.
    pub cost_savings: Decimal,
}

/// Admin dashboard view model.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    /// Total companies on the platform.
    pub total_companies: u64,
    /// Total client users.
    pub total_users: u64,
    /// Active workflows across all companies.
    pub active_workflows: u64,
    /// Execution rollup for the selected range.
    pub metrics: ExecutionMetrics,
    /// Most recent executions.
    pub recent_executions: Vec<ExecutionLogEntry>,
}

/// Client dashboard view model, scoped to one company.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDashboard {
    /// The company row.
    pub company: companies::Model,
    /// Active workflows for this company.
    pub active_workflows: u64,
    /// Execution rollup for the selected range.
    pub metrics: ExecutionMetrics,
    /// This company's workflows with execution counts.
    pub workflows: Vec<WorkflowWithStats>,
    /// Most recent executions.
    pub recent_executions: Vec<ExecutionLogEntry>,
}

/// One row in the execution log.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionLogEntry {
    /// The execution row.
    pub execution: workflow_executions::Model,
    /// Name of the workflow that ran.
    pub workflow_name: String,
    /// Owning company id.
    pub company_id: Uuid,
}

/// Per-workflow ROI rollup.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRoi {
    /// Workflow id.
    pub workflow_id: Uuid,
    /// Workflow name.
    pub name: String,
    /// Whether the workflow is active.
    pub is_active: bool,
    /// Execution rollup over the workflow's whole history.
    pub metrics: ExecutionMetrics,
    /// Total items processed.
    pub items_processed: i64,
}

/// Filters for the execution log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionLogFilter {
    /// Restrict to one company.
    pub company_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<ExecutionStatus>,
}

#[derive(Debug, FromQueryResult)]
struct SavingsRow {
    time_saved: Option<i64>,
    cost: Option<Decimal>,
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Platform-wide rollup for the admin dashboard.
    pub async fn admin_dashboard(&self, range: TimeRange) -> Result<AdminDashboard, DbErr> {
        use crate::entities::{sea_orm_active_enums::UserRole, users};

        let total_companies = companies::Entity::find().count(&self.db).await?;
        let total_users = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Client))
            .count(&self.db)
            .await?;
        let active_workflows = workflows::Entity::find()
            .filter(workflows::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;

        let since = range.start(Utc::now());
        let metrics = self.execution_metrics(None, since).await?;
        let recent_executions = self.recent_executions(None, 10).await?;

        Ok(AdminDashboard {
            total_companies,
            total_users,
            active_workflows,
            metrics,
            recent_executions,
        })
    }

    /// Company-scoped rollup for the client dashboard.
    pub async fn client_dashboard(
        &self,
        company_id: Uuid,
        range: TimeRange,
    ) -> Result<ClientDashboard, DashboardError> {
        let company = companies::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(DashboardError::NotFound)?;

        let active_workflows = workflows::Entity::find()
            .filter(workflows::Column::CompanyId.eq(company_id))
            .filter(workflows::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;

        let since = range.start(Utc::now());
        let metrics = self.execution_metrics(Some(company_id), since).await?;
        let recent_executions = self.recent_executions(Some(company_id), 5).await?;

        let workflow_repo = super::workflow::WorkflowRepository::new(self.db.clone());
        let workflows = workflow_repo.list_by_company(company_id).await?;

        Ok(ClientDashboard {
            company,
            active_workflows,
            metrics,
            workflows,
            recent_executions,
        })
    }

    /// Paginated execution log with optional company/status filters.
    pub async fn execution_logs(
        &self,
        filter: &ExecutionLogFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<ExecutionLogEntry>, DbErr> {
        let mut query = workflow_executions::Entity::find()
            .find_also_related(workflows::Entity)
            .order_by_desc(workflow_executions::Column::StartedAt);

        if let Some(company_id) = filter.company_id {
            query = query.filter(workflows::Column::CompanyId.eq(company_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(workflow_executions::Column::Status.eq(status));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let rows = paginator
            .fetch_page(page.zero_based())
            .await?;

        let data = rows
            .into_iter()
            .filter_map(|(execution, workflow)| {
                workflow.map(|w| ExecutionLogEntry {
                    execution,
                    workflow_name: w.name,
                    company_id: w.company_id,
                })
            })
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Per-workflow ROI rollups for one company.
    pub async fn workflow_roi(&self, company_id: Uuid) -> Result<Vec<WorkflowRoi>, DashboardError> {
        companies::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(DashboardError::NotFound)?;

        let company_workflows = workflows::Entity::find()
            .filter(workflows::Column::CompanyId.eq(company_id))
            .order_by_desc(workflows::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut out = Vec::with_capacity(company_workflows.len());
        for workflow in company_workflows {
            let total = workflow_executions::Entity::find()
                .filter(workflow_executions::Column::WorkflowId.eq(workflow.id))
                .count(&self.db)
                .await?;
            let successful = workflow_executions::Entity::find()
                .filter(workflow_executions::Column::WorkflowId.eq(workflow.id))
                .filter(workflow_executions::Column::Status.eq(ExecutionStatus::Completed))
                .count(&self.db)
                .await?;

            let savings: Option<SavingsRow> = workflow_executions::Entity::find()
                .select_only()
                .column_as(
                    Expr::col(workflow_executions::Column::TimeSavedMins).sum(),
                    "time_saved",
                )
                .column_as(
                    Expr::col(workflow_executions::Column::CostSavings).sum(),
                    "cost",
                )
                .filter(workflow_executions::Column::WorkflowId.eq(workflow.id))
                .into_model()
                .one(&self.db)
                .await?;

            let items: Option<ItemsRow> = workflow_executions::Entity::find()
                .select_only()
                .column_as(
                    Expr::col(workflow_executions::Column::ItemsProcessed).sum(),
                    "items",
                )
                .filter(workflow_executions::Column::WorkflowId.eq(workflow.id))
                .into_model()
                .one(&self.db)
                .await?;

            let (time_saved_mins, cost_savings) = savings
                .map_or((0, Decimal::ZERO), |row| {
                    (row.time_saved.unwrap_or(0), row.cost.unwrap_or(Decimal::ZERO))
                });

            out.push(WorkflowRoi {
                workflow_id: workflow.id,
                name: workflow.name,
                is_active: workflow.is_active,
                metrics: ExecutionMetrics {
                    total_executions: total,
                    successful_executions: successful,
                    success_rate: success_rate(successful, total),
                    time_saved_mins,
                    cost_savings,
                },
                items_processed: items.and_then(|row| row.items).unwrap_or(0),
            });
        }
        Ok(out)
    }

    /// Execution rollup, optionally scoped to a company and a lower bound.
    async fn execution_metrics(
        &self,
        company_id: Option<Uuid>,
        since: Option<DateTime<Utc>>,
    ) -> Result<ExecutionMetrics, DbErr> {
        let base = || {
            let mut query = workflow_executions::Entity::find();
            if company_id.is_some() {
                query = query.inner_join(workflows::Entity);
            }
            if let Some(id) = company_id {
                query = query.filter(workflows::Column::CompanyId.eq(id));
            }
            if let Some(since) = since {
                query = query.filter(workflow_executions::Column::StartedAt.gte(since));
            }
            query
        };

        let total = base().count(&self.db).await?;
        let successful = base()
            .filter(workflow_executions::Column::Status.eq(ExecutionStatus::Completed))
            .count(&self.db)
            .await?;

        let savings: Option<SavingsRow> = base()
            .select_only()
            .column_as(
                Expr::col((
                    workflow_executions::Entity,
                    workflow_executions::Column::TimeSavedMins,
                ))
                .sum(),
                "time_saved",
            )
            .column_as(
                Expr::col((
                    workflow_executions::Entity,
                    workflow_executions::Column::CostSavings,
                ))
                .sum(),
                "cost",
            )
            .into_model()
            .one(&self.db)
            .await?;

        let (time_saved_mins, cost_savings) = savings.map_or((0, Decimal::ZERO), |row| {
            (row.time_saved.unwrap_or(0), row.cost.unwrap_or(Decimal::ZERO))
        });

        Ok(ExecutionMetrics {
            total_executions: total,
            successful_executions: successful,
            success_rate: success_rate(successful, total),
            time_saved_mins,
            cost_savings,
        })
    }

    /// Most recent executions, optionally scoped to a company.
    async fn recent_executions(
        &self,
        company_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<ExecutionLogEntry>, DbErr> {
        let mut query = workflow_executions::Entity::find()
            .find_also_related(workflows::Entity)
            .order_by_desc(workflow_executions::Column::StartedAt)
            .limit(limit);
        if let Some(id) = company_id {
            query = query.filter(workflows::Column::CompanyId.eq(id));
        }

        Ok(query
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(execution, workflow)| {
                workflow.map(|w| ExecutionLogEntry {
                    execution,
                    workflow_name: w.name,
                    company_id: w.company_id,
                })
            })
            .collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct ItemsRow {
    items: Option<i64>,
}
