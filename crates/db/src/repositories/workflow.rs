//! Workflow repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{companies, workflow_executions, workflows};

/// Errors raised by workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Company row missing.
    #[error("Company not found")]
    NotFound,

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Input for creating a workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowInput {
    /// Owning company.
    pub company_id: Uuid,
    /// Workflow name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Whether the workflow starts active.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// A workflow with its execution count.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowWithStats {
    /// The workflow row.
    #[serde(flatten)]
    pub workflow: workflows::Model,
    /// Total executions recorded.
    pub execution_count: u64,
}

/// Workflow repository.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a workflow for a company.
    pub async fn create(
        &self,
        input: CreateWorkflowInput,
    ) -> Result<workflows::Model, WorkflowError> {
        companies::Entity::find_by_id(input.company_id)
            .one(&self.db)
            .await?
            .ok_or(WorkflowError::NotFound)?;

        let now = Utc::now().into();
        let workflow = workflows::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(input.company_id),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(workflow_id = %workflow.id, company_id = %workflow.company_id, "Workflow created");
        Ok(workflow)
    }

    /// Lists a company's workflows with execution counts.
    pub async fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<WorkflowWithStats>, DbErr> {
        let rows = workflows::Entity::find()
            .filter(workflows::Column::CompanyId.eq(company_id))
            .order_by_desc(workflows::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for workflow in rows {
            let execution_count = workflow_executions::Entity::find()
                .filter(workflow_executions::Column::WorkflowId.eq(workflow.id))
                .count(&self.db)
                .await?;
            out.push(WorkflowWithStats {
                workflow,
                execution_count,
            });
        }
        Ok(out)
    }
}
