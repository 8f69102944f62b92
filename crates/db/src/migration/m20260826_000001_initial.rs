//! Initial database migration.
//!
//! Creates all enums and tables for the Flowmetric platform. Department name
//! uniqueness per company is deliberately NOT a constraint here; it is
//! enforced at the application layer.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(SUBSCRIPTION_PLANS_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(DEPARTMENTS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(COMPANY_SE_ASSIGNMENTS_SQL).await?;

        // ============================================================
        // PART 3: WORKFLOWS & EXECUTIONS
        // ============================================================
        db.execute_unprepared(WORKFLOWS_SQL).await?;
        db.execute_unprepared(WORKFLOW_EXECUTIONS_SQL).await?;

        // ============================================================
        // PART 4: BILLING
        // ============================================================
        db.execute_unprepared(BILLING_USAGE_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(PAYMENT_METHODS_SQL).await?;

        // ============================================================
        // PART 5: INTEGRATIONS
        // ============================================================
        db.execute_unprepared(CREDENTIALS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('admin', 'se', 'client');
CREATE TYPE execution_status AS ENUM ('completed', 'failed', 'running', 'cancelled');
CREATE TYPE invoice_status AS ENUM ('draft', 'sent', 'paid', 'overdue');
CREATE TYPE pricing_model AS ENUM ('flat_rate', 'tiered', 'usage_based');
CREATE TYPE contract_unit AS ENUM ('months', 'years');
CREATE TYPE billing_cadence AS ENUM ('monthly', 'quarterly', 'annual');
CREATE TYPE service_type AS ENUM ('slack', 'gmail', 'salesforce', 'hubspot', 'custom_api');
";

const SUBSCRIPTION_PLANS_SQL: &str = r"
CREATE TABLE subscription_plans (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    pricing_model pricing_model NOT NULL,
    contract_length INTEGER NOT NULL,
    contract_unit contract_unit NOT NULL,
    billing_cadence billing_cadence NOT NULL,
    setup_fee NUMERIC(12, 2) NOT NULL DEFAULT 0,
    prepayment_pct NUMERIC(5, 2) NOT NULL DEFAULT 0,
    cap_amount NUMERIC(12, 2),
    overage_rate NUMERIC(12, 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    domain VARCHAR(255) NOT NULL UNIQUE,
    industry VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    subscription_plan_id UUID REFERENCES subscription_plans(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DEPARTMENTS_SQL: &str = r"
CREATE TABLE departments (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_departments_company ON departments(company_id);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    avatar_url TEXT,
    role user_role NOT NULL,
    company_id UUID REFERENCES companies(id) ON DELETE CASCADE,
    department_id UUID REFERENCES departments(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT FALSE,
    email_notifications BOOLEAN NOT NULL DEFAULT TRUE,
    billing_access BOOLEAN NOT NULL DEFAULT FALSE,
    admin_access BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_users_company ON users(company_id);
CREATE INDEX idx_users_role ON users(role);
";

const COMPANY_SE_ASSIGNMENTS_SQL: &str = r"
CREATE TABLE company_se_assignments (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, user_id)
);
";

const WORKFLOWS_SQL: &str = r"
CREATE TABLE workflows (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_workflows_company ON workflows(company_id);
";

const WORKFLOW_EXECUTIONS_SQL: &str = r"
CREATE TABLE workflow_executions (
    id UUID PRIMARY KEY,
    workflow_id UUID NOT NULL REFERENCES workflows(id) ON DELETE CASCADE,
    status execution_status NOT NULL,
    started_at TIMESTAMPTZ NOT NULL,
    completed_at TIMESTAMPTZ,
    duration_secs INTEGER,
    items_processed INTEGER NOT NULL DEFAULT 0,
    time_saved_mins INTEGER NOT NULL DEFAULT 0,
    cost_savings NUMERIC(12, 2) NOT NULL DEFAULT 0,
    error_message TEXT,
    result JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_executions_workflow ON workflow_executions(workflow_id);
CREATE INDEX idx_executions_started ON workflow_executions(started_at);
CREATE INDEX idx_executions_status ON workflow_executions(status);
";

const BILLING_USAGE_SQL: &str = r"
CREATE TABLE billing_usage (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    month SMALLINT NOT NULL CHECK (month BETWEEN 1 AND 12),
    year SMALLINT NOT NULL,
    execution_count INTEGER NOT NULL DEFAULT 0,
    time_saved_mins INTEGER NOT NULL DEFAULT 0,
    cost_savings NUMERIC(12, 2) NOT NULL DEFAULT 0,
    billed_amount NUMERIC(12, 2) NOT NULL DEFAULT 0,
    is_paid BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, month, year)
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    invoice_number VARCHAR(50) NOT NULL UNIQUE,
    amount NUMERIC(12, 2) NOT NULL,
    status invoice_status NOT NULL DEFAULT 'draft',
    due_date DATE NOT NULL,
    paid_date DATE,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_invoices_company ON invoices(company_id);
";

const PAYMENT_METHODS_SQL: &str = r"
CREATE TABLE payment_methods (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL UNIQUE REFERENCES companies(id) ON DELETE CASCADE,
    card_brand VARCHAR(50) NOT NULL,
    last4 VARCHAR(4) NOT NULL,
    exp_month SMALLINT NOT NULL CHECK (exp_month BETWEEN 1 AND 12),
    exp_year SMALLINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CREDENTIALS_SQL: &str = r"
CREATE TABLE credentials (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    service service_type NOT NULL,
    api_key TEXT NOT NULL,
    api_secret TEXT,
    base_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, service)
);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS credentials;
DROP TABLE IF EXISTS payment_methods;
DROP TABLE IF EXISTS invoices;
DROP TABLE IF EXISTS billing_usage;
DROP TABLE IF EXISTS workflow_executions;
DROP TABLE IF EXISTS workflows;
DROP TABLE IF EXISTS company_se_assignments;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS departments;
DROP TABLE IF EXISTS companies;
DROP TABLE IF EXISTS subscription_plans;
DROP TYPE IF EXISTS service_type;
DROP TYPE IF EXISTS billing_cadence;
DROP TYPE IF EXISTS contract_unit;
DROP TYPE IF EXISTS pricing_model;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS execution_status;
DROP TYPE IF EXISTS user_role;
";
