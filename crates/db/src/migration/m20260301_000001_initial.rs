//! Initial database migration.
//!
//! Creates the enums, tables, indexes, and triggers for tenants,
//! companies, and documents.

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
        // PART 2: CORE TABLES
        // ============================================================
        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Document lifecycle status
CREATE TYPE document_status AS ENUM (
    'pending',
    'approved',
    'rejected'
);

-- Kind of financial document
CREATE TYPE document_type AS ENUM (
    'invoice',
    'delivery',
    'corrected_invoice'
);

-- Review level
CREATE TYPE review_level AS ENUM (
    'auto',
    'recommended',
    'required',
    'manual'
);

-- Money direction
CREATE TYPE document_flow AS ENUM (
    'in',
    'out',
    'unknown'
);
";

const TENANTS_SQL: &str = r"
CREATE TABLE tenants (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    tax_id VARCHAR(50),
    is_provider BOOLEAN NOT NULL DEFAULT FALSE,
    is_customer BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Dedupe safety net: one company per (tenant, tax id) when a tax id exists.
CREATE UNIQUE INDEX companies_tenant_tax_id_key
    ON companies (tenant_id, tax_id)
    WHERE tax_id IS NOT NULL;

-- Case-insensitive name fallback lookup.
CREATE INDEX companies_tenant_lower_name_idx
    ON companies (tenant_id, LOWER(name));
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    external_id VARCHAR(255) NOT NULL,
    company_id UUID REFERENCES companies(id) ON DELETE SET NULL,
    document_type document_type NOT NULL,
    document_number VARCHAR(255),
    issue_date DATE,
    base_amount NUMERIC(12, 2),
    tax_amount NUMERIC(12, 2),
    tax_percentage NUMERIC(7, 2),
    total_amount NUMERIC(12, 2),
    confidence JSONB NOT NULL DEFAULT '{}',
    status document_status NOT NULL DEFAULT 'pending',
    review_level review_level NOT NULL DEFAULT 'required',
    flow document_flow NOT NULL DEFAULT 'unknown',
    is_auto_approved BOOLEAN NOT NULL DEFAULT FALSE,
    is_archived BOOLEAN NOT NULL DEFAULT FALSE,
    archived_at TIMESTAMPTZ,
    archived_by UUID,
    approved_at TIMESTAMPTZ,
    approved_by UUID,
    rejected_at TIMESTAMPTZ,
    rejected_by UUID,
    rejection_reason TEXT,
    edited_at TIMESTAMPTZ,
    reviewed_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT documents_tenant_external_id_key UNIQUE (tenant_id, external_id)
);

CREATE INDEX documents_tenant_status_idx ON documents (tenant_id, status);
CREATE INDEX documents_tenant_issue_date_idx ON documents (tenant_id, issue_date);
CREATE INDEX documents_company_idx ON documents (company_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER companies_set_updated_at
    BEFORE UPDATE ON companies
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER documents_set_updated_at
    BEFORE UPDATE ON documents
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
DROP TABLE IF EXISTS tenants CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS document_flow;
DROP TYPE IF EXISTS review_level;
DROP TYPE IF EXISTS document_type;
DROP TYPE IF EXISTS document_status;
";
