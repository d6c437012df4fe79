//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Nested objects that consumers
//! treat as free-form (the denormalized well reading and measurement
//! custom fields) are FLEXIBLE.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Regions (top of the site hierarchy)
-- =======================================================================
DEFINE TABLE region SCHEMAFULL;
DEFINE FIELD name ON TABLE region TYPE string;
DEFINE FIELD description ON TABLE region TYPE string;
DEFINE FIELD created_by ON TABLE region TYPE string;
DEFINE FIELD updated_by ON TABLE region TYPE string;
DEFINE FIELD is_password_protected ON TABLE region TYPE bool \
    DEFAULT false;
DEFINE FIELD protecting_secret ON TABLE region TYPE option<string>;
DEFINE FIELD protected_at ON TABLE region TYPE option<datetime>;
DEFINE FIELD protected_by ON TABLE region TYPE option<string>;
DEFINE FIELD created_at ON TABLE region TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE region TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_region_creator ON TABLE region COLUMNS created_by;

-- =======================================================================
-- Poles (scoped to region)
-- =======================================================================
DEFINE TABLE pole SCHEMAFULL;
DEFINE FIELD name ON TABLE pole TYPE string;
DEFINE FIELD description ON TABLE pole TYPE string;
DEFINE FIELD region_id ON TABLE pole TYPE string;
DEFINE FIELD location ON TABLE pole TYPE string;
DEFINE FIELD created_by ON TABLE pole TYPE string;
DEFINE FIELD updated_by ON TABLE pole TYPE string;
DEFINE FIELD is_password_protected ON TABLE pole TYPE bool \
    DEFAULT false;
DEFINE FIELD protecting_secret ON TABLE pole TYPE option<string>;
DEFINE FIELD protected_at ON TABLE pole TYPE option<datetime>;
DEFINE FIELD protected_by ON TABLE pole TYPE option<string>;
DEFINE FIELD created_at ON TABLE pole TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE pole TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_pole_region ON TABLE pole COLUMNS region_id;
DEFINE INDEX idx_pole_creator ON TABLE pole COLUMNS created_by;

-- =======================================================================
-- Wells (scoped to pole, with denormalized latest reading)
-- =======================================================================
DEFINE TABLE well SCHEMAFULL;
DEFINE FIELD name ON TABLE well TYPE string;
DEFINE FIELD pole_id ON TABLE well TYPE string;
DEFINE FIELD status ON TABLE well TYPE string \
    ASSERT $value IN ['active', 'inactive', 'maintenance'];
DEFINE FIELD reading ON TABLE well TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_by ON TABLE well TYPE string;
DEFINE FIELD updated_by ON TABLE well TYPE string;
DEFINE FIELD is_password_protected ON TABLE well TYPE bool \
    DEFAULT false;
DEFINE FIELD protecting_secret ON TABLE well TYPE option<string>;
DEFINE FIELD protected_at ON TABLE well TYPE option<datetime>;
DEFINE FIELD protected_by ON TABLE well TYPE option<string>;
DEFINE FIELD created_at ON TABLE well TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE well TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_well_pole ON TABLE well COLUMNS pole_id;
DEFINE INDEX idx_well_creator ON TABLE well COLUMNS created_by;

-- =======================================================================
-- Measurements (append-only child collection of wells)
-- =======================================================================
DEFINE TABLE measurement SCHEMAFULL;
DEFINE FIELD well_id ON TABLE measurement TYPE string;
DEFINE FIELD timestamp ON TABLE measurement TYPE datetime;
DEFINE FIELD water_level ON TABLE measurement TYPE float;
DEFINE FIELD pressure ON TABLE measurement TYPE float;
DEFINE FIELD flow_rate ON TABLE measurement TYPE float;
DEFINE FIELD observations ON TABLE measurement TYPE string;
DEFINE FIELD measured_by ON TABLE measurement TYPE string;
DEFINE FIELD custom_fields ON TABLE measurement TYPE array DEFAULT [];
DEFINE FIELD custom_fields.* ON TABLE measurement TYPE object FLEXIBLE;
DEFINE INDEX idx_measurement_well_time ON TABLE measurement \
    COLUMNS well_id, timestamp;

-- =======================================================================
-- User profiles (record id = identity uid)
-- =======================================================================
DEFINE TABLE user_profile SCHEMAFULL;
DEFINE FIELD email ON TABLE user_profile TYPE string;
DEFINE FIELD display_name ON TABLE user_profile TYPE string;
DEFINE FIELD phone ON TABLE user_profile TYPE string;
DEFINE FIELD tax_id ON TABLE user_profile TYPE string;
DEFINE FIELD role ON TABLE user_profile TYPE string \
    ASSERT $value IN ['user', 'admin'];
DEFINE FIELD created_at ON TABLE user_profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user_profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_email ON TABLE user_profile \
    COLUMNS email UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
