/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for all seven entity tables,
 * handles schema migrations for version upgrades, and guarantees the
 * default administrator account exists after every initialization.
 */

use log::{debug, info};
use rusqlite::Connection;

use crate::errors::{StoreError, StoreResult};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Email of the administrator account seeded at initialization
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@sms.com";

/// Stored credential of the default administrator account
///
/// This is the sha-256 hex digest of the word "admin", intended for first
/// login only.
pub const DEFAULT_ADMIN_PASSWORD_HASH: &str =
    "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918";

/// Initialize the database schema
///
/// Creates all tables on a fresh database, migrates older schemas, and
/// upserts the default administrator account in every case.
pub fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    // Check current schema version
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        // Fresh database - create all tables
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        // Need to migrate
        info!(
            "Migrating database schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    // The default admin is keyed by email, so re-running is harmless and
    // restores the account if it was removed.
    ensure_default_admin(conn)?;

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> StoreResult<i32> {
    // Check if the schema_version table exists
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::query("Failed to check schema_version table existence", e))?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> StoreResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )
    .map_err(|e| StoreError::query("Failed to set schema version", e))?;
    Ok(())
}

/// Create all database tables
///
/// Foreign key columns are declared with REFERENCES but the foreign_keys
/// pragma stays off: cascading is handled in the repository layer, and
/// rows orphaned by a course or module deletion must remain readable.
fn create_all_tables(conn: &Connection) -> StoreResult<()> {
    // Enable WAL mode for better concurrency and crash recovery
    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .map_err(|e| StoreError::query("Failed to enable WAL mode", e))?;

    // Create schema version table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create schema_version table", e))?;

    // Create admins table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create admins table", e))?;

    // Create students table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            date_of_birth TEXT NOT NULL,
            join_date TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create students table", e))?;

    // Create courses table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_courses_name ON courses(name);
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create courses table", e))?;

    // Create modules table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS modules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            lecturer TEXT NOT NULL,
            course_id INTEGER NOT NULL REFERENCES courses(id)
        );

        CREATE INDEX IF NOT EXISTS idx_modules_course ON modules(course_id);
        CREATE INDEX IF NOT EXISTS idx_modules_lecturer ON modules(lecturer);
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create modules table", e))?;

    // Create course_enrollments table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS course_enrollments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id),
            course_id INTEGER NOT NULL REFERENCES courses(id),
            enrollment_date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_enrollments_student ON course_enrollments(student_id);
        CREATE INDEX IF NOT EXISTS idx_enrollments_course ON course_enrollments(course_id);
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create course_enrollments table", e))?;

    // Create assessments table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            due_date TEXT NOT NULL,
            module_id INTEGER NOT NULL REFERENCES modules(id)
        );

        CREATE INDEX IF NOT EXISTS idx_assessments_module ON assessments(module_id);
        CREATE INDEX IF NOT EXISTS idx_assessments_due_date ON assessments(due_date);
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create assessments table", e))?;

    // Create results table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id),
            assessment_id INTEGER NOT NULL REFERENCES assessments(id),
            grade INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_results_student ON results(student_id);
        CREATE INDEX IF NOT EXISTS idx_results_assessment ON results(assessment_id);
        "#,
    )
    .map_err(|e| StoreError::query("Failed to create results table", e))?;

    info!("Database schema created successfully");
    Ok(())
}

/// Upsert the default administrator account, keyed by email
fn ensure_default_admin(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        r#"
        INSERT INTO admins (first_name, last_name, email, password)
        VALUES ('Tom', 'Cruise', ?1, ?2)
        ON CONFLICT(email) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            password = excluded.password
        "#,
        [DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD_HASH],
    )
    .map_err(|e| StoreError::query("Failed to upsert default admin account", e))?;

    debug!("Default admin account ensured for {}", DEFAULT_ADMIN_EMAIL);
    Ok(())
}

/// Migrate the schema from one version to another
fn migrate_schema(conn: &Connection, from_version: i32) -> StoreResult<()> {
    let current = from_version;

    while current < SCHEMA_VERSION {
        match current {
            // Add migration steps here as schema evolves
            // Example:
            // 1 => {
            //     migrate_v1_to_v2(conn)?;
            //     current = 2;
            // }
            _ => {
                return Err(StoreError::UnknownSchemaVersion(current));
            }
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!("Schema migration completed to v{}", SCHEMA_VERSION);
    Ok(())
}

/// Drop all tables (for testing purposes only)
#[cfg(test)]
pub fn drop_all_tables(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS results;
        DROP TABLE IF EXISTS assessments;
        DROP TABLE IF EXISTS course_enrollments;
        DROP TABLE IF EXISTS modules;
        DROP TABLE IF EXISTS courses;
        DROP TABLE IF EXISTS students;
        DROP TABLE IF EXISTS admins;
        DROP TABLE IF EXISTS schema_version;
        "#,
    )
    .map_err(|e| StoreError::query("Failed to drop tables", e))?;
    Ok(())
}
