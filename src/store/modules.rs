/*!
 * Repository for course modules.
 *
 * Modules sit between courses and assessments: deleting a module first
 * removes its assessments, and a course deletion walks every module of
 * that course through the same path. The transaction-scoped helpers at
 * the bottom carry those cascades for callers that already hold one.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

use super::assessments;
use super::connection::Database;
use super::models::{Module, NewModule};

/// Repository for course modules
#[derive(Clone)]
pub struct ModuleRepository {
    /// Database handle
    db: Database,
}

impl ModuleRepository {
    /// Create a new repository with the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new module and return the persisted record with its id
    pub fn add(&self, module: &NewModule) -> StoreResult<Module> {
        debug!("Adding module with name: {}", module.name);

        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO modules (name, description, lecturer, course_id) VALUES (?1, ?2, ?3, ?4)",
                params![module.name, module.description, module.lecturer, module.course_id],
            )
            .map_err(|e| StoreError::query("Failed to add module", e))?;

            Ok(Module {
                id: conn.last_insert_rowid(),
                name: module.name.clone(),
                description: module.description.clone(),
                lecturer: module.lecturer.clone(),
                course_id: module.course_id,
            })
        })
    }

    /// Find a module by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<Module>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, name, description, lecturer, course_id FROM modules WHERE id = ?1",
                [id],
                map_module_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find module with id {}", id), e))
        })
    }

    /// Find a module by its exact name
    pub fn find_by_name(&self, name: &str) -> StoreResult<Option<Module>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, name, description, lecturer, course_id FROM modules WHERE name = ?1",
                [name],
                map_module_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find module with name {}", name), e))
        })
    }

    /// Get all modules taught by the given lecturer
    pub fn find_by_lecturer(&self, lecturer: &str) -> StoreResult<Vec<Module>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, description, lecturer, course_id FROM modules WHERE lecturer = ?1")
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find modules with lecturer {}", lecturer),
                        e,
                    )
                })?;

            let modules = stmt
                .query_map([lecturer], map_module_row)
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find modules with lecturer {}", lecturer),
                        e,
                    )
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(modules)
        })
    }

    /// Get all modules belonging to the given course
    pub fn find_by_course_id(&self, course_id: i64) -> StoreResult<Vec<Module>> {
        self.db.execute(|conn| find_by_course_id_tx(conn, course_id))
    }

    /// Get all modules, in storage order
    pub fn find_all(&self) -> StoreResult<Vec<Module>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, description, lecturer, course_id FROM modules")
                .map_err(|e| StoreError::query("Failed to find all modules", e))?;

            let modules = stmt
                .query_map([], map_module_row)
                .map_err(|e| StoreError::query("Failed to find all modules", e))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(modules)
        })
    }

    /// Overwrite a module's fields, keyed by id
    ///
    /// Returns the number of rows affected (0 or 1).
    pub fn update(&self, module: &Module) -> StoreResult<usize> {
        debug!("Updating module with id: {}", module.id);

        self.db.execute(|conn| {
            conn.execute(
                "UPDATE modules SET name = ?1, description = ?2, lecturer = ?3, course_id = ?4 WHERE id = ?5",
                params![
                    module.name,
                    module.description,
                    module.lecturer,
                    module.course_id,
                    module.id,
                ],
            )
            .map_err(|e| {
                StoreError::query(format!("Failed to update module with id {}", module.id), e)
            })
        })
    }

    /// Delete a module, removing its assessments first
    ///
    /// Runs in one transaction. Results for the removed assessments are not
    /// cascaded. Returns the number of module rows removed (0 or 1).
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        debug!("Deleting module with id: {}", id);

        self.db.transaction(|tx| delete_tx(tx, id))
    }

    /// Delete every module of the given course, one module at a time
    ///
    /// Each module takes its assessments with it. Runs in one transaction
    /// and fails fast on the first error. Returns the number of module rows
    /// removed.
    pub fn delete_by_course_id(&self, course_id: i64) -> StoreResult<usize> {
        debug!("Deleting all modules for course with id: {}", course_id);

        self.db.transaction(|tx| delete_by_course_id_tx(tx, course_id))
    }
}

/// Map a row of the modules table to a Module record
fn map_module_row(row: &rusqlite::Row) -> rusqlite::Result<Module> {
    Ok(Module {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        lecturer: row.get(3)?,
        course_id: row.get(4)?,
    })
}

/// Get a course's modules (for use within a caller's transaction)
pub(crate) fn find_by_course_id_tx(conn: &Connection, course_id: i64) -> StoreResult<Vec<Module>> {
    let mut stmt = conn
        .prepare("SELECT id, name, description, lecturer, course_id FROM modules WHERE course_id = ?1")
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find modules with course id {}", course_id),
                e,
            )
        })?;

    let modules = stmt
        .query_map([course_id], map_module_row)
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find modules with course id {}", course_id),
                e,
            )
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(modules)
}

/// Delete one module, assessments first (for use within a caller's transaction)
pub(crate) fn delete_tx(conn: &Connection, id: i64) -> StoreResult<usize> {
    let assessments_removed = assessments::delete_by_module_id_tx(conn, id)?;
    debug!(
        "Removed {} assessments for module with id: {}",
        assessments_removed, id
    );

    conn.execute("DELETE FROM modules WHERE id = ?1", [id])
        .map_err(|e| StoreError::query(format!("Failed to delete module with id {}", id), e))
}

/// Delete all modules of a course, each cascading to its assessments
/// (for use within a caller's transaction)
pub(crate) fn delete_by_course_id_tx(conn: &Connection, course_id: i64) -> StoreResult<usize> {
    let modules = find_by_course_id_tx(conn, course_id)?;

    let mut removed = 0;
    for module in &modules {
        removed += delete_tx(conn, module.id)?;
    }

    Ok(removed)
}
