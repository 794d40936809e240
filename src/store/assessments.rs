/*!
 * Repository for assessments.
 *
 * Assessments belong to a module and are removed ahead of it when the
 * module goes. Deleting an assessment does not cascade to results; any
 * results pointing at a removed assessment are left dangling.
 */

use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

use super::connection::Database;
use super::models::{Assessment, NewAssessment};

/// Repository for assessments
#[derive(Clone)]
pub struct AssessmentRepository {
    /// Database handle
    db: Database,
}

impl AssessmentRepository {
    /// Create a new repository with the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new assessment and return the persisted record with its id
    pub fn add(&self, assessment: &NewAssessment) -> StoreResult<Assessment> {
        debug!("Adding assessment with name: {}", assessment.name);

        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO assessments (name, description, due_date, module_id) VALUES (?1, ?2, ?3, ?4)",
                params![
                    assessment.name,
                    assessment.description,
                    assessment.due_date,
                    assessment.module_id,
                ],
            )
            .map_err(|e| StoreError::query("Failed to add assessment", e))?;

            Ok(Assessment {
                id: conn.last_insert_rowid(),
                name: assessment.name.clone(),
                description: assessment.description.clone(),
                due_date: assessment.due_date,
                module_id: assessment.module_id,
            })
        })
    }

    /// Find an assessment by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<Assessment>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, name, description, due_date, module_id FROM assessments WHERE id = ?1",
                [id],
                map_assessment_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find assessment with id {}", id), e))
        })
    }

    /// Find an assessment by its exact name
    pub fn find_by_name(&self, name: &str) -> StoreResult<Option<Assessment>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, name, description, due_date, module_id FROM assessments WHERE name = ?1",
                [name],
                map_assessment_row,
            )
            .optional()
            .map_err(|e| {
                StoreError::query(format!("Failed to find assessment with name {}", name), e)
            })
        })
    }

    /// Get all assessments due on the given date
    pub fn find_by_due_date(&self, due_date: NaiveDate) -> StoreResult<Vec<Assessment>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, description, due_date, module_id FROM assessments WHERE due_date = ?1")
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find assessments with due date {}", due_date),
                        e,
                    )
                })?;

            let assessments = stmt
                .query_map([due_date], map_assessment_row)
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find assessments with due date {}", due_date),
                        e,
                    )
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(assessments)
        })
    }

    /// Get all assessments belonging to the given module
    pub fn find_by_module_id(&self, module_id: i64) -> StoreResult<Vec<Assessment>> {
        self.db.execute(|conn| find_by_module_id_tx(conn, module_id))
    }

    /// Get all assessments, in storage order
    pub fn find_all(&self) -> StoreResult<Vec<Assessment>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, description, due_date, module_id FROM assessments")
                .map_err(|e| StoreError::query("Failed to find all assessments", e))?;

            let assessments = stmt
                .query_map([], map_assessment_row)
                .map_err(|e| StoreError::query("Failed to find all assessments", e))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(assessments)
        })
    }

    /// Overwrite an assessment's fields, keyed by id
    ///
    /// Returns the number of rows affected (0 or 1).
    pub fn update(&self, assessment: &Assessment) -> StoreResult<usize> {
        debug!("Updating assessment with id: {}", assessment.id);

        self.db.execute(|conn| {
            conn.execute(
                "UPDATE assessments SET name = ?1, description = ?2, due_date = ?3, module_id = ?4 WHERE id = ?5",
                params![
                    assessment.name,
                    assessment.description,
                    assessment.due_date,
                    assessment.module_id,
                    assessment.id,
                ],
            )
            .map_err(|e| {
                StoreError::query(
                    format!("Failed to update assessment with id {}", assessment.id),
                    e,
                )
            })
        })
    }

    /// Delete an assessment by id; returns the number of rows affected (0 or 1)
    ///
    /// Results recorded against the assessment are left in place.
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        debug!("Deleting assessment with id: {}", id);

        self.db.execute(|conn| {
            conn.execute("DELETE FROM assessments WHERE id = ?1", [id])
                .map_err(|e| {
                    StoreError::query(format!("Failed to delete assessment with id {}", id), e)
                })
        })
    }

    /// Delete every assessment of the given module, one at a time
    ///
    /// Runs in one transaction and fails fast on the first error. Returns
    /// the number of assessment rows removed.
    pub fn delete_by_module_id(&self, module_id: i64) -> StoreResult<usize> {
        debug!("Deleting all assessments for module with id: {}", module_id);

        self.db.transaction(|tx| delete_by_module_id_tx(tx, module_id))
    }
}

/// Map a row of the assessments table to an Assessment record
fn map_assessment_row(row: &rusqlite::Row) -> rusqlite::Result<Assessment> {
    Ok(Assessment {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        due_date: row.get(3)?,
        module_id: row.get(4)?,
    })
}

/// Get a module's assessments (for use within a caller's transaction)
pub(crate) fn find_by_module_id_tx(
    conn: &Connection,
    module_id: i64,
) -> StoreResult<Vec<Assessment>> {
    let mut stmt = conn
        .prepare("SELECT id, name, description, due_date, module_id FROM assessments WHERE module_id = ?1")
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find assessments with module id {}", module_id),
                e,
            )
        })?;

    let assessments = stmt
        .query_map([module_id], map_assessment_row)
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find assessments with module id {}", module_id),
                e,
            )
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(assessments)
}

/// Delete all assessments of a module, one row per statement
/// (for use within a caller's transaction)
pub(crate) fn delete_by_module_id_tx(conn: &Connection, module_id: i64) -> StoreResult<usize> {
    let assessments = find_by_module_id_tx(conn, module_id)?;

    let mut removed = 0;
    for assessment in &assessments {
        removed += conn
            .execute("DELETE FROM assessments WHERE id = ?1", [assessment.id])
            .map_err(|e| {
                StoreError::query(
                    format!("Failed to delete assessment with id {}", assessment.id),
                    e,
                )
            })?;
    }

    Ok(removed)
}
