/*!
 * Repository for assessment results.
 *
 * A result records one student's grade for one assessment; at most one
 * should exist per (student, assessment) pair, which the seeder
 * guarantees and the storage layer does not. Unlike enrollments, bulk
 * removal by student or assessment is a single DELETE statement.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

use super::connection::Database;
use super::models::{AssessmentResult, NewAssessmentResult};

/// Repository for assessment results
#[derive(Clone)]
pub struct ResultRepository {
    /// Database handle
    db: Database,
}

impl ResultRepository {
    /// Create a new repository with the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new result and return the persisted record with its id
    pub fn add(&self, result: &NewAssessmentResult) -> StoreResult<AssessmentResult> {
        debug!(
            "Adding result for student {} on assessment {}",
            result.student_id, result.assessment_id
        );

        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO results (student_id, assessment_id, grade) VALUES (?1, ?2, ?3)",
                params![result.student_id, result.assessment_id, result.grade],
            )
            .map_err(|e| StoreError::query("Failed to add result", e))?;

            Ok(AssessmentResult {
                id: conn.last_insert_rowid(),
                student_id: result.student_id,
                assessment_id: result.assessment_id,
                grade: result.grade,
            })
        })
    }

    /// Find a result by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<AssessmentResult>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, student_id, assessment_id, grade FROM results WHERE id = ?1",
                [id],
                map_result_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find result with id {}", id), e))
        })
    }

    /// Get all results of the given student
    pub fn find_by_student_id(&self, student_id: i64) -> StoreResult<Vec<AssessmentResult>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, student_id, assessment_id, grade FROM results WHERE student_id = ?1")
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find results with student id {}", student_id),
                        e,
                    )
                })?;

            let results = stmt
                .query_map([student_id], map_result_row)
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find results with student id {}", student_id),
                        e,
                    )
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(results)
        })
    }

    /// Get all results recorded for the given assessment
    pub fn find_by_assessment_id(&self, assessment_id: i64) -> StoreResult<Vec<AssessmentResult>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, student_id, assessment_id, grade FROM results WHERE assessment_id = ?1")
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find results with assessment id {}", assessment_id),
                        e,
                    )
                })?;

            let results = stmt
                .query_map([assessment_id], map_result_row)
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to find results with assessment id {}", assessment_id),
                        e,
                    )
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(results)
        })
    }

    /// Find the one result a student has for an assessment, if any
    pub fn find_by_student_and_assessment(
        &self,
        student_id: i64,
        assessment_id: i64,
    ) -> StoreResult<Option<AssessmentResult>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, student_id, assessment_id, grade FROM results WHERE student_id = ?1 AND assessment_id = ?2",
                params![student_id, assessment_id],
                map_result_row,
            )
            .optional()
            .map_err(|e| {
                StoreError::query(
                    format!(
                        "Failed to find result for student {} and assessment {}",
                        student_id, assessment_id
                    ),
                    e,
                )
            })
        })
    }

    /// Get all results, in storage order
    pub fn find_all(&self) -> StoreResult<Vec<AssessmentResult>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, student_id, assessment_id, grade FROM results")
                .map_err(|e| StoreError::query("Failed to find all results", e))?;

            let results = stmt
                .query_map([], map_result_row)
                .map_err(|e| StoreError::query("Failed to find all results", e))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(results)
        })
    }

    /// Overwrite a result's fields, keyed by id
    ///
    /// Returns the number of rows affected (0 or 1).
    pub fn update(&self, result: &AssessmentResult) -> StoreResult<usize> {
        debug!("Updating result with id: {}", result.id);

        self.db.execute(|conn| {
            conn.execute(
                "UPDATE results SET student_id = ?1, assessment_id = ?2, grade = ?3 WHERE id = ?4",
                params![result.student_id, result.assessment_id, result.grade, result.id],
            )
            .map_err(|e| {
                StoreError::query(format!("Failed to update result with id {}", result.id), e)
            })
        })
    }

    /// Delete a result by id; returns the number of rows affected (0 or 1)
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        debug!("Deleting result with id: {}", id);

        self.db.execute(|conn| {
            conn.execute("DELETE FROM results WHERE id = ?1", [id])
                .map_err(|e| {
                    StoreError::query(format!("Failed to delete result with id {}", id), e)
                })
        })
    }

    /// Bulk-delete every result of the given student
    ///
    /// Returns the number of result rows removed.
    pub fn delete_by_student_id(&self, student_id: i64) -> StoreResult<usize> {
        debug!("Deleting all results for student with id: {}", student_id);

        self.db.execute(|conn| delete_by_student_id_tx(conn, student_id))
    }

    /// Bulk-delete every result recorded for the given assessment
    ///
    /// Returns the number of result rows removed.
    pub fn delete_by_assessment_id(&self, assessment_id: i64) -> StoreResult<usize> {
        debug!("Deleting all results for assessment with id: {}", assessment_id);

        self.db.execute(|conn| {
            conn.execute(
                "DELETE FROM results WHERE assessment_id = ?1",
                [assessment_id],
            )
            .map_err(|e| {
                StoreError::query(
                    format!("Failed to delete results with assessment id {}", assessment_id),
                    e,
                )
            })
        })
    }
}

/// Map a row of the results table to an AssessmentResult record
fn map_result_row(row: &rusqlite::Row) -> rusqlite::Result<AssessmentResult> {
    Ok(AssessmentResult {
        id: row.get(0)?,
        student_id: row.get(1)?,
        assessment_id: row.get(2)?,
        grade: row.get(3)?,
    })
}

/// Bulk-delete a student's results (for use within a caller's transaction)
pub(crate) fn delete_by_student_id_tx(conn: &Connection, student_id: i64) -> StoreResult<usize> {
    conn.execute("DELETE FROM results WHERE student_id = ?1", [student_id])
        .map_err(|e| {
            StoreError::query(
                format!("Failed to delete results with student id {}", student_id),
                e,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_repo() -> ResultRepository {
        let db = Database::new_in_memory().expect("Failed to create in-memory DB");
        ResultRepository::new(db)
    }

    #[test]
    fn test_add_shouldAssignIdAndPersist() {
        let repo = create_test_repo();

        let result = repo
            .add(&NewAssessmentResult::new(1, 2, 87))
            .expect("Failed to add result");

        assert!(result.id > 0);

        let found = repo.find_by_id(result.id).unwrap().unwrap();
        assert_eq!(found.student_id, 1);
        assert_eq!(found.assessment_id, 2);
        assert_eq!(found.grade, 87);
    }

    #[test]
    fn test_findByStudentAndAssessment_shouldReturnTheOnePair() {
        let repo = create_test_repo();

        repo.add(&NewAssessmentResult::new(1, 10, 60)).unwrap();
        repo.add(&NewAssessmentResult::new(1, 11, 70)).unwrap();
        repo.add(&NewAssessmentResult::new(2, 10, 80)).unwrap();

        let found = repo.find_by_student_and_assessment(1, 11).unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().grade, 70);

        let missing = repo.find_by_student_and_assessment(2, 11).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_findByAssessmentId_shouldReturnOnlyThatAssessment() {
        let repo = create_test_repo();

        repo.add(&NewAssessmentResult::new(1, 5, 40)).unwrap();
        repo.add(&NewAssessmentResult::new(2, 5, 50)).unwrap();
        repo.add(&NewAssessmentResult::new(2, 6, 90)).unwrap();

        let results = repo.find_by_assessment_id(5).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.assessment_id == 5));
    }

    #[test]
    fn test_update_shouldOverwriteGrade() {
        let repo = create_test_repo();

        let mut result = repo.add(&NewAssessmentResult::new(3, 7, 52)).unwrap();

        result.grade = 58;
        let affected = repo.update(&result).expect("Failed to update result");
        assert_eq!(affected, 1);

        let updated = repo.find_by_id(result.id).unwrap().unwrap();
        assert_eq!(updated.grade, 58);
    }

    #[test]
    fn test_deleteByStudentId_shouldBulkRemoveOnlyThatStudent() {
        let repo = create_test_repo();

        repo.add(&NewAssessmentResult::new(8, 1, 10)).unwrap();
        repo.add(&NewAssessmentResult::new(8, 2, 20)).unwrap();
        repo.add(&NewAssessmentResult::new(8, 3, 30)).unwrap();
        repo.add(&NewAssessmentResult::new(9, 1, 99)).unwrap();

        let removed = repo
            .delete_by_student_id(8)
            .expect("Failed to delete results by student");

        assert_eq!(removed, 3);
        assert!(repo.find_by_student_id(8).unwrap().is_empty());
        assert_eq!(repo.find_by_student_id(9).unwrap().len(), 1);
    }

    #[test]
    fn test_deleteByAssessmentId_shouldBulkRemoveOnlyThatAssessment() {
        let repo = create_test_repo();

        repo.add(&NewAssessmentResult::new(1, 30, 61)).unwrap();
        repo.add(&NewAssessmentResult::new(2, 30, 72)).unwrap();
        repo.add(&NewAssessmentResult::new(1, 31, 83)).unwrap();

        let removed = repo
            .delete_by_assessment_id(30)
            .expect("Failed to delete results by assessment");

        assert_eq!(removed, 2);
        assert!(repo.find_by_assessment_id(30).unwrap().is_empty());
        assert_eq!(repo.find_by_assessment_id(31).unwrap().len(), 1);
    }

    #[test]
    fn test_deleteByStudentId_withNoResults_shouldReturnZero() {
        let repo = create_test_repo();

        let removed = repo.delete_by_student_id(123).expect("Delete should not fail");
        assert_eq!(removed, 0);
    }
}
