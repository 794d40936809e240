/*!
 * Repository for course enrollments.
 *
 * An enrollment links one student to one course; at most one should
 * exist per (student, course) pair, which the seeder guarantees and the
 * storage layer does not. Bulk removal by student or course walks the
 * matching rows and deletes them one at a time.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

use super::connection::Database;
use super::models::{CourseEnrollment, NewCourseEnrollment};

/// Repository for course enrollments
#[derive(Clone)]
pub struct CourseEnrollmentRepository {
    /// Database handle
    db: Database,
}

impl CourseEnrollmentRepository {
    /// Create a new repository with the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new enrollment and return the persisted record with its id
    pub fn add(&self, enrollment: &NewCourseEnrollment) -> StoreResult<CourseEnrollment> {
        debug!(
            "Adding enrollment of student {} in course {}",
            enrollment.student_id, enrollment.course_id
        );

        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO course_enrollments (student_id, course_id, enrollment_date) VALUES (?1, ?2, ?3)",
                params![
                    enrollment.student_id,
                    enrollment.course_id,
                    enrollment.enrollment_date,
                ],
            )
            .map_err(|e| StoreError::query("Failed to add course enrollment", e))?;

            Ok(CourseEnrollment {
                id: conn.last_insert_rowid(),
                student_id: enrollment.student_id,
                course_id: enrollment.course_id,
                enrollment_date: enrollment.enrollment_date,
            })
        })
    }

    /// Find an enrollment by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<CourseEnrollment>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, student_id, course_id, enrollment_date FROM course_enrollments WHERE id = ?1",
                [id],
                map_enrollment_row,
            )
            .optional()
            .map_err(|e| {
                StoreError::query(format!("Failed to find enrollment with id {}", id), e)
            })
        })
    }

    /// Get all enrollments of the given student
    pub fn find_by_student_id(&self, student_id: i64) -> StoreResult<Vec<CourseEnrollment>> {
        self.db.execute(|conn| find_by_student_id_tx(conn, student_id))
    }

    /// Get all enrollments in the given course
    pub fn find_by_course_id(&self, course_id: i64) -> StoreResult<Vec<CourseEnrollment>> {
        self.db.execute(|conn| find_by_course_id_tx(conn, course_id))
    }

    /// Get all enrollments, in storage order
    pub fn find_all(&self) -> StoreResult<Vec<CourseEnrollment>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, student_id, course_id, enrollment_date FROM course_enrollments")
                .map_err(|e| StoreError::query("Failed to find all enrollments", e))?;

            let enrollments = stmt
                .query_map([], map_enrollment_row)
                .map_err(|e| StoreError::query("Failed to find all enrollments", e))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(enrollments)
        })
    }

    /// Overwrite an enrollment's fields, keyed by id
    ///
    /// Returns the number of rows affected (0 or 1).
    pub fn update(&self, enrollment: &CourseEnrollment) -> StoreResult<usize> {
        debug!("Updating enrollment with id: {}", enrollment.id);

        self.db.execute(|conn| {
            conn.execute(
                "UPDATE course_enrollments SET student_id = ?1, course_id = ?2, enrollment_date = ?3 WHERE id = ?4",
                params![
                    enrollment.student_id,
                    enrollment.course_id,
                    enrollment.enrollment_date,
                    enrollment.id,
                ],
            )
            .map_err(|e| {
                StoreError::query(
                    format!("Failed to update enrollment with id {}", enrollment.id),
                    e,
                )
            })
        })
    }

    /// Delete an enrollment by id; returns the number of rows affected (0 or 1)
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        debug!("Deleting enrollment with id: {}", id);

        self.db.execute(|conn| {
            conn.execute("DELETE FROM course_enrollments WHERE id = ?1", [id])
                .map_err(|e| {
                    StoreError::query(format!("Failed to delete enrollment with id {}", id), e)
                })
        })
    }

    /// Delete every enrollment of the given student, one at a time
    ///
    /// Runs in one transaction and fails fast on the first error. Returns
    /// the number of enrollment rows removed.
    pub fn delete_by_student_id(&self, student_id: i64) -> StoreResult<usize> {
        debug!("Deleting all enrollments for student with id: {}", student_id);

        self.db.transaction(|tx| delete_by_student_id_tx(tx, student_id))
    }

    /// Delete every enrollment in the given course, one at a time
    ///
    /// Runs in one transaction and fails fast on the first error. Returns
    /// the number of enrollment rows removed.
    pub fn delete_by_course_id(&self, course_id: i64) -> StoreResult<usize> {
        debug!("Deleting all enrollments for course with id: {}", course_id);

        self.db.transaction(|tx| delete_by_course_id_tx(tx, course_id))
    }
}

/// Map a row of the course_enrollments table to a CourseEnrollment record
fn map_enrollment_row(row: &rusqlite::Row) -> rusqlite::Result<CourseEnrollment> {
    Ok(CourseEnrollment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        course_id: row.get(2)?,
        enrollment_date: row.get(3)?,
    })
}

/// Get a student's enrollments (for use within a caller's transaction)
pub(crate) fn find_by_student_id_tx(
    conn: &Connection,
    student_id: i64,
) -> StoreResult<Vec<CourseEnrollment>> {
    let mut stmt = conn
        .prepare("SELECT id, student_id, course_id, enrollment_date FROM course_enrollments WHERE student_id = ?1")
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find enrollments with student id {}", student_id),
                e,
            )
        })?;

    let enrollments = stmt
        .query_map([student_id], map_enrollment_row)
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find enrollments with student id {}", student_id),
                e,
            )
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(enrollments)
}

/// Get a course's enrollments (for use within a caller's transaction)
pub(crate) fn find_by_course_id_tx(
    conn: &Connection,
    course_id: i64,
) -> StoreResult<Vec<CourseEnrollment>> {
    let mut stmt = conn
        .prepare("SELECT id, student_id, course_id, enrollment_date FROM course_enrollments WHERE course_id = ?1")
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find enrollments with course id {}", course_id),
                e,
            )
        })?;

    let enrollments = stmt
        .query_map([course_id], map_enrollment_row)
        .map_err(|e| {
            StoreError::query(
                format!("Failed to find enrollments with course id {}", course_id),
                e,
            )
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(enrollments)
}

/// Delete all enrollments of a student, one row per statement
/// (for use within a caller's transaction)
pub(crate) fn delete_by_student_id_tx(conn: &Connection, student_id: i64) -> StoreResult<usize> {
    let enrollments = find_by_student_id_tx(conn, student_id)?;

    let mut removed = 0;
    for enrollment in &enrollments {
        removed += delete_one_tx(conn, enrollment.id)?;
    }

    Ok(removed)
}

/// Delete all enrollments in a course, one row per statement
/// (for use within a caller's transaction)
pub(crate) fn delete_by_course_id_tx(conn: &Connection, course_id: i64) -> StoreResult<usize> {
    let enrollments = find_by_course_id_tx(conn, course_id)?;

    let mut removed = 0;
    for enrollment in &enrollments {
        removed += delete_one_tx(conn, enrollment.id)?;
    }

    Ok(removed)
}

fn delete_one_tx(conn: &Connection, id: i64) -> StoreResult<usize> {
    conn.execute("DELETE FROM course_enrollments WHERE id = ?1", [id])
        .map_err(|e| StoreError::query(format!("Failed to delete enrollment with id {}", id), e))
}
