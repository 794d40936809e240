/*!
 * Repository for courses.
 *
 * Deleting a course removes its modules first (each module removes its
 * own assessments), then the course row last, all in one transaction.
 * Enrollments in the course and results for its assessments are not
 * cascaded and stay behind as dangling rows.
 */

use log::debug;
use rusqlite::{params, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

use super::connection::Database;
use super::models::{Course, NewCourse};
use super::modules;

/// Repository for courses
#[derive(Clone)]
pub struct CourseRepository {
    /// Database handle
    db: Database,
}

impl CourseRepository {
    /// Create a new repository with the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new course and return the persisted record with its id
    pub fn add(&self, course: &NewCourse) -> StoreResult<Course> {
        debug!("Adding course with name: {}", course.name);

        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO courses (name, description) VALUES (?1, ?2)",
                params![course.name, course.description],
            )
            .map_err(|e| StoreError::query("Failed to add course", e))?;

            Ok(Course {
                id: conn.last_insert_rowid(),
                name: course.name.clone(),
                description: course.description.clone(),
            })
        })
    }

    /// Find a course by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<Course>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, name, description FROM courses WHERE id = ?1",
                [id],
                map_course_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find course with id {}", id), e))
        })
    }

    /// Find a course by its exact name
    pub fn find_by_name(&self, name: &str) -> StoreResult<Option<Course>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, name, description FROM courses WHERE name = ?1",
                [name],
                map_course_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find course with name {}", name), e))
        })
    }

    /// Get all courses, in storage order
    pub fn find_all(&self) -> StoreResult<Vec<Course>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, description FROM courses")
                .map_err(|e| StoreError::query("Failed to find all courses", e))?;

            let courses = stmt
                .query_map([], map_course_row)
                .map_err(|e| StoreError::query("Failed to find all courses", e))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(courses)
        })
    }

    /// Overwrite a course's fields, keyed by id
    ///
    /// Returns the number of rows affected (0 or 1).
    pub fn update(&self, course: &Course) -> StoreResult<usize> {
        debug!("Updating course with id: {}", course.id);

        self.db.execute(|conn| {
            conn.execute(
                "UPDATE courses SET name = ?1, description = ?2 WHERE id = ?3",
                params![course.name, course.description, course.id],
            )
            .map_err(|e| {
                StoreError::query(format!("Failed to update course with id {}", course.id), e)
            })
        })
    }

    /// Delete a course and its module subtree
    ///
    /// Modules go first (each taking its assessments with it), the course
    /// row goes last, inside one transaction. Enrollments and results are
    /// left untouched. Returns the number of course rows removed (0 or 1).
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        debug!("Deleting course with id: {}", id);

        self.db.transaction(|tx| {
            let modules_removed = modules::delete_by_course_id_tx(tx, id)?;
            debug!("Removed {} modules for course with id: {}", modules_removed, id);

            tx.execute("DELETE FROM courses WHERE id = ?1", [id])
                .map_err(|e| {
                    StoreError::query(format!("Failed to delete course with id {}", id), e)
                })
        })
    }
}

/// Map a row of the courses table to a Course record
fn map_course_row(row: &rusqlite::Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}
