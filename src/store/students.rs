/*!
 * Repository for student records.
 *
 * Students parent both course enrollments and assessment results, so
 * `delete` removes those first (results, then enrollments, then the
 * student row) inside a single transaction. The returned count covers
 * the student row only, never the cascaded children.
 */

use log::{debug, info};
use rusqlite::{params, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

use super::connection::Database;
use super::models::{NewStudent, Student};
use super::{enrollments, results};

/// Repository for student records
#[derive(Clone)]
pub struct StudentRepository {
    /// Database handle
    db: Database,
}

impl StudentRepository {
    /// Create a new repository with the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new student and return the persisted record with its id
    ///
    /// `password_hash` must already be hashed; it is stored verbatim. A
    /// duplicate email surfaces as an error naming the conflicting address.
    pub fn add(&self, student: &NewStudent, password_hash: &str) -> StoreResult<Student> {
        debug!("Adding student with email: {}", student.email);

        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO students (first_name, last_name, email, password, date_of_birth, join_date)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    student.first_name,
                    student.last_name,
                    student.email,
                    password_hash,
                    student.date_of_birth,
                    student.join_date,
                ],
            )
            .map_err(|e| {
                if let rusqlite::Error::SqliteFailure(code, _) = &e {
                    if code.code == rusqlite::ErrorCode::ConstraintViolation {
                        return StoreError::query(
                            format!(
                                "The email '{}' is associated with an existing student",
                                student.email
                            ),
                            e,
                        );
                    }
                }
                StoreError::query("Failed to add student", e)
            })?;

            Ok(Student {
                id: conn.last_insert_rowid(),
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                email: student.email.clone(),
                date_of_birth: student.date_of_birth,
                join_date: student.join_date,
            })
        })
    }

    /// Find a student by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<Student>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, first_name, last_name, email, date_of_birth, join_date FROM students WHERE id = ?1",
                [id],
                map_student_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find student with id {}", id), e))
        })
    }

    /// Find a student by email address
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<Student>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, first_name, last_name, email, date_of_birth, join_date FROM students WHERE email = ?1",
                [email],
                map_student_row,
            )
            .optional()
            .map_err(|e| {
                StoreError::query(format!("Failed to find student with email {}", email), e)
            })
        })
    }

    /// Get all students, in storage order
    pub fn find_all(&self) -> StoreResult<Vec<Student>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, first_name, last_name, email, date_of_birth, join_date FROM students")
                .map_err(|e| StoreError::query("Failed to find all students", e))?;

            let students = stmt
                .query_map([], map_student_row)
                .map_err(|e| StoreError::query("Failed to find all students", e))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(students)
        })
    }

    /// Overwrite a student's fields, keyed by id; re-stores the given hash
    ///
    /// Returns the number of rows affected (0 or 1).
    pub fn update(&self, student: &Student, password_hash: &str) -> StoreResult<usize> {
        debug!("Updating student with id: {}", student.id);

        self.db.execute(|conn| {
            conn.execute(
                r#"
                UPDATE students
                SET first_name = ?1, last_name = ?2, email = ?3, password = ?4,
                    date_of_birth = ?5, join_date = ?6
                WHERE id = ?7
                "#,
                params![
                    student.first_name,
                    student.last_name,
                    student.email,
                    password_hash,
                    student.date_of_birth,
                    student.join_date,
                    student.id,
                ],
            )
            .map_err(|e| {
                StoreError::query(format!("Failed to update student with id {}", student.id), e)
            })
        })
    }

    /// Delete a student and every row that references them
    ///
    /// Order inside one transaction: results, then enrollments, then the
    /// student row. Returns the number of student rows removed (0 or 1).
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        debug!("Deleting student with id: {}", id);

        self.db.transaction(|tx| {
            let results_removed = results::delete_by_student_id_tx(tx, id)?;
            let enrollments_removed = enrollments::delete_by_student_id_tx(tx, id)?;
            debug!(
                "Removed {} results and {} enrollments for student with id: {}",
                results_removed, enrollments_removed, id
            );

            tx.execute("DELETE FROM students WHERE id = ?1", [id])
                .map_err(|e| {
                    StoreError::query(format!("Failed to delete student with id {}", id), e)
                })
        })
    }

    /// Delete a student by email address, cascading like [`delete`](Self::delete)
    pub fn delete_by_email(&self, email: &str) -> StoreResult<usize> {
        debug!("Deleting student with email: {}", email);

        match self.find_by_email(email)? {
            Some(student) => self.delete(student.id),
            None => {
                info!("No student found with email: {}", email);
                Ok(0)
            }
        }
    }

    /// Check a pre-hashed password candidate against the stored hash
    ///
    /// Returns false both for a wrong password and for an unknown email;
    /// the two cases are deliberately indistinguishable here.
    pub fn verify_password(&self, email: &str, hashed_candidate: &str) -> StoreResult<bool> {
        debug!("Verifying password for student with email: {}", email);

        self.db.execute(|conn| {
            let stored: Option<String> = conn
                .query_row(
                    "SELECT password FROM students WHERE email = ?1",
                    [email],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to verify password for student with email {}", email),
                        e,
                    )
                })?;

            Ok(stored.is_some_and(|hash| hash == hashed_candidate))
        })
    }
}

/// Map a row of the students table to a Student record
fn map_student_row(row: &rusqlite::Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        date_of_birth: row.get(4)?,
        join_date: row.get(5)?,
    })
}
