/*!
 * Relational store for academic records.
 *
 * This module provides SQLite-based persistence for:
 * - Admin and student accounts with hashed credentials
 * - Courses, their modules, and module assessments
 * - Student enrollments and assessment results
 *
 * Referential integrity is enforced by hand: each repository's `delete`
 * removes dependent child rows before the parent, inside a transaction,
 * rather than relying on database-level cascade rules.
 */

pub mod connection;
pub mod models;
pub mod schema;

pub mod admins;
pub mod assessments;
pub mod courses;
pub mod enrollments;
pub mod modules;
pub mod results;
pub mod students;

// Re-export main types
pub use admins::AdminRepository;
pub use assessments::AssessmentRepository;
pub use connection::{Database, StoreStats};
pub use courses::CourseRepository;
pub use enrollments::CourseEnrollmentRepository;
pub use modules::ModuleRepository;
pub use results::ResultRepository;
pub use students::StudentRepository;

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::errors::StoreResult;

/// Compute the lowercase hex SHA-256 digest of a string
///
/// Credentials are hashed with this before they reach a repository;
/// the repositories themselves only ever see and store the digest.
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// All seven repositories over one shared database handle
///
/// The one-stop assembly point: open a store and every repository is
/// ready, wired to the same connection.
#[derive(Clone)]
pub struct Store {
    /// Shared database handle
    pub db: Database,
    /// Administrator accounts
    pub admins: AdminRepository,
    /// Student records
    pub students: StudentRepository,
    /// Courses
    pub courses: CourseRepository,
    /// Course modules
    pub modules: ModuleRepository,
    /// Assessments
    pub assessments: AssessmentRepository,
    /// Course enrollments
    pub enrollments: CourseEnrollmentRepository,
    /// Assessment results
    pub results: ResultRepository,
}

impl Store {
    /// Open a store backed by the database file at the given path
    pub fn open<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        Ok(Self::from_database(Database::new(db_path)?))
    }

    /// Open a store at the default platform data location
    pub fn open_default() -> StoreResult<Self> {
        Ok(Self::from_database(Database::new_default()?))
    }

    /// Open a store backed by an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_database(Database::new_in_memory()?))
    }

    /// Assemble all repositories around an existing database handle
    pub fn from_database(db: Database) -> Self {
        Self {
            admins: AdminRepository::new(db.clone()),
            students: StudentRepository::new(db.clone()),
            courses: CourseRepository::new(db.clone()),
            modules: ModuleRepository::new(db.clone()),
            assessments: AssessmentRepository::new(db.clone()),
            enrollments: CourseEnrollmentRepository::new(db.clone()),
            results: ResultRepository::new(db.clone()),
            db,
        }
    }

    /// Whether the store holds any student records yet
    pub fn is_populated(&self) -> StoreResult<bool> {
        self.db.is_populated()
    }

    /// Row counts per table plus the backing file size
    pub fn stats(&self) -> StoreResult<StoreStats> {
        self.db.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NewCourse;

    #[test]
    fn test_sha256Hex_shouldProduceConsistentLowercaseHex() {
        let hash1 = sha256_hex("Hello, World!");
        let hash2 = sha256_hex("Hello, World!");
        let hash3 = sha256_hex("different text");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64); // SHA256 produces 64 hex chars
        assert_eq!(hash1, hash1.to_lowercase());
    }

    #[test]
    fn test_sha256Hex_withDefaultPassword_shouldMatchSeededHash() {
        assert_eq!(sha256_hex("admin"), schema::DEFAULT_ADMIN_PASSWORD_HASH);
    }

    #[test]
    fn test_openInMemory_shouldWireAllRepositoriesToOneDatabase() {
        let store = Store::open_in_memory().expect("Failed to open store");

        let course = store
            .courses
            .add(&NewCourse::new(
                "Philosophy".to_string(),
                "Description0".to_string(),
            ))
            .expect("Failed to add course");

        // Visible through the shared handle and through another repository
        let stats = store.stats().unwrap();
        assert_eq!(stats.course_count, 1);

        let found = store.courses.find_by_id(course.id).unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_isPopulated_shouldTrackStudentRowsOnly() {
        let store = Store::open_in_memory().expect("Failed to open store");

        // A course alone does not make the store populated
        store
            .courses
            .add(&NewCourse::new("Law".to_string(), "Description1".to_string()))
            .unwrap();
        assert!(!store.is_populated().unwrap());
    }
}
