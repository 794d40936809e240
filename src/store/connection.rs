/*!
 * Database connection management.
 *
 * This module handles SQLite database connection creation and
 * initialization. The handle is an explicitly constructed value passed
 * into each repository at construction; there is no process-wide
 * singleton. A connection that fails to open is fatal to every
 * data-dependent operation in the same process lifetime - no retry.
 */

use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::{StoreError, StoreResult};

use super::schema;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "registrar.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "registrar";

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct Database {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create a new database connection at the default location
    pub fn new_default() -> StoreResult<Self> {
        let db_path = Self::default_database_path()?;
        Self::new(&db_path)
    }

    /// Create a new database connection at the specified path
    ///
    /// Creates the parent data directory if absent and initializes the
    /// schema, including the default administrator account.
    pub fn new<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::CreateDataDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path).map_err(|e| StoreError::OpenDatabase {
            path: db_path.clone(),
            source: e,
        })?;

        // Initialize schema
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> StoreResult<Self> {
        debug!("Creating in-memory database");

        let conn = Connection::open_in_memory().map_err(|e| StoreError::OpenDatabase {
            path: PathBuf::from(":memory:"),
            source: e,
        })?;

        // Initialize schema
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> StoreResult<PathBuf> {
        // Try to use the system data directory
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or(StoreError::NoDataDir)?;

        let db_dir = base_dir.join(DEFAULT_DB_DIRNAME);
        let db_path = db_dir.join(DEFAULT_DB_FILENAME);

        Ok(db_path)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a database operation with the connection
    ///
    /// This method acquires the mutex lock and executes the provided
    /// closure with access to the connection. Callers block until the
    /// operation returns.
    pub fn execute<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        f(&conn)
    }

    /// Execute a mutable database operation with the connection
    pub fn execute_mut<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T>,
    {
        let mut conn = self
            .connection
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        f(&mut conn)
    }

    /// Begin a transaction and execute operations within it
    ///
    /// Commits when the closure succeeds and rolls back when it returns
    /// an error, so multi-step cascades are all-or-nothing.
    pub fn transaction<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> StoreResult<T>,
    {
        let mut conn = self
            .connection
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::query("Failed to begin transaction", e))?;
        let result = f(&tx)?;
        tx.commit()
            .map_err(|e| StoreError::query("Failed to commit transaction", e))?;

        Ok(result)
    }

    /// Whether the store holds any student records yet
    ///
    /// Used to decide if a store still needs seeding.
    pub fn is_populated(&self) -> StoreResult<bool> {
        self.execute(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
                .map_err(|e| StoreError::query("Failed to check if database is populated", e))?;

            Ok(count > 0)
        })
    }

    /// Get database statistics
    pub fn stats(&self) -> StoreResult<StoreStats> {
        self.execute(|conn| {
            let count = |table: &str| -> i64 {
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .unwrap_or(0)
            };

            let admin_count = count("admins");
            let student_count = count("students");
            let course_count = count("courses");
            let module_count = count("modules");
            let assessment_count = count("assessments");
            let enrollment_count = count("course_enrollments");
            let result_count = count("results");

            // Get file size if not in-memory
            let file_size = if self.db_path.to_string_lossy() != ":memory:" {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            } else {
                0
            };

            Ok(StoreStats {
                admin_count,
                student_count,
                course_count,
                module_count,
                assessment_count,
                enrollment_count,
                result_count,
                file_size_bytes: file_size,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Number of administrator accounts
    pub admin_count: i64,
    /// Number of students
    pub student_count: i64,
    /// Number of courses
    pub course_count: i64,
    /// Number of modules
    pub module_count: i64,
    /// Number of assessments
    pub assessment_count: i64,
    /// Number of course enrollments
    pub enrollment_count: i64,
    /// Number of assessment results
    pub result_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Admins: {}, Students: {}, Courses: {}, Modules: {}, Assessments: {}, Enrollments: {}, Results: {}, Size: {} KB",
            self.admin_count,
            self.student_count,
            self.course_count,
            self.module_count,
            self.assessment_count,
            self.enrollment_count,
            self.result_count,
            self.file_size_bytes / 1024
        )
    }
}
