/*!
 * Error types for the registrar store.
 *
 * This module contains the error taxonomy for the data-access layer,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the store
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the store and its repositories
///
/// Absent rows are never an error: lookups return `Ok(None)` or an empty
/// list instead.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The data directory for the database file could not be created
    #[error("Failed to create data directory {path:?}: {source}")]
    CreateDataDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// The embedded database could not be opened
    #[error("Failed to open database {path:?}: {source}")]
    OpenDatabase {
        /// Path to the database file
        path: PathBuf,
        /// Underlying driver error
        source: rusqlite::Error,
    },

    /// No platform data directory could be determined for the default path
    #[error("Could not determine a data directory for the database")]
    NoDataDir,

    /// The schema version recorded in the database is not one this build
    /// knows how to migrate
    #[error("Unknown schema version: {0}. Cannot migrate.")]
    UnknownSchemaVersion(i32),

    /// A query failed; the context names the attempted operation and key
    #[error("{context}: {source}")]
    Query {
        /// Human-readable description of the attempted operation
        context: String,
        /// Underlying driver error
        source: rusqlite::Error,
    },

    /// The shared connection mutex was poisoned by a panicking holder
    #[error("Failed to acquire database lock: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    /// Wrap a driver error with a message naming the attempted operation
    pub fn query(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Query {
            context: context.into(),
            source,
        }
    }

    /// Whether this error means the store never became usable
    ///
    /// Open/initialization failures are fatal to every data-dependent
    /// operation in the same process lifetime; there is no retry.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::CreateDataDir { .. }
                | Self::OpenDatabase { .. }
                | Self::NoDataDir
                | Self::UnknownSchemaVersion(_)
        )
    }
}
