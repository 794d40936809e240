/*!
 * Repository for administrator accounts.
 *
 * Admins have no child rows, so deletes here never cascade. Passwords
 * arrive pre-hashed, are written once at creation, and never travel on
 * the returned records; `update` touches profile fields only.
 */

use log::debug;
use rusqlite::{params, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

use super::connection::Database;
use super::models::{Admin, NewAdmin};

/// Repository for administrator accounts
#[derive(Clone)]
pub struct AdminRepository {
    /// Database handle
    db: Database,
}

impl AdminRepository {
    /// Create a new repository with the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new admin and return the persisted record with its id
    ///
    /// `password_hash` must already be hashed; it is stored verbatim.
    pub fn add(&self, admin: &NewAdmin, password_hash: &str) -> StoreResult<Admin> {
        debug!("Adding admin with email: {}", admin.email);

        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO admins (first_name, last_name, email, password) VALUES (?1, ?2, ?3, ?4)",
                params![admin.first_name, admin.last_name, admin.email, password_hash],
            )
            .map_err(|e| StoreError::query("Failed to add admin", e))?;

            Ok(Admin {
                id: conn.last_insert_rowid(),
                first_name: admin.first_name.clone(),
                last_name: admin.last_name.clone(),
                email: admin.email.clone(),
            })
        })
    }

    /// Find an admin by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<Admin>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, first_name, last_name, email FROM admins WHERE id = ?1",
                [id],
                map_admin_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find admin with id {}", id), e))
        })
    }

    /// Find an admin by email address
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, first_name, last_name, email FROM admins WHERE email = ?1",
                [email],
                map_admin_row,
            )
            .optional()
            .map_err(|e| StoreError::query(format!("Failed to find admin with email {}", email), e))
        })
    }

    /// Get all admins, in storage order
    pub fn find_all(&self) -> StoreResult<Vec<Admin>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, first_name, last_name, email FROM admins")
                .map_err(|e| StoreError::query("Failed to find all admins", e))?;

            let admins = stmt
                .query_map([], map_admin_row)
                .map_err(|e| StoreError::query("Failed to find all admins", e))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(admins)
        })
    }

    /// Update an admin's profile fields, keyed by id
    ///
    /// The stored password hash is untouched. Returns the number of rows
    /// affected (0 or 1).
    pub fn update(&self, admin: &Admin) -> StoreResult<usize> {
        debug!("Updating admin with id: {}", admin.id);

        self.db.execute(|conn| {
            conn.execute(
                "UPDATE admins SET first_name = ?1, last_name = ?2, email = ?3 WHERE id = ?4",
                params![admin.first_name, admin.last_name, admin.email, admin.id],
            )
            .map_err(|e| {
                StoreError::query(format!("Failed to update admin with id {}", admin.id), e)
            })
        })
    }

    /// Delete an admin by id; returns the number of rows affected (0 or 1)
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        debug!("Deleting admin with id: {}", id);

        self.db.execute(|conn| {
            conn.execute("DELETE FROM admins WHERE id = ?1", [id])
                .map_err(|e| {
                    StoreError::query(format!("Failed to delete admin with id {}", id), e)
                })
        })
    }

    /// Check a pre-hashed password candidate against the stored hash
    ///
    /// Returns false both for a wrong password and for an unknown email;
    /// the two cases are deliberately indistinguishable here.
    pub fn verify_password(&self, email: &str, hashed_candidate: &str) -> StoreResult<bool> {
        debug!("Verifying password for admin with email: {}", email);

        self.db.execute(|conn| {
            let stored: Option<String> = conn
                .query_row(
                    "SELECT password FROM admins WHERE email = ?1",
                    [email],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| {
                    StoreError::query(
                        format!("Failed to verify password for admin with email {}", email),
                        e,
                    )
                })?;

            Ok(stored.is_some_and(|hash| hash == hashed_candidate))
        })
    }
}

/// Map a row of the admins table to an Admin record
fn map_admin_row(row: &rusqlite::Row) -> rusqlite::Result<Admin> {
    Ok(Admin {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
    })
}
