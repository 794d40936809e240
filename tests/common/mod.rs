/*!
 * Common test utilities for the registrar test suite
 */

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;

use registrar::store::models::{NewAssessment, NewCourse, NewModule, NewStudent};
use registrar::store::Store;

/// Creates a temporary directory for test databases
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Opens a store backed by a database file inside the given directory
pub fn open_temp_store(dir: &TempDir) -> Result<Store> {
    let db_path = dir.path().join("registrar-test.db");
    Ok(Store::open(db_path)?)
}

/// A fixed date for deterministic fixtures
pub fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).expect("Valid fixture date")
}

/// Minimal student fixture with the given email
pub fn sample_student(email: &str) -> NewStudent {
    NewStudent::new(
        "Ada".to_string(),
        "Lovelace".to_string(),
        email.to_string(),
        sample_date(),
        sample_date(),
    )
}

/// Minimal course fixture with the given name
pub fn sample_course(name: &str) -> NewCourse {
    NewCourse::new(name.to_string(), format!("{} description", name))
}

/// Minimal module fixture attached to the given course
pub fn sample_module(name: &str, course_id: i64) -> NewModule {
    NewModule::new(
        name.to_string(),
        format!("{} description", name),
        "Hamilton".to_string(),
        course_id,
    )
}

/// Minimal assessment fixture attached to the given module
pub fn sample_assessment(name: &str, module_id: i64) -> NewAssessment {
    NewAssessment::new(
        name.to_string(),
        format!("{} description", name),
        sample_date(),
        module_id,
    )
}
