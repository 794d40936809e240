/*!
 * Tests for the store facade and connection handling
 */

use anyhow::Result;

use crate::common;
use registrar::store::schema::DEFAULT_ADMIN_EMAIL;
use registrar::store::{sha256_hex, Store};

/// Test opening a store on a missing path creates the database file
#[test]
fn test_open_withMissingFile_shouldCreateDatabase() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("data").join("registrar-test.db");

    let store = Store::open(&db_path)?;

    assert!(db_path.exists());
    assert_eq!(store.db.path(), db_path.as_path());

    Ok(())
}

/// Test the default admin is seeded and can verify its password
#[test]
fn test_open_shouldSeedDefaultAdmin() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = common::open_temp_store(&temp_dir)?;

    let admin = store
        .admins
        .find_by_email(DEFAULT_ADMIN_EMAIL)?
        .expect("Default admin missing");
    assert_eq!(admin.first_name, "Tom");
    assert_eq!(admin.last_name, "Cruise");

    assert!(store.admins.verify_password(DEFAULT_ADMIN_EMAIL, &sha256_hex("admin"))?);
    assert!(!store.admins.verify_password(DEFAULT_ADMIN_EMAIL, &sha256_hex("wrong"))?);

    Ok(())
}

/// Test rows persist across closing and reopening the same file
#[test]
fn test_reopen_withExistingRows_shouldKeepThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("registrar-test.db");

    {
        let store = Store::open(&db_path)?;
        store
            .students
            .add(&common::sample_student("kept@sms.com"), &sha256_hex("pw"))?;
        assert!(store.is_populated()?);
    }

    let reopened = Store::open(&db_path)?;
    assert!(reopened.students.find_by_email("kept@sms.com")?.is_some());
    assert!(reopened.is_populated()?);

    Ok(())
}

/// Test reopening does not duplicate the default admin
#[test]
fn test_reopen_shouldNotDuplicateDefaultAdmin() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("registrar-test.db");

    Store::open(&db_path)?;
    let store = Store::open(&db_path)?;

    assert_eq!(store.admins.find_all()?.len(), 1);

    Ok(())
}

/// Test stats report per-table counts and a nonzero file size
#[test]
fn test_stats_withRows_shouldCountPerTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = common::open_temp_store(&temp_dir)?;

    store
        .students
        .add(&common::sample_student("s1@sms.com"), &sha256_hex("pw"))?;
    let course = store.courses.add(&common::sample_course("Physics"))?;
    store.modules.add(&common::sample_module("Mechanics", course.id))?;

    let stats = store.stats()?;
    assert_eq!(stats.admin_count, 1);
    assert_eq!(stats.student_count, 1);
    assert_eq!(stats.course_count, 1);
    assert_eq!(stats.module_count, 1);
    assert_eq!(stats.assessment_count, 0);
    assert_eq!(stats.enrollment_count, 0);
    assert_eq!(stats.result_count, 0);
    assert!(stats.file_size_bytes > 0);

    let rendered = stats.to_string();
    assert!(rendered.contains("Students: 1"));
    assert!(rendered.contains("Courses: 1"));

    Ok(())
}

/// Test a fresh store reports itself as unpopulated
#[test]
fn test_isPopulated_withOnlyDefaultAdmin_shouldReturnFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = common::open_temp_store(&temp_dir)?;

    // The seeded admin row does not count as population
    assert!(!store.is_populated()?);

    Ok(())
}
