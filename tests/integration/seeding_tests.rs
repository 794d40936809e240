/*!
 * Integration tests for the sample data generator
 */

use std::collections::HashSet;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common;
use registrar::seed::{SeedGenerator, SeedTargets, COURSE_NAMES};
use registrar::store::{sha256_hex, Store};

/// Test a full default-target run on an empty store
#[test]
fn test_populate_withDefaultTargets_shouldBuildFullDataset() -> Result<()> {
    let store = Store::open_in_memory()?;
    let generator = SeedGenerator::new(store.clone(), SeedTargets::default());

    let summary = generator.populate_with(&mut StdRng::seed_from_u64(7))?;

    assert_eq!(summary.students_added, 10);
    assert_eq!(summary.courses_added, 50);
    assert_eq!(summary.modules_added, 250);
    assert_eq!(summary.assessments_added, 750);
    assert_eq!(summary.enrollments_added, 20);
    // Two courses per student, 5 modules x 3 assessments each
    assert_eq!(summary.results_added, 20 * 15);

    let stats = store.stats()?;
    assert_eq!(stats.student_count, 10);
    assert_eq!(stats.course_count, 50);
    assert_eq!(stats.module_count, 250);
    assert_eq!(stats.assessment_count, 750);
    assert_eq!(stats.enrollment_count, 20);
    assert_eq!(stats.result_count, 300);

    // One course per pool name
    for name in COURSE_NAMES {
        assert!(store.courses.find_by_name(name)?.is_some());
    }

    // Every student carries exactly the target number of enrollments
    for student in store.students.find_all()? {
        assert_eq!(store.enrollments.find_by_student_id(student.id)?.len(), 2);
    }

    // Grades stay inside the generator's range
    for result in store.results.find_all()? {
        assert!((0..100).contains(&result.grade));
    }

    Ok(())
}

/// Test seeded emails are distinct and numbered from zero
#[test]
fn test_populate_shouldNumberStudentEmailsFromZero() -> Result<()> {
    let store = Store::open_in_memory()?;
    let generator = SeedGenerator::new(store.clone(), SeedTargets::default());

    generator.populate_with(&mut StdRng::seed_from_u64(11))?;

    let emails: HashSet<String> = store
        .students
        .find_all()?
        .into_iter()
        .map(|s| s.email)
        .collect();

    assert_eq!(emails.len(), 10);
    for n in 0..10 {
        assert!(emails.contains(&format!("student{}@sms.com", n)));
    }

    Ok(())
}

/// Test a second run in steady state adds nothing
#[test]
fn test_populate_secondRun_shouldAddZeroRows() -> Result<()> {
    let store = Store::open_in_memory()?;
    let generator = SeedGenerator::new(store.clone(), SeedTargets::default());

    generator.populate_with(&mut StdRng::seed_from_u64(13))?;
    let before = store.stats()?;

    let second = generator.populate_with(&mut StdRng::seed_from_u64(14))?;

    assert!(second.is_empty());
    let after = store.stats()?;
    assert_eq!(after.student_count, before.student_count);
    assert_eq!(after.module_count, before.module_count);
    assert_eq!(after.result_count, before.result_count);

    Ok(())
}

/// Test re-seeding after a student deletion tops up without email reuse
#[test]
fn test_populate_afterStudentDelete_shouldNotReuseFreedEmail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = common::open_temp_store(&temp_dir)?;
    let generator = SeedGenerator::new(store.clone(), SeedTargets::default());

    generator.populate_with(&mut StdRng::seed_from_u64(17))?;

    let removed = store.students.delete_by_email("student3@sms.com")?;
    assert_eq!(removed, 1);

    let second = generator.populate_with(&mut StdRng::seed_from_u64(18))?;

    assert_eq!(second.students_added, 1);
    assert_eq!(store.students.find_all()?.len(), 10);
    assert!(store.students.find_by_email("student3@sms.com")?.is_none());
    assert!(store.students.find_by_email("student10@sms.com")?.is_some());

    Ok(())
}

/// Test re-seeding after a course deletion rebuilds only the course tree
#[test]
fn test_populate_afterCourseDelete_shouldRebuildCourseTreeOnly() -> Result<()> {
    let store = Store::open_in_memory()?;
    let generator = SeedGenerator::new(store.clone(), SeedTargets::default());

    generator.populate_with(&mut StdRng::seed_from_u64(19))?;

    let course = store
        .courses
        .find_by_name("Physics")?
        .expect("Seeded course missing");
    store.courses.delete(course.id)?;

    let second = generator.populate_with(&mut StdRng::seed_from_u64(20))?;

    // The course comes back with a full complement of modules and
    // assessments; students are already at their enrollment target, so
    // no enrollments or results are added for it
    assert_eq!(second.courses_added, 1);
    assert_eq!(second.modules_added, 5);
    assert_eq!(second.assessments_added, 15);
    assert_eq!(second.students_added, 0);
    assert_eq!(second.enrollments_added, 0);
    assert_eq!(second.results_added, 0);

    let rebuilt = store
        .courses
        .find_by_name("Physics")?
        .expect("Course not rebuilt");
    assert_eq!(store.modules.find_by_course_id(rebuilt.id)?.len(), 5);

    Ok(())
}

/// Test generated passwords hash the student's first and last name
#[test]
fn test_populate_shouldHashPasswordsFromNames() -> Result<()> {
    let store = Store::open_in_memory()?;
    let generator = SeedGenerator::new(
        store.clone(),
        SeedTargets {
            students: 2,
            modules_per_course: 1,
            assessments_per_module: 1,
            enrollments_per_student: 1,
        },
    );

    generator.populate_with(&mut StdRng::seed_from_u64(23))?;

    for student in store.students.find_all()? {
        let candidate = sha256_hex(&format!("{}{}", student.first_name, student.last_name));
        assert!(store.students.verify_password(&student.email, &candidate)?);
    }

    Ok(())
}
