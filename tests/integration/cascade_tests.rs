/*!
 * Integration tests for cascading deletes across repositories
 */

use anyhow::Result;

use crate::common;
use registrar::store::models::{NewAssessmentResult, NewCourseEnrollment};
use registrar::store::{sha256_hex, Store};

/// Build a store holding one course with the given module/assessment shape
fn store_with_course(modules: usize, assessments_per_module: usize) -> Result<(Store, i64)> {
    let store = Store::open_in_memory()?;

    let course = store.courses.add(&common::sample_course("Computer Science"))?;
    for m in 0..modules {
        let module = store
            .modules
            .add(&common::sample_module(&format!("Module {}", m), course.id))?;
        for a in 0..assessments_per_module {
            store.assessments.add(&common::sample_assessment(
                &format!("Assessment {}-{}", m, a),
                module.id,
            ))?;
        }
    }

    Ok((store, course.id))
}

/// Test course deletion removes every module and assessment beneath it
#[test]
fn test_courseDelete_withModulesAndAssessments_shouldRemoveAllDescendants() -> Result<()> {
    let (store, course_id) = store_with_course(3, 2)?;
    assert_eq!(store.modules.find_all()?.len(), 3);
    assert_eq!(store.assessments.find_all()?.len(), 6);

    let affected = store.courses.delete(course_id)?;

    // Only the course row is counted, the children go with it
    assert_eq!(affected, 1);
    assert!(store.courses.find_by_id(course_id)?.is_none());
    assert!(store.modules.find_all()?.is_empty());
    assert!(store.assessments.find_all()?.is_empty());

    Ok(())
}

/// Test course deletion leaves enrollments and results in place
#[test]
fn test_courseDelete_shouldLeaveEnrollmentsAndResults() -> Result<()> {
    let (store, course_id) = store_with_course(1, 1)?;

    let student = store
        .students
        .add(&common::sample_student("dangling@sms.com"), &sha256_hex("pw"))?;
    store
        .enrollments
        .add(&NewCourseEnrollment::new(student.id, course_id, common::sample_date()))?;
    let assessment_id = store.assessments.find_all()?[0].id;
    store
        .results
        .add(&NewAssessmentResult::new(student.id, assessment_id, 72))?;

    store.courses.delete(course_id)?;

    // Enrollment and result rows survive with no parent course
    let enrollments = store.enrollments.find_by_student_id(student.id)?;
    assert_eq!(enrollments.len(), 1);
    assert_eq!(enrollments[0].course_id, course_id);
    assert_eq!(store.results.find_by_student_id(student.id)?.len(), 1);

    Ok(())
}

/// Test module deletion removes its assessments and spares its siblings
#[test]
fn test_moduleDelete_shouldRemoveOwnAssessmentsOnly() -> Result<()> {
    let (store, _) = store_with_course(2, 3)?;
    let modules = store.modules.find_all()?;
    let (doomed, kept) = (&modules[0], &modules[1]);

    let affected = store.modules.delete(doomed.id)?;

    assert_eq!(affected, 1);
    assert!(store.assessments.find_by_module_id(doomed.id)?.is_empty());
    assert_eq!(store.assessments.find_by_module_id(kept.id)?.len(), 3);

    Ok(())
}

/// Test student deletion removes their enrollments and results
#[test]
fn test_studentDelete_shouldRemoveEnrollmentsAndResults() -> Result<()> {
    let (store, course_id) = store_with_course(1, 2)?;

    let doomed = store
        .students
        .add(&common::sample_student("doomed@sms.com"), &sha256_hex("pw"))?;
    let bystander = store
        .students
        .add(&common::sample_student("bystander@sms.com"), &sha256_hex("pw"))?;

    for student_id in [doomed.id, bystander.id] {
        store
            .enrollments
            .add(&NewCourseEnrollment::new(student_id, course_id, common::sample_date()))?;
        for assessment in store.assessments.find_all()? {
            store
                .results
                .add(&NewAssessmentResult::new(student_id, assessment.id, 55))?;
        }
    }

    let affected = store.students.delete(doomed.id)?;

    assert_eq!(affected, 1);
    assert!(store.students.find_by_id(doomed.id)?.is_none());
    assert!(store.enrollments.find_by_student_id(doomed.id)?.is_empty());
    assert!(store.results.find_by_student_id(doomed.id)?.is_empty());

    // The other student keeps everything
    assert_eq!(store.enrollments.find_by_student_id(bystander.id)?.len(), 1);
    assert_eq!(store.results.find_by_student_id(bystander.id)?.len(), 2);

    Ok(())
}

/// Test assessment deletion leaves its results dangling
#[test]
fn test_assessmentDelete_shouldLeaveResultsDangling() -> Result<()> {
    let (store, _) = store_with_course(1, 1)?;

    let student = store
        .students
        .add(&common::sample_student("grades@sms.com"), &sha256_hex("pw"))?;
    let assessment_id = store.assessments.find_all()?[0].id;
    store
        .results
        .add(&NewAssessmentResult::new(student.id, assessment_id, 90))?;

    store.assessments.delete(assessment_id)?;

    assert!(store.assessments.find_by_id(assessment_id)?.is_none());
    let results = store.results.find_by_student_id(student.id)?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].assessment_id, assessment_id);

    Ok(())
}

/// Test deleting a course does not touch an unrelated course's tree
#[test]
fn test_courseDelete_shouldSpareOtherCourses() -> Result<()> {
    let (store, first_id) = store_with_course(2, 2)?;

    let second = store.courses.add(&common::sample_course("Mathematics"))?;
    let second_module = store
        .modules
        .add(&common::sample_module("Algebra", second.id))?;
    store
        .assessments
        .add(&common::sample_assessment("Midterm", second_module.id))?;

    store.courses.delete(first_id)?;

    assert!(store.courses.find_by_id(second.id)?.is_some());
    assert_eq!(store.modules.find_by_course_id(second.id)?.len(), 1);
    assert_eq!(store.assessments.find_by_module_id(second_module.id)?.len(), 1);

    Ok(())
}
