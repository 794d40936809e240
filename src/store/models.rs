/*!
 * Entity models for the registrar store.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data. Every entity comes in two shapes:
 * a `NewX` insert payload without an id, and the persisted `X` record
 * whose id was assigned by the store. Password hashes are stored for
 * admins and students but never carried on the records themselves.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Administrator account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    /// Database ID
    pub id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Login email, unique across admins
    pub email: String,
}

/// Payload for inserting a new administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdmin {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Login email, unique across admins
    pub email: String,
}

impl NewAdmin {
    /// Create a new admin payload
    pub fn new(first_name: String, last_name: String, email: String) -> Self {
        Self {
            first_name,
            last_name,
            email,
        }
    }
}

/// Student record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Database ID
    pub id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Login email, unique across students
    pub email: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Date the student joined the institution
    pub join_date: NaiveDate,
}

/// Payload for inserting a new student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Login email, unique across students
    pub email: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Date the student joined the institution
    pub join_date: NaiveDate,
}

impl NewStudent {
    /// Create a new student payload
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        date_of_birth: NaiveDate,
        join_date: NaiveDate,
    ) -> Self {
        Self {
            first_name,
            last_name,
            email,
            date_of_birth,
            join_date,
        }
    }
}

/// Course record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Database ID
    pub id: i64,
    /// Course name
    pub name: String,
    /// Free-form description
    pub description: String,
}

/// Payload for inserting a new course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    /// Course name
    pub name: String,
    /// Free-form description
    pub description: String,
}

impl NewCourse {
    /// Create a new course payload
    pub fn new(name: String, description: String) -> Self {
        Self { name, description }
    }
}

/// Module record, owned by a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Database ID
    pub id: i64,
    /// Module name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Name of the lecturer teaching the module
    pub lecturer: String,
    /// Owning course
    pub course_id: i64,
}

/// Payload for inserting a new module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewModule {
    /// Module name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Name of the lecturer teaching the module
    pub lecturer: String,
    /// Owning course
    pub course_id: i64,
}

impl NewModule {
    /// Create a new module payload
    pub fn new(name: String, description: String, lecturer: String, course_id: i64) -> Self {
        Self {
            name,
            description,
            lecturer,
            course_id,
        }
    }
}

/// Assessment record, owned by a module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Database ID
    pub id: i64,
    /// Assessment name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Date the assessment is due
    pub due_date: NaiveDate,
    /// Owning module
    pub module_id: i64,
}

/// Payload for inserting a new assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssessment {
    /// Assessment name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Date the assessment is due
    pub due_date: NaiveDate,
    /// Owning module
    pub module_id: i64,
}

impl NewAssessment {
    /// Create a new assessment payload
    pub fn new(name: String, description: String, due_date: NaiveDate, module_id: i64) -> Self {
        Self {
            name,
            description,
            due_date,
            module_id,
        }
    }
}

/// Enrollment of a student in a course
///
/// Represents the many-to-many student/course relation. At most one
/// enrollment should exist per (student, course) pair; the seed generator
/// enforces this, the storage layer does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEnrollment {
    /// Database ID
    pub id: i64,
    /// Enrolled student
    pub student_id: i64,
    /// Course the student is enrolled in
    pub course_id: i64,
    /// Date the enrollment was created
    pub enrollment_date: NaiveDate,
}

/// Payload for inserting a new course enrollment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseEnrollment {
    /// Enrolled student
    pub student_id: i64,
    /// Course the student is enrolled in
    pub course_id: i64,
    /// Date the enrollment was created
    pub enrollment_date: NaiveDate,
}

impl NewCourseEnrollment {
    /// Create a new enrollment payload
    pub fn new(student_id: i64, course_id: i64, enrollment_date: NaiveDate) -> Self {
        Self {
            student_id,
            course_id,
            enrollment_date,
        }
    }
}

/// Grade a student achieved on an assessment
///
/// Grades are expected in 0..=100 but not enforced at storage; at most one
/// result should exist per (student, assessment) pair, enforced by the
/// seed generator rather than the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Database ID
    pub id: i64,
    /// Graded student
    pub student_id: i64,
    /// Assessment the grade belongs to
    pub assessment_id: i64,
    /// Achieved grade
    pub grade: i64,
}

/// Payload for inserting a new assessment result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssessmentResult {
    /// Graded student
    pub student_id: i64,
    /// Assessment the grade belongs to
    pub assessment_id: i64,
    /// Achieved grade
    pub grade: i64,
}

impl NewAssessmentResult {
    /// Create a new result payload
    pub fn new(student_id: i64, assessment_id: i64, grade: i64) -> Self {
        Self {
            student_id,
            assessment_id,
            grade,
        }
    }
}
