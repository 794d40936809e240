/*!
 * Seed data generator.
 *
 * Populates a store with a consistent random sample dataset: students
 * with numbered emails, a fixed course catalogue, modules and
 * assessments topped up to per-parent targets, and enrollments with a
 * result for every assessment the enrolled course offers. Every step is
 * deficit-based, so re-running against an already-seeded store adds
 * nothing and never produces duplicate emails, courses, enrollments,
 * or results.
 */

use chrono::{Local, Utc};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::StoreResult;
use crate::store::models::{
    NewAssessment, NewAssessmentResult, NewCourse, NewCourseEnrollment, NewModule, NewStudent,
};
use crate::store::{sha256_hex, Store};

/// First names drawn from when generating students
pub const FIRST_NAMES: &[&str] = &[
    "John",
    "Jane",
    "Michael",
    "Emily",
    "David",
    "Sarah",
    "Robert",
    "Emma",
    "William",
    "Olivia",
    "James",
    "Ava",
    "Alexander",
    "Sophia",
    "Benjamin",
    "Isabella",
    "Daniel",
    "Mia",
    "Matthew",
    "Charlotte",
    "Ethan",
    "Abigail",
    "Joseph",
    "Harper",
    "Jackson",
    "Amelia",
    "Aiden",
    "Evelyn",
    "Samuel",
    "Elizabeth",
    "Lucas",
    "Sofia",
    "Henry",
    "Avery",
    "Sebastian",
    "Ella",
    "Owen",
    "Scarlett",
    "Gabriel",
    "Grace",
    "Carter",
    "Chloe",
    "Jayden",
    "Riley",
    "Wyatt",
    "Lily",
    "Luke",
    "Aria",
    "Dylan",
    "Zoey",
    "Levi",
    "Hannah",
    "Nathan",
    "Lillian",
    "Isaac",
    "Addison",
    "Julian",
    "Nora",
    "Elijah",
    "Audrey",
    "Liam",
    "Brooklyn",
    "Mason",
    "Savannah",
    "Logan",
    "Claire",
    "Oliver",
    "Skylar",
    "Caleb",
    "Eleanor",
];

/// Last names drawn from for students and for module lecturers
pub const LAST_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Hernandez",
    "Lopez",
    "Gonzalez",
    "Wilson",
    "Anderson",
    "Thomas",
    "Taylor",
    "Moore",
    "Jackson",
    "Martin",
    "Lee",
    "Perez",
    "Thompson",
    "White",
    "Harris",
    "Sanchez",
    "Clark",
    "Ramirez",
    "Lewis",
    "Robinson",
    "Walker",
    "Young",
    "Allen",
    "King",
    "Wright",
    "Scott",
    "Torres",
    "Nguyen",
    "Hill",
    "Flores",
    "Green",
    "Adams",
    "Nelson",
    "Baker",
    "Hall",
    "Rivera",
    "Campbell",
    "Mitchell",
    "Carter",
    "Roberts",
    "Phillips",
    "Evans",
    "Turner",
    "Torres",
    "Parker",
    "Collins",
    "Edwards",
    "Stewart",
    "Flores",
    "Morris",
];

/// The fixed course catalogue; one course is created per entry
pub const COURSE_NAMES: &[&str] = &[
    "Computer Science",
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "History",
    "Geography",
    "Literature",
    "Art",
    "Music",
    "Physical Education",
    "Economics",
    "Psychology",
    "Sociology",
    "Political Science",
    "Philosophy",
    "Business",
    "Marketing",
    "Finance",
    "Information Technology",
    "Engineering",
    "Medicine",
    "Nursing",
    "Law",
    "Education",
    "Communication",
    "Environmental Science",
    "Agriculture",
    "Architecture",
    "Film Studies",
    "Culinary Arts",
    "Journalism",
    "Social Work",
    "Counseling",
    "Health Science",
    "Nutrition",
    "Dentistry",
    "Veterinary Medicine",
    "Pharmacy",
    "Astronomy",
    "Astrophysics",
    "Astrobiology",
    "Astrochemistry",
    "Astrogeology",
    "Astrology",
    "Astrocartography",
    "Astroentomology",
    "Astroethnology",
    "Astroephemery",
];

/// Module names drawn from when topping up a course
pub const MODULE_NAMES: &[&str] = &[
    "Introduction",
    "Fundamentals",
    "Advanced",
    "Practical",
    "Theory",
    "Application",
    "Design",
    "Implementation",
    "Analysis",
    "Evaluation",
    "Management",
    "Strategy",
    "Planning",
    "Control",
    "Measurement",
    "Simulation",
    "Optimization",
    "Evaluation",
    "Innovation",
    "Integration",
    "Communication",
    "Collaboration",
    "Leadership",
    "Teamwork",
    "Problem Solving",
    "Critical Thinking",
    "Creativity",
    "Innovation",
    "Risk Management",
    "Quality Control",
    "Process Improvement",
    "Cost Analysis",
    "Budgeting",
    "Resource Management",
    "Supply Chain",
    "Logistics",
    "Inventory Management",
    "Order Fulfillment",
    "Warehouse Management",
    "Transportation Management",
    "Project Management",
    "Risk Management",
    "Compliance Management",
    "Regulatory Management",
    "Risk Assessment",
    "Risk Mitigation",
    "Risk Transfer",
    "Risk Communication",
    "Risk Awareness",
];

static STUDENT_EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^student(\d+)@sms\.com$").expect("Invalid student email regex"));

fn default_students() -> usize {
    10
}

fn default_modules_per_course() -> usize {
    5
}

fn default_assessments_per_module() -> usize {
    3
}

fn default_enrollments_per_student() -> usize {
    2
}

/// Target row counts the generator tops the store up to
///
/// The course target is implicit: one course per [`COURSE_NAMES`] entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTargets {
    /// Total number of students
    #[serde(default = "default_students")]
    pub students: usize,
    /// Modules per course
    #[serde(default = "default_modules_per_course")]
    pub modules_per_course: usize,
    /// Assessments per module
    #[serde(default = "default_assessments_per_module")]
    pub assessments_per_module: usize,
    /// Enrollments per student, bounded by the number of courses
    #[serde(default = "default_enrollments_per_student")]
    pub enrollments_per_student: usize,
}

impl Default for SeedTargets {
    fn default() -> Self {
        Self {
            students: default_students(),
            modules_per_course: default_modules_per_course(),
            assessments_per_module: default_assessments_per_module(),
            enrollments_per_student: default_enrollments_per_student(),
        }
    }
}

/// Rows added by one generator run, per entity class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Students created
    pub students_added: usize,
    /// Courses created
    pub courses_added: usize,
    /// Modules created
    pub modules_added: usize,
    /// Assessments created
    pub assessments_added: usize,
    /// Enrollments created
    pub enrollments_added: usize,
    /// Results created
    pub results_added: usize,
}

impl SeedSummary {
    /// True when the run added nothing (every target was already met)
    pub fn is_empty(&self) -> bool {
        self.students_added == 0
            && self.courses_added == 0
            && self.modules_added == 0
            && self.assessments_added == 0
            && self.enrollments_added == 0
            && self.results_added == 0
    }
}

impl std::fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Students: {}, Courses: {}, Modules: {}, Assessments: {}, Enrollments: {}, Results: {}",
            self.students_added,
            self.courses_added,
            self.modules_added,
            self.assessments_added,
            self.enrollments_added,
            self.results_added
        )
    }
}

/// Seed data generator over a store
pub struct SeedGenerator {
    /// Store being populated
    store: Store,
    /// Row-count targets
    targets: SeedTargets,
}

impl SeedGenerator {
    /// Create a generator for the given store and targets
    pub fn new(store: Store, targets: SeedTargets) -> Self {
        Self { store, targets }
    }

    /// Populate the store using the thread RNG
    pub fn populate(&self) -> StoreResult<SeedSummary> {
        self.populate_with(&mut rand::rng())
    }

    /// Populate the store using the given RNG
    ///
    /// Steps run in dependency order: students, courses, modules,
    /// assessments, then enrollments together with their results. Each
    /// step only tops existing rows up to its target.
    pub fn populate_with<R: Rng>(&self, rng: &mut R) -> StoreResult<SeedSummary> {
        info!("Populating tables");

        let students_added = self.populate_students(rng)?;
        let courses_added = self.populate_courses()?;
        let modules_added = self.populate_modules(rng)?;
        let assessments_added = self.populate_assessments()?;
        let (enrollments_added, results_added) = self.populate_enrollments_and_results(rng)?;

        info!("Finished populating tables");

        Ok(SeedSummary {
            students_added,
            courses_added,
            modules_added,
            assessments_added,
            enrollments_added,
            results_added,
        })
    }

    /// Top the students table up to the target count
    ///
    /// Emails are numbered from the highest existing suffix upward, so a
    /// deleted student's number is never handed out again.
    fn populate_students<R: Rng>(&self, rng: &mut R) -> StoreResult<usize> {
        debug!("Populating students table");

        let existing = self.store.students.find_all()?;
        let mut next_number = next_student_number(existing.iter().map(|s| s.email.as_str()));
        let needed = self.targets.students.saturating_sub(existing.len());

        let today = Local::now().date_naive();
        let mut added = 0;
        for _ in 0..needed {
            let email = format!("student{}@sms.com", next_number);
            next_number += 1;

            if self.store.students.find_by_email(&email)?.is_some() {
                debug!("Student with email {} already exists, skipping", email);
                continue;
            }

            let first_name = pick(rng, FIRST_NAMES);
            let last_name = pick(rng, LAST_NAMES);
            let password_hash = sha256_hex(&format!("{}{}", first_name, last_name));

            self.store.students.add(
                &NewStudent::new(
                    first_name.to_string(),
                    last_name.to_string(),
                    email,
                    today,
                    today,
                ),
                &password_hash,
            )?;
            added += 1;
        }

        debug!("Populated students table");
        Ok(added)
    }

    /// Create one course per catalogue name that does not exist yet
    fn populate_courses(&self) -> StoreResult<usize> {
        debug!("Populating courses table");

        let mut added = 0;
        for (index, name) in COURSE_NAMES.iter().enumerate() {
            if self.store.courses.find_by_name(name)?.is_some() {
                debug!("Course with name {} already exists, skipping", name);
                continue;
            }

            self.store
                .courses
                .add(&NewCourse::new((*name).to_string(), format!("Description{}", index)))?;
            added += 1;
        }

        debug!("Populated courses table");
        Ok(added)
    }

    /// Top every course up to the per-course module target
    fn populate_modules<R: Rng>(&self, rng: &mut R) -> StoreResult<usize> {
        debug!("Populating modules table");

        let courses = self.store.courses.find_all()?;
        if courses.is_empty() {
            warn!("No courses found, cannot populate modules");
            return Ok(0);
        }

        let mut added = 0;
        for course in &courses {
            let existing = self.store.modules.find_by_course_id(course.id)?.len();
            let needed = self.targets.modules_per_course.saturating_sub(existing);
            if needed == 0 {
                debug!("Course {} already has enough modules, skipping", course.name);
                continue;
            }

            for i in 0..needed {
                let name = pick(rng, MODULE_NAMES);
                let lecturer = pick(rng, LAST_NAMES);
                // Timestamp plus index keeps generated descriptions unique
                let description = format!(
                    "Description-{}-{}-{}",
                    course.id,
                    Utc::now().timestamp_millis(),
                    i
                );

                self.store.modules.add(&NewModule::new(
                    name.to_string(),
                    description,
                    lecturer.to_string(),
                    course.id,
                ))?;
                added += 1;
            }
        }

        debug!("Populated modules table");
        Ok(added)
    }

    /// Top every module up to the per-module assessment target
    fn populate_assessments(&self) -> StoreResult<usize> {
        debug!("Populating assessments table");

        let modules = self.store.modules.find_all()?;
        if modules.is_empty() {
            warn!("No modules found, cannot populate assessments");
            return Ok(0);
        }

        let today = Local::now().date_naive();
        let mut added = 0;
        for module in &modules {
            let existing = self.store.assessments.find_by_module_id(module.id)?.len();
            let needed = self.targets.assessments_per_module.saturating_sub(existing);
            if needed == 0 {
                debug!("Module {} already has enough assessments, skipping", module.name);
                continue;
            }

            for i in 0..needed {
                let name = format!("Assessment-{}-{}", module.id, existing + i + 1);
                let description = format!(
                    "Description-{}-{}-{}",
                    module.id,
                    Utc::now().timestamp_millis(),
                    i
                );

                self.store.assessments.add(&NewAssessment::new(
                    name,
                    description,
                    today,
                    module.id,
                ))?;
                added += 1;
            }
        }

        debug!("Populated assessments table");
        Ok(added)
    }

    /// Top every student up to the enrollment target, grading as we go
    ///
    /// New enrollments draw randomly, without replacement, from the
    /// courses the student is not yet enrolled in. Each new enrollment
    /// records a result for every assessment in the course that the
    /// student has no result for yet.
    fn populate_enrollments_and_results<R: Rng>(&self, rng: &mut R) -> StoreResult<(usize, usize)> {
        debug!("Populating enrollments and results tables");

        let students = self.store.students.find_all()?;
        let courses = self.store.courses.find_all()?;
        if students.is_empty() || courses.is_empty() {
            warn!("No students or courses found, cannot populate enrollments and results");
            return Ok((0, 0));
        }

        let today = Local::now().date_naive();
        let mut enrollments_added = 0;
        let mut results_added = 0;

        for student in &students {
            let existing = self.store.enrollments.find_by_student_id(student.id)?;
            let needed = self
                .targets
                .enrollments_per_student
                .saturating_sub(existing.len())
                .min(courses.len());
            if needed == 0 {
                debug!(
                    "Student {} already has enough enrollments, skipping",
                    student.email
                );
                continue;
            }

            // Courses the student is not yet enrolled in
            let mut available: Vec<i64> = courses
                .iter()
                .filter(|c| !existing.iter().any(|e| e.course_id == c.id))
                .map(|c| c.id)
                .collect();
            available.shuffle(rng);

            for course_id in available.into_iter().take(needed) {
                self.store
                    .enrollments
                    .add(&NewCourseEnrollment::new(student.id, course_id, today))?;
                enrollments_added += 1;

                results_added += self.add_results_for_enrollment(rng, student.id, course_id)?;
            }
        }

        debug!("Populated course enrollments and results tables");
        Ok((enrollments_added, results_added))
    }

    /// Record a random grade for every ungraded assessment in a course
    fn add_results_for_enrollment<R: Rng>(
        &self,
        rng: &mut R,
        student_id: i64,
        course_id: i64,
    ) -> StoreResult<usize> {
        let mut added = 0;
        for module in self.store.modules.find_by_course_id(course_id)? {
            for assessment in self.store.assessments.find_by_module_id(module.id)? {
                if self
                    .store
                    .results
                    .find_by_student_and_assessment(student_id, assessment.id)?
                    .is_some()
                {
                    continue;
                }

                self.store.results.add(&NewAssessmentResult::new(
                    student_id,
                    assessment.id,
                    rng.random_range(0..100),
                ))?;
                added += 1;
            }
        }
        Ok(added)
    }
}

/// Next free numeric suffix for generated student emails
///
/// Scans existing emails for the `student<N>@sms.com` shape and returns
/// the highest matched number plus one, or 0 when none match.
fn next_student_number<'a>(emails: impl Iterator<Item = &'a str>) -> i64 {
    let mut highest: i64 = -1;
    for email in emails {
        if let Some(caps) = STUDENT_EMAIL_REGEX.captures(email) {
            match caps[1].parse::<i64>() {
                Ok(number) => highest = highest.max(number),
                Err(_) => debug!("Skipping email that doesn't match pattern: {}", email),
            }
        }
    }
    highest + 1
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}
