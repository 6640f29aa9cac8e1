//! Seed rows and seeding configuration.

use chrono::{DateTime, Utc};
use gradebook_models::{CourseId, GradeType, UserId, UserRole};

/// Password of every seeded account.
pub const SEED_PASSWORD: &str = "password";

/// Domain of every seeded email; `clear-seed` deletes by it.
pub const SEED_EMAIL_DOMAIN: &str = "school.test";

pub const COURSE_TITLES: [&str; 20] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "English",
    "French",
    "Spanish",
    "Computer Science",
    "Art",
    "Physical Education",
    "Music",
    "Literature",
    "Economics",
    "Psychology",
    "Philosophy",
    "Statistics",
    "Algebra",
    "Geometry",
];

pub struct UserSeed {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub password_hash: String,
}

pub struct CourseSeed {
    pub title: String,
    pub description: String,
    pub teacher_id: UserId,
}

pub struct EnrollmentSeed {
    pub student_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
}

pub struct GradeSeed {
    pub student_id: UserId,
    pub course_id: CourseId,
    pub value: f64,
    pub grade_type: GradeType,
    pub coefficient: i32,
    pub created_at: DateTime<Utc>,
}

/// How much data `seed` creates.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    /// Inclusive range of courses each student enrolls in
    pub courses_per_student: (usize, usize),
    /// Inclusive range of grades per enrollment
    pub grades_per_enrollment: (usize, usize),
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 8,
            students: 50,
            courses_per_student: (3, 6),
            grades_per_enrollment: (4, 8),
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize, students: usize) -> Self {
        Self {
            teachers,
            students,
            ..Default::default()
        }
    }
}
