//! # Gradebook Models
//!
//! Database entities, request/response DTOs and statistics shapes shared
//! by the API server and the CLI.
//!
//! - [`ids`]: typed identifiers
//! - [`users`]: users, roles, registration and login
//! - [`courses`]: courses and their listings
//! - [`enrollments`]: student/course links
//! - [`grades`]: grades, grade types and grading DTOs
//! - [`statistics`]: averages, rankings and distributions

pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod ids;
pub mod statistics;
pub mod users;

pub use courses::{Course, CourseSummary, CreateCourseDto, UpdateCourseDto};
pub use enrollments::{EnrolledStudent, Enrollment, StudentEnrollment};
pub use grades::{
    CreateGradeDto, DeletedGradesResponse, GRADE_MAX, GRADE_MIN, Grade, GradeDetail, GradeType,
    GradeTypeFilter, MIN_COEFFICIENT, UpdateGradeDto,
};
pub use ids::{CourseId, EnrollmentId, GradeId, UserId};
pub use statistics::{
    AveragesByType, ClassStatistics, CourseStatistics, DistributionBucket, RankingEntry,
    RankingPosition, StudentAggregate, StudentProgress, TypeAverage,
};
pub use users::{
    LoginRequest, LoginResponse, RegisterRequestDto, User, UserCredentials, UserRole,
    display_name,
};
