pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod home;
pub mod reports;
pub mod statistics;
