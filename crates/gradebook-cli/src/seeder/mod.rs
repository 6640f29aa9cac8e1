//! Database seeding with demo users, courses, enrollments and grades.
//!
//! # Module Structure
//!
//! - [`users`] - admin, teachers and students on the `school.test` domain
//! - [`courses`] - one course per subject title, teachers assigned round-robin
//! - [`enrollments`] - random distinct courses per student
//! - [`grades`] - random grades per enrollment
//! - [`models`] - seed rows and [`SeedConfig`]
//!
//! # Performance
//!
//! - Parallel data generation using Rayon
//! - Batch inserts with multi-value INSERT statements
//! - Single bcrypt hash reused for all users (cost 4 for speed)

pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod models;
pub mod users;

pub use models::{SEED_PASSWORD, SeedConfig};

use gradebook_core::hash_password_with_cost;
use gradebook_models::UserRole;
use sqlx::PgPool;
use std::time::Instant;

/// Seeds users, courses, enrollments and grades.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting full database seeding...");
    println!(
        "   - Users: 1 admin, {} teachers, {} students",
        config.teachers, config.students
    );
    println!(
        "   - Courses per student: {}-{}, grades per enrollment: {}-{}",
        config.courses_per_student.0,
        config.courses_per_student.1,
        config.grades_per_enrollment.0,
        config.grades_per_enrollment.1
    );

    let password_hash = hash_password()?;

    let users = users::seed_users(db, &config, &password_hash).await?;
    let teacher_ids: Vec<_> = users
        .iter()
        .filter(|(_, role)| *role == UserRole::Teacher)
        .map(|(id, _)| *id)
        .collect();
    let student_ids: Vec<_> = users
        .iter()
        .filter(|(_, role)| *role == UserRole::Student)
        .map(|(id, _)| *id)
        .collect();

    let course_ids = courses::seed_courses(db, &teacher_ids).await?;
    let enrollments =
        enrollments::seed_enrollments(db, &config, &student_ids, &course_ids).await?;
    let grade_count = grades::seed_grades(db, &config, &enrollments).await?;

    println!(
        "\n✅ Seeding complete! Created {} users, {} courses, {} enrollments, {} grades in {:?}",
        users.len(),
        course_ids.len(),
        enrollments.len(),
        grade_count,
        start_time.elapsed()
    );
    println!("\n📝 Default password for all users: {}", SEED_PASSWORD);

    Ok(())
}

/// Clears all seeded data. Accounts outside the seed domain are kept.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing all seeded data...");

    users::clear_users(db).await?;

    println!("✅ All seeded data cleared in {:?}", start_time.elapsed());
    Ok(())
}

fn hash_password() -> Result<String, Box<dyn std::error::Error>> {
    println!("🔐 Hashing password...");
    let start = Instant::now();
    // cost 4 keeps seeding fast
    let hash = hash_password_with_cost(SEED_PASSWORD, 4)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;
    println!("   ✓ Hashed password in {:?}", start.elapsed());
    Ok(hash)
}
