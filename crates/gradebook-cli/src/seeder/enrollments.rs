use super::models::{EnrollmentSeed, SeedConfig};
use chrono::{Duration, Utc};
use gradebook_models::{CourseId, UserId};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

const MAX_AGE_DAYS: i64 = 180;

/// Each student picks a random set of distinct courses.
pub fn generate_enrollments(
    config: &SeedConfig,
    student_ids: &[UserId],
    course_ids: &[CourseId],
) -> Vec<EnrollmentSeed> {
    let (min, max) = config.courses_per_student;
    let max = max.min(course_ids.len());
    let min = min.min(max);

    student_ids
        .par_iter()
        .flat_map_iter(|&student_id| {
            let mut rng = rand::thread_rng();
            let count = rng.gen_range(min..=max);
            let now = Utc::now();

            course_ids
                .choose_multiple(&mut rng, count)
                .map(|&course_id| EnrollmentSeed {
                    student_id,
                    course_id,
                    enrolled_at: now - Duration::days(rng.gen_range(0..=MAX_AGE_DAYS)),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_enrollments(
    db: &PgPool,
    config: &SeedConfig,
    student_ids: &[UserId],
    course_ids: &[CourseId],
) -> Result<Vec<EnrollmentSeed>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let enrollments = generate_enrollments(config, student_ids, course_ids);

    let mut tx = db.begin().await?;

    // 3 params per enrollment
    const BATCH_SIZE: usize = 2000;

    for chunk in enrollments.chunks(BATCH_SIZE) {
        insert_enrollments_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;

    println!(
        "📝 Created {} enrollments in {:?}",
        enrollments.len(),
        start_time.elapsed()
    );

    Ok(enrollments)
}

async fn insert_enrollments_chunk(
    tx: &mut Transaction<'_, Postgres>,
    enrollments: &[EnrollmentSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if enrollments.is_empty() {
        return Ok(());
    }

    let mut query =
        String::from("INSERT INTO enrollments (student_id, course_id, enrolled_at) VALUES ");
    for i in 0..enrollments.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 3;
        query.push_str(&format!("(${}, ${}, ${})", p + 1, p + 2, p + 3));
    }
    query.push_str(" ON CONFLICT (student_id, course_id) DO NOTHING");

    let mut q = sqlx::query(&query);
    for enrollment in enrollments {
        q = q
            .bind(enrollment.student_id)
            .bind(enrollment.course_id)
            .bind(enrollment.enrolled_at);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}
