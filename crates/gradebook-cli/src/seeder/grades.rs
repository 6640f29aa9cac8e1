use super::models::{EnrollmentSeed, GradeSeed, SeedConfig};
use chrono::{Duration, Utc};
use gradebook_models::GradeType;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

const MIN_SEED_VALUE: u32 = 8;
const MAX_SEED_VALUE: u32 = 20;
const MAX_AGE_DAYS: i64 = 180;

pub fn generate_grades(config: &SeedConfig, enrollments: &[EnrollmentSeed]) -> Vec<GradeSeed> {
    let (min, max) = config.grades_per_enrollment;
    let min = min.min(max);

    enrollments
        .par_iter()
        .flat_map_iter(|enrollment| {
            let mut rng = rand::thread_rng();
            let count = rng.gen_range(min..=max);
            let now = Utc::now();

            (0..count)
                .map(|_| GradeSeed {
                    student_id: enrollment.student_id,
                    course_id: enrollment.course_id,
                    value: f64::from(rng.gen_range(MIN_SEED_VALUE..=MAX_SEED_VALUE)),
                    grade_type: *GradeType::ALL
                        .choose(&mut rng)
                        .unwrap_or(&GradeType::Exam),
                    coefficient: rng.gen_range(1..=3),
                    created_at: now - Duration::days(rng.gen_range(0..=MAX_AGE_DAYS)),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_grades(
    db: &PgPool,
    config: &SeedConfig,
    enrollments: &[EnrollmentSeed],
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let grades = generate_grades(config, enrollments);

    let mut tx = db.begin().await?;

    // 6 params per grade
    const BATCH_SIZE: usize = 1000;

    for chunk in grades.chunks(BATCH_SIZE) {
        insert_grades_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;

    println!(
        "🎯 Created {} grades in {:?}",
        grades.len(),
        start_time.elapsed()
    );

    Ok(grades.len())
}

async fn insert_grades_chunk(
    tx: &mut Transaction<'_, Postgres>,
    grades: &[GradeSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if grades.is_empty() {
        return Ok(());
    }

    let mut query = String::from(
        "INSERT INTO grades (student_id, course_id, value, grade_type, coefficient, created_at) VALUES ",
    );
    for i in 0..grades.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }

    let mut q = sqlx::query(&query);
    for grade in grades {
        q = q
            .bind(grade.student_id)
            .bind(grade.course_id)
            .bind(grade.value)
            .bind(grade.grade_type)
            .bind(grade.coefficient)
            .bind(grade.created_at);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_models::{CourseId, UserId};

    #[test]
    fn test_generated_grades_stay_in_bounds() {
        let config = SeedConfig::default();
        let enrollments: Vec<EnrollmentSeed> = (0..5)
            .map(|_| EnrollmentSeed {
                student_id: UserId::new(),
                course_id: CourseId::new(),
                enrolled_at: Utc::now(),
            })
            .collect();

        let grades = generate_grades(&config, &enrollments);

        assert!(grades.len() >= 5 * 4 && grades.len() <= 5 * 8);
        for grade in &grades {
            assert!((8.0..=20.0).contains(&grade.value));
            assert_eq!(grade.value.fract(), 0.0);
            assert!((1..=3).contains(&grade.coefficient));
            assert!(grade.created_at <= Utc::now());
        }
    }
}
