use super::models::{COURSE_TITLES, CourseSeed};
use fake::Fake;
use fake::faker::lorem::en::Paragraph;
use gradebook_models::{CourseId, UserId};
use sqlx::PgPool;
use std::time::Instant;

/// One course per title, assigned to teachers round-robin.
pub fn generate_courses(teacher_ids: &[UserId]) -> Vec<CourseSeed> {
    if teacher_ids.is_empty() {
        return Vec::new();
    }

    COURSE_TITLES
        .iter()
        .enumerate()
        .map(|(idx, title)| CourseSeed {
            title: (*title).to_string(),
            description: Paragraph(2..4).fake(),
            teacher_id: teacher_ids[idx % teacher_ids.len()],
        })
        .collect()
}

pub async fn seed_courses(
    db: &PgPool,
    teacher_ids: &[UserId],
) -> Result<Vec<CourseId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let courses = generate_courses(teacher_ids);

    if courses.is_empty() {
        println!("📚 No teachers, skipping courses");
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO courses (title, description, teacher_id) VALUES ");
    for i in 0..courses.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 3;
        query.push_str(&format!("(${}, ${}, ${})", p + 1, p + 2, p + 3));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for course in &courses {
        q = q
            .bind(&course.title)
            .bind(&course.description)
            .bind(course.teacher_id);
    }

    let ids: Vec<CourseId> = q.fetch_all(db).await?;

    println!(
        "📚 Created {} courses in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courses_are_assigned_round_robin() {
        let teachers = vec![UserId::new(), UserId::new(), UserId::new()];
        let courses = generate_courses(&teachers);

        assert_eq!(courses.len(), COURSE_TITLES.len());
        assert_eq!(courses[0].title, "Mathematics");
        assert_eq!(courses[0].teacher_id, teachers[0]);
        assert_eq!(courses[1].teacher_id, teachers[1]);
        assert_eq!(courses[3].teacher_id, teachers[0]);
    }

    #[test]
    fn test_no_teachers_no_courses() {
        assert!(generate_courses(&[]).is_empty());
    }
}
