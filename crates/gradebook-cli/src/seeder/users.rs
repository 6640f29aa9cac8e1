use super::models::{SEED_EMAIL_DOMAIN, SeedConfig, UserSeed};
use fake::Fake;
use fake::faker::name::en::Name;
use gradebook_models::{UserId, UserRole};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

/// Admin, then teachers, then students. Emails are deterministic so that
/// `clear-seed` and demo logins can rely on them.
pub fn generate_users(config: &SeedConfig, password_hash: &str) -> Vec<UserSeed> {
    let mut users = Vec::with_capacity(1 + config.teachers + config.students);

    users.push(UserSeed {
        email: format!("admin@{}", SEED_EMAIL_DOMAIN),
        name: "Admin User".to_string(),
        role: UserRole::Admin,
        password_hash: password_hash.to_string(),
    });

    users.par_extend(
        (1..=config.teachers)
            .into_par_iter()
            .map(|i| generate_user("teacher", i, UserRole::Teacher, password_hash)),
    );
    users.par_extend(
        (1..=config.students)
            .into_par_iter()
            .map(|i| generate_user("student", i, UserRole::Student, password_hash)),
    );

    users
}

fn generate_user(prefix: &str, index: usize, role: UserRole, password_hash: &str) -> UserSeed {
    UserSeed {
        email: format!("{}{}@{}", prefix, index, SEED_EMAIL_DOMAIN),
        name: Name().fake(),
        role,
        password_hash: password_hash.to_string(),
    }
}

/// Inserts users and returns `(id, role)` in input order.
pub async fn seed_users(
    db: &PgPool,
    config: &SeedConfig,
    password_hash: &str,
) -> Result<Vec<(UserId, UserRole)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let users = generate_users(config, password_hash);

    println!(
        "👥 Generated {} users in {:?}",
        users.len(),
        start_time.elapsed()
    );

    let inserted = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        inserted.len(),
        start_time.elapsed()
    );

    Ok(inserted)
}

pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<(UserId, UserRole)>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 4 params per user
    const BATCH_SIZE: usize = 1000;

    let mut all = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let ids = insert_users_chunk(&mut tx, chunk).await?;
        all.extend(ids.into_iter().zip(chunk.iter().map(|u| u.role)));
    }

    tx.commit().await?;
    Ok(all)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (email, name, role, password) VALUES ");

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.role)
            .bind(&user.password_hash);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes every account on the seed domain. Courses, enrollments and
/// grades go with them through `ON DELETE CASCADE`.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_users_counts_and_emails() {
        let config = SeedConfig::new(2, 3);
        let users = generate_users(&config, "hash");

        assert_eq!(users.len(), 6);
        assert_eq!(users[0].email, "admin@school.test");
        assert_eq!(users[0].role, UserRole::Admin);

        let teachers: Vec<_> = users
            .iter()
            .filter(|u| u.role == UserRole::Teacher)
            .map(|u| u.email.as_str())
            .collect();
        assert_eq!(teachers, vec!["teacher1@school.test", "teacher2@school.test"]);

        assert_eq!(
            users.iter().filter(|u| u.role == UserRole::Student).count(),
            3
        );
        assert!(users.iter().all(|u| u.password_hash == "hash"));
        assert!(users.iter().all(|u| !u.name.is_empty()));
    }
}
