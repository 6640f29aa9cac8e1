use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use gradebook_cli::admin::create_admin;
use gradebook_cli::seeder::{self, SeedConfig};
use sqlx::postgres::{PgPool, PgPoolOptions};

#[derive(Parser)]
#[command(name = "gradebook-cli")]
#[command(about = "Gradebook CLI - Administrative tools for Gradebook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with demo users, courses, enrollments and grades
    Seed {
        /// Number of teachers to create
        #[arg(long, default_value = "8")]
        teachers: usize,

        /// Number of students to create
        #[arg(long, default_value = "50")]
        students: usize,
    },
    /// Clear all seeded data (keeps accounts outside the seed domain)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("❌ DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed { teachers, students } => handle_seed(&pool, teachers, students).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

fn prompt_admin_details(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String, String), dialoguer::Error> {
    let name = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Name")
            .allow_empty(true)
            .interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    Ok((name, email, password))
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let (name, email, password) = match prompt_admin_details(name, email, password) {
        Ok(details) => details,
        Err(e) => {
            eprintln!("\n❌ Failed to read input: {}", e);
            std::process::exit(1);
        }
    };

    match create_admin(pool, &email, Some(&name), &password).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email.trim().to_lowercase());
            if !name.trim().is_empty() {
                println!("   Name: {}", name.trim());
            }
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool, teachers: usize, students: usize) {
    if let Err(e) = seeder::seed_all(pool, SeedConfig::new(teachers, students)).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
