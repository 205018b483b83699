use std::io::{self, Write};

use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use consultancy_api::auth::passwords::PasswordService;
use consultancy_api::auth::responses::Role;

#[derive(Parser, Debug)]
#[command(
    name = "create_admin",
    about = "Provision a consultancy-site administrator account"
)]
struct Args {
    /// Unique login username (3-30 characters).
    #[arg(long)]
    username: String,

    /// Email address for the account (case insensitive).
    #[arg(long)]
    email: String,

    /// Plaintext password to hash and store for this administrator.
    #[arg(long)]
    password: String,

    /// Optional display name; defaults to the username.
    #[arg(long)]
    name: Option<String>,

    /// Role to assign (`admin` or `super-admin`).
    #[arg(long, default_value = "admin")]
    role: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    let username = args.username.trim().to_string();
    let email = args.email.trim().to_lowercase();

    if !email.contains('@') {
        writeln!(io::stderr(), "error: email must contain '@'")?;
        std::process::exit(1);
    }
    if username.len() < 3 || username.len() > 30 {
        writeln!(io::stderr(), "error: username must be 3-30 characters")?;
        std::process::exit(1);
    }
    if args.password.len() < 6 {
        writeln!(io::stderr(), "error: password must be at least 6 characters")?;
        std::process::exit(1);
    }

    let role = match args.role.trim().to_lowercase().as_str() {
        "super-admin" => Role::SuperAdmin,
        "admin" => Role::Admin,
        other => {
            writeln!(
                io::stderr(),
                "error: unsupported role '{other}'. Use 'admin' or 'super-admin'."
            )?;
            std::process::exit(1);
        }
    };

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM admins WHERE lower(email) = lower($1) OR username = $2",
    )
    .bind(&email)
    .bind(&username)
    .fetch_one(&pool)
    .await?;

    if existing > 0 {
        writeln!(
            io::stderr(),
            "error: an admin with username '{username}' or email '{email}' already exists."
        )?;
        std::process::exit(1);
    }

    let password_service = PasswordService::new()
        .map_err(|err| io::Error::other(format!("argon2 init failed: {err}")))?;
    let password_hash = password_service
        .hash_password(&args.password)
        .map_err(|err| io::Error::other(format!("password hash failed: {err}")))?;

    let name = args.name.unwrap_or_else(|| username.clone());

    let admin_id: i32 = sqlx::query_scalar(
        "INSERT INTO admins (username, name, email, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&username)
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&pool)
    .await?;

    println!(
        "Created {} '{username}' <{email}> with id {admin_id}",
        role.as_str()
    );
    Ok(())
}
