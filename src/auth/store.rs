//! Credential store for administrator accounts.
//!
//! All password handling funnels through this type: plaintext enters on
//! insert or password change and is hashed immediately; nothing else ever
//! re-hashes or reads the stored hash. The [`Admin`] record deliberately does
//! not implement `Serialize` — external representations go through
//! [`AdminSummary`], which has no secret field.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::auth::responses::{AdminSummary, Role};
use crate::auth::{AuthResult, PasswordService};

const ADMIN_COLUMNS: &str =
    "id, username, name, email, password_hash, role, is_active, last_login_at, created_at, updated_at";

/// Full administrator record, including the password hash. Internal only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Public profile view, secret omitted by construction.
    pub fn summary(&self) -> AdminSummary {
        AdminSummary {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields required to provision a new administrator. `password` is plaintext
/// and is hashed inside [`AdminStore::insert`].
#[derive(Debug)]
pub struct NewAdmin {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct AdminStore {
    pool: PgPool,
    passwords: Arc<PasswordService>,
}

impl AdminStore {
    pub fn new(pool: PgPool, passwords: Arc<PasswordService>) -> Self {
        Self { pool, passwords }
    }

    pub async fn find_by_id(&self, id: i32) -> AuthResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    pub async fn find_by_email(&self, email: &str) -> AuthResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    pub async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> AuthResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE lower(email) = lower($1) OR username = $2"
        ))
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    /// Insert a new administrator, hashing the plaintext password.
    pub async fn insert(&self, new: NewAdmin) -> AuthResult<Admin> {
        let password_hash = self.passwords.hash_password(&new.password)?;
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (username, name, email, password_hash, role) \
             VALUES ($1, $2, lower($3), $4, $5) RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(&new.username)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&password_hash)
        .bind(new.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }

    /// Profile edit: name and email only, the stored hash is untouched.
    pub async fn update_profile(
        &self,
        id: i32,
        name: &str,
        email: &str,
    ) -> AuthResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins SET name = $1, email = lower($2), updated_at = now() \
             WHERE id = $3 RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    /// Replace the stored hash with a freshly computed one.
    pub async fn change_password(&self, id: i32, new_password: &str) -> AuthResult<()> {
        let password_hash = self.passwords.hash_password(new_password)?;
        sqlx::query("UPDATE admins SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(&password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn touch_last_login(&self, id: i32) -> AuthResult<()> {
        sqlx::query("UPDATE admins SET last_login_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> AuthResult<Vec<Admin>> {
        let admins = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(admins)
    }

    /// Recompute-and-compare against the stored hash.
    pub fn verify_password(&self, admin: &Admin, candidate: &str) -> AuthResult<bool> {
        self.passwords.verify_password(candidate, &admin.password_hash)
    }
}
