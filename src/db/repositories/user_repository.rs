use sqlx::PgPool;

use crate::db::models::User;
use crate::db::{with_retry, DatabaseError};

/// Column list for users queries.
const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, role, department, \
    phone, is_active, created_at, updated_at";

pub struct UserRepository;

impl UserRepository {
    /// Insert a new account with the default `user` role. The password has
    /// already been hashed by the caller.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        full_name: &str,
        department: Option<&str>,
        phone: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, full_name, department, phone)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );
        let email_lower = email.to_lowercase();
        let user = with_retry(|| {
            sqlx::query_as::<_, User>(&query)
                .bind(username)
                .bind(&email_lower)
                .bind(password_hash)
                .bind(full_name)
                .bind(department)
                .bind(phone)
                .fetch_one(pool)
        })
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = with_retry(|| {
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .fetch_optional(pool)
        })
        .await?;
        Ok(user)
    }

    /// Look an account up by email or username (employee-id logins use the
    /// same credential field). Emails are stored lowercased, so the email
    /// comparison lowercases the credential too; usernames match verbatim.
    pub async fn find_by_email_or_username(
        pool: &PgPool,
        credential: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR username = $2");
        let email = credential.to_lowercase();
        let user = with_retry(|| {
            sqlx::query_as::<_, User>(&query)
                .bind(&email)
                .bind(credential)
                .fetch_optional(pool)
        })
        .await?;
        Ok(user)
    }

    /// Whether an account already exists with this email or username.
    pub async fn exists(
        pool: &PgPool,
        email: &str,
        username: &str,
    ) -> Result<bool, DatabaseError> {
        let found = with_retry(|| {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM users WHERE email = $1 OR username = $2",
            )
            .bind(email)
            .bind(username)
            .fetch_one(pool)
        })
        .await?;
        Ok(found > 0)
    }
}
