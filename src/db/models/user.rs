use chrono::{DateTime, Utc};
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account role for the authenticated incidents subsystem. Plain `user`
/// accounts only see their own incident reports; supervisors and admins
/// review and close them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Supervisor,
    Admin,
}

impl UserRole {
    pub fn is_reviewer(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Supervisor)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    pub password: SecretBox<String>,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    pub department: Option<String>,
    pub phone: Option<String>,
}

/// Login accepts an email or a username (employee id) in the same field.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 1, message = "Email or Employee ID is required"))]
    pub email: String,
    pub password: SecretBox<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_supervisor_review() {
        assert!(UserRole::Admin.is_reviewer());
        assert!(UserRole::Supervisor.is_reviewer());
        assert!(!UserRole::User.is_reviewer());
    }

    #[test]
    fn register_payload_is_validated() {
        let payload = RegisterUser {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: SecretBox::new(Box::new("secret123".to_string())),
            full_name: String::new(),
            department: None,
            phone: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("full_name"));
    }
}
