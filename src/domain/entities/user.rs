use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};

use crate::domain::password::validate_password_strength;
use crate::entities::variants::string_enum;

string_enum! {
    pub enum UserRole ("role") {
        Admin => "admin",
        User => "user",
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserInsert {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

impl NewUser {
    /// Self-registration always yields a regular user.
    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        UserInsert {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash,
            role: UserRole::User,
        }
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("username_format");
        error.message = Some("Username can only contain letters, numbers, dots, hyphens, and underscores".into());
        Err(error)
    }
}

/// `username` accepts either the username or the email address.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[serde(alias = "email")]
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePassword {
    #[serde(alias = "currentPassword")]
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[serde(alias = "newPassword")]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
