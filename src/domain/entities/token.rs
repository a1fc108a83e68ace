use serde::{Serialize, Deserialize};

use crate::entities::user::{PublicUser, UserRole};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(user: PublicUser, token: String) -> Self {
        AuthResponse {
            user,
            token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn user_id(&self) -> Option<u64> {
        self.sub.parse().ok()
    }
}
