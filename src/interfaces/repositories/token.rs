use jsonwebtoken::TokenData;

use crate::{entities::{token::Claims, user::User}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Issues a signed token for the user
    fn create_jwt(&self, user: &User) -> Result<String, AuthError>;

    /// Verifies signature and expiry and returns the claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
