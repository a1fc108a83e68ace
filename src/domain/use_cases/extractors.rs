use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use crate::{entities::token::Claims, errors::AuthError, middlewares::auth::TokenRejection};

/// The token's own rejection when one was sent, otherwise missing credentials.
fn unauthenticated(req: &HttpRequest) -> actix_web::Error {
    match req.extensions().get::<TokenRejection>() {
        Some(TokenRejection(err)) => err.clone().into(),
        None => AuthError::MissingCredentials.into(),
    }
}

/// Claims of an authenticated caller. Rejects with 401 when the request
/// carried no valid bearer token, keeping the token's own error (expired,
/// invalid) when there was one.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl AuthClaims {
    /// Numeric id of the caller, or `InvalidToken` when the subject is not one.
    pub fn user_id(&self) -> Result<u64, AuthError> {
        self.0.user_id().ok_or(AuthError::InvalidToken)
    }
}

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthClaims(claims.clone()))),
            None => ready(Err(unauthenticated(req))),
        }
    }
}

/// 403 for authenticated non-admins, 401 without credentials.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) if claims.is_admin() => {
                ready(Ok(AdminClaims(claims.clone())))
            }
            Some(_) => {
                ready(Err(AuthError::Forbidden("Admin access required".into()).into()))
            }
            None => {
                ready(Err(unauthenticated(req)))
            }
        }
    }
}
