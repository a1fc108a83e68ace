use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::token::Claims, errors::AuthError, AppState};

pub const ADMIN_PREFIX: &str = "/api/admin";

/// Why a bearer token sent to a non-admin route was not accepted.
#[derive(Debug, Clone)]
pub struct TokenRejection(pub AuthError);

/// Decodes an optional bearer token into `Claims` request data and guards the
/// admin scope. Outside the admin scope a bad token is not fatal: routes decide
/// for themselves whether they need claims (see the `AuthClaims` extractor).
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if req.method() == Method::OPTIONS {
                return service.call(req).await;
            }

            let claims = match extract_token(&req) {
                Some(token) => match decode_claims(&req, &token) {
                    Ok(claims) => Some(claims),
                    Err(e) if req.path().starts_with(ADMIN_PREFIX) => {
                        tracing::warn!(path = %req.path(), "Rejected bearer token: {}", e);
                        return Ok(reject(req, e));
                    }
                    Err(e) => {
                        // Public routes still serve the request; extractors
                        // report the rejection where a caller is required.
                        tracing::debug!(path = %req.path(), "Ignoring bearer token: {}", e);
                        req.extensions_mut().insert(TokenRejection(e));
                        None
                    }
                },
                None => None,
            };

            if let Err(e) = enforce_admin_access(req.path(), claims.as_ref()) {
                return Ok(reject(req, e));
            }

            if let Some(claims) = claims {
                req.extensions_mut().insert(claims);
            }
            service.call(req).await
        })
    }
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn decode_claims(req: &ServiceRequest, token: &str) -> Result<Claims, AuthError> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::MissingJwtService
        })?;

    let decoded = state.auth_handler.token_service.decode_jwt(token)?;
    Ok(decoded.claims)
}

fn enforce_admin_access(path: &str, claims: Option<&Claims>) -> Result<(), AuthError> {
    if !path.starts_with(ADMIN_PREFIX) {
        return Ok(());
    }

    match claims {
        None => Err(AuthError::MissingCredentials),
        Some(claims) if !claims.is_admin() => {
            tracing::warn!(user = %claims.sub, "Admin access required for path: {}", path);
            Err(AuthError::Forbidden("Admin access required".into()))
        }
        Some(_) => Ok(()),
    }
}

fn reject(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}
