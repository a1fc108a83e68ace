use actix_web::{get, patch, post, web, Responder, ResponseError};

use crate::entities::user::{ChangePassword, LoginUser, NewUser};
use crate::handlers::respond::{created, respond};
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[post("/register")]
#[tracing::instrument(skip(state, user), fields(username = %user.username))]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> impl Responder {
    created(state.auth_handler.register(user.into_inner()).await)
}

#[post("/login")]
#[tracing::instrument(skip(state, user))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> impl Responder {
    respond(state.auth_handler.login(user.into_inner()).await)
}

#[get("/me")]
#[tracing::instrument(skip(state, claims), fields(user = %claims.0.sub))]
pub async fn me(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> impl Responder {
    match claims.user_id() {
        Ok(user_id) => respond(state.auth_handler.current_user(user_id).await),
        Err(e) => e.error_response(),
    }
}

#[patch("/change-password")]
#[tracing::instrument(skip(state, claims, request), fields(user = %claims.0.sub))]
pub async fn change_password(
    claims: AuthClaims,
    state: web::Data<AppState>,
    request: web::Json<ChangePassword>,
) -> impl Responder {
    match claims.user_id() {
        Ok(user_id) => respond(state.auth_handler.change_password(user_id, request.into_inner()).await),
        Err(e) => e.error_response(),
    }
}
