use actix_web::web;

use crate::handlers::{home::home, json_error::not_found, system::health_check};

mod admin;
mod auth;
mod contact;
mod json_error;
mod projects;
mod uploads;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .service(health_check)
            .configure(projects::config_routes)
            .configure(contact::config_routes)
            .configure(auth::config_routes)
            .configure(uploads::config_routes)
            .configure(admin::config_routes)
    );

    cfg.configure(json_error::config_routes);
    cfg.default_service(web::to(not_found));
}
