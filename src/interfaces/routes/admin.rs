use actix_web::web;

use crate::handlers::{contact, projects};

/// Everything under `/api/admin` is also guarded by the auth middleware.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(projects::admin_list_projects)
            .service(projects::create_project)
            .service(projects::admin_project_by_id)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(projects::admin_project_images)
            .service(projects::add_project_image)
            .service(projects::delete_project_image)
            // `unread` before `{id}`
            .service(contact::unread_messages)
            .service(contact::list_messages)
            .service(contact::get_message)
            .service(contact::update_status)
            .service(contact::delete_message)
    );
}
