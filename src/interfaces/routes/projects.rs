use actix_web::web;

use crate::handlers::projects;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(projects::list_projects)
            .service(projects::featured_projects)
            .service(projects::projects_by_category)
            .service(projects::search_projects)
            .service(projects::project_stats)
            .service(projects::project_by_id)
            .service(projects::project_images)
            .service(projects::project_by_slug)
    );
}
