use actix_web::web;

use crate::handlers::uploads;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/upload")
            .service(uploads::upload_single)
            .service(uploads::upload_multiple)
            .service(uploads::list_uploads)
            .service(uploads::delete_upload)
    );
}
