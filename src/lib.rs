mod domain;
mod interfaces;
mod infrastructure;
mod shared_repos;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases, validation, password};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, storage, utils};
pub use shared_repos::SharedRepositories;

use auth::jwt::JwtService;
use db::mysql::Database;
use repositories::sqlx_repo::{SqlxContactRepo, SqlxProjectRepo, SqlxUploadRepo, SqlxUserRepo};
use storage::file_store::LocalFileStore;
use use_cases::{auth::AuthHandler, contact::ContactHandler, projects::ProjectHandler, uploads::UploadHandler};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo>;
pub type AppContactHandler = ContactHandler<SqlxContactRepo>;
pub type AppUploadHandler = UploadHandler<SqlxUploadRepo, LocalFileStore>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub project_handler: AppProjectHandler,
    pub contact_handler: AppContactHandler,
    pub upload_handler: AppUploadHandler,
    pub database: Database,
    pub trust_x_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, database: &Database, file_store: LocalFileStore) -> Self {
        let repos = SharedRepositories::new(database);

        let jwt_service = JwtService::new(config);
        let auth_handler = AuthHandler::new(repos.user_repo, jwt_service);
        let project_handler = ProjectHandler::new(repos.project_repo, config.max_page_size);
        let contact_handler = ContactHandler::new(repos.contact_repo, config.max_page_size);
        let upload_handler = UploadHandler::new(repos.upload_repo, file_store, config.max_upload_bytes as u64);

        AppState {
            auth_handler,
            project_handler,
            contact_handler,
            upload_handler,
            database: database.clone(),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }
}
