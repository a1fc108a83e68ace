use crate::db::mysql::Database;
use crate::repositories::sqlx_repo::{SqlxContactRepo, SqlxProjectRepo, SqlxUploadRepo, SqlxUserRepo};

/// One repository per table family, all sharing the same pool.
#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: SqlxUserRepo,
    pub project_repo: SqlxProjectRepo,
    pub contact_repo: SqlxContactRepo,
    pub upload_repo: SqlxUploadRepo,
}

impl SharedRepositories {
    pub fn new(db: &Database) -> Self {
        SharedRepositories {
            user_repo: SqlxUserRepo::new(db),
            project_repo: SqlxProjectRepo::new(db),
            contact_repo: SqlxContactRepo::new(db),
            upload_repo: SqlxUploadRepo::new(db),
        }
    }
}
