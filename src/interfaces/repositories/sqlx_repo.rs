use sqlx::MySqlPool;

use crate::db::mysql::Database;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxUploadRepo {
    pub pool: MySqlPool,
}

impl SqlxUserRepo {
    pub fn new(db: &Database) -> Self {
        SqlxUserRepo { pool: db.pool().clone() }
    }
}

impl SqlxProjectRepo {
    pub fn new(db: &Database) -> Self {
        SqlxProjectRepo { pool: db.pool().clone() }
    }
}

impl SqlxContactRepo {
    pub fn new(db: &Database) -> Self {
        SqlxContactRepo { pool: db.pool().clone() }
    }
}

impl SqlxUploadRepo {
    pub fn new(db: &Database) -> Self {
        SqlxUploadRepo { pool: db.pool().clone() }
    }
}

/// True when `err` is a unique-key violation reported by the server.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
