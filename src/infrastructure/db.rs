pub mod mysql;
pub mod schema;
