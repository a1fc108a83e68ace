pub mod contact;
pub mod envelope;
pub mod option_fields;
pub mod pagination;
pub mod project;
pub mod token;
pub mod upload;
pub mod user;
pub mod variants;
