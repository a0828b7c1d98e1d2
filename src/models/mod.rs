//! Data model structs shared between the database layer and route handlers.

pub mod document;
pub mod user;

pub use document::*;
pub use user::*;
