//! Data access layer. Route handlers call into these modules; nothing here
//! knows about HTTP.

pub mod documents;
pub mod users;

pub use documents::*;
