//! Business logic that does not belong to a single HTTP handler or table:
//! the location routing policy and QR rendering.

pub mod location;
pub mod qr;
