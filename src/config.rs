//! Server configuration, read once from the environment at startup.
//!
//! Required: `DATABASE_URL`, `JWT_SECRET`.
//! Optional: `HOST` (default 0.0.0.0), `PORT` (default 3000),
//! `BASE_URL` (default http://localhost:3000) — the public URL embedded in
//! generated QR codes.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Public base URL of the deployment; QR codes encode
    /// `{base_url}/documents/{id}`.
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}
