use anyhow::Result;
use std::env;
use crate::constants::{DEFAULT_DATABASE_URL, DEFAULT_SERVER_PORT};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Comma-separated CORS origins; permissive when unset
    pub allowed_origins: Option<String>,
    /// Whether sign-in seeds the demo incoming requests
    pub seed_requests: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            allowed_origins: env::var("ALLOWED_ORIGINS").ok(),
            seed_requests: match env::var("REFLECTA_SEED_REQUESTS") {
                Ok(value) => parse_flag(&value)?,
                Err(_) => true,
            },
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("REFLECTA_SEED_REQUESTS must be a boolean, got '{}'", other)),
    }
}
