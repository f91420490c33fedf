pub mod models;
pub mod db;
pub mod services;
pub mod handlers;
pub mod utils;
pub mod constants;

pub use utils::config::Config;
pub use db::connection::get_db_pool;
pub use handlers::{create_router, AppState};

// Re-export common types
pub use sqlx::SqlitePool;
pub use anyhow::Result;
pub use chrono::{DateTime, Utc};
