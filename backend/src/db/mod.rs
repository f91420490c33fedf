pub mod connection;
pub mod kv;
pub mod migrations;

pub use connection::{get_db_pool, DatabaseConfig};
