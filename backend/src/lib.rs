pub mod models;
pub mod db;
pub mod services;
pub mod handlers;
pub mod utils;
pub mod constants;
pub mod error;

pub use utils::config::Config;
pub use db::connection::get_db_pool;
pub use error::AppError;
pub use handlers::create_router;

// Re-export common types
pub use sqlx::PgPool;
pub use anyhow::Result;
pub use chrono::{DateTime, NaiveDate, Utc};
