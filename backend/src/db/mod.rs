pub mod connection;
pub mod conversations;
pub mod daily_picks;
pub mod interests;
pub mod likes;
pub mod migrations;
pub mod users;

pub use connection::{get_db_pool, get_lazy_db_pool, DatabaseConfig};
