pub mod address;
pub mod config;
pub mod dates;
pub mod logging;
pub mod paging;

pub use address::normalize_world_address;
pub use config::Config;
pub use logging::init_logging;
pub use paging::page_bounds;
