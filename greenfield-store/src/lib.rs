pub mod app_config;
pub mod database;
pub mod events;
pub mod seed;

pub use app_config::Config;
pub use database::Database;
pub use events::EventBus;
