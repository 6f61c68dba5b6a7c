pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use config::Config;
pub use error::AppError;
