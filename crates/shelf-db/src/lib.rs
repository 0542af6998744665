pub mod account_repository;
pub mod config;
pub mod database;

pub use account_repository::AccountRepository;
pub use config::DatabaseConfig;
pub use database::Database;
