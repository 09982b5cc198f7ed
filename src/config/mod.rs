/// Database configuration and connection management
pub mod database;

/// Bar and account configuration loading from config.toml
pub mod settings;

/// Staff accounts used by the session login
pub mod users;
