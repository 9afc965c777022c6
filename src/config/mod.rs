#[cfg(feature = "cli")]
pub mod cli;
pub mod migration_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use migration_config::{CommandConfig, MigrationConfig};
