pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    collaborators::CommandCollaborators, operator::TerminalOperator, storage::LocalStorage,
};
pub use config::MigrationConfig;
pub use crate::core::migration::{MigrationEngine, MigrationReport};
pub use utils::error::{MigrationError, Result};
