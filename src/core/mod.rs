pub mod checkpoint;
pub mod cleanup;
pub mod constraints;
pub mod layout;
pub mod legacy_config;
pub mod manifest;
pub mod migration;
pub mod repair;

pub use crate::domain::model::{LegacyConfigRecord, PackageReference, PackageVersion, ProjectKind};
pub use crate::domain::ports::{Collaborators, Operator, Storage};
pub use crate::utils::error::Result;
