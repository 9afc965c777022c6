use crate::utils::error::Result;
use crate::utils::validation::{validate_package_name, validate_path, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "repo-migrate")]
#[command(about = "Migrate a project generated from an older template to the current conventions")]
pub struct CliConfig {
    /// Root of the project to migrate
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Optional TOML file overriding collaborator commands
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip package name discovery
    #[arg(long)]
    pub package_name: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("project_dir", &self.project_dir.to_string_lossy())?;
        if let Some(name) = &self.package_name {
            validate_package_name("package_name", name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "repo-migrate",
            "--project-dir",
            "/tmp/project",
            "--package-name",
            "my_service",
            "--verbose",
        ]);

        assert_eq!(cli.project_dir, PathBuf::from("/tmp/project"));
        assert_eq!(cli.package_name.as_deref(), Some("my_service"));
        assert!(cli.config.is_none());
        assert!(cli.verbose);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_package_name() {
        let cli = CliConfig::parse_from(["repo-migrate", "--package-name", "my-service"]);
        assert_eq!(cli.project_dir, PathBuf::from("."));
        assert!(cli.validate().is_err());
    }
}
