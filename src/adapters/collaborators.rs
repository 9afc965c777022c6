use crate::config::CommandConfig;
use crate::domain::ports::Collaborators;
use crate::utils::error::{MigrationError, Result};
use std::path::PathBuf;
use std::process::Command;

const PACKAGE_PLACEHOLDER: &str = "{package}";

/// 以外部命令實作協作步驟，命令在專案根目錄下執行
#[derive(Debug, Clone)]
pub struct CommandCollaborators {
    project_dir: PathBuf,
    commands: CommandConfig,
}

impl CommandCollaborators {
    pub fn new(project_dir: impl Into<PathBuf>, commands: CommandConfig) -> Self {
        Self {
            project_dir: project_dir.into(),
            commands,
        }
    }

    fn command(&self, name: &str, argv: &[String]) -> Result<Command> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| MigrationError::CollaboratorError {
                name: name.to_string(),
                message: "no command configured".to_string(),
            })?;

        let mut command = Command::new(program);
        command.args(args).current_dir(&self.project_dir);
        Ok(command)
    }

    fn run(&self, name: &str, argv: &[String]) -> Result<()> {
        tracing::debug!("Running {}: {:?}", name, argv);
        let status = self
            .command(name, argv)?
            .status()
            .map_err(|e| MigrationError::CollaboratorError {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(MigrationError::CollaboratorError {
                name: name.to_string(),
                message: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

impl Collaborators for CommandCollaborators {
    fn sync_template_files(&self, paths: &[&str]) -> Result<()> {
        let mut argv = self.commands.template_sync.clone();
        argv.extend(paths.iter().map(|p| p.to_string()));
        self.run("template sync", &argv)
    }

    fn discover_package_name(&self) -> Result<String> {
        let name = "package name discovery";
        let output = self
            .command(name, &self.commands.package_name)?
            .output()
            .map_err(|e| MigrationError::CollaboratorError {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MigrationError::CollaboratorError {
                name: name.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let package_name = stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);

        package_name.ok_or_else(|| MigrationError::CollaboratorError {
            name: name.to_string(),
            message: "no package name printed".to_string(),
        })
    }

    fn install_tools(&self, package_name: &str) -> Result<()> {
        let scripts: Vec<&str> = self.commands.tool_scripts.iter().map(String::as_str).collect();
        if !scripts.is_empty() {
            self.sync_template_files(&scripts)?;
        }

        for command in &self.commands.install_tools {
            let argv: Vec<String> = command
                .iter()
                .map(|arg| arg.replace(PACKAGE_PLACEHOLDER, package_name))
                .collect();
            self.run("tool installation", &argv)?;
        }
        Ok(())
    }

    fn list_outdated_dependencies(&self) -> Result<()> {
        self.run("outdated dependency listing", &self.commands.list_outdated)
    }

    fn update_lock_files(&self) -> Result<()> {
        self.run("lock file generation", &self.commands.update_lock)
    }

    fn update_hook_revisions(&self) -> Result<()> {
        self.run("hook revision update", &self.commands.update_hook_revs)
    }
}
