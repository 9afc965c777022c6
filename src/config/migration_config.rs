use crate::utils::error::{MigrationError, Result};
use crate::utils::validation::{validate_command, validate_package_name, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

/// 遷移設定，全部欄位皆有預設值，對應模板 `scripts/` 目錄下的工具
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// 指定套件名稱時略過自動偵測
    pub package_name: Option<String>,
    pub commands: CommandConfig,
}

/// 外部協作步驟的命令列（argv）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// 會在後面附加要同步的相對路徑；不附加時同步全部
    pub template_sync: Vec<String>,
    /// 標準輸出第一行即為套件名稱
    pub package_name: Vec<String>,
    /// 安裝工具前需要重新同步的腳本
    pub tool_scripts: Vec<String>,
    /// `{package}` 會被替換成套件名稱
    pub install_tools: Vec<Vec<String>>,
    pub list_outdated: Vec<String>,
    pub update_lock: Vec<String>,
    pub update_hook_revs: Vec<String>,
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            template_sync: argv(&["scripts/update_template_files.py"]),
            package_name: argv(&[
                "python",
                "-c",
                "from scripts.get_package_name import get_package_name; print(get_package_name())",
            ]),
            tool_scripts: argv(&[
                "scripts/script_utils/deps.py",
                "scripts/script_utils/lock_deps.py",
            ]),
            install_tools: vec![
                argv(&["pip", "install", "httpx"]),
                argv(&["pip", "install", "pip-tools"]),
                argv(&["pip", "install", "stringcase"]),
                argv(&["pip", "uninstall", "-y", "{package}"]),
                argv(&["pip", "install", "-e", "."]),
            ],
            list_outdated: argv(&["scripts/list_outdated_dependencies.py"]),
            update_lock: argv(&["scripts/update_lock.py"]),
            update_hook_revs: argv(&["scripts/update_hook_revs.py"]),
        }
    }
}

impl MigrationConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MigrationError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PIP_INDEX})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for MigrationConfig {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.package_name {
            validate_package_name("package_name", name)?;
        }

        let commands = &self.commands;
        validate_command("commands.template_sync", &commands.template_sync)?;
        validate_command("commands.package_name", &commands.package_name)?;
        validate_command("commands.list_outdated", &commands.list_outdated)?;
        validate_command("commands.update_lock", &commands.update_lock)?;
        validate_command("commands.update_hook_revs", &commands.update_hook_revs)?;
        for command in &commands.install_tools {
            validate_command("commands.install_tools", command)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MigrationConfig::from_toml_str("").unwrap();
        assert!(config.package_name.is_none());
        assert_eq!(config.commands.update_lock, vec!["scripts/update_lock.py"]);
        assert_eq!(config.commands.install_tools.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = MigrationConfig::from_toml_str(
            r#"
package_name = "my_service"

[commands]
update_lock = ["make", "lock"]
"#,
        )
        .unwrap();

        assert_eq!(config.package_name.as_deref(), Some("my_service"));
        assert_eq!(config.commands.update_lock, vec!["make", "lock"]);
        assert_eq!(
            config.commands.update_hook_revs,
            vec!["scripts/update_hook_revs.py"]
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REPO_MIGRATE_TEST_LOCK", "scripts/lock.sh");

        let config = MigrationConfig::from_toml_str(
            "[commands]\nupdate_lock = [\"${REPO_MIGRATE_TEST_LOCK}\"]\n",
        )
        .unwrap();
        assert_eq!(config.commands.update_lock, vec!["scripts/lock.sh"]);

        std::env::remove_var("REPO_MIGRATE_TEST_LOCK");
    }

    #[test]
    fn test_validation_rejects_empty_command_and_bad_name() {
        let config = MigrationConfig::from_toml_str("[commands]\nupdate_lock = []\n").unwrap();
        assert!(config.validate().is_err());

        let config = MigrationConfig::from_toml_str("package_name = \"my-service\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"package_name = \"from_file\"\n")
            .unwrap();

        let config = MigrationConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.package_name.as_deref(), Some("from_file"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = MigrationConfig::from_toml_str("package_name = ").unwrap_err();
        assert!(matches!(err, MigrationError::ConfigError { .. }));
    }
}
