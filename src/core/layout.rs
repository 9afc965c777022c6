use crate::domain::model::PackageVersion;
use crate::domain::ports::Storage;
use crate::utils::error::{MigrationError, Result};
use regex::{NoExpand, Regex};

const VERSION_VARIABLE: &str = "__version__";
const DYNAMIC_VERSION: &str =
    "from importlib.metadata import version\n\n__version__ = version(__package__)";

pub fn entry_file(package_name: &str) -> String {
    format!("{}/__init__.py", package_name)
}

pub fn migrated_entry_file(package_name: &str) -> String {
    format!("src/{}/__init__.py", package_name)
}

/// 取第一行 `__version__` 等號右側的值，去掉空白與雙引號
pub fn read_package_version(content: &str, file: &str) -> Result<PackageVersion> {
    content
        .lines()
        .find(|line| line.starts_with(VERSION_VARIABLE))
        .and_then(|line| line.split('=').nth(1))
        .map(|value| PackageVersion::new(value.trim().trim_matches('"')))
        .ok_or_else(|| MigrationError::VersionUndeterminedError {
            file: file.to_string(),
        })
}

pub fn read_version_from_entry_file<S: Storage + ?Sized>(
    storage: &S,
    package_name: &str,
) -> Result<PackageVersion> {
    let file = entry_file(package_name);
    let content = storage.read_to_string(&file)?;
    read_package_version(&content, &file)
}

/// 把 `__version__ = "<version>"` 換成執行期從套件 metadata 取得版本
///
/// 只比對與已知版本完全相同的字面值；找不到時不修改內容。
pub fn rewrite_version_statement(content: &str, version: &PackageVersion) -> Option<String> {
    let pattern = format!(
        r#"{}\s*=\s*"{}""#,
        VERSION_VARIABLE,
        regex::escape(version.as_str())
    );
    let re = Regex::new(&pattern).ok()?;

    re.is_match(content)
        .then(|| re.replace_all(content, NoExpand(DYNAMIC_VERSION)).into_owned())
}

/// `<pkg>/` → `src/<pkg>/`
pub fn move_package_to_src<S: Storage + ?Sized>(storage: &S, package_name: &str) -> Result<()> {
    let target = format!("src/{}", package_name);
    storage.rename(package_name, &target)?;
    tracing::info!("📦 Moved {} to {}", package_name, target);
    Ok(())
}

pub fn update_entry_file<S: Storage + ?Sized>(
    storage: &S,
    package_name: &str,
    version: &PackageVersion,
) -> Result<()> {
    let file = migrated_entry_file(package_name);
    let content = storage.read_to_string(&file)?;

    let rewritten = rewrite_version_statement(&content, version).ok_or_else(|| {
        MigrationError::VersionStatementNotFoundError {
            file: file.clone(),
            version: version.to_string(),
        }
    })?;

    storage.write(&file, &rewritten)?;
    tracing::info!("🔖 {} now reads its version from package metadata", file);
    Ok(())
}
