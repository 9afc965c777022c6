use crate::utils::error::{MigrationError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MigrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MigrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MigrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 命令必須至少包含可執行檔名稱
pub fn validate_command(field_name: &str, argv: &[String]) -> Result<()> {
    match argv.first() {
        Some(program) => validate_non_empty_string(field_name, program),
        None => Err(MigrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "Command cannot be empty".to_string(),
        }),
    }
}

/// 套件名稱必須是合法的 Python 識別字，因為它同時是目錄名稱與 import 名稱
pub fn validate_package_name(field_name: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest {
        return Err(MigrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Package name must be a valid Python identifier".to_string(),
        });
    }
    Ok(())
}
