use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Manifest parse error: {0}")]
    ManifestParseError(#[from] toml::de::Error),

    #[error("Manifest serialization error: {0}")]
    ManifestSerializeError(#[from] toml::ser::Error),

    #[error("Missing section [{section}] in {file}")]
    MissingSectionError { file: String, section: String },

    #[error("Missing key '{key}' in section [{section}]")]
    MissingKeyError { section: String, key: String },

    #[error("Malformed entry in [{section}]: '{line}' ({reason})")]
    MalformedEntryError {
        section: String,
        line: String,
        reason: String,
    },

    #[error("Unable to determine version from {file}")]
    VersionUndeterminedError { file: String },

    #[error("No `__version__ = \"{version}\"` statement found in {file}")]
    VersionStatementNotFoundError { file: String, version: String },

    #[error("Operator input closed while waiting for: {prompt}")]
    OperatorInputClosed { prompt: String },

    #[error("Collaborator '{name}' failed: {message}")]
    CollaboratorError { name: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    LegacyDescriptor,
    Manifest,
    Layout,
    Operator,
    Collaborator,
    Configuration,
    FileSystem,
}

impl MigrationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingSectionError { .. }
            | Self::MissingKeyError { .. }
            | Self::MalformedEntryError { .. } => ErrorCategory::LegacyDescriptor,
            Self::ManifestParseError(_) | Self::ManifestSerializeError(_) => {
                ErrorCategory::Manifest
            }
            Self::VersionUndeterminedError { .. } | Self::VersionStatementNotFoundError { .. } => {
                ErrorCategory::Layout
            }
            Self::OperatorInputClosed { .. } => ErrorCategory::Operator,
            Self::CollaboratorError { .. } => ErrorCategory::Collaborator,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) => ErrorCategory::FileSystem,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::VersionStatementNotFoundError { .. } => ErrorSeverity::Low,
            Self::OperatorInputClosed { .. } | Self::CollaboratorError { .. } => {
                ErrorSeverity::Medium
            }
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingSectionError { .. } | Self::MissingKeyError { .. } => {
                "Make sure setup.cfg declares [metadata] description/url and [options] install_requires"
            }
            Self::MalformedEntryError { .. } => {
                "Fix the offending line in setup.cfg and run the migration again"
            }
            Self::VersionUndeterminedError { .. } => {
                "Add a `__version__ = \"x.y.z\"` line to the package's __init__.py"
            }
            Self::VersionStatementNotFoundError { .. } => {
                "Replace the version line in src/<package>/__init__.py by hand"
            }
            Self::ManifestParseError(_) | Self::ManifestSerializeError(_) => {
                "Check pyproject.toml for syntax errors after the template sync"
            }
            Self::OperatorInputClosed { .. } => "Run the migration from an interactive terminal",
            Self::CollaboratorError { .. } => {
                "Check the command configured for this step and rerun it by hand"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the migration configuration file"
            }
            Self::IoError(_) => "Check file permissions in the project directory",
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;
