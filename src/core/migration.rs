use crate::core::checkpoint::{ask_yes_no, checkpoint};
use crate::core::cleanup::cleanup_legacy_files;
use crate::core::layout::{move_package_to_src, read_version_from_entry_file, update_entry_file};
use crate::core::legacy_config::read_legacy_config;
use crate::core::manifest::{write_manifest, ManifestDocument};
use crate::core::repair::repair_manifest;
use crate::domain::model::{PackageVersion, ProjectKind};
use crate::domain::ports::{Collaborators, Operator, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_package_name;
use std::fmt;
use std::time::{Duration, Instant};

const KIND_QUESTION: &str = "Is this a microservice (i.e. not a library?) (y/n)";
const REVIEW_MANIFEST: &str = "Please review pyproject.toml in the root dir closely. Fix any errors.";
const CAP_LIBRARY: &str = "If this is a library, cap the dependencies in pyproject.toml.";
const REVIEW_OUTDATED: &str =
    "Review the list above. Consider updating any outdated dependencies now.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Skipped,
    /// 失敗但不影響後續步驟，需人工處理
    Warned(String),
}

#[derive(Debug, Clone)]
pub struct StepRecord {
    pub name: &'static str,
    pub status: StepStatus,
    pub duration: Duration,
}

/// 一次遷移的執行摘要
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub kind: ProjectKind,
    pub package_name: String,
    pub version: PackageVersion,
    pub steps: Vec<StepRecord>,
}

impl MigrationReport {
    pub fn warnings(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.steps.iter().filter_map(|step| match &step.status {
            StepStatus::Warned(message) => Some((step.name, message.as_str())),
            _ => None,
        })
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.name == name)
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Migrated {} {} ({}) in {:?}",
            self.kind,
            self.package_name,
            self.version,
            self.total_duration()
        )?;
        for step in &self.steps {
            let status = match &step.status {
                StepStatus::Completed => "done".to_string(),
                StepStatus::Skipped => "skipped".to_string(),
                StepStatus::Warned(message) => format!("needs attention: {}", message),
            };
            writeln!(f, "  - {}: {}", step.name, status)?;
        }
        Ok(())
    }
}

/// 依固定順序執行整個遷移；已完成的步驟不會回滾
pub struct MigrationEngine<S: Storage, C: Collaborators, O: Operator> {
    storage: S,
    collaborators: C,
    operator: O,
    package_name_override: Option<String>,
    steps: Vec<StepRecord>,
}

impl<S: Storage, C: Collaborators, O: Operator> MigrationEngine<S, C, O> {
    pub fn new(storage: S, collaborators: C, operator: O) -> Self {
        Self {
            storage,
            collaborators,
            operator,
            package_name_override: None,
            steps: Vec::new(),
        }
    }

    pub fn with_package_name(mut self, package_name: Option<String>) -> Self {
        self.package_name_override = package_name;
        self
    }

    pub fn into_parts(self) -> (S, C, O) {
        (self.storage, self.collaborators, self.operator)
    }

    pub fn run(&mut self) -> Result<MigrationReport> {
        tracing::info!("🚀 Starting template migration");
        self.steps.clear();

        // 以下步驟失敗即中止，此時尚未修改任何檔案
        let kind = self.step("decide project kind", |e| e.decide_kind())?;
        let package_name = self.step("discover package name", |e| e.package_name())?;
        let version = self.step("read package version", |e| {
            read_version_from_entry_file(&e.storage, &package_name)
        })?;
        let record = self.step("read legacy config", |e| read_legacy_config(&e.storage))?;

        tracing::info!("PACKAGE_NAME: {}", package_name);
        tracing::info!("VERSION: {}", version);
        tracing::info!("KIND: {}", kind);

        self.step("sync template files", |e| {
            e.collaborators.sync_template_files(&[])
        })?;
        self.step("write manifest", |e| {
            let document = ManifestDocument::build(&record, kind, &package_name, &version);
            write_manifest(&e.storage, &document)
        })?;
        self.step("repair manifest", |e| repair_manifest(&e.storage).map(|_| ()))?;
        self.step("review manifest", |e| checkpoint(&mut e.operator, REVIEW_MANIFEST))?;

        // 函式庫的版本上限不易自動化，交由人工設定
        if kind == ProjectKind::Library {
            self.step("cap library dependencies", |e| {
                checkpoint(&mut e.operator, CAP_LIBRARY)
            })?;
        } else {
            self.skip("cap library dependencies");
        }

        self.step("move package to src", |e| {
            move_package_to_src(&e.storage, &package_name)
        })?;
        self.soft_step("rewrite version statement", |e| {
            update_entry_file(&e.storage, &package_name, &version)
        });
        self.soft_step("clean up legacy files", |e| {
            cleanup_legacy_files(&e.storage, &e.collaborators).map(|_| ())
        });

        self.soft_step("install tools", |e| {
            e.collaborators.install_tools(&package_name)
        });
        self.soft_step("list outdated dependencies", |e| {
            e.collaborators.list_outdated_dependencies()
        });
        self.step("review outdated dependencies", |e| {
            checkpoint(&mut e.operator, REVIEW_OUTDATED)
        })?;

        tracing::info!("⏳ Building lock files. This could take a few minutes...");
        self.soft_step("update lock files", |e| e.collaborators.update_lock_files());

        tracing::info!("⏳ Updating pre-commit-hook versions...");
        self.soft_step("update hook revisions", |e| {
            e.collaborators.update_hook_revisions()
        });

        tracing::info!("✅ Done - rebuild the dev container");

        Ok(MigrationReport {
            kind,
            package_name,
            version,
            steps: std::mem::take(&mut self.steps),
        })
    }

    fn decide_kind(&mut self) -> Result<ProjectKind> {
        let is_microservice = ask_yes_no(&mut self.operator, KIND_QUESTION)?;
        Ok(if is_microservice {
            ProjectKind::Microservice
        } else {
            ProjectKind::Library
        })
    }

    fn package_name(&mut self) -> Result<String> {
        let name = match &self.package_name_override {
            Some(name) => name.clone(),
            None => self.collaborators.discover_package_name()?,
        };
        validate_package_name("package_name", &name)?;
        Ok(name)
    }

    fn step<T>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start_time = Instant::now();
        tracing::debug!("▶️ {}", name);

        match f(self) {
            Ok(value) => {
                self.record(name, StepStatus::Completed, start_time);
                Ok(value)
            }
            Err(e) => {
                tracing::error!("❌ Step '{}' failed: {}", name, e);
                Err(e)
            }
        }
    }

    /// 失敗只記錄警告，流程繼續
    fn soft_step(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> Result<()>) {
        let start_time = Instant::now();
        tracing::debug!("▶️ {}", name);

        let status = match f(self) {
            Ok(()) => StepStatus::Completed,
            Err(e) => {
                tracing::warn!("⚠️ Step '{}' needs manual attention: {}", name, e);
                tracing::warn!("💡 {}", e.recovery_suggestion());
                StepStatus::Warned(e.to_string())
            }
        };
        self.record(name, status, start_time);
    }

    fn skip(&mut self, name: &'static str) {
        tracing::info!("⏭️ Skipping step: {} (condition not met)", name);
        self.steps.push(StepRecord {
            name,
            status: StepStatus::Skipped,
            duration: Duration::ZERO,
        });
    }

    fn record(&mut self, name: &'static str, status: StepStatus, start_time: Instant) {
        let duration = start_time.elapsed();
        tracing::debug!("Step '{}' finished in {:?}", name, duration);
        self.steps.push(StepRecord {
            name,
            status,
            duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_warnings() {
        let report = MigrationReport {
            kind: ProjectKind::Library,
            package_name: "lib".to_string(),
            version: PackageVersion::new("1.0.0"),
            steps: vec![
                StepRecord {
                    name: "move package to src",
                    status: StepStatus::Completed,
                    duration: Duration::from_millis(5),
                },
                StepRecord {
                    name: "rewrite version statement",
                    status: StepStatus::Warned("not found".to_string()),
                    duration: Duration::from_millis(1),
                },
            ],
        };

        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings, vec![("rewrite version statement", "not found")]);
        assert_eq!(report.total_duration(), Duration::from_millis(6));

        let rendered = report.to_string();
        assert!(rendered.starts_with("Migrated library lib (1.0.0)"));
        assert!(rendered.contains("rewrite version statement: needs attention: not found"));
    }
}
