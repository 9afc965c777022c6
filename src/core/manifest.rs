use crate::core::constraints::{transform_dependencies, transform_optional_groups};
use crate::domain::model::{LegacyConfigRecord, PackageVersion, ProjectKind};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use toml::{Table, Value};

pub const MANIFEST_FILE: &str = "pyproject.toml";

/// 新版 pyproject.toml 中由遷移負責的 `[project]` 欄位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDocument {
    pub name: String,
    pub version: String,
    pub description: String,
    pub dependencies: Vec<String>,
    /// 至少有一個非空群組時才為 `Some`
    pub optional_dependencies: Option<Vec<(String, Vec<String>)>>,
    pub repository_url: String,
    pub scripts: Vec<(String, String)>,
}

impl ManifestDocument {
    pub fn build(
        record: &LegacyConfigRecord,
        kind: ProjectKind,
        package_name: &str,
        version: &PackageVersion,
    ) -> Self {
        let dependencies = transform_dependencies(&record.dependencies, kind)
            .iter()
            .map(ToString::to_string)
            .collect();

        // 微服務不遷移 extras
        let optional_dependencies = match (&record.optional_dependency_groups, kind) {
            (Some(groups), ProjectKind::Library) => {
                let rendered: Vec<(String, Vec<String>)> = transform_optional_groups(groups)
                    .into_iter()
                    .filter(|group| !group.dependencies.is_empty())
                    .map(|group| {
                        let deps = group.dependencies.iter().map(ToString::to_string).collect();
                        (group.name, deps)
                    })
                    .collect();
                (!rendered.is_empty()).then_some(rendered)
            }
            _ => None,
        };

        let scripts = record
            .console_scripts
            .as_ref()
            .map(|scripts| {
                scripts
                    .iter()
                    .map(|s| (s.name.clone(), s.target.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: package_name.to_string(),
            version: version.to_string(),
            description: record.description.clone(),
            dependencies,
            optional_dependencies,
            repository_url: record.repository_url.clone(),
            scripts,
        }
    }

    /// 寫入模板的 manifest 表格，其他區段與順序保持不變
    pub fn merge_into(&self, manifest: &mut Table) {
        let project = manifest
            .entry("project")
            .or_insert_with(|| Value::Table(Table::new()));
        if !project.is_table() {
            *project = Value::Table(Table::new());
        }
        if let Value::Table(project) = project {
            self.write_project(project);
        }
    }

    fn write_project(&self, project: &mut Table) {
        project.insert("name".to_string(), Value::String(self.name.clone()));
        project.insert("version".to_string(), Value::String(self.version.clone()));
        project.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        project.insert("dependencies".to_string(), string_array(&self.dependencies));

        match &self.optional_dependencies {
            Some(groups) => {
                let table: Table = groups
                    .iter()
                    .map(|(name, deps)| (name.clone(), string_array(deps)))
                    .collect();
                project.insert("optional-dependencies".to_string(), Value::Table(table));
            }
            None => {
                project.remove("optional-dependencies");
            }
        }

        let mut urls = Table::new();
        urls.insert(
            "Repository".to_string(),
            Value::String(self.repository_url.clone()),
        );
        project.insert("urls".to_string(), Value::Table(urls));

        let scripts: Table = self
            .scripts
            .iter()
            .map(|(name, target)| (name.clone(), Value::String(target.clone())))
            .collect();
        project.insert("scripts".to_string(), Value::Table(scripts));
    }
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// 讀取模板同步後的 pyproject.toml；不存在時從空表格開始
pub fn load_manifest_table<S: Storage + ?Sized>(storage: &S) -> Result<Table> {
    if !storage.exists(MANIFEST_FILE) {
        tracing::warn!("{} not found, starting from an empty manifest", MANIFEST_FILE);
        return Ok(Table::new());
    }
    let content = storage.read_to_string(MANIFEST_FILE)?;
    Ok(toml::from_str(&content)?)
}

pub fn render_manifest(manifest: &Table) -> Result<String> {
    Ok(toml::to_string_pretty(manifest)?)
}

/// 合併並寫出 manifest（尚未修正單元素陣列格式）
pub fn write_manifest<S: Storage + ?Sized>(storage: &S, document: &ManifestDocument) -> Result<()> {
    let mut manifest = load_manifest_table(storage)?;
    document.merge_into(&mut manifest);
    let rendered = render_manifest(&manifest)?;
    storage.write(MANIFEST_FILE, &rendered)?;
    tracing::info!("📝 Wrote {}", MANIFEST_FILE);
    Ok(())
}
