use crate::domain::model::{ConsoleScript, LegacyConfigRecord, OptionalGroup, PackageReference};
use crate::domain::ports::Storage;
use crate::utils::error::{MigrationError, Result};

pub const LEGACY_DESCRIPTOR: &str = "setup.cfg";

const METADATA: &str = "metadata";
const OPTIONS: &str = "options";
const EXTRAS_REQUIRE: &str = "options.extras_require";
const ENTRY_POINTS: &str = "options.entry_points";

#[derive(Debug, Clone, Default)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

/// setup.cfg 使用的 INI 子集：區段、`key = value`、縮排續行、整行註解
#[derive(Debug, Clone, Default)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn parse(content: &str) -> Result<Self> {
        let mut doc = IniDocument::default();
        let mut current: Option<usize> = None;
        let mut current_key: Option<String> = None;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                // 多行值中的空行保留，拆分清單時再濾掉
                if let (Some(idx), Some(key)) = (current, &current_key) {
                    let section = &mut doc.sections[idx];
                    if let Some(entry) = section.entries.iter_mut().find(|(k, _)| k == key) {
                        entry.1.push('\n');
                    }
                }
                continue;
            }

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = line.starts_with(char::is_whitespace);
            if indented {
                if let (Some(idx), Some(key)) = (current, &current_key) {
                    let section = &mut doc.sections[idx];
                    if let Some(entry) = section.entries.iter_mut().find(|(k, _)| k == key) {
                        entry.1.push('\n');
                        entry.1.push_str(trimmed);
                        continue;
                    }
                }
            }

            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                current = Some(doc.section_index(name.trim()));
                current_key = None;
                continue;
            }

            let idx = current.ok_or_else(|| MigrationError::MalformedEntryError {
                section: "<none>".to_string(),
                line: trimmed.to_string(),
                reason: "entry outside of any section".to_string(),
            })?;

            let split_at = trimmed
                .find(['=', ':'])
                .ok_or_else(|| MigrationError::MalformedEntryError {
                    section: doc.sections[idx].name.clone(),
                    line: trimmed.to_string(),
                    reason: "expected `key = value`".to_string(),
                })?;
            let key = trimmed[..split_at].trim().to_lowercase();
            let value = trimmed[split_at + 1..].trim().to_string();

            doc.sections[idx].set(key.clone(), value);
            current_key = Some(key);
        }

        // 與 configparser 相同，去除值尾端多餘的空行
        for section in &mut doc.sections {
            for (_, value) in &mut section.entries {
                let trimmed_len = value.trim_end().len();
                value.truncate(trimmed_len);
            }
        }

        Ok(doc)
    }

    fn section_index(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(IniSection {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        }
    }

    fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }
}

/// 從專案目錄讀取 setup.cfg
pub fn read_legacy_config<S: Storage + ?Sized>(storage: &S) -> Result<LegacyConfigRecord> {
    let content = storage.read_to_string(LEGACY_DESCRIPTOR)?;
    parse_legacy_config(&content)
}

/// 解析五個欄位：description、url、install_requires、extras_require、console_scripts
pub fn parse_legacy_config(content: &str) -> Result<LegacyConfigRecord> {
    let doc = IniDocument::parse(content)?;

    let metadata = require_section(&doc, METADATA)?;
    let options = require_section(&doc, OPTIONS)?;

    let description = require_key(metadata, "description")?.to_string();
    let repository_url = require_key(metadata, "url")?.to_string();
    let dependencies = parse_requirement_lines(OPTIONS, require_key(options, "install_requires")?)?;

    let optional_dependency_groups = doc
        .section(EXTRAS_REQUIRE)
        .map(|section| {
            section
                .entries
                .iter()
                .map(|(group, deps)| {
                    Ok(OptionalGroup {
                        name: group.clone(),
                        dependencies: parse_requirement_lines(EXTRAS_REQUIRE, deps)?,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    let console_scripts = doc
        .section(ENTRY_POINTS)
        .map(|section| match section.get("console_scripts") {
            Some(value) => parse_console_scripts(value),
            None => Ok(Vec::new()),
        })
        .transpose()?;

    tracing::debug!(
        "Read {} dependencies, extras declared: {}, scripts declared: {}",
        dependencies.len(),
        optional_dependency_groups.is_some(),
        console_scripts.is_some()
    );

    Ok(LegacyConfigRecord {
        description,
        repository_url,
        dependencies,
        optional_dependency_groups,
        console_scripts,
    })
}

fn require_section<'a>(doc: &'a IniDocument, name: &str) -> Result<&'a IniSection> {
    doc.section(name)
        .ok_or_else(|| MigrationError::MissingSectionError {
            file: LEGACY_DESCRIPTOR.to_string(),
            section: name.to_string(),
        })
}

fn require_key<'a>(section: &'a IniSection, key: &str) -> Result<&'a str> {
    section.get(key).ok_or_else(|| MigrationError::MissingKeyError {
        section: section.name.clone(),
        key: key.to_string(),
    })
}

fn non_empty_lines(value: &str) -> impl Iterator<Item = &str> {
    value.trim().lines().map(str::trim).filter(|l| !l.is_empty())
}

/// 去掉行尾的 ` #` 註解，與 setuptools 讀取需求清單的方式一致
fn strip_inline_comment(line: &str) -> &str {
    line.match_indices('#')
        .find(|(idx, _)| line[..*idx].ends_with(char::is_whitespace))
        .map_or(line, |(idx, _)| line[..idx].trim_end())
}

fn parse_requirement_lines(section: &str, value: &str) -> Result<Vec<PackageReference>> {
    non_empty_lines(value)
        .map(strip_inline_comment)
        .filter(|line| !line.is_empty())
        .map(|line| {
            PackageReference::parse(line).map_err(|reason| MigrationError::MalformedEntryError {
                section: section.to_string(),
                line: line.to_string(),
                reason,
            })
        })
        .collect()
}

fn parse_console_scripts(value: &str) -> Result<Vec<ConsoleScript>> {
    non_empty_lines(value)
        .map(|line| {
            let (name, target) =
                line.split_once('=')
                    .ok_or_else(|| MigrationError::MalformedEntryError {
                        section: ENTRY_POINTS.to_string(),
                        line: line.to_string(),
                        reason: "console script must be `name = target`".to_string(),
                    })?;
            Ok(ConsoleScript {
                name: name.trim().to_string(),
                target: target.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CFG: &str = r#"
[metadata]
name = my_lib
description = A shared library
url = https://github.com/org/my_lib

[options]
packages = find:
install_requires =
    httpx==0.24.0

    pydantic>=1.10
# trailing comment

[options.extras_require]
server =
    fastapi==0.95.1
empty =

[options.entry_points]
console_scripts =
    my-cli = my_lib.cli:main
    other = my_lib.other:run
"#;

    #[test]
    fn test_parse_full_descriptor() {
        let record = parse_legacy_config(FULL_CFG).unwrap();

        assert_eq!(record.description, "A shared library");
        assert_eq!(record.repository_url, "https://github.com/org/my_lib");
        let deps: Vec<&str> = record.dependencies.iter().map(|d| d.as_str()).collect();
        assert_eq!(deps, vec!["httpx==0.24.0", "pydantic>=1.10"]);

        let groups = record.optional_dependency_groups.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "server");
        assert_eq!(groups[0].dependencies[0].as_str(), "fastapi==0.95.1");
        assert_eq!(groups[1].name, "empty");
        assert!(groups[1].dependencies.is_empty());

        let scripts = record.console_scripts.unwrap();
        assert_eq!(
            scripts[0],
            ConsoleScript {
                name: "my-cli".to_string(),
                target: "my_lib.cli:main".to_string(),
            }
        );
        assert_eq!(scripts.len(), 2);
    }

    #[test]
    fn test_requirement_inline_comments_are_dropped() {
        let cfg = "[metadata]\ndescription = foo\nurl = bar\n[options]\ninstall_requires =\n    httpx==0.24.0  # pinned for tls\n    pydantic>=1.10\t# v1 api\n";
        let record = parse_legacy_config(cfg).unwrap();

        let deps: Vec<&str> = record.dependencies.iter().map(|d| d.as_str()).collect();
        assert_eq!(deps, vec!["httpx==0.24.0", "pydantic>=1.10"]);
        assert_eq!(record.dependencies[0].constraints()[0].version, "0.24.0");
    }

    #[test]
    fn test_absent_optional_sections_are_none() {
        let cfg = "[metadata]\ndescription = foo\nurl = bar\n[options]\ninstall_requires =\n    a==1.0\n";
        let record = parse_legacy_config(cfg).unwrap();
        assert!(record.optional_dependency_groups.is_none());
        assert!(record.console_scripts.is_none());
    }

    #[test]
    fn test_entry_points_without_console_scripts_is_empty() {
        let cfg = "[metadata]\ndescription = foo\nurl = bar\n[options]\ninstall_requires = a\n[options.entry_points]\n";
        let record = parse_legacy_config(cfg).unwrap();
        assert_eq!(record.console_scripts, Some(Vec::new()));
    }

    #[test]
    fn test_missing_sections() {
        let err = parse_legacy_config("[options]\ninstall_requires = a\n").unwrap_err();
        assert!(matches!(
            err,
            MigrationError::MissingSectionError { ref section, .. } if section == "metadata"
        ));

        let err = parse_legacy_config("[metadata]\ndescription = foo\nurl = bar\n").unwrap_err();
        assert!(matches!(
            err,
            MigrationError::MissingSectionError { ref section, .. } if section == "options"
        ));
    }

    #[test]
    fn test_missing_install_requires() {
        let err = parse_legacy_config("[metadata]\ndescription = foo\nurl = bar\n[options]\n")
            .unwrap_err();
        assert!(matches!(err, MigrationError::MissingKeyError { ref key, .. } if key == "install_requires"));
    }

    #[test]
    fn test_console_script_without_separator_is_malformed() {
        let cfg = "[metadata]\ndescription = foo\nurl = bar\n[options]\ninstall_requires = a\n[options.entry_points]\nconsole_scripts =\n    broken-entry\n";
        let err = parse_legacy_config(cfg).unwrap_err();
        assert!(matches!(err, MigrationError::MalformedEntryError { ref line, .. } if line == "broken-entry"));
    }

    #[test]
    fn test_keys_are_lowercased_and_colon_separator_accepted() {
        let doc = IniDocument::parse("[metadata]\nDescription: hello\n").unwrap();
        assert_eq!(doc.get("metadata", "description"), Some("hello"));
        assert!(doc.has_section("metadata"));
    }

    #[test]
    fn test_entry_outside_section_is_malformed() {
        assert!(IniDocument::parse("key = value\n").is_err());
    }
}
