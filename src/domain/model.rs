use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// 專案類型，決定依賴版本是否放寬以及是否遷移可選依賴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Microservice,
    Library,
}

impl ProjectKind {
    pub fn is_microservice(self) -> bool {
        matches!(self, Self::Microservice)
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Microservice => write!(f, "microservice"),
            Self::Library => write!(f, "library"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    ArbitraryEqual,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Compatible,
    Less,
    Greater,
}

impl ConstraintOp {
    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "===" => Self::ArbitraryEqual,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<=" => Self::LessEqual,
            ">=" => Self::GreaterEqual,
            "~=" => Self::Compatible,
            "<" => Self::Less,
            ">" => Self::Greater,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArbitraryEqual => "===",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Compatible => "~=",
            Self::Less => "<",
            Self::Greater => ">",
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    pub op: ConstraintOp,
    pub version: String,
}

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?(?:\s*\[[^\]]*\])?)\s*(.*)$")
        .expect("valid requirement name pattern")
});

static CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(===|==|!=|<=|>=|~=|<|>)\s*(\S+)$").expect("valid constraint pattern")
});

static EXACT_PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"===?").expect("valid pin pattern"));

/// 依賴參照：名稱（含 extras）、版本約束與環境標記
///
/// 保留原始文字，未經修改的參照輸出時逐位元組不變。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    raw: String,
    name: String,
    constraints: Vec<VersionConstraint>,
    marker: Option<String>,
}

impl PackageReference {
    /// 解析單行依賴，失敗時回傳原因
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let raw = line.trim().to_string();
        let (requirement, marker) = match raw.split_once(';') {
            Some((req, marker)) => (req.trim(), Some(marker.trim().to_string())),
            None => (raw.as_str(), None),
        };

        let caps = NAME_RE
            .captures(requirement)
            .ok_or_else(|| "missing project name".to_string())?;
        let name = caps[1].to_string();
        let rest = caps[2].trim();

        let constraints = if rest.is_empty() || rest.starts_with('@') {
            Vec::new()
        } else {
            let rest = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .unwrap_or(rest);
            rest.split(',')
                .map(|part| {
                    let part = part.trim();
                    let caps = CONSTRAINT_RE
                        .captures(part)
                        .ok_or_else(|| format!("invalid version constraint '{}'", part))?;
                    let op = ConstraintOp::parse(&caps[1])
                        .ok_or_else(|| format!("unknown operator '{}'", &caps[1]))?;
                    Ok(VersionConstraint {
                        op,
                        version: caps[2].to_string(),
                    })
                })
                .collect::<std::result::Result<Vec<_>, String>>()?
        };

        Ok(Self {
            raw,
            name,
            constraints,
            marker,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraints(&self) -> &[VersionConstraint] {
        &self.constraints
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 將所有 `==` 改為 `>=`；`===` 與環境標記內的比較不變
    pub fn loosened(&self) -> Self {
        Self {
            raw: loosen_pins(&self.raw),
            name: self.name.clone(),
            constraints: self
                .constraints
                .iter()
                .map(|c| VersionConstraint {
                    op: match c.op {
                        ConstraintOp::Equal => ConstraintOp::GreaterEqual,
                        op => op,
                    },
                    version: c.version.clone(),
                })
                .collect(),
            marker: self.marker.clone(),
        }
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 文字層級的 `==` → `>=`，逐行處理
///
/// `===` 不變；每行 `;` 之後的環境標記（如 `python_version == "3.10"`）也不變。
pub fn loosen_pins(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            let (requirement, marker) = line.split_at(line.find(';').unwrap_or(line.len()));
            let requirement = EXACT_PIN_RE.replace_all(requirement, |caps: &regex::Captures| {
                if &caps[0] == "===" {
                    "===".to_string()
                } else {
                    ">=".to_string()
                }
            });
            format!("{}{}", requirement, marker)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalGroup {
    pub name: String,
    pub dependencies: Vec<PackageReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleScript {
    pub name: String,
    pub target: String,
}

/// 舊版 setup.cfg 的結構化內容
///
/// `None` 表示區段未宣告，`Some(vec![])` 表示宣告但為空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyConfigRecord {
    pub description: String,
    pub repository_url: String,
    pub dependencies: Vec<PackageReference>,
    pub optional_dependency_groups: Option<Vec<OptionalGroup>>,
    pub console_scripts: Option<Vec<ConsoleScript>>,
}

/// 從入口檔讀出的版本字串，整個流程只讀一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion(String);

impl PackageVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pinned_reference() {
        let dep = PackageReference::parse("fastapi==0.95.1").unwrap();
        assert_eq!(dep.name(), "fastapi");
        assert_eq!(dep.constraints().len(), 1);
        assert_eq!(dep.constraints()[0].op, ConstraintOp::Equal);
        assert_eq!(dep.constraints()[0].version, "0.95.1");
        assert_eq!(dep.to_string(), "fastapi==0.95.1");
    }

    #[test]
    fn test_parse_extras_marker_and_ranges() {
        let dep =
            PackageReference::parse("uvicorn[standard]>=0.20,<1.0; python_version < \"3.11\"")
                .unwrap();
        assert_eq!(dep.name(), "uvicorn[standard]");
        assert_eq!(dep.constraints().len(), 2);
        assert_eq!(dep.constraints()[1].op, ConstraintOp::Less);
        assert_eq!(dep.marker(), Some("python_version < \"3.11\""));
    }

    #[test]
    fn test_parse_unconstrained_and_direct_reference() {
        assert!(PackageReference::parse("requests").unwrap().constraints().is_empty());
        let direct = PackageReference::parse("pkg @ https://example.com/pkg.whl").unwrap();
        assert_eq!(direct.name(), "pkg");
        assert!(direct.constraints().is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_name_and_bad_operator() {
        assert!(PackageReference::parse("==1.0").is_err());
        assert!(PackageReference::parse("pkg=1.0").is_err());
    }

    #[test]
    fn test_loosened_keeps_marker_and_arbitrary_equality() {
        let dep = PackageReference::parse("a==1.0; python_version == \"3.10\"").unwrap();
        assert_eq!(
            dep.loosened().as_str(),
            "a>=1.0; python_version == \"3.10\""
        );

        let arbitrary = PackageReference::parse("b===2.0").unwrap();
        assert_eq!(arbitrary.loosened().as_str(), "b===2.0");
    }

    #[test]
    fn test_loosen_pins_skips_markers_on_each_line() {
        let text = "a==1.0; python_version == \"3.10\"\nb==2.0\nc===3.0\n";
        assert_eq!(
            loosen_pins(text),
            "a>=1.0; python_version == \"3.10\"\nb>=2.0\nc===3.0\n"
        );
    }

    #[test]
    fn test_loosened_leaves_other_operators() {
        let dep = PackageReference::parse("c~=1.4,!=1.4.2").unwrap();
        assert_eq!(dep.loosened(), dep);
    }
}
