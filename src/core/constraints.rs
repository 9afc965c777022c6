use crate::domain::model::{OptionalGroup, PackageReference, ProjectKind};

/// 主依賴：微服務放寬 `==` 為 `>=`，函式庫維持原樣
///
/// 函式庫的版本上限交給人工設定，見流程中的 capping 檢查點。
pub fn transform_dependencies(
    dependencies: &[PackageReference],
    kind: ProjectKind,
) -> Vec<PackageReference> {
    match kind {
        ProjectKind::Microservice => dependencies.iter().map(PackageReference::loosened).collect(),
        ProjectKind::Library => dependencies.to_vec(),
    }
}

/// 可選依賴群組一律放寬，與專案類型無關
pub fn transform_optional_groups(groups: &[OptionalGroup]) -> Vec<OptionalGroup> {
    groups
        .iter()
        .map(|group| OptionalGroup {
            name: group.name.clone(),
            dependencies: group
                .dependencies
                .iter()
                .map(PackageReference::loosened)
                .collect(),
        })
        .collect()
}
