use crate::domain::model::loosen_pins;
use crate::domain::ports::{Collaborators, Storage};
use crate::utils::error::Result;

pub const UNPINNED_REQUIREMENTS: &str = "requirements.txt";
pub const LEGACY_DEV_COMMON: &str = "requirements-dev-common.txt";
pub const DEV_REQUIREMENTS: &str = "requirements-dev.txt";
pub const DEV_REQUIREMENTS_IN: &str = "requirements-dev.in";
pub const PRE_COMMIT_CONFIG: &str = ".pre-commit-config.yaml";

const OLD_COMMON_REFERENCE: &str = "common.txt";
const NEW_COMMON_REFERENCE: &str = "common.in";
const COMMON_INCLUDE: &str = "-r requirements-dev-common.in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevRequirementsOutcome {
    /// 既有的 common 參照已改名
    RenamedReference,
    /// 原本沒有參照，補上 include
    AppendedInclude,
    /// requirements-dev.txt 不存在
    Skipped,
}

/// 盡力刪除；檔案不存在或刪除失敗只記錄，不中斷流程
pub fn delete_best_effort<S: Storage + ?Sized>(storage: &S, path: &str) -> bool {
    if !storage.exists(path) {
        tracing::warn!("Skipped deleting {} because it doesn't exist", path);
        return false;
    }

    match storage.remove_file(path) {
        Ok(()) => {
            tracing::info!("🗑️ Deleted {}", path);
            true
        }
        Err(e) => {
            tracing::warn!("Skipped deleting {}: {}", path, e);
            false
        }
    }
}

/// 改寫 dev requirements 內容，回傳新內容與是否改名了既有參照
pub fn rewrite_dev_requirements(content: &str) -> (String, DevRequirementsOutcome) {
    let (updated, outcome) = if content.contains(OLD_COMMON_REFERENCE) {
        (
            content.replace(OLD_COMMON_REFERENCE, NEW_COMMON_REFERENCE),
            DevRequirementsOutcome::RenamedReference,
        )
    } else {
        let mut appended = content.to_string();
        if !appended.is_empty() && !appended.ends_with('\n') {
            appended.push('\n');
        }
        appended.push_str(COMMON_INCLUDE);
        appended.push('\n');
        (appended, DevRequirementsOutcome::AppendedInclude)
    };

    (loosen_pins(&updated), outcome)
}

/// 內容改寫必須在改副檔名之前完成
pub fn fix_dev_requirements<S: Storage + ?Sized>(storage: &S) -> Result<DevRequirementsOutcome> {
    if !storage.exists(DEV_REQUIREMENTS) {
        tracing::warn!("{} not found, skipping dev requirements rewrite", DEV_REQUIREMENTS);
        return Ok(DevRequirementsOutcome::Skipped);
    }

    let content = storage.read_to_string(DEV_REQUIREMENTS)?;
    let (updated, outcome) = rewrite_dev_requirements(&content);
    storage.write(DEV_REQUIREMENTS, &updated)?;
    storage.rename(DEV_REQUIREMENTS, DEV_REQUIREMENTS_IN)?;

    tracing::info!(
        "✏️ Rewrote {} as {} ({:?})",
        DEV_REQUIREMENTS,
        DEV_REQUIREMENTS_IN,
        outcome
    );
    Ok(outcome)
}

/// 刪除舊檔、改寫 dev requirements，再從模板重新產生 pre-commit 設定
pub fn cleanup_legacy_files<S, C>(storage: &S, collaborators: &C) -> Result<DevRequirementsOutcome>
where
    S: Storage + ?Sized,
    C: Collaborators + ?Sized,
{
    for path in [
        UNPINNED_REQUIREMENTS,
        // 舊模板留下的 .in，稍後由改寫後的 requirements-dev.txt 取代
        DEV_REQUIREMENTS_IN,
        LEGACY_DEV_COMMON,
    ] {
        delete_best_effort(storage, path);
    }

    // pre-commit 設定無論改寫成功與否都要重新產生，改寫錯誤留到最後回報
    let outcome = fix_dev_requirements(storage);
    if let Err(e) = &outcome {
        tracing::warn!("⚠️ Failed to rewrite {}: {}", DEV_REQUIREMENTS, e);
    }

    delete_best_effort(storage, PRE_COMMIT_CONFIG);
    collaborators.sync_template_files(&[PRE_COMMIT_CONFIG])?;

    outcome
}
