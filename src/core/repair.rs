use crate::core::manifest::MANIFEST_FILE;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;

// 緊接在 `=` 之後、只含一個雙引號字串且帶結尾逗號的陣列；
// 字串值內的 `[ "x" ]` 前面不是 `=`，不會被比對
static SINGLE_ELEMENT_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(=[ \t]*)\[\s*("(?:[^"\\\n]|\\.)*")\s*,\s*\]"#)
        .expect("valid single-element array pattern")
});

/// 將序列化後被展開成多行的單元素字串陣列收回成 `["value"]`
///
/// 純文字處理，空陣列、多元素陣列與已是單行的陣列保持原樣；重複套用結果不變。
pub fn repair_single_element_arrays(text: &str) -> String {
    SINGLE_ELEMENT_ARRAY.replace_all(text, "${1}[$2]").into_owned()
}

pub fn repair_manifest<S: Storage + ?Sized>(storage: &S) -> Result<bool> {
    let original = storage.read_to_string(MANIFEST_FILE)?;
    let repaired = repair_single_element_arrays(&original);
    let changed = repaired != original;

    if changed {
        storage.write(MANIFEST_FILE, &repaired)?;
        tracing::debug!("Collapsed single-element arrays in {}", MANIFEST_FILE);
    }

    Ok(changed)
}
