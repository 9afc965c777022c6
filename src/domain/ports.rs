use crate::utils::error::Result;

/// 以專案根目錄為基準的檔案存取
pub trait Storage {
    fn read_to_string(&self, path: &str) -> Result<String>;
    fn write(&self, path: &str, contents: &str) -> Result<()>;
    fn exists(&self, path: &str) -> bool;
    fn remove_file(&self, path: &str) -> Result<()>;
    /// 重新命名檔案或目錄，必要時建立目標的上層目錄
    fn rename(&self, from: &str, to: &str) -> Result<()>;
}

/// 互動輸入：顯示提示並讀取一行回覆
pub trait Operator {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// 委派給模板腳本的外部步驟，只回報成功或失敗
pub trait Collaborators {
    /// 從模板同步指定檔案；空清單表示同步全部
    fn sync_template_files(&self, paths: &[&str]) -> Result<()>;
    fn discover_package_name(&self) -> Result<String>;
    fn install_tools(&self, package_name: &str) -> Result<()>;
    fn list_outdated_dependencies(&self) -> Result<()>;
    fn update_lock_files(&self) -> Result<()>;
    fn update_hook_revisions(&self) -> Result<()>;
}
