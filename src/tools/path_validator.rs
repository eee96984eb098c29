use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// 確認目標資料夾存在，並回傳其絕對路徑
pub fn resolve_target_folder(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        bail!("資料夾不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    path.canonicalize()
        .with_context(|| format!("無法取得絕對路徑: {}", path.display()))
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    Ok(())
}
