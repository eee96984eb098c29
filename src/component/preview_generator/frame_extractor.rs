use super::label_rasterizer::escape_filter_value;
use crate::tools::{FfmpegRunner, ensure_directory_exists, seconds_to_time};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// 單一影片的暫存區
///
/// 存放擷取出的截圖，離開作用域時（成功、失敗或 panic）一律整個刪除。
pub struct ScratchArea {
    path: PathBuf,
    // 使用系統暫存目錄時由 TempDir 負責刪除
    managed: Option<TempDir>,
}

impl ScratchArea {
    /// 在系統暫存目錄下建立，或在指定目錄下建立 `<index>-<uuid>`
    pub fn acquire(base: Option<&Path>, index: usize) -> Result<Self> {
        match base {
            Some(base) => {
                let path = base.join(format!("{index}-{}", Uuid::new_v4()));
                ensure_directory_exists(&path)?;
                Ok(Self {
                    path,
                    managed: None,
                })
            }
            None => {
                let temp_dir = tempfile::Builder::new()
                    .prefix(&format!("video-previews-{index}-"))
                    .tempdir()
                    .context("無法建立暫存目錄")?;
                Ok(Self {
                    path: temp_dir.path().to_path_buf(),
                    managed: Some(temp_dir),
                })
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        if self.managed.is_none()
            && self.path.exists()
            && let Err(e) = fs::remove_dir_all(&self.path)
        {
            warn!("無法清理暫存目錄 {}: {}", self.path.display(), e);
        }
    }
}

/// 截圖擷取參數
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub source: PathBuf,
    pub interval_seconds: f64,
    /// 截圖尺寸（來源解析度，非格子尺寸）
    pub target_width: u32,
    pub target_height: u32,
    pub font: String,
    pub font_size: u32,
    pub outline_width: u32,
    /// 時間戳字體與外框的放大倍率
    pub font_scale: f64,
    pub capture_count: u32,
}

impl ExtractionRequest {
    #[must_use]
    pub fn scaled_font_size(&self) -> u32 {
        (f64::from(self.font_size) * self.font_scale).round() as u32
    }

    #[must_use]
    pub fn scaled_outline_width(&self) -> u32 {
        (f64::from(self.outline_width) * self.font_scale).round() as u32
    }

    /// 輸出檔名樣板，例如 63 格為 `%02d.jpg`
    ///
    /// fps 濾鏡可能在結尾多輸出一張，位數以 `capture_count + 1` 計算。
    #[must_use]
    pub fn output_pattern(&self) -> String {
        let digits = (u64::from(self.capture_count) + 1).to_string().len();
        format!("%0{digits}d.jpg")
    }
}

/// 截圖擷取器
///
/// 將截圖寫入 `scratch_dir`，回傳依時間排序的檔案列表。
/// 空列表由呼叫端視為該檔案的失敗。
pub trait FrameExtractor: Send + Sync {
    fn extract(&self, request: &ExtractionRequest, scratch_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// 以單一 ffmpeg 指令固定間隔擷取並燒入時間戳
pub struct FfmpegFrameExtractor<'a> {
    runner: &'a dyn FfmpegRunner,
}

impl<'a> FfmpegFrameExtractor<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn FfmpegRunner) -> Self {
        Self { runner }
    }
}

impl FrameExtractor for FfmpegFrameExtractor<'_> {
    fn extract(&self, request: &ExtractionRequest, scratch_dir: &Path) -> Result<Vec<PathBuf>> {
        ensure_directory_exists(scratch_dir)?;

        let output_pattern = scratch_dir.join(request.output_pattern());
        let args = vec![
            "-i".to_string(),
            request.source.to_string_lossy().to_string(),
            "-ss".to_string(),
            seconds_to_time(request.interval_seconds),
            "-vf".to_string(),
            build_snapshot_filter(request),
            output_pattern.to_string_lossy().to_string(),
        ];

        let output = self
            .runner
            .run(&args)
            .with_context(|| format!("無法擷取截圖: {}", request.source.display()))?;
        debug!("擷取輸出: {}", output.lines().last().unwrap_or_default());

        collect_snapshots(scratch_dir)
    }
}

/// 建立擷取用的濾鏡鏈：固定頻率取樣、縮放、燒入置中於底部的時間戳
#[must_use]
pub fn build_snapshot_filter(request: &ExtractionRequest) -> String {
    format!(
        "fps=1/{interval},scale={width}:{height},drawtext=font={font}:fontsize={size}:fontcolor=white:borderw={border}:bordercolor=black:x=(w-tw)/2:y=h-th-10:text='%{{pts\\:hms}}'",
        interval = request.interval_seconds,
        width = request.target_width,
        height = request.target_height,
        font = escape_filter_value(&request.font),
        size = request.scaled_font_size(),
        border = request.scaled_outline_width(),
    )
}

/// 收集暫存區內的 jpg 檔（不分大小寫），依檔名中的編號排序
pub fn collect_snapshots(scratch_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut snapshots: Vec<PathBuf> = fs::read_dir(scratch_dir)
        .with_context(|| format!("無法讀取暫存目錄: {}", scratch_dir.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"))
        })
        .collect();

    snapshots.sort_by_cached_key(|path| snapshot_sort_key(path));
    Ok(snapshots)
}

/// 數字檔名依數值排序，其餘排在後面並依名稱排序
fn snapshot_sort_key(path: &Path) -> (u64, String) {
    let number = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<u64>().ok())
        .unwrap_or(u64::MAX);
    (number, path.to_string_lossy().to_lowercase())
}
