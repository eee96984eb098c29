use crate::component::preview_generator::GridSpec;
use crate::tools::DEFAULT_VIDEO_GLOB;
use std::path::{Path, PathBuf};

/// 小於等於此大小的檔案通常不是有效影片
pub const DEFAULT_MIN_SIZE_BYTES: u64 = 1024 * 1024;

/// 預覽圖頂部的檔名標籤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilenameLabel {
    #[default]
    None,
    /// 僅檔名
    Bare,
    /// 相對於掃描資料夾的路徑
    Relative,
    /// 絕對路徑
    Absolute,
}

impl FilenameLabel {
    /// 多個旗標同時設定時，優先順序為絕對、相對、檔名
    #[must_use]
    pub const fn from_flags(bare: bool, relative: bool, absolute: bool) -> Self {
        if absolute {
            Self::Absolute
        } else if relative {
            Self::Relative
        } else if bare {
            Self::Bare
        } else {
            Self::None
        }
    }

    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub fn text_for(self, video: &Path, folder: &Path) -> Option<String> {
        match self {
            Self::None => None,
            Self::Absolute => Some(video.to_string_lossy().to_string()),
            Self::Relative => Some(
                video
                    .strip_prefix(folder)
                    .unwrap_or(video)
                    .to_string_lossy()
                    .to_string(),
            ),
            Self::Bare => video
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
        }
    }
}

/// 預覽圖生成設定
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    pub glob: String,
    pub width: u32,
    pub height: u32,
    /// JPEG 品質 (0-100)
    pub quality: u8,
    pub columns: u32,
    pub rows: u32,
    pub suffix: String,
    pub font: String,
    pub font_size: u32,
    pub outline_width: u32,
    /// 暫存目錄的上層；`None` 使用系統暫存目錄
    pub temp_dir: Option<PathBuf>,
    pub border_width: u32,
    pub overwrite: bool,
    pub filename_label: FilenameLabel,
    /// 同時處理的影片數；1 為依序處理
    pub jobs: usize,
    pub min_size_bytes: u64,
    pub ffmpeg: PathBuf,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            glob: DEFAULT_VIDEO_GLOB.to_string(),
            width: 1920,
            height: 1080,
            quality: 100,
            columns: 9,
            rows: 7,
            suffix: ".preview.jpg".to_string(),
            font: "Arial".to_string(),
            font_size: 16,
            outline_width: 1,
            temp_dir: None,
            border_width: 2,
            overwrite: false,
            filename_label: FilenameLabel::None,
            jobs: 1,
            min_size_bytes: DEFAULT_MIN_SIZE_BYTES,
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl PreviewSettings {
    #[must_use]
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            canvas_width: self.width,
            canvas_height: self.height,
            columns: self.columns,
            rows: self.rows,
            border_width: self.border_width,
            label_font_size: self
                .filename_label
                .is_enabled()
                .then_some(self.font_size),
        }
    }

    /// 預覽圖路徑：`<資料夾>/<不含副檔名的檔名><suffix>`
    #[must_use]
    pub fn preview_path(&self, video: &Path) -> PathBuf {
        let stem = video
            .file_stem()
            .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());
        let parent = video.parent().unwrap_or(Path::new("."));
        parent.join(format!("{stem}{}", self.suffix))
    }
}
