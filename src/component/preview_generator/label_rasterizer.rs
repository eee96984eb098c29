use crate::tools::FfmpegRunner;
use anyhow::{Context, Result, bail};
use image::RgbaImage;
use std::fs;
use std::path::Path;

/// 檔名標籤的樣式與透明底圖尺寸
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStyle {
    pub font: String,
    pub font_size: u32,
    pub width: u32,
    pub height: u32,
}

/// 將文字繪製為透明底的 RGBA 圖片（白字、靠左上）
pub trait LabelRasterizer: Send + Sync {
    fn rasterize(&self, text: &str, style: &LabelStyle, scratch_dir: &Path) -> Result<RgbaImage>;
}

/// 使用 ffmpeg drawtext 在透明 lavfi 色塊上繪製文字
pub struct FfmpegLabelRasterizer<'a> {
    runner: &'a dyn FfmpegRunner,
}

impl<'a> FfmpegLabelRasterizer<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn FfmpegRunner) -> Self {
        Self { runner }
    }
}

impl LabelRasterizer for FfmpegLabelRasterizer<'_> {
    fn rasterize(&self, text: &str, style: &LabelStyle, scratch_dir: &Path) -> Result<RgbaImage> {
        // 文字寫入檔案，避免檔名中的特殊字元干擾濾鏡語法
        let text_path = scratch_dir.join("label.txt");
        let image_path = scratch_dir.join("label.png");
        fs::write(&text_path, text)
            .with_context(|| format!("無法寫入標籤文字: {}", text_path.display()))?;

        let args = vec![
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            format!("color=c=black@0.0:s={}x{}", style.width, style.height),
            "-vf".to_string(),
            build_label_filter(style, &text_path),
            "-frames:v".to_string(),
            "1".to_string(),
            "-y".to_string(),
            image_path.to_string_lossy().to_string(),
        ];
        self.runner.run(&args)?;

        if !image_path.exists() {
            bail!("標籤圖片未建立: {}", image_path.display());
        }

        let label = image::open(&image_path)
            .with_context(|| format!("無法讀取標籤圖片: {}", image_path.display()))?
            .into_rgba8();
        Ok(label)
    }
}

#[must_use]
pub fn build_label_filter(style: &LabelStyle, text_path: &Path) -> String {
    format!(
        "format=rgba,drawtext=font={}:fontsize={}:fontcolor=white:x=0:y=0:expansion=none:textfile={}",
        escape_filter_value(&style.font),
        style.font_size,
        escape_filter_value(&text_path.to_string_lossy())
    )
}

/// 跳脫濾鏡參數值（選項層與濾鏡圖層兩層）
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str(r"\\\\"),
            '\'' => escaped.push_str(r"\\\'"),
            ':' => escaped.push_str(r"\\:"),
            ',' | ';' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
