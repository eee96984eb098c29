use super::error::PreviewError;
use super::grid_planner::GridLayout;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;
use std::path::{Path, PathBuf};

/// 預覽圖背景色
pub const BACKGROUND_COLOR: [u8; 3] = [0, 0, 0];

/// 合成預覽圖所需的繪圖操作
pub trait RasterCanvas {
    fn dimensions(&self) -> (u32, u32);
    fn fill(&mut self, color: [u8; 3]);
    /// 讀取圖片並縮放到 `width x height` 後貼上
    fn draw_image(
        &mut self,
        path: &Path,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), PreviewError>;
    /// 依 alpha 疊加圖片
    fn draw_overlay(&mut self, image: &RgbaImage, x: u32, y: u32);
    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, PreviewError>;
}

/// 以記憶體中的 RGBA 緩衝區實作畫布
pub struct ImageCanvas {
    buffer: RgbaImage,
}

impl ImageCanvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
        }
    }
}

impl RasterCanvas for ImageCanvas {
    fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    fn fill(&mut self, color: [u8; 3]) {
        let [r, g, b] = color;
        for pixel in self.buffer.pixels_mut() {
            *pixel = Rgba([r, g, b, 255]);
        }
    }

    fn draw_image(
        &mut self,
        path: &Path,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), PreviewError> {
        let snapshot = image::open(path)?
            .resize_exact(width, height, FilterType::Triangle)
            .into_rgba8();
        imageops::replace(&mut self.buffer, &snapshot, i64::from(x), i64::from(y));
        Ok(())
    }

    fn draw_overlay(&mut self, image: &RgbaImage, x: u32, y: u32) {
        imageops::overlay(&mut self.buffer, image, i64::from(x), i64::from(y));
    }

    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, PreviewError> {
        let rgb = DynamicImage::ImageRgba8(self.buffer.clone()).into_rgb8();
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)?;
        Ok(bytes)
    }
}

/// 將截圖依序排入網格，繪製標籤後編碼為 JPEG
///
/// 截圖不足時其餘格子保留背景色；多出的截圖忽略。
pub fn compose_contact_sheet<C: RasterCanvas>(
    canvas: &mut C,
    snapshots: &[PathBuf],
    layout: &GridLayout,
    border_width: u32,
    label: Option<&RgbaImage>,
    quality: u8,
) -> Result<Vec<u8>, PreviewError> {
    canvas.fill(BACKGROUND_COLOR);

    for row in 0..layout.rows {
        for column in 0..layout.columns {
            let index = (row * layout.columns + column) as usize;
            let Some(snapshot) = snapshots.get(index) else {
                continue;
            };

            let (x, y) = layout.cell_origin(column, row, border_width);
            canvas.draw_image(snapshot, x, y, layout.cell_width, layout.cell_height)?;
        }
    }

    if let Some(label) = label {
        canvas.draw_overlay(label, border_width, border_width);
    }

    let bytes = canvas.encode_jpeg(quality)?;
    if bytes.is_empty() {
        return Err(PreviewError::EmptyBuffer);
    }

    debug!(
        "合成 {}/{} 張截圖，{} bytes",
        snapshots.len().min(layout.cells() as usize),
        layout.cells(),
        bytes.len()
    );
    Ok(bytes)
}
