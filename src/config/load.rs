use crate::cli::Cli;
use crate::config::types::{FilenameLabel, PreviewSettings};
use anyhow::{Result, bail};

/// JPEG 的單邊像素上限
const MAX_CANVAS_SIDE: u32 = 65_535;
const MAX_GRID_SIDE: u32 = 1_000;

impl PreviewSettings {
    /// 由命令列參數建立設定並驗證
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let temp_dir = cli
            .temp
            .as_ref()
            .filter(|path| !path.as_os_str().to_string_lossy().trim().is_empty())
            .cloned();

        let settings = Self {
            glob: cli.glob.clone(),
            width: cli.width,
            height: cli.height,
            quality: cli.quality,
            columns: cli.columns,
            rows: cli.rows,
            suffix: cli.suffix.clone(),
            font: cli.font.clone(),
            font_size: cli.font_size,
            outline_width: cli.outline_width,
            temp_dir,
            border_width: cli.border_width,
            overwrite: cli.overwrite,
            filename_label: FilenameLabel::from_flags(
                cli.add_filename,
                cli.add_filename_rel,
                cli.add_filename_abs,
            ),
            jobs: cli.jobs,
            min_size_bytes: cli.min_size,
            ffmpeg: cli.ffmpeg.clone(),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            bail!("JPEG 品質必須介於 0 到 100: {}", self.quality);
        }
        if self.width == 0 || self.height == 0 {
            bail!("預覽圖尺寸必須大於 0: {}x{}", self.width, self.height);
        }
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            bail!(
                "預覽圖尺寸不可超過 {MAX_CANVAS_SIDE}: {}x{}",
                self.width,
                self.height
            );
        }
        if self.columns == 0 || self.rows == 0 {
            bail!("欄數與列數必須大於 0: {}x{}", self.columns, self.rows);
        }
        if self.columns > MAX_GRID_SIDE || self.rows > MAX_GRID_SIDE {
            bail!(
                "欄數與列數不可超過 {MAX_GRID_SIDE}: {}x{}",
                self.columns,
                self.rows
            );
        }
        if self.jobs == 0 {
            bail!("同時處理數必須大於 0");
        }
        if self.suffix.is_empty() {
            bail!("預覽圖檔名後綴不可為空");
        }
        if self.glob.trim().is_empty() {
            bail!("glob 不可為空");
        }
        Ok(())
    }
}
