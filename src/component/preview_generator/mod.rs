//! 影片預覽圖生成元件
//!
//! 每部影片的流程：
//! A. 偵測長度與解析度（ffmpeg -i，含結尾驗證與完整解碼備援）
//! B. 計算網格排版與固定截圖間隔
//! C. 以單一 ffmpeg 指令擷取截圖並燒入時間戳
//! D. 合成網格、繪製檔名標籤並寫出 JPEG

mod duration_probe;
mod error;
mod frame_extractor;
mod grid_compositor;
mod grid_planner;
mod label_rasterizer;
mod main;
mod snapshot_scheduler;

pub use duration_probe::{
    DurationProbe, EMPTY_OUTPUT_ERROR, ProbeField, ProbeResult, is_ffmpeg_empty_output,
    parse_last_progress_time, parse_report,
};
pub use error::PreviewError;
pub use frame_extractor::{
    ExtractionRequest, FfmpegFrameExtractor, FrameExtractor, ScratchArea, build_snapshot_filter,
    collect_snapshots,
};
pub use grid_compositor::{BACKGROUND_COLOR, ImageCanvas, RasterCanvas, compose_contact_sheet};
pub use grid_planner::{GridError, GridLayout, GridSpec, LABEL_LINE_HEIGHT, plan_grid};
pub use label_rasterizer::{FfmpegLabelRasterizer, LabelRasterizer, LabelStyle};
pub use main::{
    BatchReport, FileOutcome, FileReport, PreviewGenerator, PreviewTools, SkipReason,
    label_style, progress_figures,
};
pub use snapshot_scheduler::{SnapshotSchedule, schedule_snapshots};
