pub mod cli;
pub mod component;
pub mod config;
pub mod init;
pub mod signal;
pub mod tools;

use anyhow::Result;
use component::preview_generator::{
    BatchReport, FfmpegFrameExtractor, FfmpegLabelRasterizer, PreviewGenerator, PreviewTools,
};
use config::PreviewSettings;
use console::style;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tools::{GlobPattern, SystemFfmpeg, resolve_target_folder, scan_video_files};

/// 以系統 ffmpeg 為資料夾內的影片產生預覽圖
pub fn run(
    folder: &Path,
    settings: &PreviewSettings,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<BatchReport> {
    let ffmpeg = SystemFfmpeg::new(&settings.ffmpeg);
    if !ffmpeg.is_available() {
        warn!("找不到 ffmpeg 或不在 PATH 中: {}", settings.ffmpeg.display());
        println!(
            "{}",
            style("找不到 ffmpeg 執行檔或不在 PATH 中，所有影片可能都會處理失敗").red()
        );
    }

    let extractor = FfmpegFrameExtractor::new(&ffmpeg);
    let label_rasterizer = FfmpegLabelRasterizer::new(&ffmpeg);
    let tools = PreviewTools {
        runner: &ffmpeg,
        extractor: &extractor,
        label_rasterizer: &label_rasterizer,
    };

    run_with_tools(folder, settings, tools, shutdown_signal)
}

/// 掃描資料夾並以指定的外部工具執行批次
///
/// 資料夾不存在時直接回傳錯誤，不處理任何檔案。
pub fn run_with_tools(
    folder: &Path,
    settings: &PreviewSettings,
    tools: PreviewTools<'_>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<BatchReport> {
    let folder = resolve_target_folder(folder)?;
    let glob = GlobPattern::new(&settings.glob)?;

    println!("{}", style("=== 影片預覽圖生成 ===").cyan().bold());
    info!("掃描 {}（{}）", folder.display(), glob.as_str());
    let candidates = scan_video_files(&folder, &glob)?;

    let generator = PreviewGenerator::new(settings, &folder, tools, shutdown_signal);
    let report = generator.run(&candidates);

    print_summary(&report);
    Ok(report)
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", style("=== 預覽圖生成摘要 ===").cyan().bold());
    println!("  總計: {} 個檔案", report.files.len());
    println!("  成功: {} 個", style(report.generated()).green());

    if report.skipped() > 0 {
        println!("  跳過: {} 個", style(report.skipped()).yellow());
    }

    if report.failed() > 0 {
        println!("  失敗: {} 個", style(report.failed()).red());
    }

    info!(
        "預覽圖生成完成 - 成功: {}, 跳過: {}, 失敗: {}",
        report.generated(),
        report.skipped(),
        report.failed()
    );
}
