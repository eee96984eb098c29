use super::duration_probe::DurationProbe;
use super::error::PreviewError;
use super::frame_extractor::{ExtractionRequest, FrameExtractor, ScratchArea};
use super::grid_compositor::{ImageCanvas, RasterCanvas, compose_contact_sheet};
use super::grid_planner::{LABEL_LINE_HEIGHT, plan_grid};
use super::label_rasterizer::{LabelRasterizer, LabelStyle};
use super::snapshot_scheduler::schedule_snapshots;
use crate::config::PreviewSettings;
use crate::tools::{FfmpegRunner, VideoCandidate, compare_paths_case_insensitive};
use console::style;
use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 檔案太小，通常不含有效影片
    TooSmall,
    /// 預覽圖已存在且未要求覆寫
    AlreadyExists,
    /// 收到中斷訊號，未開始處理
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Generated(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// 批次處理結果，依候選檔案順序排列
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    #[must_use]
    pub fn generated(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Generated(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| predicate(&f.outcome)).count()
    }
}

/// 外部工具的組合：探測用 ffmpeg、截圖擷取器與標籤繪製器
pub struct PreviewTools<'a> {
    pub runner: &'a dyn FfmpegRunner,
    pub extractor: &'a dyn FrameExtractor,
    pub label_rasterizer: &'a dyn LabelRasterizer,
}

/// 預覽圖批次生成器
///
/// 每部影片的流程：
/// A. 偵測長度與解析度
/// B. 計算網格排版與截圖間隔
/// C. 擷取截圖到暫存區
/// D. 合成網格並寫出 JPEG
pub struct PreviewGenerator<'a> {
    settings: &'a PreviewSettings,
    folder: PathBuf,
    tools: PreviewTools<'a>,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a> PreviewGenerator<'a> {
    #[must_use]
    pub fn new(
        settings: &'a PreviewSettings,
        folder: &Path,
        tools: PreviewTools<'a>,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            settings,
            folder: folder.to_path_buf(),
            tools,
            shutdown_signal,
        }
    }

    pub fn run(&self, candidates: &[VideoCandidate]) -> BatchReport {
        let mut sorted = candidates.to_vec();
        sorted.sort_by(|a, b| compare_paths_case_insensitive(&a.path, &b.path));

        let mut files = Vec::with_capacity(sorted.len());
        let mut pending = Vec::new();

        for candidate in sorted {
            match self.skip_reason(&candidate) {
                Some(reason) => {
                    debug!("略過 {}: {reason:?}", candidate.path.display());
                    files.push(FileReport {
                        path: candidate.path,
                        outcome: FileOutcome::Skipped(reason),
                    });
                }
                None => {
                    pending.push(files.len());
                    files.push(FileReport {
                        path: candidate.path,
                        outcome: FileOutcome::Skipped(SkipReason::Interrupted),
                    });
                }
            }
        }

        println!(
            "{}",
            style(format!("找到 {} 個需要處理的影片檔案", pending.len())).magenta()
        );
        info!("找到 {} 個需要處理的影片檔案", pending.len());

        let progress = BatchProgress::new(pending.len());
        let jobs: Vec<(usize, PathBuf)> = pending
            .iter()
            .enumerate()
            .map(|(order, &slot)| (order, files[slot].path.clone()))
            .collect();

        let outcomes = self.process_all(&jobs, &progress);
        for (&slot, outcome) in pending.iter().zip(outcomes) {
            files[slot].outcome = outcome;
        }

        progress.finish();
        BatchReport { files }
    }

    fn skip_reason(&self, candidate: &VideoCandidate) -> Option<SkipReason> {
        if candidate.size <= self.settings.min_size_bytes {
            return Some(SkipReason::TooSmall);
        }
        if !self.settings.overwrite && self.settings.preview_path(&candidate.path).exists() {
            return Some(SkipReason::AlreadyExists);
        }
        None
    }

    fn process_all(&self, jobs: &[(usize, PathBuf)], progress: &BatchProgress) -> Vec<FileOutcome> {
        if self.settings.jobs > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.settings.jobs)
                .build()
            {
                Ok(pool) => {
                    return pool.install(|| {
                        jobs.par_iter()
                            .map(|(index, path)| self.process_one(*index, path, progress))
                            .collect()
                    });
                }
                Err(e) => warn!("無法建立執行緒池，改為依序處理: {e}"),
            }
        }

        jobs.iter()
            .map(|(index, path)| self.process_one(*index, path, progress))
            .collect()
    }

    fn process_one(&self, index: usize, video: &Path, progress: &BatchProgress) -> FileOutcome {
        if self.shutdown_signal.load(Ordering::SeqCst) {
            return FileOutcome::Skipped(SkipReason::Interrupted);
        }

        progress.println(format!(
            "{} {}",
            style("處理中").cyan(),
            style(video.display()).bold()
        ));
        info!("處理中: {}", video.display());

        let outcome = match self.process_single_video(index, video) {
            Ok(output) => {
                progress.println(format!(
                    "  {} 預覽圖已建立: {}",
                    style("✓").green(),
                    output.display()
                ));
                info!("預覽圖已建立: {} -> {}", video.display(), output.display());
                FileOutcome::Generated(output)
            }
            Err(e) => {
                progress.println(format!("  {} 處理失敗: {}", style("✗").red(), e));
                error!("處理影片失敗 {}: {e}", video.display());
                FileOutcome::Failed(e.to_string())
            }
        };

        progress.advance();
        outcome
    }

    /// 處理單一影片，暫存區在合成後（含任何錯誤路徑）一律釋放
    fn process_single_video(&self, index: usize, video: &Path) -> Result<PathBuf, PreviewError> {
        let settings = self.settings;

        // A. 偵測
        let probe = DurationProbe::new(self.tools.runner).probe(video);
        let (duration, width, height) = probe
            .complete()
            .ok_or_else(|| PreviewError::MissingProbeData(probe.missing_fields()))?;
        debug!("{}: {duration:.2}s, {width}x{height}", video.display());

        // B. 排版與排程
        let layout = plan_grid(&settings.grid_spec(), width, height)?;
        let schedule = schedule_snapshots(duration, layout.columns, layout.rows);
        if schedule.interval_seconds <= 0.0 {
            return Err(PreviewError::TooShort(duration));
        }
        debug!(
            "格子 {}x{}，間隔 {:.2}s，時間點 {:?}",
            layout.cell_width,
            layout.cell_height,
            schedule.interval_seconds,
            schedule.capture_timestamps()
        );

        // C. 擷取
        let scratch = ScratchArea::acquire(settings.temp_dir.as_deref(), index)?;
        let request = ExtractionRequest {
            source: video.to_path_buf(),
            interval_seconds: schedule.interval_seconds,
            target_width: width,
            target_height: height,
            font: settings.font.clone(),
            font_size: settings.font_size,
            outline_width: settings.outline_width,
            font_scale: layout.font_scale,
            capture_count: schedule.capture_count,
        };
        let snapshots = self.tools.extractor.extract(&request, scratch.path())?;
        if snapshots.is_empty() {
            return Err(PreviewError::NoSnapshots);
        }
        if snapshots.len() != schedule.capture_count as usize {
            debug!(
                "截圖數量 {} 與格數 {} 不同",
                snapshots.len(),
                schedule.capture_count
            );
        }

        // D. 合成
        let label = self.render_label(video, scratch.path());
        let mut canvas = ImageCanvas::new(settings.width, settings.height);
        let bytes = compose_contact_sheet(
            &mut canvas,
            &snapshots,
            &layout,
            settings.border_width,
            label.as_ref(),
            settings.quality,
        )?;
        debug!("畫布 {:?}", canvas.dimensions());
        drop(scratch);

        let output = settings.preview_path(video);
        fs::write(&output, &bytes)?;
        Ok(output)
    }

    /// 標籤繪製失敗不影響預覽圖，僅記錄警告
    fn render_label(&self, video: &Path, scratch_dir: &Path) -> Option<RgbaImage> {
        let settings = self.settings;
        let text = settings.filename_label.text_for(video, &self.folder)?;

        self.tools
            .label_rasterizer
            .rasterize(&text, &label_style(settings), scratch_dir)
            .map_err(|e| warn!("無法繪製檔名標籤 {}: {e:#}", video.display()))
            .ok()
    }
}

/// 標籤列：畫布寬度扣除左邊框，高度為字體大小的 1.2 倍
#[must_use]
pub fn label_style(settings: &PreviewSettings) -> LabelStyle {
    LabelStyle {
        font: settings.font.clone(),
        font_size: settings.font_size,
        width: settings.width.saturating_sub(settings.border_width).max(1),
        height: (f64::from(settings.font_size) * LABEL_LINE_HEIGHT).ceil().max(1.0) as u32,
    }
}

/// 批次進度：每完成一個檔案輸出 `完成數/總數（百分比）`
struct BatchProgress {
    total: usize,
    done: AtomicUsize,
    bar: ProgressBar,
}

impl BatchProgress {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(progress_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        {
            bar.set_style(progress_style.progress_chars("#>-"));
        }

        Self {
            total,
            done: AtomicUsize::new(0),
            bar,
        }
    }

    fn println(&self, message: String) {
        self.bar.println(message);
    }

    fn advance(&self) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let (percent, left) = progress_figures(done, self.total);
        let message = format!(
            "已完成 {done}/{}（{percent:.2}%），剩餘 {left}/{}（{:.2}%）",
            self.total,
            self.total,
            100.0 - percent
        );

        self.bar.inc(1);
        self.bar.println(style(&message).magenta().to_string());
        info!("{message}");
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// 回傳（完成百分比，四捨五入到小數兩位；剩餘檔案數）
#[must_use]
pub fn progress_figures(done: usize, total: usize) -> (f64, usize) {
    if total == 0 {
        return (100.0, 0);
    }
    let percent = (done as f64 / total as f64 * 100.0 * 100.0).round() / 100.0;
    (percent, total.saturating_sub(done))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_figures() {
        assert_eq!(progress_figures(1, 3), (33.33, 2));
        assert_eq!(progress_figures(2, 3), (66.67, 1));
        assert_eq!(progress_figures(3, 3), (100.0, 0));
        assert_eq!(progress_figures(0, 0), (100.0, 0));
    }

    #[test]
    fn test_label_style() {
        let settings = PreviewSettings::default();
        let style = label_style(&settings);
        assert_eq!(style.width, 1918);
        assert_eq!(style.height, 20);
        assert_eq!(style.font_size, 16);
    }

    #[test]
    fn test_batch_report_counts() {
        let report = BatchReport {
            files: vec![
                FileReport {
                    path: PathBuf::from("a.mp4"),
                    outcome: FileOutcome::Generated(PathBuf::from("a.preview.jpg")),
                },
                FileReport {
                    path: PathBuf::from("b.mp4"),
                    outcome: FileOutcome::Skipped(SkipReason::TooSmall),
                },
                FileReport {
                    path: PathBuf::from("c.mp4"),
                    outcome: FileOutcome::Failed("x".into()),
                },
                FileReport {
                    path: PathBuf::from("d.mp4"),
                    outcome: FileOutcome::Skipped(SkipReason::AlreadyExists),
                },
            ],
        };
        assert_eq!(report.generated(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failed(), 1);
    }
}
