//! E2E Integration Tests
//!
//! 使用真實的 ffmpeg 測試完整流程；未安裝 ffmpeg 時略過

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use image::GenericImageView;
use tempfile::TempDir;
use video_previews::component::preview_generator::{DurationProbe, FileOutcome};
use video_previews::config::{FilenameLabel, PreviewSettings};
use video_previews::tools::{FfmpegRunner, SystemFfmpeg};

/// 檢查 ffmpeg 與 drawtext 濾鏡是否可用
fn ffmpeg_with_drawtext() -> Option<SystemFfmpeg> {
    let ffmpeg = SystemFfmpeg::default();
    if !ffmpeg.is_available() {
        println!("找不到 ffmpeg，略過測試");
        return None;
    }
    let filters = ffmpeg.run(&["-hide_banner".to_string(), "-filters".to_string()]).ok()?;
    if !filters.contains("drawtext") {
        println!("ffmpeg 不支援 drawtext，略過測試");
        return None;
    }
    Some(ffmpeg)
}

/// 以 lavfi testsrc 產生測試影片
fn create_test_clip(ffmpeg: &SystemFfmpeg, path: &Path, seconds: u32) -> bool {
    let source = format!("testsrc=duration={seconds}:size=320x240:rate=10");
    let output = path.to_string_lossy().to_string();
    let args: Vec<String> = [
        "-y",
        "-f",
        "lavfi",
        "-i",
        source.as_str(),
        "-c:v",
        "mpeg4",
        "-pix_fmt",
        "yuv420p",
        output.as_str(),
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    let _ = ffmpeg.run(&args);
    path.exists()
}

fn e2e_settings() -> PreviewSettings {
    PreviewSettings {
        width: 640,
        height: 480,
        columns: 3,
        rows: 2,
        quality: 85,
        min_size_bytes: 0,
        ..Default::default()
    }
}

/// 測試偵測長度與解析度
#[test]
fn test_probe_real_clip() {
    let Some(ffmpeg) = ffmpeg_with_drawtext() else {
        return;
    };
    let temp = TempDir::new().unwrap();
    let clip = temp.path().join("clip.mp4");
    assert!(create_test_clip(&ffmpeg, &clip, 20), "無法建立測試影片");

    let probe = DurationProbe::new(&ffmpeg).probe(&clip);
    println!("偵測結果: {probe:?}");

    let (duration, width, height) = probe.complete().expect("偵測結果不完整");
    assert!((19.0..=21.0).contains(&duration), "長度異常: {duration}");
    assert_eq!((width, height), (320, 240));
}

/// 測試完整的預覽圖生成流程
#[test]
fn test_generate_previews_e2e() {
    let Some(ffmpeg) = ffmpeg_with_drawtext() else {
        return;
    };
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("nested");
    fs::create_dir_all(&nested).unwrap();

    let clips: Vec<PathBuf> = vec![temp.path().join("first.mp4"), nested.join("second.mp4")];
    for clip in &clips {
        assert!(create_test_clip(&ffmpeg, clip, 14), "無法建立測試影片");
    }

    let settings = PreviewSettings {
        filename_label: FilenameLabel::Relative,
        ..e2e_settings()
    };
    let report =
        video_previews::run(temp.path(), &settings, Arc::new(AtomicBool::new(false))).unwrap();

    for file in &report.files {
        println!("  - {}: {:?}", file.path.display(), file.outcome);
    }
    assert_eq!(report.generated(), 2, "應該產生 2 張預覽圖");

    for clip in &clips {
        let preview = settings.preview_path(clip);
        assert!(preview.exists(), "預覽圖不存在: {}", preview.display());
        let image = image::open(&preview).unwrap();
        assert_eq!(image.dimensions(), (640, 480));
    }

    // 第二次執行不應重新產生
    let second =
        video_previews::run(temp.path(), &settings, Arc::new(AtomicBool::new(false))).unwrap();
    assert_eq!(second.generated(), 0);
    assert!(
        second
            .files
            .iter()
            .all(|f| !matches!(f.outcome, FileOutcome::Generated(_)))
    );
}
