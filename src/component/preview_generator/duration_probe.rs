//! 影片長度與解析度偵測
//!
//! ffmpeg 報告中的 Duration 經常不可靠，因此：
//! 1. 先解析 `ffmpeg -i` 的報告取得長度與解析度
//! 2. 以結尾前後各 1 秒的空輸出解碼驗證長度
//! 3. 驗證失敗則完整解碼，以最後的 `time=` 作為長度

use crate::tools::{FfmpegRunner, seconds_to_time, time_to_seconds};
use log::{debug, warn};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// ffmpeg 在指定時間點之後已無內容時的錯誤訊息
pub const EMPTY_OUTPUT_ERROR: &str = "Output file is empty, nothing was encoded";

static REGEX_PROGRESS_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time=(\S+)").expect("Invalid regex"));

/// 預設的空輸出判斷
#[must_use]
pub fn is_ffmpeg_empty_output(text: &str) -> bool {
    text.contains(EMPTY_OUTPUT_ERROR)
}

/// 偵測結果；任一欄位為 `None` 表示無法處理該檔案
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeResult {
    pub duration_seconds: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeField {
    Duration,
    Width,
    Height,
}

impl fmt::Display for ProbeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Duration => "長度",
            Self::Width => "寬度",
            Self::Height => "高度",
        };
        f.write_str(name)
    }
}

impl ProbeResult {
    /// 三個欄位皆存在時回傳 `(duration, width, height)`
    #[must_use]
    pub fn complete(&self) -> Option<(f64, u32, u32)> {
        Some((self.duration_seconds?, self.width?, self.height?))
    }

    #[must_use]
    pub fn missing_fields(&self) -> Vec<ProbeField> {
        let mut missing = Vec::new();
        if self.duration_seconds.is_none() {
            missing.push(ProbeField::Duration);
        }
        if self.width.is_none() {
            missing.push(ProbeField::Width);
        }
        if self.height.is_none() {
            missing.push(ProbeField::Height);
        }
        missing
    }
}

pub struct DurationProbe<'a> {
    runner: &'a dyn FfmpegRunner,
    is_empty_output: fn(&str) -> bool,
}

impl<'a> DurationProbe<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn FfmpegRunner) -> Self {
        Self {
            runner,
            is_empty_output: is_ffmpeg_empty_output,
        }
    }

    /// 替換空輸出判斷（不同 ffmpeg 版本的錯誤文字可能不同）
    #[must_use]
    pub fn with_empty_output_predicate(mut self, predicate: fn(&str) -> bool) -> Self {
        self.is_empty_output = predicate;
        self
    }

    pub fn probe(&self, path: &Path) -> ProbeResult {
        let input = path.to_string_lossy().to_string();
        let report = self.run_quietly(vec!["-i".to_string(), input.clone()]);

        let mut result = parse_report(&report, &input);

        if let Some(duration) = result.duration_seconds {
            result.duration_seconds = self.confirm_duration(&input, duration);
        }

        if result.duration_seconds.is_none() {
            debug!("長度不可靠，改用完整解碼: {input}");
            result.duration_seconds = self.decode_full_duration(&input);
        }

        debug!("偵測結果 {input}: {result:?}");
        result
    }

    /// 確認報告中的長度：結尾前 1 秒必須有內容，結尾後 1 秒必須沒有
    fn confirm_duration(&self, input: &str, duration: f64) -> Option<f64> {
        let before = self.run_quietly(null_decode_args(input, duration - 1.0));
        if (self.is_empty_output)(&before) {
            debug!("結尾前 1 秒已無內容，報告長度過長: {duration:.2}s");
            return None;
        }

        let after = self.run_quietly(null_decode_args(input, duration + 1.0));
        if !(self.is_empty_output)(&after) {
            debug!("結尾後 1 秒仍有內容，報告長度過短: {duration:.2}s");
            return None;
        }

        Some(duration)
    }

    fn decode_full_duration(&self, input: &str) -> Option<f64> {
        let output = self.run_quietly(
            ["-v", "quiet", "-stats", "-i", input, "-f", "null", "-"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        );
        parse_last_progress_time(&output)
    }

    /// 執行失敗（例如找不到 ffmpeg）時視為空輸出，由呼叫端依缺漏欄位處理
    fn run_quietly(&self, args: Vec<String>) -> String {
        self.runner.run(&args).unwrap_or_else(|e| {
            warn!("ffmpeg 執行失敗: {e:#}");
            String::new()
        })
    }
}

fn null_decode_args(input: &str, seconds: f64) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string(),
        "-ss".to_string(),
        seconds_to_time(seconds),
        "-f".to_string(),
        "null".to_string(),
        "-".to_string(),
    ]
}

fn report_regex(input: &str) -> Option<Regex> {
    let pattern = format!(
        concat!(
            r"(?si)Input #0,.+?'{}':",
            r".+?Duration:\s*(?P<duration>[^,]+),",
            r".+?Video:.*?(?P<width>[1-9][0-9]+)x(?P<height>[1-9][0-9]+)",
            r"(?:\s+\[SAR\s+[0-9]+:[0-9]+\s+DAR\s+(?P<dar_w>[0-9]+):(?P<dar_h>[0-9]+)\]|,)",
        ),
        regex::escape(input)
    );

    Regex::new(&pattern)
        .map_err(|e| warn!("無法建立報告解析式: {e}"))
        .ok()
}

/// 解析 `ffmpeg -i` 的報告
///
/// 有 DAR 時以寬度重新計算高度（修正非方形像素的串流）。
#[must_use]
pub fn parse_report(report: &str, input: &str) -> ProbeResult {
    let Some(caps) = report_regex(input).and_then(|re| re.captures(report)) else {
        return ProbeResult::default();
    };

    let duration_seconds = caps
        .name("duration")
        .and_then(|m| time_to_seconds(m.as_str()));

    let width = caps
        .name("width")
        .and_then(|m| m.as_str().parse::<u32>().ok());
    let reported_height = caps
        .name("height")
        .and_then(|m| m.as_str().parse::<u32>().ok());
    let aspect = caps
        .name("dar_w")
        .zip(caps.name("dar_h"))
        .and_then(|(w, h)| Some((w.as_str().parse::<u32>().ok()?, h.as_str().parse::<u32>().ok()?)))
        .filter(|&(w, h)| w > 0 && h > 0);

    let height = width.and_then(|width| match aspect {
        Some((aspect_w, aspect_h)) => {
            Some((f64::from(width) / f64::from(aspect_w) * f64::from(aspect_h)).floor() as u32)
        }
        None => reported_height,
    });

    ProbeResult {
        duration_seconds,
        width,
        height,
    }
}

/// 取得完整解碼輸出中最後一個可解析的 `time=` 值
#[must_use]
pub fn parse_last_progress_time(output: &str) -> Option<f64> {
    REGEX_PROGRESS_TIME
        .captures_iter(output)
        .filter_map(|caps| caps.get(1).and_then(|m| time_to_seconds(m.as_str())))
        .last()
}
