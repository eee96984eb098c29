/// 將 `HH:MM:SS.ff`（或 `MM:SS`、`SS`）時間字串轉為秒數
///
/// 任一段無法解析（例如 `N/A`）時回傳 `None`。
#[must_use]
pub fn time_to_seconds(time: &str) -> Option<f64> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }

    time.split(':')
        .rev()
        .enumerate()
        .try_fold(0.0, |acc, (i, part)| {
            let value: f64 = part.trim().parse().ok()?;
            Some(acc + value * 60f64.powi(i as i32))
        })
        .filter(|seconds: &f64| seconds.is_finite())
}

/// 將秒數格式化為 ffmpeg `-ss` 可接受的 `HH:MM:SS.ff`
///
/// 負值視為 0。
#[must_use]
pub fn seconds_to_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let hours = centis / 360_000;
    let minutes = (centis % 360_000) / 6_000;
    let rest = centis % 6_000;

    format!("{hours:02}:{minutes:02}:{:02}.{:02}", rest / 100, rest % 100)
}
