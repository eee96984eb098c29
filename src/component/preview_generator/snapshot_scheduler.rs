/// 截圖時間排程
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotSchedule {
    /// 相鄰兩張截圖的間隔（秒，四捨五入到小數兩位）
    pub interval_seconds: f64,
    /// 需要的截圖數量（= 格數）
    pub capture_count: u32,
}

impl SnapshotSchedule {
    /// 預期的截圖時間點：`interval, 2*interval, ..., capture_count*interval`
    ///
    /// 影片被切成 `capture_count + 1` 段，最後一段不取樣，避免取到常常損毀的結尾。
    #[must_use]
    pub fn capture_timestamps(&self) -> Vec<f64> {
        (1..=self.capture_count)
            .map(|k| f64::from(k) * self.interval_seconds)
            .collect()
    }
}

#[must_use]
pub fn schedule_snapshots(duration: f64, columns: u32, rows: u32) -> SnapshotSchedule {
    let cells = columns.saturating_mul(rows);
    let interval = duration / (f64::from(cells) + 1.0);

    SnapshotSchedule {
        interval_seconds: round_to(interval, 2),
        capture_count: cells,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_scenario() {
        let schedule = schedule_snapshots(130.0, 3, 2);
        assert_eq!(schedule.capture_count, 6);
        assert!((schedule.interval_seconds - 18.57).abs() < 1e-9);

        let timestamps = schedule.capture_timestamps();
        assert_eq!(timestamps.len(), 6);
        assert!((timestamps[0] - 18.57).abs() < 1e-9);
        assert!((timestamps[1] - 37.14).abs() < 1e-9);
        assert!((timestamps[5] - 111.42).abs() < 0.02);
        assert!(timestamps.iter().all(|&t| t < 130.0));
    }

    #[test]
    fn test_interval_covers_duration_within_rounding() {
        for &duration in &[1.0, 7.5, 59.94, 130.0, 3600.0, 5432.1, 86_399.99] {
            for &(columns, rows) in &[(1, 1), (3, 2), (9, 7), (10, 10)] {
                let schedule = schedule_snapshots(duration, columns, rows);
                let cells = f64::from(columns * rows);
                // 每段的捨入誤差最多 0.005
                let tolerance = 0.005 * (cells + 1.0) + 1e-9;
                assert!(
                    (schedule.interval_seconds * (cells + 1.0) - duration).abs() <= tolerance,
                    "duration={duration} grid={columns}x{rows} -> {schedule:?}"
                );
                assert!(schedule.interval_seconds > 0.0);
            }
        }
    }

    #[test]
    fn test_zero_duration() {
        let schedule = schedule_snapshots(0.0, 9, 7);
        assert_eq!(schedule.interval_seconds, 0.0);
        assert_eq!(schedule.capture_count, 63);
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(18.571_428, 2) - 18.57).abs() < 1e-12);
        assert!((round_to(2.675_1, 2) - 2.68).abs() < 1e-12);
    }
}
