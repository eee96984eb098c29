use super::duration_probe::ProbeField;
use super::grid_planner::GridError;
use thiserror::Error;

/// 單一影片處理失敗的原因；批次會記錄後繼續處理下一個檔案
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("無法取得影片{}", join_fields(.0))]
    MissingProbeData(Vec<ProbeField>),

    #[error("影片太短，無法安排截圖時間（{0:.2}s）")]
    TooShort(f64),

    #[error("網格配置錯誤: {0}")]
    Grid(#[from] GridError),

    #[error("沒有產生任何截圖")]
    NoSnapshots,

    #[error("建立影像緩衝區失敗")]
    EmptyBuffer,

    #[error("影像處理失敗: {0}")]
    Image(#[from] image::ImageError),

    #[error("檔案存取失敗: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0:#}")]
    Tool(#[from] anyhow::Error),
}

fn join_fields(fields: &[ProbeField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("、")
}
