use thiserror::Error;

/// 檔名標籤列高度相對於字體大小的比例
pub const LABEL_LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("欄數與列數必須大於 0（{columns}x{rows}）")]
    EmptyGrid { columns: u32, rows: u32 },

    #[error("格數過多: {columns}x{rows}")]
    TooManyCells { columns: u32, rows: u32 },

    #[error("來源解析度無效: {width}x{height}")]
    InvalidSource { width: u32, height: u32 },

    #[error("畫布 {canvas_width}x{canvas_height} 容納不下 {columns}x{rows} 的網格")]
    CanvasTooSmall {
        canvas_width: u32,
        canvas_height: u32,
        columns: u32,
        rows: u32,
    },
}

/// 網格排版參數
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub columns: u32,
    pub rows: u32,
    pub border_width: u32,
    /// 有檔名標籤時的字體大小
    pub label_font_size: Option<u32>,
}

/// 每格的像素尺寸與文字縮放比例
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// 檔名標籤預留的頂部高度
    pub top_offset: f64,
    /// 來源高度 / 格高，用於放大畫面內的時間戳字體
    pub font_scale: f64,
}

impl GridLayout {
    #[must_use]
    pub const fn cells(&self) -> u32 {
        self.columns * self.rows
    }

    /// 第 `row` 列、第 `column` 欄的左上角座標
    #[must_use]
    pub fn cell_origin(&self, column: u32, row: u32, border_width: u32) -> (u32, u32) {
        let x = border_width + column * (self.cell_width + border_width);
        let y = self.top_offset
            + f64::from(border_width)
            + f64::from(row) * f64::from(self.cell_height + border_width);
        (x, y.round() as u32)
    }
}

/// 計算網格排版
///
/// 先以寬度填滿欄數，若高度超出則改以高度填滿列數，兩者皆維持來源長寬比。
pub fn plan_grid(spec: &GridSpec, source_width: u32, source_height: u32) -> Result<GridLayout, GridError> {
    let GridSpec {
        canvas_width,
        canvas_height,
        columns,
        rows,
        border_width,
        label_font_size,
    } = *spec;

    if columns == 0 || rows == 0 {
        return Err(GridError::EmptyGrid { columns, rows });
    }
    if columns.checked_mul(rows).and_then(|cells| cells.checked_add(1)).is_none() {
        return Err(GridError::TooManyCells { columns, rows });
    }
    if source_width == 0 || source_height == 0 {
        return Err(GridError::InvalidSource {
            width: source_width,
            height: source_height,
        });
    }

    let too_small = GridError::CanvasTooSmall {
        canvas_width,
        canvas_height,
        columns,
        rows,
    };

    let border = f64::from(border_width);
    let top_offset =
        label_font_size.map_or(0.0, |size| f64::from(size) * LABEL_LINE_HEIGHT + border);
    let aspect_ratio = f64::from(source_width) / f64::from(source_height);

    let available_width = f64::from(canvas_width) - (f64::from(columns) + 1.0) * border;
    let available_height =
        f64::from(canvas_height) - ((f64::from(rows) + 1.0) * border + top_offset);

    if available_width <= 0.0 || available_height <= 0.0 {
        return Err(too_small);
    }

    let mut cell_width = (available_width / f64::from(columns)).floor();
    let mut cell_height = (cell_width / aspect_ratio).floor();

    if f64::from(rows) * cell_height > available_height {
        cell_height = (available_height / f64::from(rows)).floor();
        cell_width = (cell_height * aspect_ratio).floor();
    }

    if cell_width < 1.0 || cell_height < 1.0 {
        return Err(too_small);
    }

    Ok(GridLayout {
        columns,
        rows,
        cell_width: cell_width as u32,
        cell_height: cell_height as u32,
        top_offset,
        font_scale: f64::from(source_height) / cell_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(canvas: (u32, u32), grid: (u32, u32), border: u32, label: Option<u32>) -> GridSpec {
        GridSpec {
            canvas_width: canvas.0,
            canvas_height: canvas.1,
            columns: grid.0,
            rows: grid.1,
            border_width: border,
            label_font_size: label,
        }
    }

    fn assert_within_canvas(spec: &GridSpec, layout: &GridLayout) {
        let border = f64::from(spec.border_width);
        let used_width = f64::from(spec.columns * layout.cell_width) + f64::from(spec.columns + 1) * border;
        let used_height = f64::from(spec.rows * layout.cell_height)
            + f64::from(spec.rows + 1) * border
            + layout.top_offset;
        assert!(used_width <= f64::from(spec.canvas_width), "{spec:?} -> {layout:?}");
        assert!(used_height <= f64::from(spec.canvas_height), "{spec:?} -> {layout:?}");
    }

    #[test]
    fn test_width_fit_scenario() {
        let spec = spec((640, 480), (3, 2), 2, None);
        let layout = plan_grid(&spec, 1280, 720).unwrap();
        assert_eq!(layout.cell_width, 210);
        assert_eq!(layout.cell_height, 118);
        assert_eq!(layout.top_offset, 0.0);
        assert!((layout.font_scale - 720.0 / 118.0).abs() < 1e-9);
    }

    #[test]
    fn test_height_fit_for_portrait_source() {
        let spec = spec((1920, 1080), (9, 7), 2, None);
        let layout = plan_grid(&spec, 1080, 1920).unwrap();
        // 可用高度 1080 - 16 = 1064，每列 floor(1064 / 7) = 152
        assert_eq!(layout.cell_height, 152);
        assert_eq!(layout.cell_width, 85);
        assert_within_canvas(&spec, &layout);
    }

    #[test]
    fn test_label_reserves_top_offset() {
        let spec = spec((1920, 1080), (9, 7), 2, Some(16));
        let layout = plan_grid(&spec, 1920, 1080).unwrap();
        assert!((layout.top_offset - 21.2).abs() < 1e-9);
        assert_within_canvas(&spec, &layout);
    }

    #[test]
    fn test_layout_fits_canvas_across_grids() {
        let sources = [(1920, 1080), (1280, 720), (720, 405), (640, 480), (1080, 1920), (2560, 1080)];
        for &(columns, rows) in &[(1, 1), (3, 2), (9, 7), (4, 12), (16, 2)] {
            for &border in &[0, 2, 7] {
                for &(w, h) in &sources {
                    let spec = spec((1920, 1080), (columns, rows), border, Some(16));
                    let layout = plan_grid(&spec, w, h).unwrap();
                    assert_within_canvas(&spec, &layout);

                    let aspect = f64::from(w) / f64::from(h);
                    let cell_aspect = f64::from(layout.cell_width) / f64::from(layout.cell_height);
                    // 無條件捨去造成的誤差最多 1 像素
                    let tolerance = aspect / f64::from(layout.cell_height)
                        + 1.0 / f64::from(layout.cell_height);
                    assert!((cell_aspect - aspect).abs() <= tolerance, "{spec:?} {w}x{h} -> {layout:?}");
                }
            }
        }
    }

    #[test]
    fn test_cell_origin() {
        let spec = spec((1920, 1080), (9, 7), 2, Some(16));
        let layout = plan_grid(&spec, 1920, 1080).unwrap();
        assert_eq!(layout.cell_origin(0, 0, 2), (2, 23));
        let (x, _) = layout.cell_origin(2, 0, 2);
        assert_eq!(x, 2 + 2 * (layout.cell_width + 2));
    }

    #[test]
    fn test_infeasible_canvas_is_error() {
        let tiny = spec((20, 20), (9, 7), 2, None);
        assert!(matches!(
            plan_grid(&tiny, 1920, 1080),
            Err(GridError::CanvasTooSmall { .. })
        ));

        let label_only = spec((1920, 25), (1, 1), 2, Some(16));
        assert!(plan_grid(&label_only, 1920, 1080).is_err());
    }

    #[test]
    fn test_overflowing_grid_is_error() {
        let huge = spec((1920, 1080), (u32::MAX, 2), 2, None);
        assert_eq!(
            plan_grid(&huge, 1920, 1080),
            Err(GridError::TooManyCells { columns: u32::MAX, rows: 2 })
        );

        let wide = spec((1920, 1080), (u32::MAX, 1), 2, None);
        assert!(plan_grid(&wide, 1920, 1080).is_err());
    }

    #[test]
    fn test_empty_grid_is_error() {
        let spec = spec((1920, 1080), (0, 7), 2, None);
        assert_eq!(
            plan_grid(&spec, 1920, 1080),
            Err(GridError::EmptyGrid { columns: 0, rows: 7 })
        );
    }
}
