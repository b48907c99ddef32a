// ==========================================
// 交通调查入库系统 - 工作簿版式约定
// ==========================================
// - 汇总页 "Summary"：第 0 列为标签，第 1 列为值
// - 方向页：表名含 "bound"；第 0 行为标题，第 1 行为转向表头，
//   第 2 行为车型名，第 3 行起为计数；第 0 列为时间索引
// - 车型分类汇总页："Grand Total" 行之后的首列标签即车型名
// ==========================================

use crate::tabular::Cell;

pub const SUMMARY_SHEET: &str = "Summary";

/// 方向页标记（表名包含即视为方向页）
pub const DIRECTION_MARKER: &str = "bound";

/// 转向表头中的保留字（序号列/空列）
pub const RESERVED_HEADER_MARKERS: &[&str] = &["Movement", "Unnamed"];

/// 方向页：转向表头所在行
pub const HEADER_ROW: usize = 1;

/// 方向页：车型名所在行
pub const VEHICLE_ROW: usize = HEADER_ROW + 1;

/// 方向页：计数起始行
pub const FIRST_COUNT_ROW: usize = VEHICLE_ROW + 1;

/// 方向页：时间索引列
pub const INDEX_COLUMN: usize = 0;

pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

/// 车型分类汇总页中百分比行的标记
pub const PERCENT_MARKER: &str = "%";

/// 汇总页标签
pub mod summary_labels {
    pub const STUDY_NAME: &str = "Study Name";
    pub const PROJECT: &str = "Project";
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const LOCATION: &str = "Location";
    pub const LAT_LONG: &str = "Latitude and Longitude";
}

pub fn is_direction_sheet(sheet_name: &str) -> bool {
    sheet_name.contains(DIRECTION_MARKER)
}

/// 表头是否为转向名；空表头按保留列处理
pub fn movement_header(cell: &Cell) -> Option<String> {
    let header = cell.as_text()?;
    if RESERVED_HEADER_MARKERS
        .iter()
        .any(|marker| header.contains(marker))
    {
        return None;
    }
    Some(header)
}
