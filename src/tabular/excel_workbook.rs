// ==========================================
// 交通调查入库系统 - Excel 工作簿
// ==========================================
// 工具: calamine（打开时一次性读入全部工作表）
// 说明: calamine 的 Range 从首个非空单元格开始，这里补齐前导空行/空列，
//       保证网格坐标与工作表坐标一致
// ==========================================

use crate::importer::error::{ExtractionError, ExtractionResult};
use crate::tabular::{Cell, Grid, TabularSource};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ExcelWorkbook {
    path: PathBuf,
    sheets: Vec<(String, Grid)>,
}

impl ExcelWorkbook {
    /// 打开工作簿并读入全部工作表
    pub fn open<P: AsRef<Path>>(path: P) -> ExtractionResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let mut workbook = open_workbook_auto(path).map_err(|e| ExtractionError::Workbook {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| ExtractionError::Workbook {
                    path: path_str.clone(),
                    message: format!("工作表 {} 读取失败: {}", name, e),
                })?;
            sheets.push((name, grid_from_range(&range)));
        }

        debug!(path = %path_str, sheets = sheets.len(), "Excel 工作簿已读入");

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl TabularSource for ExcelWorkbook {
    fn path(&self) -> &Path {
        &self.path
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet(&self, name: &str) -> ExtractionResult<&Grid> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, grid)| grid)
            .ok_or_else(|| ExtractionError::SheetMissing {
                path: self.path_key(),
                sheet: name.to_string(),
            })
    }
}

fn grid_from_range(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for data_row in range.rows() {
        let mut row = vec![Cell::Empty; col_offset];
        row.extend(data_row.iter().map(cell_from_data));
        rows.push(row);
    }

    Grid::new(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(data.to_string())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_data_scalars() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(4)), Cell::Int(4));
        assert_eq!(cell_from_data(&Data::Float(2.5)), Cell::Float(2.5));
        assert_eq!(
            cell_from_data(&Data::String("Thru".to_string())),
            Cell::Text("Thru".to_string())
        );
    }

    #[test]
    fn test_grid_from_range_pads_offset() {
        let mut range: Range<Data> = Range::new((1, 2), (1, 3));
        range.set_value((1, 2), Data::String("Grand Total".to_string()));
        range.set_value((1, 3), Data::Int(9));

        let grid = grid_from_range(&range);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cell(1, 2), &Cell::Text("Grand Total".to_string()));
        assert_eq!(grid.cell(1, 3), &Cell::Int(9));
        assert_eq!(grid.cell(0, 0), &Cell::Empty);
    }

    #[test]
    fn test_open_missing_file_is_workbook_error() {
        let result = ExcelWorkbook::open("missing-123.xlsx");
        assert!(matches!(result, Err(ExtractionError::Workbook { .. })));
    }
}
