// ==========================================
// 交通调查入库系统 - 表格数据源
// ==========================================
// 职责: 把一个工作簿抽象为「具名工作表 → 单元格网格」
// 实现: ExcelWorkbook (calamine) / CsvWorkbook (目录内每个 CSV 一张表)
//       / InMemoryWorkbook (测试与替身)
// ==========================================

pub mod cell;
pub mod csv_workbook;
pub mod excel_workbook;
pub mod memory_workbook;

pub use cell::{Cell, Grid};
pub use csv_workbook::CsvWorkbook;
pub use excel_workbook::ExcelWorkbook;
pub use memory_workbook::InMemoryWorkbook;

use crate::importer::error::{ExtractionError, ExtractionResult};
use std::path::Path;

// ==========================================
// TabularSource Trait
// ==========================================
// 用途: 抽取器只依赖该接口，不关心底层文件格式
pub trait TabularSource {
    /// 数据源路径（文件名承载 study_type 与 miovision_id）
    fn path(&self) -> &Path;

    /// 工作表名称（保持工作簿内顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 按名称读取工作表
    ///
    /// # 返回
    /// - Err(SheetMissing): 工作表不存在
    fn sheet(&self, name: &str) -> ExtractionResult<&Grid>;

    /// 路径字符串（作为跨阶段的文件键）
    fn path_key(&self) -> String {
        self.path().display().to_string()
    }
}

/// 按路径类型打开数据源
///
/// - 目录 → CsvWorkbook
/// - .xlsx/.xlsm/.xls/.ods → ExcelWorkbook
pub fn open_workbook<P: AsRef<Path>>(path: P) -> ExtractionResult<Box<dyn TabularSource>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExtractionError::FileNotFound(path.display().to_string()));
    }

    if path.is_dir() {
        return Ok(Box::new(CsvWorkbook::open(path)?));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => Ok(Box::new(ExcelWorkbook::open(path)?)),
        _ => Err(ExtractionError::UnsupportedFormat {
            path: path.display().to_string(),
            extension: ext,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_workbook_missing_path() {
        let result = open_workbook("does/not/exist.xlsx");
        assert!(matches!(result, Err(ExtractionError::FileNotFound(_))));
    }

    #[test]
    fn test_open_workbook_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("TMC-1.txt");
        fs::write(&file, "x").unwrap();

        let result = open_workbook(&file);
        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_open_workbook_directory_as_csv() {
        let dir = TempDir::new().unwrap();
        let study_dir = dir.path().join("TMC-77");
        fs::create_dir(&study_dir).unwrap();
        fs::write(study_dir.join("Summary.csv"), "Study Name,Main St\n").unwrap();

        let source = open_workbook(&study_dir).unwrap();
        assert_eq!(source.sheet_names(), vec!["Summary".to_string()]);
        assert!(source.path_key().ends_with("TMC-77"));
    }
}
