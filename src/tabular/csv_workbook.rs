// ==========================================
// 交通调查入库系统 - CSV 目录工作簿
// ==========================================
// 约定: 一个目录代表一个工作簿，目录名即 `<study_type>-<miovision_id>`，
//       目录内每个 `<工作表名>.csv` 代表一张工作表（无表头，按原样读入）
// 排序: 工作表按文件名排序
// ==========================================

use crate::importer::error::{ExtractionError, ExtractionResult};
use crate::tabular::{Cell, Grid, TabularSource};
use csv::ReaderBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvWorkbook {
    path: PathBuf,
    sheets: Vec<(String, Grid)>,
}

impl CsvWorkbook {
    /// 打开目录并读入全部 CSV 工作表
    pub fn open<P: AsRef<Path>>(dir: P) -> ExtractionResult<Self> {
        let dir = dir.as_ref();
        let dir_str = dir.display().to_string();

        let mut csv_files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| ExtractionError::Io {
                path: dir_str.clone(),
                source: e,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.eq_ignore_ascii_case("csv"))
                        .unwrap_or(false)
            })
            .collect();
        csv_files.sort();

        let mut sheets = Vec::with_capacity(csv_files.len());
        for file in csv_files {
            let name = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            sheets.push((name, read_sheet(&file)?));
        }

        Ok(Self {
            path: dir.to_path_buf(),
            sheets,
        })
    }
}

fn read_sheet(file: &Path) -> ExtractionResult<Grid> {
    let file_str = file.display().to_string();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 允许行长度不一致
        .from_path(file)
        .map_err(|e| ExtractionError::Csv {
            path: file_str.clone(),
            message: e.to_string(),
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExtractionError::Csv {
            path: file_str.clone(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(Cell::infer).collect());
    }

    Ok(Grid::new(rows))
}

impl TabularSource for CsvWorkbook {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_csv_workbook_reads_sheets_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Summary.csv"), "Study Name,Main St\n").unwrap();
        fs::write(
            dir.path().join("Northbound.csv"),
            "Title\n,Right,\n,Cars,Trucks\n2024-05-01 07:00:00,3,0\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let workbook = CsvWorkbook::open(dir.path()).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec!["Northbound".to_string(), "Summary".to_string()]
        );

        let grid = workbook.sheet("Northbound").unwrap();
        assert_eq!(grid.cell(1, 1), &Cell::Text("Right".to_string()));
        assert_eq!(grid.cell(3, 1), &Cell::Int(3));
        assert!(matches!(grid.cell(3, 0), Cell::DateTime(_)));
    }

    #[test]
    fn test_csv_workbook_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let workbook = CsvWorkbook::open(dir.path()).unwrap();
        assert!(matches!(
            workbook.sheet("Summary"),
            Err(ExtractionError::SheetMissing { .. })
        ));
    }
}
