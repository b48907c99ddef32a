// ==========================================
// 交通调查入库系统 - 内存工作簿
// ==========================================
// 用途: 测试替身 / 由程序构造的工作簿
// ==========================================

use crate::importer::error::{ExtractionError, ExtractionResult};
use crate::tabular::{Cell, Grid, TabularSource};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    path: PathBuf,
    sheets: Vec<(String, Grid)>,
}

impl InMemoryWorkbook {
    /// 创建空工作簿
    ///
    /// # 参数
    /// - path: 逻辑路径（文件名需符合 `<study_type>-<miovision_id>`）
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            sheets: Vec::new(),
        }
    }

    /// 追加工作表（同名则替换）
    pub fn with_sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.insert_sheet(name, Grid::new(rows));
        self
    }

    pub fn insert_sheet(&mut self, name: &str, grid: Grid) {
        match self.sheets.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = grid,
            None => self.sheets.push((name.to_string(), grid)),
        }
    }
}

impl TabularSource for InMemoryWorkbook {
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
