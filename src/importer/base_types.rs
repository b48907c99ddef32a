// ==========================================
// 交通调查入库系统 - 词表发现
// ==========================================
// 职责: 跨全部文件汇总方向/转向/车型名称，用于词表初始化
// 输出: 去重并排序
// ==========================================

use crate::importer::error::{ExtractionError, ExtractionResult};
use crate::importer::layout::{is_direction_sheet, GRAND_TOTAL_LABEL, PERCENT_MARKER};
use crate::importer::movement_extractor::sheet_movements;
use crate::tabular::{Grid, TabularSource};
use std::collections::BTreeSet;

// ==========================================
// BaseTypesProvider Trait
// ==========================================
// 实现者: DirectionVocabulary, MovementVocabulary, VehicleVocabulary
pub trait BaseTypesProvider {
    /// 词表名称（去重、排序）
    fn return_information(&self, sources: &[Box<dyn TabularSource>]) -> ExtractionResult<Vec<String>>;
}

// ==========================================
// 方向词表：全部文件中含 "bound" 的表名
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionVocabulary;

impl DirectionVocabulary {
    fn directions_per_file(source: &dyn TabularSource) -> Vec<String> {
        source
            .sheet_names()
            .into_iter()
            .filter(|name| is_direction_sheet(name))
            .collect()
    }
}

impl BaseTypesProvider for DirectionVocabulary {
    fn return_information(&self, sources: &[Box<dyn TabularSource>]) -> ExtractionResult<Vec<String>> {
        let directions: BTreeSet<String> = sources
            .iter()
            .flat_map(|source| Self::directions_per_file(source.as_ref()))
            .collect();
        Ok(directions.into_iter().collect())
    }
}

// ==========================================
// 转向词表：方向页表头（排除保留字）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementVocabulary;

impl BaseTypesProvider for MovementVocabulary {
    fn return_information(&self, sources: &[Box<dyn TabularSource>]) -> ExtractionResult<Vec<String>> {
        let mut movements = BTreeSet::new();
        for source in sources {
            for sheet_name in DirectionVocabulary::directions_per_file(source.as_ref()) {
                movements.extend(sheet_movements(source.sheet(&sheet_name)?));
            }
        }
        Ok(movements.into_iter().collect())
    }
}

// ==========================================
// 车型词表：车型分类汇总页 "Grand Total" 之后的首列标签
// ==========================================
#[derive(Debug, Clone)]
pub struct VehicleVocabulary {
    breakdown_sheet: String,
}

impl VehicleVocabulary {
    /// # 参数
    /// - breakdown_sheet: 车型分类汇总页名称
    pub fn new(breakdown_sheet: &str) -> Self {
        Self {
            breakdown_sheet: breakdown_sheet.to_string(),
        }
    }

    fn vehicles_per_file(&self, source: &dyn TabularSource) -> ExtractionResult<Vec<String>> {
        let grid = source.sheet(&self.breakdown_sheet)?;
        let total_row = grand_total_row(grid).ok_or_else(|| ExtractionError::TotalRowMissing {
            path: source.path_key(),
            sheet: self.breakdown_sheet.clone(),
            label: GRAND_TOTAL_LABEL.to_string(),
        })?;

        Ok(((total_row + 1)..grid.height())
            .filter_map(|row| grid.cell(row, 0).as_text())
            .filter(|label| !label.contains(PERCENT_MARKER))
            .collect())
    }
}

impl BaseTypesProvider for VehicleVocabulary {
    fn return_information(&self, sources: &[Box<dyn TabularSource>]) -> ExtractionResult<Vec<String>> {
        let mut vehicles = BTreeSet::new();
        for source in sources {
            vehicles.extend(self.vehicles_per_file(source.as_ref())?);
        }
        Ok(vehicles.into_iter().collect())
    }
}

/// "Grand Total" 行号（第 0 行为表头，不参与匹配）
pub(crate) fn grand_total_row(grid: &Grid) -> Option<usize> {
    (1..grid.height()).find(|&row| grid.cell(row, 0).as_text().as_deref() == Some(GRAND_TOTAL_LABEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::{Cell, InMemoryWorkbook};

    const BREAKDOWN: &str = "Total Volume Class Breakdown";

    fn breakdown_rows(vehicles: &[&str]) -> Vec<Vec<Cell>> {
        let mut rows = vec![
            vec![Cell::from("Class"), Cell::from("Northbound")],
            vec![Cell::from("Grand Total"), Cell::Int(10)],
        ];
        rows.extend(vehicles.iter().map(|v| vec![Cell::from(*v), Cell::Int(1)]));
        rows
    }

    fn direction_rows(headers: &[&str]) -> Vec<Vec<Cell>> {
        vec![vec![Cell::from("Title")], headers.iter().map(|h| Cell::from(*h)).collect()]
    }

    fn sources() -> Vec<Box<dyn TabularSource>> {
        vec![
            Box::new(
                InMemoryWorkbook::new("TMC-1.xlsx")
                    .with_sheet("Northbound", direction_rows(&["", "Right", "Thru"]))
                    .with_sheet(BREAKDOWN, breakdown_rows(&["Lights", "% Lights", "Buses"])),
            ),
            Box::new(
                InMemoryWorkbook::new("TMC-2.xlsx")
                    .with_sheet("Northbound", direction_rows(&["Movement", "Left"]))
                    .with_sheet("Westbound", direction_rows(&["", "Thru", "Unnamed: 2"]))
                    .with_sheet(BREAKDOWN, breakdown_rows(&["Lights", "", "Bicycles on Road"])),
            ),
        ]
    }

    #[test]
    fn test_directions_union_sorted() {
        let directions = DirectionVocabulary.return_information(&sources()).unwrap();
        assert_eq!(directions, vec!["Northbound".to_string(), "Westbound".to_string()]);
    }

    #[test]
    fn test_movements_union_sorted() {
        let movements = MovementVocabulary.return_information(&sources()).unwrap();
        assert_eq!(
            movements,
            vec!["Left".to_string(), "Right".to_string(), "Thru".to_string()]
        );
    }

    #[test]
    fn test_vehicles_after_grand_total_without_percent() {
        let vehicles = VehicleVocabulary::new(BREAKDOWN)
            .return_information(&sources())
            .unwrap();
        assert_eq!(
            vehicles,
            vec![
                "Bicycles on Road".to_string(),
                "Buses".to_string(),
                "Lights".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_grand_total_is_error() {
        let sources: Vec<Box<dyn TabularSource>> = vec![Box::new(
            InMemoryWorkbook::new("TMC-1.xlsx")
                .with_sheet(BREAKDOWN, vec![vec![Cell::from("Class")], vec![Cell::from("Lights")]]),
        )];
        let err = VehicleVocabulary::new(BREAKDOWN)
            .return_information(&sources)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::TotalRowMissing { .. }));
    }
}
