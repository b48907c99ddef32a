// ==========================================
// 交通调查入库系统 - 工作簿总量
// ==========================================
// 来源: 车型分类汇总页 "Grand Total" 行
// 计算: 标签之后各数值单元格之和 - 2 × 末个数值（末列合计被重复计入）
// ==========================================

use crate::importer::base_types::grand_total_row;
use crate::importer::error::{ExtractionError, ExtractionResult};
use crate::importer::layout::GRAND_TOTAL_LABEL;
use crate::tabular::TabularSource;

/// 工作簿侧的调查总量
pub fn workbook_grand_total(source: &dyn TabularSource, sheet: &str) -> ExtractionResult<i64> {
    let grid = source.sheet(sheet)?;
    let missing = || ExtractionError::TotalRowMissing {
        path: source.path_key(),
        sheet: sheet.to_string(),
        label: GRAND_TOTAL_LABEL.to_string(),
    };

    let row = grand_total_row(grid).ok_or_else(missing)?;
    let values: Vec<f64> = (1..grid.width())
        .filter_map(|col| grid.cell(row, col).as_f64())
        .collect();
    let last = values.last().copied().ok_or_else(missing)?;

    let total = values.iter().sum::<f64>() - 2.0 * last;
    Ok(total.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::{Cell, InMemoryWorkbook};

    const BREAKDOWN: &str = "Total Volume Class Breakdown";

    #[test]
    fn test_grand_total_subtracts_trailing_total_twice() {
        let source = InMemoryWorkbook::new("TMC-1.xlsx").with_sheet(
            BREAKDOWN,
            vec![
                vec![Cell::from("Class"), Cell::from("N"), Cell::from("S"), Cell::from("Total"), Cell::from("Check")],
                vec![Cell::from("Grand Total"), Cell::Int(10), Cell::Int(5), Cell::Int(15), Cell::Int(15)],
                vec![Cell::from("Lights"), Cell::Int(9), Cell::Int(5), Cell::Int(14), Cell::Int(14)],
            ],
        );

        // 10 + 5 + 15 + 15 - 2 × 15
        assert_eq!(workbook_grand_total(&source, BREAKDOWN).unwrap(), 15);
    }

    #[test]
    fn test_grand_total_missing_row() {
        let source = InMemoryWorkbook::new("TMC-1.xlsx")
            .with_sheet(BREAKDOWN, vec![vec![Cell::from("Class")]]);
        let err = workbook_grand_total(&source, BREAKDOWN).unwrap_err();
        assert!(matches!(err, ExtractionError::TotalRowMissing { .. }));
    }
}
