// ==========================================
// 交通调查入库系统 - 转向抽取器
// ==========================================
// 输入: 当前文件已识别的方向
// 规则: 方向页第 HEADER_ROW 行的表头，排除保留字（Movement/Unnamed）与空表头
// 去重: 同一方向内重复的转向只保留首次出现
// ==========================================

use crate::domain::{DirectionMovementFields, StudyFileName};
use crate::importer::error::ExtractionResult;
use crate::importer::extractor_trait::{EntityExtractor, KnownEntities};
use crate::importer::layout::{movement_header, HEADER_ROW};
use crate::tabular::{Grid, TabularSource};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct MovementsExtractor;

impl MovementsExtractor {
    pub fn new() -> Self {
        Self
    }
}

/// 方向页中的转向名（按列顺序，去重）
pub fn sheet_movements(grid: &Grid) -> Vec<String> {
    let mut seen = HashSet::new();
    (0..grid.width())
        .filter_map(|col| movement_header(grid.cell(HEADER_ROW, col)))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

impl EntityExtractor<DirectionMovementFields> for MovementsExtractor {
    fn extract_fields(
        &self,
        source: &dyn TabularSource,
        known: &KnownEntities<'_>,
    ) -> ExtractionResult<Vec<DirectionMovementFields>> {
        let miovision_id = StudyFileName::parse(source.path())?.miovision_id;
        let directions: HashSet<&str> = known.directions.iter().map(String::as_str).collect();

        let mut fields = Vec::new();
        for sheet_name in source.sheet_names() {
            if !directions.contains(sheet_name.as_str()) {
                continue;
            }

            let grid = source.sheet(&sheet_name)?;
            fields.extend(
                sheet_movements(grid)
                    .into_iter()
                    .map(|movement_name| DirectionMovementFields {
                        miovision_id,
                        direction_name: sheet_name.clone(),
                        movement_name,
                    }),
            );
        }

        Ok(fields)
    }
}
