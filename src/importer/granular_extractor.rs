// ==========================================
// 交通调查入库系统 - 分时计数抽取器
// ==========================================
// 版式: 一个转向下有多个车型子列，只有首个子列带转向表头，
//       后续子列沿用最近一次出现的转向
// 规则:
// - 车型名行必须出现在车型词表中
// - 计数需可转为非负整数；0 不输出（稀疏表示）
// - 非零计数所在行的索引必须是时间戳
// - 列跨度从表头行开始计算，首行标题不产生列
// ==========================================

use crate::domain::{GranularFields, StudyFileName};
use crate::importer::error::{ExtractionError, ExtractionResult};
use crate::importer::extractor_trait::{EntityExtractor, KnownEntities};
use crate::importer::layout::{FIRST_COUNT_ROW, HEADER_ROW, INDEX_COLUMN, VEHICLE_ROW};
use crate::tabular::{Grid, TabularSource};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct GranularExtractor;

impl GranularExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_sheet(
        &self,
        path: &str,
        miovision_id: i64,
        direction_name: &str,
        grid: &Grid,
        movements: &HashSet<&str>,
        vehicles: &HashSet<&str>,
    ) -> ExtractionResult<Vec<GranularFields>> {
        let mut fields = Vec::new();
        let mut current_movement: Option<String> = None;

        for col in (INDEX_COLUMN + 1)..grid.width_from(HEADER_ROW) {
            if let Some(header) = grid.cell(HEADER_ROW, col).as_text() {
                if movements.contains(header.as_str()) {
                    current_movement = Some(header);
                }
            }

            let vehicle_name = grid.cell(VEHICLE_ROW, col).as_text().unwrap_or_default();
            if !vehicles.contains(vehicle_name.as_str()) {
                return Err(ExtractionError::UnknownVehicle {
                    path: path.to_string(),
                    sheet: direction_name.to_string(),
                    vehicle: vehicle_name,
                });
            }

            let movement_name = current_movement.clone().ok_or_else(|| ExtractionError::InvalidCell {
                path: path.to_string(),
                sheet: direction_name.to_string(),
                row: HEADER_ROW + 1,
                col: col + 1,
                message: "车型列之前没有出现转向表头".to_string(),
            })?;

            for row in FIRST_COUNT_ROW..grid.height() {
                let cell = grid.cell(row, col);
                let traffic_count = cell.as_count().ok_or_else(|| ExtractionError::InvalidCell {
                    path: path.to_string(),
                    sheet: direction_name.to_string(),
                    row: row + 1,
                    col: col + 1,
                    message: format!("计数不是非负整数: '{}'", cell),
                })?;

                if traffic_count == 0 {
                    continue;
                }

                let index = grid.cell(row, INDEX_COLUMN);
                let time = index.as_datetime().ok_or_else(|| ExtractionError::NonTimestampIndex {
                    path: path.to_string(),
                    sheet: direction_name.to_string(),
                    row: row + 1,
                    value: index.to_string(),
                })?;

                fields.push(GranularFields {
                    miovision_id,
                    direction_name: direction_name.to_string(),
                    movement_name: movement_name.clone(),
                    vehicle_name: vehicle_name.clone(),
                    time,
                    traffic_count,
                });
            }
        }

        debug!(path = %path, direction = %direction_name, counts = fields.len(), "方向页计数抽取完成");
        Ok(fields)
    }
}

impl EntityExtractor<GranularFields> for GranularExtractor {
    fn extract_fields(
        &self,
        source: &dyn TabularSource,
        known: &KnownEntities<'_>,
    ) -> ExtractionResult<Vec<GranularFields>> {
        let path = source.path_key();
        let miovision_id = StudyFileName::parse(source.path())?.miovision_id;
        let directions: HashSet<&str> = known.directions.iter().map(String::as_str).collect();
        let movements: HashSet<&str> = known.movements.iter().map(String::as_str).collect();
        let vehicles: HashSet<&str> = known.vehicles.iter().map(String::as_str).collect();

        let mut fields = Vec::new();
        for sheet_name in source.sheet_names() {
            if !directions.contains(sheet_name.as_str()) {
                continue;
            }

            let grid = source.sheet(&sheet_name)?;
            fields.extend(self.extract_sheet(
                &path,
                miovision_id,
                &sheet_name,
                grid,
                &movements,
                &vehicles,
            )?);
        }

        Ok(fields)
    }
}
