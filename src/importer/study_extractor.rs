// ==========================================
// 交通调查入库系统 - 调查字段抽取器
// ==========================================
// 来源: 汇总页 "Summary"（标签/值两列，无表头）
// 派生: study_duration = (End Time - Start Time) 小时
//       study_date     = Start Time
//       latitude/longitude 由逗号分隔的单元格拆分
//       study_type/miovision_id 来自文件名
// ==========================================

use crate::domain::{StudyFields, StudyFileName};
use crate::importer::error::{ExtractionError, ExtractionResult};
use crate::importer::extractor_trait::{EntityExtractor, KnownEntities};
use crate::importer::layout::{summary_labels, SUMMARY_SHEET};
use crate::tabular::{Cell, Grid, TabularSource};
use chrono::NaiveDateTime;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct StudiesExtractor;

impl StudiesExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 抽取单个调查的字段
    pub fn extract_study(&self, source: &dyn TabularSource) -> ExtractionResult<StudyFields> {
        let path = source.path_key();
        let file_name = StudyFileName::parse(source.path())?;
        let summary = SummaryPage {
            grid: source.sheet(SUMMARY_SHEET)?,
            path: &path,
        };

        let study_name = summary.required_text(summary_labels::STUDY_NAME)?;
        let project_name = summary
            .value(summary_labels::PROJECT)
            .and_then(|cell| cell.as_text());
        let start_time = summary.required_datetime(summary_labels::START_TIME)?;
        let end_time = summary.required_datetime(summary_labels::END_TIME)?;
        let location_name = summary.required_text(summary_labels::LOCATION)?;
        let lat_long = summary.required_text(summary_labels::LAT_LONG)?;

        let (latitude, longitude) = parse_lat_long(&lat_long).ok_or_else(|| {
            ExtractionError::InvalidLatLong {
                path: path.clone(),
                value: lat_long.clone(),
            }
        })?;

        let study_duration =
            (end_time - start_time).num_seconds() as f64 / SECONDS_PER_HOUR;

        Ok(StudyFields {
            miovision_id: file_name.miovision_id,
            study_name,
            study_duration,
            study_type: file_name.study_type,
            location_name,
            latitude,
            longitude,
            project_name,
            study_date: start_time,
        })
    }
}

impl EntityExtractor<StudyFields> for StudiesExtractor {
    fn extract_fields(
        &self,
        source: &dyn TabularSource,
        _known: &KnownEntities<'_>,
    ) -> ExtractionResult<Vec<StudyFields>> {
        Ok(vec![self.extract_study(source)?])
    }
}

/// 汇总页（标签列 0 / 值列 1）
struct SummaryPage<'a> {
    grid: &'a Grid,
    path: &'a str,
}

impl<'a> SummaryPage<'a> {
    /// 首个标签匹配行的值单元格
    fn value(&self, label: &str) -> Option<&'a Cell> {
        self.row_of(label).map(|row| self.grid.cell(row, 1))
    }

    fn required(&self, label: &str) -> ExtractionResult<&'a Cell> {
        self.value(label)
            .filter(|cell| !cell.is_blank())
            .ok_or_else(|| ExtractionError::LabelMissing {
                path: self.path.to_string(),
                label: label.to_string(),
            })
    }

    fn required_text(&self, label: &str) -> ExtractionResult<String> {
        let cell = self.required(label)?;
        cell.as_text().ok_or_else(|| ExtractionError::LabelMissing {
            path: self.path.to_string(),
            label: label.to_string(),
        })
    }

    fn required_datetime(&self, label: &str) -> ExtractionResult<NaiveDateTime> {
        let cell = self.required(label)?;
        cell.as_datetime()
            .ok_or_else(|| ExtractionError::InvalidCell {
                path: self.path.to_string(),
                sheet: SUMMARY_SHEET.to_string(),
                row: self.row_of(label).map(|r| r + 1).unwrap_or(0),
                col: 2,
                message: format!("{} 不是日期时间: {}", label, cell),
            })
    }

    fn row_of(&self, label: &str) -> Option<usize> {
        (0..self.grid.height())
            .find(|&row| self.grid.cell(row, 0).as_text().as_deref() == Some(label))
    }
}

/// "lat, long" → (lat, long)
fn parse_lat_long(value: &str) -> Option<(f64, f64)> {
    let mut parts = value.split(',');
    let latitude = parts.next()?.trim().parse::<f64>().ok()?;
    let longitude = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((latitude, longitude))
}
