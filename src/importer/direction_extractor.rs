// ==========================================
// 交通调查入库系统 - 方向抽取器
// ==========================================
// 规则: 表名含 "bound" 的工作表即一个方向
// ==========================================

use crate::domain::{StudyDirectionFields, StudyFileName};
use crate::importer::error::ExtractionResult;
use crate::importer::extractor_trait::{EntityExtractor, KnownEntities};
use crate::importer::layout::is_direction_sheet;
use crate::tabular::TabularSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionsExtractor;

impl DirectionsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl EntityExtractor<StudyDirectionFields> for DirectionsExtractor {
    fn extract_fields(
        &self,
        source: &dyn TabularSource,
        _known: &KnownEntities<'_>,
    ) -> ExtractionResult<Vec<StudyDirectionFields>> {
        let miovision_id = StudyFileName::parse(source.path())?.miovision_id;

        Ok(source
            .sheet_names()
            .into_iter()
            .filter(|name| is_direction_sheet(name))
            .map(|direction_name| StudyDirectionFields {
                miovision_id,
                direction_name,
            })
            .collect())
    }
}
