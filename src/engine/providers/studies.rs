// ==========================================
// 阶段 1: Studies
// ==========================================
// 每个文件写入一行 studies（根节点，无需身份解析）
// ==========================================

use crate::domain::StudyFields;
use crate::engine::identity_resolver::IdentityResolver;
use crate::engine::providers::{CoreDataProvider, WriteCounts};
use crate::error::LoaderResult;
use crate::importer::StudiesExtractor;
use crate::repository::RelationalWriter;
use crate::schema::{studies_columns as sc, table_names, TIMESTAMP_FORMAT};
use crate::tabular::TabularSource;
use rusqlite::types::Value;
use tracing::{debug, info, instrument};

const STUDY_COLUMNS: [&str; 9] = [
    sc::MIOVISION_ID,
    sc::STUDY_NAME,
    sc::STUDY_DURATION,
    sc::STUDY_TYPE,
    sc::LOCATION_NAME,
    sc::LATITUDE,
    sc::LONGITUDE,
    sc::PROJECT_NAME,
    sc::STUDY_DATE,
];

#[derive(Debug, Clone, Default)]
pub struct StudiesProvider {
    extractor: StudiesExtractor,
}

impl StudiesProvider {
    pub fn new() -> Self {
        Self {
            extractor: StudiesExtractor::new(),
        }
    }

    fn study_values(study: StudyFields) -> Vec<Value> {
        vec![
            Value::Integer(study.miovision_id),
            Value::Text(study.study_name),
            Value::Real(study.study_duration),
            Value::Text(study.study_type),
            Value::Text(study.location_name),
            Value::Real(study.latitude),
            Value::Real(study.longitude),
            study.project_name.map(Value::Text).unwrap_or(Value::Null),
            Value::Text(study.study_date.format(TIMESTAMP_FORMAT).to_string()),
        ]
    }
}

impl CoreDataProvider for StudiesProvider {
    fn stage_name(&self) -> &'static str {
        "studies"
    }

    #[instrument(skip_all, fields(stage = "studies", files = sources.len()))]
    fn write_data(
        &self,
        writer: &dyn RelationalWriter,
        _resolver: &mut dyn IdentityResolver,
        sources: &[Box<dyn TabularSource>],
    ) -> LoaderResult<WriteCounts> {
        let mut rows = 0;
        for source in sources {
            let study = self.extractor.extract_study(source.as_ref())?;
            let miovision_id = study.miovision_id;
            writer.insert(table_names::STUDIES, &STUDY_COLUMNS, &Self::study_values(study))?;
            rows += 1;
            debug!(path = %source.path_key(), miovision_id, "调查已写入");
        }

        info!(rows, "studies 写入完成");
        Ok(WriteCounts::rows(rows))
    }
}
