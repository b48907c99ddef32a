// ==========================================
// 阶段 2: StudiesDirections
// ==========================================
// 每个 (调查, 方向) 至多一行：已存在则复用 id；记录文件→方向备忘
// ==========================================

use crate::domain::{StudyDirectionFields, StudyDirectionKey};
use crate::engine::error::ResolutionResult;
use crate::engine::identity_resolver::IdentityResolver;
use crate::engine::providers::{CoreDataProvider, WriteCounts};
use crate::error::LoaderResult;
use crate::importer::{DirectionsExtractor, EntityExtractor, KnownEntities};
use crate::repository::RelationalWriter;
use crate::schema::{studies_directions_columns as sd, table_names};
use crate::tabular::TabularSource;
use rusqlite::types::Value;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Default)]
pub struct StudiesDirectionsProvider {
    extractor: DirectionsExtractor,
}

impl StudiesDirectionsProvider {
    pub fn new() -> Self {
        Self {
            extractor: DirectionsExtractor::new(),
        }
    }
}

impl CoreDataProvider for StudiesDirectionsProvider {
    fn stage_name(&self) -> &'static str {
        "studies_directions"
    }

    #[instrument(skip_all, fields(stage = "studies_directions", files = sources.len()))]
    fn write_data(
        &self,
        writer: &dyn RelationalWriter,
        resolver: &mut dyn IdentityResolver,
        sources: &[Box<dyn TabularSource>],
    ) -> LoaderResult<WriteCounts> {
        let mut rows = 0;
        for source in sources {
            let path = source.path_key();
            let fields: Vec<StudyDirectionFields> = self
                .extractor
                .extract_fields(source.as_ref(), &KnownEntities::default())?;

            for field in &fields {
                let resolved = resolver.lookup_or_create_study_direction(
                    &StudyDirectionKey::from(field),
                    &mut |miovision_id, direction_type_id| -> ResolutionResult<i64> {
                        Ok(writer.insert_and_return_id(
                            table_names::STUDIES_DIRECTIONS,
                            &[sd::MIOVISION_ID, sd::DIRECTION_TYPE_ID],
                            &[Value::Integer(miovision_id), Value::Integer(direction_type_id)],
                        )?)
                    },
                )?;
                if resolved.is_created() {
                    rows += 1;
                }
            }

            let directions: Vec<String> = fields.into_iter().map(|f| f.direction_name).collect();
            resolver.record_path_directions(&path, &directions);
            debug!(path = %path, directions = directions.len(), "方向已写入");
        }

        info!(rows, "studies_directions 写入完成");
        Ok(WriteCounts::rows(rows))
    }
}
