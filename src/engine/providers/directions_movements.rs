// ==========================================
// 阶段 3: DirectionsMovements
// ==========================================
// 依赖阶段 2 的文件→方向备忘与 StudyDirection id
// 每个 (方向, 转向) 至多一行：已存在则复用 id；记录文件→转向备忘
// ==========================================

use crate::domain::{DirectionMovementFields, DirectionMovementKey};
use crate::engine::error::ResolutionResult;
use crate::engine::identity_resolver::IdentityResolver;
use crate::engine::providers::{CoreDataProvider, WriteCounts};
use crate::error::LoaderResult;
use crate::importer::{EntityExtractor, KnownEntities, MovementsExtractor};
use crate::repository::RelationalWriter;
use crate::schema::{directions_movements_columns as dm, table_names};
use crate::tabular::TabularSource;
use rusqlite::types::Value;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Default)]
pub struct DirectionsMovementsProvider {
    extractor: MovementsExtractor,
}

impl DirectionsMovementsProvider {
    pub fn new() -> Self {
        Self {
            extractor: MovementsExtractor::new(),
        }
    }
}

impl CoreDataProvider for DirectionsMovementsProvider {
    fn stage_name(&self) -> &'static str {
        "directions_movements"
    }

    #[instrument(skip_all, fields(stage = "directions_movements", files = sources.len()))]
    fn write_data(
        &self,
        writer: &dyn RelationalWriter,
        resolver: &mut dyn IdentityResolver,
        sources: &[Box<dyn TabularSource>],
    ) -> LoaderResult<WriteCounts> {
        let mut rows = 0;
        for source in sources {
            let path = source.path_key();
            let directions = resolver.path_directions(&path)?;
            let known = KnownEntities {
                directions: &directions,
                ..KnownEntities::default()
            };
            let fields: Vec<DirectionMovementFields> =
                self.extractor.extract_fields(source.as_ref(), &known)?;

            let mut movements: Vec<String> = Vec::new();
            for field in &fields {
                if !movements.contains(&field.movement_name) {
                    movements.push(field.movement_name.clone());
                }

                let resolved = resolver.lookup_or_create_direction_movement(
                    &DirectionMovementKey::from(field),
                    &mut |study_direction_id, movement_type_id| -> ResolutionResult<i64> {
                        Ok(writer.insert_and_return_id(
                            table_names::DIRECTIONS_MOVEMENTS,
                            &[dm::STUDY_DIRECTION_ID, dm::MOVEMENT_TYPE_ID],
                            &[Value::Integer(study_direction_id), Value::Integer(movement_type_id)],
                        )?)
                    },
                )?;
                if resolved.is_created() {
                    rows += 1;
                }
            }

            resolver.record_path_movements(&path, &movements);
            debug!(path = %path, movements = movements.len(), "转向已写入");
        }

        info!(rows, "directions_movements 写入完成");
        Ok(WriteCounts::rows(rows))
    }
}
