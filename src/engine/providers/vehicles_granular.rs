// ==========================================
// 阶段 4: VehiclesAndGranularCounts
// ==========================================
// MovementVehicle: 缓存或库中已有则复用，否则建行并记录
// GranularCount:   每条非零计数写入一行
// ==========================================

use crate::domain::{GranularFields, MovementVehicleKey};
use crate::engine::error::ResolutionResult;
use crate::engine::identity_resolver::IdentityResolver;
use crate::engine::providers::{CoreDataProvider, WriteCounts};
use crate::error::LoaderResult;
use crate::importer::{EntityExtractor, GranularExtractor, KnownEntities};
use crate::repository::RelationalWriter;
use crate::schema::{
    granular_count_columns as gc, movements_vehicles_columns as mv, table_names, TIMESTAMP_FORMAT,
};
use crate::tabular::TabularSource;
use rusqlite::types::Value;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Default)]
pub struct VehiclesAndGranularCountsProvider {
    extractor: GranularExtractor,
}

impl VehiclesAndGranularCountsProvider {
    pub fn new() -> Self {
        Self {
            extractor: GranularExtractor::new(),
        }
    }
}

impl CoreDataProvider for VehiclesAndGranularCountsProvider {
    fn stage_name(&self) -> &'static str {
        "vehicles_granular_counts"
    }

    #[instrument(skip_all, fields(stage = "vehicles_granular_counts", files = sources.len()))]
    fn write_data(
        &self,
        writer: &dyn RelationalWriter,
        resolver: &mut dyn IdentityResolver,
        sources: &[Box<dyn TabularSource>],
    ) -> LoaderResult<WriteCounts> {
        let vehicles = resolver.all_vehicle_names()?;
        let mut counts = WriteCounts::default();

        for source in sources {
            let path = source.path_key();
            let directions = resolver.path_directions(&path)?;
            let movements = resolver.path_movements(&path)?;
            let known = KnownEntities {
                directions: &directions,
                movements: &movements,
                vehicles: &vehicles,
            };
            let fields: Vec<GranularFields> = self.extractor.extract_fields(source.as_ref(), &known)?;

            for field in &fields {
                let key = MovementVehicleKey::from(field);
                let resolved = resolver.lookup_or_create_movement_vehicle(
                    &key,
                    &mut |direction_movement_id, vehicle_type_id| -> ResolutionResult<i64> {
                        Ok(writer.insert_and_return_id(
                            table_names::MOVEMENTS_VEHICLES,
                            &[mv::DIRECTION_MOVEMENT_ID, mv::VEHICLE_TYPE_ID],
                            &[Value::Integer(direction_movement_id), Value::Integer(vehicle_type_id)],
                        )?)
                    },
                )?;
                if resolved.is_created() {
                    counts.movement_vehicles += 1;
                }

                writer.insert(
                    table_names::GRANULAR_COUNT,
                    &[gc::MOVEMENT_VEHICLE_ID, gc::TIME_STAMP, gc::TRAFFIC_COUNT],
                    &[
                        Value::Integer(resolved.id()),
                        Value::Text(field.time.format(TIMESTAMP_FORMAT).to_string()),
                        Value::Integer(field.traffic_count),
                    ],
                )?;
                counts.rows += 1;
            }

            debug!(path = %path, counts = fields.len(), "分时计数已写入");
        }

        info!(
            rows = counts.rows,
            movement_vehicles = counts.movement_vehicles,
            "granular_count 写入完成"
        );
        Ok(counts)
    }
}
