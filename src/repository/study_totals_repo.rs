// ==========================================
// 交通调查入库系统 - 调查总量查询
// ==========================================
// 汇总路径: studies → studies_directions → directions_movements
//           → movements_vehicles → granular_count
// ==========================================

use crate::repository::error::RepositoryResult;
use crate::schema::{
    directions_movements_columns as dm, granular_count_columns as gc,
    movements_vehicles_columns as mv, quote_ident as q, studies_directions_columns as sd,
    table_names, ID_COLUMN,
};
use rusqlite::{params, Connection};

pub struct StudyTotalsRepository<'c> {
    conn: &'c Connection,
}

impl<'c> StudyTotalsRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 单个调查已入库的总车流量（无计数时为 0）
    pub fn study_total_volume(&self, miovision_id: i64) -> RepositoryResult<i64> {
        let sql = format!(
            r#"
            SELECT COALESCE(SUM(gc.{traffic_count}), 0)
            FROM {studies_directions} sd
            JOIN {directions_movements} dm ON dm.{study_direction_id} = sd.{id}
            JOIN {movements_vehicles} mv ON mv.{direction_movement_id} = dm.{id}
            JOIN {granular_count} gc ON gc.{movement_vehicle_id} = mv.{id}
            WHERE sd.{miovision_id} = ?1
            "#,
            traffic_count = q(gc::TRAFFIC_COUNT),
            studies_directions = q(table_names::STUDIES_DIRECTIONS),
            directions_movements = q(table_names::DIRECTIONS_MOVEMENTS),
            movements_vehicles = q(table_names::MOVEMENTS_VEHICLES),
            granular_count = q(table_names::GRANULAR_COUNT),
            study_direction_id = q(dm::STUDY_DIRECTION_ID),
            direction_movement_id = q(mv::DIRECTION_MOVEMENT_ID),
            movement_vehicle_id = q(gc::MOVEMENT_VEHICLE_ID),
            miovision_id = q(sd::MIOVISION_ID),
            id = q(ID_COLUMN),
        );

        let total: i64 = self.conn.query_row(&sql, params![miovision_id], |row| row.get(0))?;
        Ok(total)
    }

    /// 已入库的全部 miovision_id（升序）
    pub fn list_study_ids(&self) -> RepositoryResult<Vec<i64>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY 1",
            q(crate::schema::studies_columns::MIOVISION_ID),
            q(table_names::STUDIES)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }
}
