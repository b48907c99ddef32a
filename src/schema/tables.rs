// ==========================================
// 交通调查入库系统 - 建表定义
// ==========================================
// 顺序: 词表 → studies → studies_directions → directions_movements
//       → movements_vehicles → granular_count
// 说明: 词表名称列不加 UNIQUE，重复由 TypesWriter 的存在性检查保证
// ==========================================

use super::{
    directions_movements_columns as dm, granular_count_columns as gc,
    movements_vehicles_columns as mv, studies_columns as sc, studies_directions_columns as sd,
    table_names, type_labels, ID_COLUMN,
};

/// 单表定义（表名 + CREATE TABLE 语句）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: &'static str,
    pub ddl: String,
}

/// SQL 标识符加双引号（内部双引号转义）
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn vocabulary_table(table: &'static str, label: &str, max_len: u32) -> TableDefinition {
    TableDefinition {
        name: table,
        ddl: format!(
            r#"CREATE TABLE {table} (
                {id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {label} VARCHAR({max_len}) NOT NULL
            )"#,
            table = quote_ident(table),
            id = quote_ident(ID_COLUMN),
            label = quote_ident(label),
        ),
    }
}

fn studies_table() -> TableDefinition {
    TableDefinition {
        name: table_names::STUDIES,
        ddl: format!(
            r#"CREATE TABLE {table} (
                {miovision_id} INTEGER NOT NULL,
                {study_name} VARCHAR(100) NOT NULL,
                {study_duration} DECIMAL NOT NULL,
                {study_type} VARCHAR(100) NOT NULL,
                {location_name} VARCHAR(100) NOT NULL,
                {latitude} DECIMAL NOT NULL,
                {longitude} DECIMAL NOT NULL,
                {project_name} VARCHAR(100),
                {study_date} DATE NOT NULL,
                PRIMARY KEY ({miovision_id})
            )"#,
            table = quote_ident(table_names::STUDIES),
            miovision_id = quote_ident(sc::MIOVISION_ID),
            study_name = quote_ident(sc::STUDY_NAME),
            study_duration = quote_ident(sc::STUDY_DURATION),
            study_type = quote_ident(sc::STUDY_TYPE),
            location_name = quote_ident(sc::LOCATION_NAME),
            latitude = quote_ident(sc::LATITUDE),
            longitude = quote_ident(sc::LONGITUDE),
            project_name = quote_ident(sc::PROJECT_NAME),
            study_date = quote_ident(sc::STUDY_DATE),
        ),
    }
}

/// 层级子表：代理主键 + 父表外键 + 词表外键
fn child_table(
    table: &'static str,
    parent_column: &str,
    parent_table: &str,
    parent_key: &str,
    type_column: &str,
    type_table: &str,
) -> TableDefinition {
    TableDefinition {
        name: table,
        ddl: format!(
            r#"CREATE TABLE {table} (
                {id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {parent_column} INTEGER NOT NULL REFERENCES {parent_table}({parent_key}),
                {type_column} INTEGER NOT NULL REFERENCES {type_table}({id})
            )"#,
            table = quote_ident(table),
            id = quote_ident(ID_COLUMN),
            parent_column = quote_ident(parent_column),
            parent_table = quote_ident(parent_table),
            parent_key = quote_ident(parent_key),
            type_column = quote_ident(type_column),
            type_table = quote_ident(type_table),
        ),
    }
}

fn granular_count_table() -> TableDefinition {
    TableDefinition {
        name: table_names::GRANULAR_COUNT,
        ddl: format!(
            r#"CREATE TABLE {table} (
                {id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {movement_vehicle_id} INTEGER NOT NULL REFERENCES {movements_vehicles}({id}),
                {time_stamp} TEXT NOT NULL,
                {traffic_count} INTEGER NOT NULL CHECK ({traffic_count} >= 0)
            )"#,
            table = quote_ident(table_names::GRANULAR_COUNT),
            id = quote_ident(ID_COLUMN),
            movement_vehicle_id = quote_ident(gc::MOVEMENT_VEHICLE_ID),
            movements_vehicles = quote_ident(table_names::MOVEMENTS_VEHICLES),
            time_stamp = quote_ident(gc::TIME_STAMP),
            traffic_count = quote_ident(gc::TRAFFIC_COUNT),
        ),
    }
}

/// 初始化所需的全部表（已按依赖顺序排列）
pub fn initial_tables() -> Vec<TableDefinition> {
    vec![
        // 词表先建
        vocabulary_table(table_names::MOVEMENT_TYPES, type_labels::MOVEMENT_TYPE_NAME, 40),
        vocabulary_table(table_names::VEHICLES_TYPES, type_labels::VEHICLE_TYPE_NAME, 100),
        vocabulary_table(table_names::DIRECTION_TYPES, type_labels::DIRECTION_TYPE_NAME, 20),
        // 核心层级表
        studies_table(),
        child_table(
            table_names::STUDIES_DIRECTIONS,
            sd::MIOVISION_ID,
            table_names::STUDIES,
            sc::MIOVISION_ID,
            sd::DIRECTION_TYPE_ID,
            table_names::DIRECTION_TYPES,
        ),
        child_table(
            table_names::DIRECTIONS_MOVEMENTS,
            dm::STUDY_DIRECTION_ID,
            table_names::STUDIES_DIRECTIONS,
            ID_COLUMN,
            dm::MOVEMENT_TYPE_ID,
            table_names::MOVEMENT_TYPES,
        ),
        child_table(
            table_names::MOVEMENTS_VEHICLES,
            mv::DIRECTION_MOVEMENT_ID,
            table_names::DIRECTIONS_MOVEMENTS,
            ID_COLUMN,
            mv::VEHICLE_TYPE_ID,
            table_names::VEHICLES_TYPES,
        ),
        granular_count_table(),
    ]
}
