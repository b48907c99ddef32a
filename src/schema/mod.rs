// ==========================================
// 交通调查入库系统 - 表结构契约
// ==========================================
// 职责: 表名/列名常量、建表 DDL、建表顺序
// 约束: 表名与列名只在本模块定义，写入器与 Provider 统一引用
// ==========================================

pub mod tables;

pub use tables::{initial_tables, quote_ident, TableDefinition};

/// 表名
pub mod table_names {
    // 核心层级表（按外键依赖顺序）
    pub const STUDIES: &str = "studies";
    pub const STUDIES_DIRECTIONS: &str = "studies_directions";
    pub const DIRECTIONS_MOVEMENTS: &str = "directions_movements";
    pub const MOVEMENTS_VEHICLES: &str = "movements_vehicles";
    pub const GRANULAR_COUNT: &str = "granular_count";

    // 词表
    pub const VEHICLES_TYPES: &str = "vehicles_types";
    pub const MOVEMENT_TYPES: &str = "movement_types";
    pub const DIRECTION_TYPES: &str = "direction_types";
}

/// 词表名称列
pub mod type_labels {
    pub const VEHICLE_TYPE_NAME: &str = "vehicle_type_name";
    pub const MOVEMENT_TYPE_NAME: &str = "movement_type_name";
    pub const DIRECTION_TYPE_NAME: &str = "direction_type_name";
}

/// 代理主键列（词表与层级子表共用）
pub const ID_COLUMN: &str = "id";

/// 时间戳文本格式（study_date / time_stamp）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// studies 表列
pub mod studies_columns {
    pub const MIOVISION_ID: &str = "miovision_id";
    pub const STUDY_NAME: &str = "study_name";
    pub const STUDY_DURATION: &str = "study_duration";
    pub const STUDY_TYPE: &str = "study_type";
    pub const LOCATION_NAME: &str = "location_name";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const PROJECT_NAME: &str = "project_name";
    pub const STUDY_DATE: &str = "study_date";
}

/// studies_directions 表列
pub mod studies_directions_columns {
    pub const MIOVISION_ID: &str = "miovision_id";
    pub const DIRECTION_TYPE_ID: &str = "direction_type_id";
}

/// directions_movements 表列
pub mod directions_movements_columns {
    pub const STUDY_DIRECTION_ID: &str = "study_direction_id";
    pub const MOVEMENT_TYPE_ID: &str = "movement_type_id";
}

/// movements_vehicles 表列
pub mod movements_vehicles_columns {
    pub const DIRECTION_MOVEMENT_ID: &str = "direction_movement_id";
    pub const VEHICLE_TYPE_ID: &str = "vehicle_type_id";
}

/// granular_count 表列
pub mod granular_count_columns {
    pub const MOVEMENT_VEHICLE_ID: &str = "movement_vehicle_id";
    pub const TIME_STAMP: &str = "time_stamp";
    pub const TRAFFIC_COUNT: &str = "traffic_count";
}

/// 词表描述：表名 + 名称列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyTable {
    pub table: &'static str,
    pub label: &'static str,
}

pub const DIRECTION_VOCABULARY: VocabularyTable = VocabularyTable {
    table: table_names::DIRECTION_TYPES,
    label: type_labels::DIRECTION_TYPE_NAME,
};

pub const MOVEMENT_VOCABULARY: VocabularyTable = VocabularyTable {
    table: table_names::MOVEMENT_TYPES,
    label: type_labels::MOVEMENT_TYPE_NAME,
};

pub const VEHICLE_VOCABULARY: VocabularyTable = VocabularyTable {
    table: table_names::VEHICLES_TYPES,
    label: type_labels::VEHICLE_TYPE_NAME,
};
