// ==========================================
// 交通调查入库系统 - 层级抽取记录
// ==========================================
// 自然键:
// - StudyDirection:    (miovision_id, direction_name)
// - DirectionMovement: (miovision_id, direction_name, movement_name)
// - MovementVehicle:   (miovision_id, direction_name, movement_name, vehicle_name)
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudyDirectionFields {
    pub miovision_id: i64,
    pub direction_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionMovementFields {
    pub miovision_id: i64,
    pub direction_name: String,
    pub movement_name: String,
}

/// 单车型、单时间点计数（traffic_count 恒 > 0）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularFields {
    pub miovision_id: i64,
    pub direction_name: String,
    pub movement_name: String,
    pub vehicle_name: String,
    pub time: NaiveDateTime,
    pub traffic_count: i64,
}

// ==========================================
// 复合自然键
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudyDirectionKey {
    pub miovision_id: i64,
    pub direction_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectionMovementKey {
    pub miovision_id: i64,
    pub direction_name: String,
    pub movement_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovementVehicleKey {
    pub miovision_id: i64,
    pub direction_name: String,
    pub movement_name: String,
    pub vehicle_name: String,
}

impl From<&StudyDirectionFields> for StudyDirectionKey {
    fn from(fields: &StudyDirectionFields) -> Self {
        Self {
            miovision_id: fields.miovision_id,
            direction_name: fields.direction_name.clone(),
        }
    }
}

impl From<&DirectionMovementFields> for DirectionMovementKey {
    fn from(fields: &DirectionMovementFields) -> Self {
        Self {
            miovision_id: fields.miovision_id,
            direction_name: fields.direction_name.clone(),
            movement_name: fields.movement_name.clone(),
        }
    }
}

impl From<&GranularFields> for DirectionMovementKey {
    fn from(fields: &GranularFields) -> Self {
        Self {
            miovision_id: fields.miovision_id,
            direction_name: fields.direction_name.clone(),
            movement_name: fields.movement_name.clone(),
        }
    }
}

impl From<&GranularFields> for MovementVehicleKey {
    fn from(fields: &GranularFields) -> Self {
        Self {
            miovision_id: fields.miovision_id,
            direction_name: fields.direction_name.clone(),
            movement_name: fields.movement_name.clone(),
            vehicle_name: fields.vehicle_name.clone(),
        }
    }
}

impl StudyDirectionKey {
    pub fn new(miovision_id: i64, direction_name: &str) -> Self {
        Self {
            miovision_id,
            direction_name: direction_name.to_string(),
        }
    }
}

impl DirectionMovementKey {
    pub fn new(miovision_id: i64, direction_name: &str, movement_name: &str) -> Self {
        Self {
            miovision_id,
            direction_name: direction_name.to_string(),
            movement_name: movement_name.to_string(),
        }
    }

    /// 父键
    pub fn study_direction(&self) -> StudyDirectionKey {
        StudyDirectionKey::new(self.miovision_id, &self.direction_name)
    }
}

impl MovementVehicleKey {
    /// 父键
    pub fn direction_movement(&self) -> DirectionMovementKey {
        DirectionMovementKey::new(self.miovision_id, &self.direction_name, &self.movement_name)
    }
}
