// ==========================================
// 交通调查入库系统 - 运行汇总
// ==========================================

use serde::{Deserialize, Serialize};

/// 一次入库运行的写入统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub run_id: String,
    pub files: usize,
    pub studies: usize,
    pub study_directions: usize,
    pub direction_movements: usize,
    pub movement_vehicles: usize,
    pub granular_counts: usize,
    pub elapsed_ms: u128,
}

/// 词表初始化统计（新插入条数）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub directions: usize,
    pub movements: usize,
    pub vehicles: usize,
}

/// 单个调查的总量核对结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeReconciliation {
    pub miovision_id: i64,
    pub workbook_total: i64,
    pub database_total: i64,
}

impl VolumeReconciliation {
    pub fn is_consistent(&self) -> bool {
        self.workbook_total == self.database_total
    }
}
