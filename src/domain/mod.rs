// ==========================================
// 交通调查入库系统 - 领域层
// ==========================================
// 职责: 抽取记录、自然键、运行汇总
// ==========================================

pub mod fields;
pub mod study;
pub mod summary;

pub use fields::{
    DirectionMovementFields, DirectionMovementKey, GranularFields, MovementVehicleKey,
    StudyDirectionFields, StudyDirectionKey,
};
pub use study::{StudyFields, StudyFileName};
pub use summary::{LoadSummary, SeedSummary, VolumeReconciliation};
