// ==========================================
// 交通调查入库系统 - 层级数据写入阶段
// ==========================================
// 顺序: Studies → StudiesDirections → DirectionsMovements
//       → VehiclesAndGranularCounts
// 约束: 每个阶段处理完全部文件后，下一阶段才能开始
// ==========================================

pub mod directions_movements;
pub mod studies;
pub mod studies_directions;
pub mod vehicles_granular;

pub use directions_movements::DirectionsMovementsProvider;
pub use studies::StudiesProvider;
pub use studies_directions::StudiesDirectionsProvider;
pub use vehicles_granular::VehiclesAndGranularCountsProvider;

use crate::engine::identity_resolver::IdentityResolver;
use crate::error::LoaderResult;
use crate::repository::RelationalWriter;
use crate::tabular::TabularSource;

/// 单个阶段的写入行数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    /// 本阶段主表写入行数
    pub rows: usize,
    /// 顺带新建的 MovementVehicle 行数（仅最后一个阶段）
    pub movement_vehicles: usize,
}

impl WriteCounts {
    pub fn rows(rows: usize) -> Self {
        Self {
            rows,
            movement_vehicles: 0,
        }
    }
}

// ==========================================
// CoreDataProvider Trait
// ==========================================
pub trait CoreDataProvider {
    /// 阶段名称（日志用）
    fn stage_name(&self) -> &'static str;

    /// 对全部文件执行本阶段
    ///
    /// # 参数
    /// - writer: 关系写入门面
    /// - resolver: 本次运行共享的身份解析上下文
    /// - sources: 已打开的工作簿
    fn write_data(
        &self,
        writer: &dyn RelationalWriter,
        resolver: &mut dyn IdentityResolver,
        sources: &[Box<dyn TabularSource>],
    ) -> LoaderResult<WriteCounts>;
}
