// ==========================================
// 交通调查入库系统 - 引擎层
// ==========================================
// 职责: 身份解析、分阶段写入、运行编排
// 红线: Engine 不拼 SQL，数据库访问统一经过 RelationalWriter
// ==========================================

pub mod error;
pub mod identity_resolver;
pub mod orchestrator;
pub mod providers;

pub use error::{ResolutionError, ResolutionResult};
pub use identity_resolver::{IdentityResolver, Resolved, TransactionContext};
pub use orchestrator::{reconcile, LoadOrchestrator};
pub use providers::{
    CoreDataProvider, DirectionsMovementsProvider, StudiesDirectionsProvider, StudiesProvider,
    VehiclesAndGranularCountsProvider, WriteCounts,
};
