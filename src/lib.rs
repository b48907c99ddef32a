// ==========================================
// 交通调查入库系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (rusqlite) + calamine
// 系统定位: 把 Miovision 调查工作簿按层级写入关系库
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 表结构契约 - 表名/列名/DDL
pub mod schema;

// 表格数据源 - Excel / CSV / 内存
pub mod tabular;

// 领域层 - 抽取记录与自然键
pub mod domain;

// 抽取层 - 工作簿 → 字段记录
pub mod importer;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 身份解析与分阶段写入
pub mod engine;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 统一错误类型
pub mod error;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::LoaderConfig;
pub use domain::{LoadSummary, SeedSummary, VolumeReconciliation};
pub use engine::{reconcile, LoadOrchestrator, TransactionContext};
pub use error::{LoaderError, LoaderResult};
pub use tabular::{open_workbook, TabularSource};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "交通调查入库系统";
