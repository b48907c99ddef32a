// ==========================================
// 交通调查入库系统 - 配置层
// ==========================================
// 职责: 连接串、基础目录、车型汇总页、扩展名、初始化开关
// 来源: 环境变量 / JSON 文件
// ==========================================

pub mod error;
pub mod loader_config;

pub use error::{ConfigError, ConfigResult};
pub use loader_config::{config_keys, LoaderConfig};
