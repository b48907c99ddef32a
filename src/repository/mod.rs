// ==========================================
// 交通调查入库系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod relational_writer;
pub mod study_totals_repo;
pub mod table_writer;
pub mod types_writer;

pub use error::{RepositoryError, RepositoryResult};
pub use relational_writer::{RelationalWriter, SqliteRelationalWriter};
pub use study_totals_repo::StudyTotalsRepository;
pub use table_writer::TableWriter;
pub use types_writer::{TypesWriter, VocabularySeed};
