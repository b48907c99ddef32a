// ==========================================
// 交通调查入库系统 - 身份解析错误类型
// ==========================================
// 触发: 需要恰好 1 个 id 时得到 0 个或多个；或阶段顺序错误导致缓存未命中
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("映射中不存在键 (mapping={mapping}): {key}")]
    KeyNotFound { mapping: &'static str, key: String },

    #[error("词表查询期望恰好 1 行，实际 {count} 行 (table={table}, name={name})")]
    NonSingularResult {
        table: String,
        name: String,
        count: usize,
    },

    #[error("词表为空，请先执行初始化 (table={table})")]
    EmptyVocabulary { table: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;
