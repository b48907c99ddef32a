// ==========================================
// 交通调查入库系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: rusqlite 约束失败按 UNIQUE / FOREIGN KEY 归类，其余原样保留
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库操作失败: {0}")]
    Connection(#[source] rusqlite::Error),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 结果数量错误 =====
    #[error("期望恰好 1 行，实际 {count} 行 (table={table}, where {predicate})")]
    NonSingularResult {
        table: String,
        predicate: String,
        count: usize,
    },

    // ===== 表结构错误 =====
    #[error("表不存在: {0}")]
    TableMissing(String),

    #[error("建表失败 (table={table}): {message}")]
    TableCreationFailed { table: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") || msg.contains("PRIMARY KEY") {
                    RepositoryError::UniqueConstraintViolation(msg.clone())
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg.clone())
                } else {
                    RepositoryError::Connection(err)
                }
            }
            _ => RepositoryError::Connection(err),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_classifies_unique_violation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY); INSERT INTO t VALUES (1);")
            .unwrap();
        let err: RepositoryError = conn.execute("INSERT INTO t VALUES (1)", []).unwrap_err().into();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_classifies_foreign_key_violation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE p (id INTEGER PRIMARY KEY);
             CREATE TABLE c (id INTEGER PRIMARY KEY, p_id INTEGER NOT NULL REFERENCES p(id));",
        )
        .unwrap();
        let err: RepositoryError = conn
            .execute("INSERT INTO c (p_id) VALUES (42)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_other_errors_kept_as_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn.execute("SELECT * FROM nowhere", []).unwrap_err().into();
        assert!(matches!(err, RepositoryError::Connection(_)));
    }
}
