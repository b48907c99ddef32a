// ==========================================
// 交通调查入库系统 - 关系写入门面
// ==========================================
// 职责: 建表、插入、插入并回查 id、存在性探测、按谓词查询
// 红线: 只做数据 CRUD，不含任何业务规则
// 约束: 标识符统一加引号，取值一律绑定参数
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::schema::{quote_ident, ID_COLUMN};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::cell::Cell;
use tracing::{debug, warn};

// ==========================================
// RelationalWriter Trait
// ==========================================
// 实现者: SqliteRelationalWriter
pub trait RelationalWriter {
    /// 表是否存在
    fn table_exists(&self, table: &str) -> RepositoryResult<bool>;

    /// 执行一条 CREATE TABLE 语句
    fn create_table(&self, table: &str, ddl: &str) -> RepositoryResult<()>;

    /// 插入一行
    fn insert(&self, table: &str, columns: &[&str], values: &[Value]) -> RepositoryResult<()>;

    /// 插入一行，再按同一组列/值回查生成的 id
    ///
    /// # 返回
    /// - Err(NonSingularResult): 回查结果不是恰好 1 行
    fn insert_and_return_id(
        &self,
        table: &str,
        columns: &[&str],
        values: &[Value],
    ) -> RepositoryResult<i64>;

    /// 某列是否已存在指定取值
    ///
    /// # 返回
    /// - Err(TableMissing): 表不存在
    fn attribute_exists(&self, column: &str, value: &Value, table: &str) -> RepositoryResult<bool>;

    /// 按列/值谓词查询全部匹配行的 id
    fn select_ids(&self, table: &str, columns: &[&str], values: &[Value]) -> RepositoryResult<Vec<i64>>;

    /// 读取某个文本列的全部取值
    fn select_text_column(&self, table: &str, column: &str) -> RepositoryResult<Vec<String>>;
}

/// 谓词 `"a" IS ?1 AND "b" IS ?2`（IS 同时覆盖 NULL 比较）
fn predicate(columns: &[&str]) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} IS ?{}", quote_ident(c), i + 1))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// 日志与错误信息中使用的谓词描述
fn describe_predicate(columns: &[&str], values: &[Value]) -> String {
    columns
        .iter()
        .zip(values)
        .map(|(c, v)| format!("{}={:?}", c, v))
        .collect::<Vec<_>>()
        .join(", ")
}

// ==========================================
// SqliteRelationalWriter
// ==========================================
pub struct SqliteRelationalWriter<'c> {
    conn: &'c Connection,
    warned_autocommit: Cell<bool>,
}

impl<'c> SqliteRelationalWriter<'c> {
    /// # 参数
    /// - conn: 共享连接（可以是事务解引用得到的连接）
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            warned_autocommit: Cell::new(false),
        }
    }

    /// 不在事务内写入时提示一次（照常执行）
    ///
    /// # 返回
    /// - true: 本次调用发出了提示
    fn warn_if_autocommit(&self) -> bool {
        if self.conn.is_autocommit() && !self.warned_autocommit.replace(true) {
            warn!("写入未处于事务中，每条语句将单独提交");
            return true;
        }
        false
    }
}

impl<'c> RelationalWriter for SqliteRelationalWriter<'c> {
    fn table_exists(&self, table: &str) -> RepositoryResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create_table(&self, table: &str, ddl: &str) -> RepositoryResult<()> {
        self.warn_if_autocommit();
        self.conn
            .execute_batch(ddl)
            .map_err(|e| RepositoryError::TableCreationFailed {
                table: table.to_string(),
                message: e.to_string(),
            })?;
        debug!(table = %table, "表已创建");
        Ok(())
    }

    fn insert(&self, table: &str, columns: &[&str], values: &[Value]) -> RepositoryResult<()> {
        self.warn_if_autocommit();
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", "),
            placeholders
        );

        self.conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(())
    }

    fn insert_and_return_id(
        &self,
        table: &str,
        columns: &[&str],
        values: &[Value],
    ) -> RepositoryResult<i64> {
        self.insert(table, columns, values)?;

        let ids = self.select_ids(table, columns, values)?;
        match ids.as_slice() {
            [id] => Ok(*id),
            _ => Err(RepositoryError::NonSingularResult {
                table: table.to_string(),
                predicate: describe_predicate(columns, values),
                count: ids.len(),
            }),
        }
    }

    fn attribute_exists(&self, column: &str, value: &Value, table: &str) -> RepositoryResult<bool> {
        if !self.table_exists(table)? {
            return Err(RepositoryError::TableMissing(table.to_string()));
        }

        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1",
            quote_ident(table),
            quote_ident(column)
        );
        let count: i64 = self.conn.query_row(&sql, params![value], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn select_ids(&self, table: &str, columns: &[&str], values: &[Value]) -> RepositoryResult<Vec<i64>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            quote_ident(ID_COLUMN),
            quote_ident(table),
            predicate(columns)
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn select_text_column(&self, table: &str, column: &str) -> RepositoryResult<Vec<String>> {
        let sql = format!("SELECT {} FROM {}", quote_ident(column), quote_ident(table));

        let mut stmt = self.conn.prepare(&sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(values)
    }
}
