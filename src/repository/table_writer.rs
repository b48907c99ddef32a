// ==========================================
// 交通调查入库系统 - 建表写入器
// ==========================================
// 职责: 在一个事务内按依赖顺序创建全部表，已存在的表跳过
// 事务: 全部成功才提交；任一失败回滚（事务对象 drop 即回滚）
// ==========================================

use crate::repository::error::RepositoryResult;
use crate::repository::relational_writer::{RelationalWriter, SqliteRelationalWriter};
use crate::schema::TableDefinition;
use rusqlite::Connection;
use tracing::info;

pub struct TableWriter<'c> {
    conn: &'c Connection,
}

impl<'c> TableWriter<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 创建表
    ///
    /// # 参数
    /// - tables: 已按依赖顺序排列的表定义
    ///
    /// # 返回
    /// - Ok(usize): 本次新建的表数量
    pub fn create_tables(&self, tables: &[TableDefinition]) -> RepositoryResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let writer = SqliteRelationalWriter::new(&tx);

        let mut created = 0;
        for table in tables {
            if writer.table_exists(table.name)? {
                continue;
            }
            writer.create_table(table.name, &table.ddl)?;
            created += 1;
        }

        tx.commit()?;
        info!(created, total = tables.len(), "建表完成");
        Ok(created)
    }
}
