// ==========================================
// 交通调查入库系统 - 词表写入器
// ==========================================
// 职责: 初始化方向/转向/车型词表
// 幂等: 名称已存在则跳过（attribute_exists），重复运行不会新增行
// 事务: 三张词表在同一事务内写入
// ==========================================

use crate::domain::SeedSummary;
use crate::repository::error::RepositoryResult;
use crate::repository::relational_writer::{RelationalWriter, SqliteRelationalWriter};
use crate::schema::{VocabularyTable, DIRECTION_VOCABULARY, MOVEMENT_VOCABULARY, VEHICLE_VOCABULARY};
use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::info;

/// 待写入的词表名称
#[derive(Debug, Clone, Default)]
pub struct VocabularySeed {
    pub directions: Vec<String>,
    pub movements: Vec<String>,
    pub vehicles: Vec<String>,
}

pub struct TypesWriter<'c> {
    conn: &'c Connection,
}

impl<'c> TypesWriter<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 写入词表
    ///
    /// # 返回
    /// - Ok(SeedSummary): 每张词表本次新插入的条数
    pub fn write_into_tables(&self, seed: &VocabularySeed) -> RepositoryResult<SeedSummary> {
        let tx = self.conn.unchecked_transaction()?;
        let writer = SqliteRelationalWriter::new(&tx);

        let summary = SeedSummary {
            directions: Self::write_vocabulary(&writer, &DIRECTION_VOCABULARY, &seed.directions)?,
            movements: Self::write_vocabulary(&writer, &MOVEMENT_VOCABULARY, &seed.movements)?,
            vehicles: Self::write_vocabulary(&writer, &VEHICLE_VOCABULARY, &seed.vehicles)?,
        };

        tx.commit()?;
        info!(
            directions = summary.directions,
            movements = summary.movements,
            vehicles = summary.vehicles,
            "词表初始化完成"
        );
        Ok(summary)
    }

    fn write_vocabulary(
        writer: &dyn RelationalWriter,
        vocabulary: &VocabularyTable,
        names: &[String],
    ) -> RepositoryResult<usize> {
        let mut inserted = 0;
        for name in names {
            let value = Value::Text(name.clone());
            if writer.attribute_exists(vocabulary.label, &value, vocabulary.table)? {
                continue;
            }
            writer.insert(vocabulary.table, &[vocabulary.label], &[value])?;
            inserted += 1;
        }
        Ok(inserted)
    }
}
