// ==========================================
// 交通调查入库系统 - 抽取器 Trait
// ==========================================
// 职责: 定义抽取接口（不包含实现）
// 约束: 抽取器只读取给定数据源，不做任何数据库 I/O
// ==========================================

use crate::importer::error::ExtractionResult;
use crate::tabular::TabularSource;

/// 前序阶段已知的实体名称
///
/// - directions: 当前文件已识别的方向
/// - movements:  当前文件已识别的转向
/// - vehicles:   全局车型词表
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownEntities<'a> {
    pub directions: &'a [String],
    pub movements: &'a [String],
    pub vehicles: &'a [String],
}

// ==========================================
// EntityExtractor Trait
// ==========================================
// 实现者: StudiesExtractor, DirectionsExtractor, MovementsExtractor, GranularExtractor
pub trait EntityExtractor<T> {
    /// 从单个数据源抽取字段记录
    ///
    /// # 参数
    /// - source: 已打开的工作簿
    /// - known: 前序阶段提供的实体名称（不需要的抽取器忽略）
    ///
    /// # 返回
    /// - Ok(Vec<T>): 字段记录
    /// - Err: 版式不符
    fn extract_fields(
        &self,
        source: &dyn TabularSource,
        known: &KnownEntities<'_>,
    ) -> ExtractionResult<Vec<T>>;
}
