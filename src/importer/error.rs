// ==========================================
// 交通调查入库系统 - 抽取层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 每个错误都带出错文件路径；抽取错误对整次运行都是致命的
// ==========================================

use thiserror::Error;

/// 抽取层错误类型
#[derive(Error, Debug)]
pub enum ExtractionError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {path}（扩展名: {extension}）")]
    UnsupportedFormat { path: String, extension: String },

    #[error("基础目录不可用: {0}")]
    BaseFolderInvalid(String),

    #[error("文件扩展名不符 (期望 {expected}): {path}")]
    ExtensionMismatch { path: String, expected: String },

    #[error("文件读取失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("工作簿解析失败: {path}: {message}")]
    Workbook { path: String, message: String },

    #[error("CSV 解析失败: {path}: {message}")]
    Csv { path: String, message: String },

    // ===== 文件名约定错误 =====
    #[error("文件名不符合 <study_type>-<miovision_id> 约定: {0}")]
    InvalidFileName(String),

    #[error("miovision_id 必须为正整数 ({path}): {value}")]
    InvalidMiovisionId { path: String, value: String },

    // ===== 版式错误 =====
    #[error("工作表缺失 ({path}): {sheet}")]
    SheetMissing { path: String, sheet: String },

    #[error("汇总页缺少标签 ({path}): {label}")]
    LabelMissing { path: String, label: String },

    #[error("经纬度无法解析 ({path}): {value}")]
    InvalidLatLong { path: String, value: String },

    #[error("单元格值无效 ({path}, 表 {sheet}, 行 {row}, 列 {col}): {message}")]
    InvalidCell {
        path: String,
        sheet: String,
        row: usize,
        col: usize,
        message: String,
    },

    #[error("车型 {vehicle} 不在车型词表中 ({path}, 表 {sheet})")]
    UnknownVehicle {
        path: String,
        sheet: String,
        vehicle: String,
    },

    #[error("行索引不是时间戳 ({path}, 表 {sheet}, 行 {row}): {value}")]
    NonTimestampIndex {
        path: String,
        sheet: String,
        row: usize,
        value: String,
    },

    #[error("汇总行缺失 ({path}, 表 {sheet}): {label}")]
    TotalRowMissing {
        path: String,
        sheet: String,
        label: String,
    },
}

/// Result 类型别名
pub type ExtractionResult<T> = Result<T, ExtractionError>;
