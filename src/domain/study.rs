// ==========================================
// 交通调查入库系统 - 调查（Study）领域对象
// ==========================================
// 文件名约定: `<study_type>-<miovision_id>.<扩展名>`
// ==========================================

use crate::importer::error::{ExtractionError, ExtractionResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// StudyFileName - 文件名解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudyFileName {
    pub study_type: String,
    pub miovision_id: i64,
}

impl StudyFileName {
    /// 从路径解析 study_type 与 miovision_id
    ///
    /// # 返回
    /// - Err(InvalidFileName): 文件名不是恰好两段
    /// - Err(InvalidMiovisionId): 第二段不是正整数
    pub fn parse(path: &Path) -> ExtractionResult<Self> {
        let path_str = path.display().to_string();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ExtractionError::InvalidFileName(path_str.clone()))?;

        let parts: Vec<&str> = stem.split('-').collect();
        let (study_type, id_str) = match parts.as_slice() {
            [study_type, id_str] if !study_type.trim().is_empty() => (*study_type, *id_str),
            _ => return Err(ExtractionError::InvalidFileName(path_str)),
        };

        let miovision_id = id_str
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ExtractionError::InvalidMiovisionId {
                path: path_str.clone(),
                value: id_str.to_string(),
            })?;

        Ok(Self {
            study_type: study_type.trim().to_string(),
            miovision_id,
        })
    }
}

// ==========================================
// StudyFields - studies 表一行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyFields {
    pub miovision_id: i64,
    pub study_name: String,
    /// 时长（小时）
    pub study_duration: f64,
    pub study_type: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub project_name: Option<String>,
    /// 取开始时间
    pub study_date: NaiveDateTime,
}
