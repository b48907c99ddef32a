// ==========================================
// 交通调查入库系统 - 基础目录校验
// ==========================================
// 规则: 基础目录必须存在；目录下每个条目都必须带指定扩展名
// 排序: 文件按路径排序，保证日志与处理顺序稳定
// ==========================================

use crate::importer::error::{ExtractionError, ExtractionResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FolderValidator {
    files: Vec<PathBuf>,
}

impl FolderValidator {
    /// 校验基础目录
    ///
    /// # 参数
    /// - base_folder: 基础目录
    /// - validation_extension: 扩展名（含前导 '.'，如 ".xlsx"）
    pub fn new(base_folder: &Path, validation_extension: &str) -> ExtractionResult<Self> {
        let folder_str = base_folder.display().to_string();
        if !base_folder.is_dir() {
            return Err(ExtractionError::BaseFolderInvalid(folder_str));
        }

        let expected = validation_extension.trim_start_matches('.');
        let mut files = Vec::new();
        for entry in fs::read_dir(base_folder).map_err(|e| ExtractionError::Io {
            path: folder_str.clone(),
            source: e,
        })? {
            let path = entry
                .map_err(|e| ExtractionError::Io {
                    path: folder_str.clone(),
                    source: e,
                })?
                .path();

            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == expected)
                .unwrap_or(false);
            if !matches {
                return Err(ExtractionError::ExtensionMismatch {
                    path: path.display().to_string(),
                    expected: validation_extension.to_string(),
                });
            }
            files.push(path);
        }

        files.sort();
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}
