// ==========================================
// 交通调查入库系统 - 统一错误类型
// ==========================================
// 职责: 汇总各层错误，由编排器与入口返回
// 策略: 所有错误对整次运行都是致命的，不做跳过或重试
// ==========================================

use crate::config::ConfigError;
use crate::engine::ResolutionError;
use crate::importer::ExtractionError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<rusqlite::Error> for LoaderError {
    fn from(err: rusqlite::Error) -> Self {
        LoaderError::Repository(err.into())
    }
}

pub type LoaderResult<T> = Result<T, LoaderError>;
