// ==========================================
// 交通调查入库系统 - 入库配置
// ==========================================
// 来源: 环境变量 或 JSON 文件
// 必需: LOCAL_DATABASE_URL（缺失即失败，早于任何抽取）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 配置键（环境变量名）
pub mod config_keys {
    pub const DATABASE_URL: &str = "LOCAL_DATABASE_URL";
    pub const BASE_FOLDER: &str = "MIOVISION_BASE_FOLDER";
    pub const VEHICLE_BREAKDOWN_SHEET: &str = "VEHICLE_BREAKDOWN_SHEET";
    pub const VALIDATION_EXTENSION: &str = "VALIDATION_EXTENSION";
    pub const INITIALIZE_SETUP: &str = "INITIALIZE_SETUP";
}

pub const DEFAULT_BASE_FOLDER: &str = "Granular Miovision Files";
pub const DEFAULT_VEHICLE_BREAKDOWN_SHEET: &str = "Total Volume Class Breakdown";
pub const DEFAULT_VALIDATION_EXTENSION: &str = ".xlsx";

fn default_base_folder() -> String {
    DEFAULT_BASE_FOLDER.to_string()
}

fn default_vehicle_breakdown_sheet() -> String {
    DEFAULT_VEHICLE_BREAKDOWN_SHEET.to_string()
}

fn default_validation_extension() -> String {
    DEFAULT_VALIDATION_EXTENSION.to_string()
}

fn default_initialize_setup() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub db_connection_string: String,
    #[serde(default = "default_base_folder")]
    pub base_folder: String,
    #[serde(default = "default_vehicle_breakdown_sheet")]
    pub vehicle_breakdown_sheet: String,
    #[serde(default = "default_validation_extension")]
    pub validation_extension: String,
    /// true: 建表 + 词表初始化后再写入层级数据；false: 只写层级数据
    #[serde(default = "default_initialize_setup")]
    pub initialize_setup: bool,
}

impl LoaderConfig {
    /// 使用默认值构造（仅连接串必填）
    pub fn new(db_connection_string: &str) -> Self {
        Self {
            db_connection_string: db_connection_string.to_string(),
            base_folder: default_base_folder(),
            vehicle_breakdown_sheet: default_vehicle_breakdown_sheet(),
            validation_extension: default_validation_extension(),
            initialize_setup: default_initialize_setup(),
        }
    }

    /// 从进程环境变量读取
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（环境变量的可替换实现）
    ///
    /// # 参数
    /// - lookup: 键 → 取值
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_connection_string = non_blank(config_keys::DATABASE_URL)
            .ok_or_else(|| ConfigError::MissingKey(config_keys::DATABASE_URL.to_string()))?;

        let initialize_setup = match non_blank(config_keys::INITIALIZE_SETUP) {
            Some(raw) => parse_flag(config_keys::INITIALIZE_SETUP, &raw)?,
            None => default_initialize_setup(),
        };

        let config = Self {
            db_connection_string,
            base_folder: non_blank(config_keys::BASE_FOLDER).unwrap_or_else(default_base_folder),
            vehicle_breakdown_sheet: non_blank(config_keys::VEHICLE_BREAKDOWN_SHEET)
                .unwrap_or_else(default_vehicle_breakdown_sheet),
            validation_extension: non_blank(config_keys::VALIDATION_EXTENSION)
                .unwrap_or_else(default_validation_extension),
            initialize_setup,
        };
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取（可选字段使用默认值）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| ConfigError::Json {
            path: path_str,
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// 校验必填项与取值格式
    pub fn validate(&self) -> ConfigResult<()> {
        if self.db_connection_string.trim().is_empty() {
            return Err(ConfigError::MissingKey(config_keys::DATABASE_URL.to_string()));
        }

        if !self.validation_extension.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                key: config_keys::VALIDATION_EXTENSION.to_string(),
                value: self.validation_extension.clone(),
                message: "扩展名必须以 '.' 开头".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_flag(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: "应为 1/0/true/false/yes/no".to_string(),
        }),
    }
}
