// ==========================================
// 交通调查入库系统 - 抽取层
// ==========================================
// 职责: 从调查工作簿中读取字段记录，不做数据库 I/O
// 包含: 目录校验、词表发现、四类实体抽取器、工作簿总量
// ==========================================

pub mod base_types;
pub mod direction_extractor;
pub mod error;
pub mod extractor_trait;
pub mod folder_validator;
pub mod granular_extractor;
pub mod layout;
pub mod movement_extractor;
pub mod study_extractor;
pub mod volume_totals;

pub use base_types::{BaseTypesProvider, DirectionVocabulary, MovementVocabulary, VehicleVocabulary};
pub use direction_extractor::DirectionsExtractor;
pub use error::{ExtractionError, ExtractionResult};
pub use extractor_trait::{EntityExtractor, KnownEntities};
pub use folder_validator::FolderValidator;
pub use granular_extractor::GranularExtractor;
pub use movement_extractor::{sheet_movements, MovementsExtractor};
pub use study_extractor::StudiesExtractor;
pub use volume_totals::workbook_grand_total;
