// ==========================================
// 交通调查入库系统 - 入库编排器
// ==========================================
// 流程:
// 1. 校验基础目录，打开全部工作簿
// 2. (initialize_setup) 建表 → 词表发现 → 词表写入
// 3. 阶段 1-4 依次执行，共享同一个 TransactionContext
// 事务: 每个阶段一个事务，阶段内任一错误回滚本阶段并终止运行
// ==========================================

use crate::config::LoaderConfig;
use crate::domain::{LoadSummary, SeedSummary, StudyFileName, VolumeReconciliation};
use crate::engine::identity_resolver::{IdentityResolver, TransactionContext};
use crate::engine::providers::{
    CoreDataProvider, DirectionsMovementsProvider, StudiesDirectionsProvider, StudiesProvider,
    VehiclesAndGranularCountsProvider, WriteCounts,
};
use crate::error::LoaderResult;
use crate::importer::{
    workbook_grand_total, BaseTypesProvider, DirectionVocabulary, FolderValidator,
    MovementVocabulary, VehicleVocabulary,
};
use crate::repository::{
    SqliteRelationalWriter, StudyTotalsRepository, TableWriter, TypesWriter, VocabularySeed,
};
use crate::schema::initial_tables;
use crate::tabular::{open_workbook, TabularSource};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, info_span};
use uuid::Uuid;

// ==========================================
// LoadOrchestrator - 入库编排器
// ==========================================
pub struct LoadOrchestrator<'c> {
    conn: &'c Connection,
    config: LoaderConfig,
}

impl<'c> LoadOrchestrator<'c> {
    /// # 参数
    /// - conn: 已配置的数据库连接（整次运行共享）
    /// - config: 入库配置
    pub fn new(conn: &'c Connection, config: LoaderConfig) -> Self {
        Self { conn, config }
    }

    /// 打开基础目录下的全部工作簿
    pub fn open_sources(&self) -> LoaderResult<Vec<Box<dyn TabularSource>>> {
        let validator = FolderValidator::new(
            Path::new(&self.config.base_folder),
            &self.config.validation_extension,
        )?;

        let sources = validator
            .files()
            .iter()
            .map(open_workbook)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sources)
    }

    /// 对基础目录执行完整入库
    pub fn run(&self) -> LoaderResult<LoadSummary> {
        let sources = self.open_sources()?;
        self.run_sources(&sources)
    }

    /// 对已打开的数据源执行完整入库
    pub fn run_sources(&self, sources: &[Box<dyn TabularSource>]) -> LoaderResult<LoadSummary> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("load_run", run_id = %run_id);
        let _guard = span.enter();

        let started = Instant::now();
        info!(
            files = sources.len(),
            initialize_setup = self.config.initialize_setup,
            "开始入库"
        );

        match self.execute(sources) {
            Ok(mut summary) => {
                summary.run_id = run_id;
                summary.elapsed_ms = started.elapsed().as_millis();
                info!(
                    studies = summary.studies,
                    study_directions = summary.study_directions,
                    direction_movements = summary.direction_movements,
                    movement_vehicles = summary.movement_vehicles,
                    granular_counts = summary.granular_counts,
                    elapsed_ms = summary.elapsed_ms as u64,
                    "入库完成"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, "入库失败，运行终止");
                Err(e)
            }
        }
    }

    /// 建表 + 词表初始化
    pub fn initialize(&self, sources: &[Box<dyn TabularSource>]) -> LoaderResult<SeedSummary> {
        TableWriter::new(self.conn).create_tables(&initial_tables())?;

        let seed = VocabularySeed {
            directions: DirectionVocabulary.return_information(sources)?,
            movements: MovementVocabulary.return_information(sources)?,
            vehicles: VehicleVocabulary::new(&self.config.vehicle_breakdown_sheet)
                .return_information(sources)?,
        };
        Ok(TypesWriter::new(self.conn).write_into_tables(&seed)?)
    }

    fn execute(&self, sources: &[Box<dyn TabularSource>]) -> LoaderResult<LoadSummary> {
        if self.config.initialize_setup {
            self.initialize(sources)?;
        }

        let reader = SqliteRelationalWriter::new(self.conn);
        let mut context = TransactionContext::new(&reader);

        let studies = self.run_stage(&StudiesProvider::new(), &mut context, sources)?;
        let directions = self.run_stage(&StudiesDirectionsProvider::new(), &mut context, sources)?;
        let movements = self.run_stage(&DirectionsMovementsProvider::new(), &mut context, sources)?;
        let granular =
            self.run_stage(&VehiclesAndGranularCountsProvider::new(), &mut context, sources)?;

        Ok(LoadSummary {
            files: sources.len(),
            studies: studies.rows,
            study_directions: directions.rows,
            direction_movements: movements.rows,
            movement_vehicles: granular.movement_vehicles,
            granular_counts: granular.rows,
            ..LoadSummary::default()
        })
    }

    fn run_stage(
        &self,
        provider: &dyn CoreDataProvider,
        resolver: &mut dyn IdentityResolver,
        sources: &[Box<dyn TabularSource>],
    ) -> LoaderResult<WriteCounts> {
        let tx = self.conn.unchecked_transaction()?;
        let writer = SqliteRelationalWriter::new(&tx);

        let counts = provider.write_data(&writer, resolver, sources)?;

        tx.commit()?;
        info!(stage = provider.stage_name(), rows = counts.rows, "阶段已提交");
        Ok(counts)
    }
}

/// 核对每个调查的工作簿总量与入库总量
///
/// # 参数
/// - breakdown_sheet: 车型分类汇总页名称
pub fn reconcile(
    conn: &Connection,
    sources: &[Box<dyn TabularSource>],
    breakdown_sheet: &str,
) -> LoaderResult<Vec<VolumeReconciliation>> {
    let repo = StudyTotalsRepository::new(conn);

    sources
        .iter()
        .map(|source| -> LoaderResult<VolumeReconciliation> {
            let miovision_id = StudyFileName::parse(source.path())?.miovision_id;
            Ok(VolumeReconciliation {
                miovision_id,
                workbook_total: workbook_grand_total(source.as_ref(), breakdown_sheet)?,
                database_total: repo.study_total_volume(miovision_id)?,
            })
        })
        .collect()
}
