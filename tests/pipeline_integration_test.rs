// ==========================================
// 入库流水线集成测试
// ==========================================
// 测试目标: 建表 → 词表 → 阶段 1-4 的完整流程与层级写入约束
// ==========================================

mod test_helpers;

use rusqlite::Connection;
use std::collections::HashSet;
use tempfile::TempDir;
use test_helpers::*;
use traffic_study_loader::config::LoaderConfig;
use traffic_study_loader::domain::MovementVehicleKey;
use traffic_study_loader::engine::{
    CoreDataProvider, DirectionsMovementsProvider, IdentityResolver, ResolutionError,
    ResolutionResult, Resolved, StudiesDirectionsProvider, StudiesProvider, TransactionContext,
    VehiclesAndGranularCountsProvider,
};
use traffic_study_loader::importer::ExtractionError;
use traffic_study_loader::logging;
use traffic_study_loader::repository::{RepositoryError, SqliteRelationalWriter};
use traffic_study_loader::schema::{granular_count_columns as gc, table_names};
use traffic_study_loader::tabular::{Cell, Grid};
use traffic_study_loader::{LoadOrchestrator, LoaderError};

fn in_memory_config() -> LoaderConfig {
    LoaderConfig::new(":memory:")
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_round_trip_on_fixture() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![fixture_workbook("TMC-101.xlsx")]);

    let summary = LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap();

    assert_eq!(summary.files, 1);
    assert_eq!(summary.studies, 1);
    assert_eq!(summary.study_directions, 2);
    assert_eq!(summary.direction_movements, 3);
    assert_eq!(summary.movement_vehicles, 5);
    assert_eq!(summary.granular_counts, 5);
    assert!(!summary.run_id.is_empty());

    assert_eq!(count_rows(&conn, table_names::STUDIES), 1);
    assert_eq!(count_rows(&conn, table_names::STUDIES_DIRECTIONS), 2);
    assert!(count_rows(&conn, table_names::DIRECTIONS_MOVEMENTS) <= 4);
    assert!(count_rows(&conn, table_names::MOVEMENTS_VEHICLES) <= 12);
    assert_eq!(count_rows(&conn, table_names::GRANULAR_COUNT), 5);
    assert_eq!(dangling_foreign_keys(&conn), 0);
}

#[test]
fn test_study_row_fields() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![fixture_workbook("TMC-101.xlsx")]);
    LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap();

    let (study_type, duration, project, date): (String, f64, Option<String>, String) = conn
        .query_row(
            "SELECT study_type, study_duration, project_name, study_date FROM studies WHERE miovision_id = 101",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();
    assert_eq!(study_type, "TMC");
    assert!((duration - 2.5).abs() < 1e-9);
    assert_eq!(project.as_deref(), Some("Downtown Counts"));
    assert_eq!(date, "2024-05-01 07:00:00");
}

#[test]
fn test_granular_sparsity_and_exact_counts() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![fixture_workbook("TMC-101.xlsx")]);
    LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap();

    let zero_rows: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM granular_count WHERE {} = 0", gc::TRAFFIC_COUNT),
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(zero_rows, 0);

    let mut stmt = conn
        .prepare(
            r#"
            SELECT dt.direction_type_name, mt.movement_type_name, vt.vehicle_type_name,
                   g.time_stamp, g.traffic_count
            FROM granular_count g
            JOIN movements_vehicles mv ON mv.id = g.movement_vehicle_id
            JOIN vehicles_types vt ON vt.id = mv.vehicle_type_id
            JOIN directions_movements dm ON dm.id = mv.direction_movement_id
            JOIN movement_types mt ON mt.id = dm.movement_type_id
            JOIN studies_directions sd ON sd.id = dm.study_direction_id
            JOIN direction_types dt ON dt.id = sd.direction_type_id
            ORDER BY 1, 2, 3, 4
            "#,
        )
        .unwrap();
    let rows: Vec<(String, String, String, String, i64)> = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let expected = vec![
        ("Northbound", "Right", "Buses", "2024-05-01 07:15:00", 1),
        ("Northbound", "Right", "Lights", "2024-05-01 07:00:00", 3),
        ("Northbound", "Thru", "Lights", "2024-05-01 07:00:00", 2),
        ("Southbound", "Right", "Bicycles", "2024-05-01 07:00:00", 4),
        ("Southbound", "Right", "Lights", "2024-05-01 07:15:00", 5),
    ];
    let actual: Vec<(&str, &str, &str, &str, i64)> = rows
        .iter()
        .map(|(d, m, v, t, c)| (d.as_str(), m.as_str(), v.as_str(), t.as_str(), *c))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_hierarchical_ids_distinct_across_files() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![
        fixture_workbook("TMC-101.xlsx"),
        fixture_workbook("TMC-102.xlsx"),
    ]);

    let summary = LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap();
    assert_eq!(summary.study_directions, 4);
    assert_eq!(summary.movement_vehicles, 10);
    assert_eq!(summary.granular_counts, 10);

    // 两个文件共享词表，层级行各自独立
    assert_eq!(count_rows(&conn, table_names::DIRECTION_TYPES), 2);
    let pairs: HashSet<(i64, i64)> = conn
        .prepare("SELECT miovision_id, direction_type_id FROM studies_directions")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(pairs.len(), 4);
    assert_eq!(dangling_foreign_keys(&conn), 0);
}

#[test]
fn test_duplicate_miovision_id_fails_at_database() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![
        fixture_workbook("TMC-101.xlsx"),
        fixture_workbook("ATR-101.xlsx"),
    ]);

    let err = LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Repository(RepositoryError::UniqueConstraintViolation(_))
    ));

    // studies 阶段整体回滚
    assert_eq!(count_rows(&conn, table_names::STUDIES), 0);
}

#[test]
fn test_stage_three_before_stage_two_is_key_not_found() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![fixture_workbook("TMC-101.xlsx")]);
    let orchestrator = LoadOrchestrator::new(&conn, in_memory_config());
    orchestrator.initialize(&sources).unwrap();

    let writer = SqliteRelationalWriter::new(&conn);
    let mut context = TransactionContext::new(&writer);
    StudiesProvider::new()
        .write_data(&writer, &mut context, &sources)
        .unwrap();

    let err = DirectionsMovementsProvider::new()
        .write_data(&writer, &mut context, &sources)
        .unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Resolution(ResolutionError::KeyNotFound { .. })
    ));
    assert_eq!(count_rows(&conn, table_names::DIRECTIONS_MOVEMENTS), 0);
}

#[test]
fn test_rerun_with_fresh_context_reuses_existing_rows() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![fixture_workbook("TMC-101.xlsx")]);
    LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap();

    // 新的上下文：缓存为空，只能从库中找回已有行
    let writer = SqliteRelationalWriter::new(&conn);
    let mut context = TransactionContext::new(&writer);
    let directions = StudiesDirectionsProvider::new()
        .write_data(&writer, &mut context, &sources)
        .unwrap();
    let movements = DirectionsMovementsProvider::new()
        .write_data(&writer, &mut context, &sources)
        .unwrap();

    assert_eq!(directions.rows, 0);
    assert_eq!(movements.rows, 0);
    assert_eq!(count_rows(&conn, table_names::STUDIES_DIRECTIONS), 2);
    assert_eq!(count_rows(&conn, table_names::DIRECTIONS_MOVEMENTS), 3);

    let key = MovementVehicleKey {
        miovision_id: 101,
        direction_name: "Northbound".to_string(),
        movement_name: "Right".to_string(),
        vehicle_name: "Lights".to_string(),
    };
    let resolved = context
        .lookup_or_create_movement_vehicle(&key, &mut |_, _| -> ResolutionResult<i64> {
            panic!("已有的 MovementVehicle 不应重新建行")
        })
        .unwrap();
    assert!(matches!(resolved, Resolved::Found(_)));
    assert_eq!(count_rows(&conn, table_names::MOVEMENTS_VEHICLES), 5);
}

#[test]
fn test_granular_stage_without_movements_is_key_not_found() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![fixture_workbook("TMC-101.xlsx")]);
    LoadOrchestrator::new(&conn, in_memory_config())
        .initialize(&sources)
        .unwrap();

    let writer = SqliteRelationalWriter::new(&conn);
    let mut context = TransactionContext::new(&writer);
    context.record_path_directions("TMC-101.xlsx", &["Northbound".to_string()]);

    let err = VehiclesAndGranularCountsProvider::new()
        .write_data(&writer, &mut context, &sources)
        .unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Resolution(ResolutionError::KeyNotFound { mapping: "path_movements", .. })
    ));
}

#[test]
fn test_non_singular_vocabulary_lookup() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let sources = boxed(vec![fixture_workbook("TMC-101.xlsx")]);
    LoadOrchestrator::new(&conn, in_memory_config())
        .initialize(&sources)
        .unwrap();

    // 绕过词表写入器直接插入重复名称
    conn.execute(
        "INSERT INTO direction_types (direction_type_name) VALUES ('Northbound')",
        [],
    )
    .unwrap();

    let writer = SqliteRelationalWriter::new(&conn);
    let mut context = TransactionContext::new(&writer);
    let err = context.direction_type_id("Northbound").unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::NonSingularResult { count: 2, .. }
    ));

    let config = LoaderConfig {
        initialize_setup: false,
        ..in_memory_config()
    };
    let err = LoadOrchestrator::new(&conn, config)
        .run_sources(&sources)
        .unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Resolution(ResolutionError::NonSingularResult { .. })
    ));
}

#[test]
fn test_unknown_vehicle_aborts_run() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();

    let mut workbook = fixture_workbook("TMC-101.xlsx");
    workbook.insert_sheet(
        "Westbound",
        Grid::new(vec![
            vec![Cell::from("Westbound")],
            vec![Cell::Empty, Cell::from("Thru")],
            vec![Cell::from("Time"), Cell::from("Scooters")],
            vec![Cell::from(at(7, 0)), Cell::Int(2)],
        ]),
    );
    let sources = boxed(vec![workbook]);

    let err = LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Extraction(ExtractionError::UnknownVehicle { .. })
    ));

    // 前三个阶段已提交，最后一个阶段回滚
    assert_eq!(count_rows(&conn, table_names::STUDIES), 1);
    assert_eq!(count_rows(&conn, table_names::GRANULAR_COUNT), 0);
    assert_eq!(count_rows(&conn, table_names::MOVEMENTS_VEHICLES), 0);
}

#[test]
fn test_incremental_run_without_initialize() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let first = boxed(vec![fixture_workbook("TMC-101.xlsx")]);
    LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&first)
        .unwrap();

    let config = LoaderConfig {
        initialize_setup: false,
        ..in_memory_config()
    };
    let second = boxed(vec![fixture_workbook("TMC-202.xlsx")]);
    let summary = LoadOrchestrator::new(&conn, config)
        .run_sources(&second)
        .unwrap();

    assert_eq!(summary.studies, 1);
    assert_eq!(count_rows(&conn, table_names::STUDIES), 2);
    assert_eq!(count_rows(&conn, table_names::VEHICLES_TYPES), 3);
    assert_eq!(dangling_foreign_keys(&conn), 0);
}

#[test]
fn test_run_from_csv_directories() {
    logging::init_test();
    let base = TempDir::new().unwrap();
    write_csv_workbook(base.path(), "TMC-301.d").unwrap();
    write_csv_workbook(base.path(), "TMC-302.d").unwrap();

    let conn = Connection::open_in_memory().unwrap();
    traffic_study_loader::db::configure_sqlite_connection(&conn).unwrap();

    let summary = LoadOrchestrator::new(&conn, test_config(base.path(), ".d"))
        .run()
        .unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.granular_counts, 10);
    assert_eq!(count_rows(&conn, table_names::STUDIES), 2);
    assert_eq!(dangling_foreign_keys(&conn), 0);
}

#[test]
fn test_run_rejects_folder_with_wrong_extension() {
    logging::init_test();
    let base = TempDir::new().unwrap();
    write_csv_workbook(base.path(), "TMC-301.d").unwrap();
    std::fs::write(base.path().join("notes.txt"), "x").unwrap();

    let conn = Connection::open_in_memory().unwrap();
    let err = LoadOrchestrator::new(&conn, test_config(base.path(), ".d"))
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Extraction(ExtractionError::ExtensionMismatch { .. })
    ));
}

#[test]
fn test_missing_summary_label_names_file() {
    logging::init_test();
    let (_file, conn) = create_test_db().unwrap();
    let workbook = fixture_workbook("TMC-101.xlsx").with_sheet(
        "Summary",
        vec![vec![Cell::from("Study Name"), Cell::from("King & Bay")]],
    );
    let sources = boxed(vec![workbook]);

    let err = LoadOrchestrator::new(&conn, in_memory_config())
        .run_sources(&sources)
        .unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Extraction(ExtractionError::LabelMissing { .. })
    ));
    assert!(err.to_string().contains("TMC-101.xlsx"));
}
