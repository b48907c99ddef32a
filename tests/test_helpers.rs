// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、标准调查工作簿夹具、CSV 目录工作簿、行数与外键检查
// 夹具: 2 个方向 / 2 个转向 / 3 个车型 / 5 个非零计数（合计 15）
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use traffic_study_loader::config::LoaderConfig;
use traffic_study_loader::db::open_sqlite_connection;
use traffic_study_loader::tabular::{Cell, InMemoryWorkbook, TabularSource};

pub const BREAKDOWN_SHEET: &str = "Total Volume Class Breakdown";

/// 夹具中非零计数之和
pub const FIXTURE_TOTAL_VOLUME: i64 = 15;

/// 创建临时测试数据库（已开启外键约束）
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - Connection: 已配置的连接
pub fn create_test_db() -> Result<(NamedTempFile, Connection), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("临时路径不是 UTF-8")?.to_string();
    let conn = open_sqlite_connection(&db_path)?;
    Ok((temp_file, conn))
}

/// 测试配置（基础目录由调用方指定）
pub fn test_config(base_folder: &Path, validation_extension: &str) -> LoaderConfig {
    LoaderConfig {
        base_folder: base_folder.display().to_string(),
        validation_extension: validation_extension.to_string(),
        ..LoaderConfig::new(":memory:")
    }
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn text(value: &str) -> Cell {
    Cell::from(value)
}

fn counts(time: NaiveDateTime, values: &[i64]) -> Vec<Cell> {
    let mut row = vec![Cell::from(time)];
    row.extend(values.iter().map(|v| Cell::Int(*v)));
    row
}

/// 标准夹具的全部工作表
pub fn fixture_sheets() -> Vec<(String, Vec<Vec<Cell>>)> {
    let summary = vec![
        vec![text("Study Name"), text("King & Bay")],
        vec![text("Project"), text("Downtown Counts")],
        vec![text("Start Time"), Cell::from(at(7, 0))],
        vec![text("End Time"), Cell::from(at(9, 30))],
        vec![text("Location"), text("King St & Bay St")],
        vec![text("Latitude and Longitude"), text("43.6487, -79.3817")],
    ];

    // Right: Lights/Buses/Bicycles，Thru: Lights/Buses/Bicycles
    let northbound = vec![
        vec![text("Northbound")],
        vec![Cell::Empty, text("Right"), Cell::Empty, Cell::Empty, text("Thru"), Cell::Empty, Cell::Empty],
        vec![
            text("Time"),
            text("Lights"),
            text("Buses"),
            text("Bicycles"),
            text("Lights"),
            text("Buses"),
            text("Bicycles"),
        ],
        counts(at(7, 0), &[3, 0, 0, 2, 0, 0]),
        counts(at(7, 15), &[0, 1, 0, 0, 0, 0]),
    ];

    // 只有 Right
    let southbound = vec![
        vec![text("Southbound")],
        vec![Cell::Empty, text("Right"), Cell::Empty, Cell::Empty],
        vec![text("Time"), text("Lights"), text("Buses"), text("Bicycles")],
        counts(at(7, 0), &[0, 0, 4]),
        counts(at(7, 15), &[5, 0, 0]),
    ];

    let breakdown = vec![
        vec![text("Class"), text("Northbound"), text("Southbound"), text("Total"), text("Check")],
        vec![text("Grand Total"), Cell::Int(6), Cell::Int(9), Cell::Int(15), Cell::Int(15)],
        vec![text("Lights"), Cell::Int(5), Cell::Int(5), Cell::Int(10), Cell::Int(10)],
        vec![text("% Lights"), Cell::Float(0.83), Cell::Float(0.55), Cell::Float(0.66), Cell::Float(0.66)],
        vec![text("Buses"), Cell::Int(1), Cell::Int(0), Cell::Int(1), Cell::Int(1)],
        vec![text("Bicycles"), Cell::Int(0), Cell::Int(4), Cell::Int(4), Cell::Int(4)],
    ];

    vec![
        ("Summary".to_string(), summary),
        ("Northbound".to_string(), northbound),
        ("Southbound".to_string(), southbound),
        (BREAKDOWN_SHEET.to_string(), breakdown),
    ]
}

/// 标准夹具的内存工作簿
///
/// # 参数
/// - file_name: 如 "TMC-101.xlsx"
pub fn fixture_workbook(file_name: &str) -> InMemoryWorkbook {
    fixture_sheets()
        .into_iter()
        .fold(InMemoryWorkbook::new(file_name), |workbook, (name, rows)| {
            workbook.with_sheet(&name, rows)
        })
}

pub fn boxed(workbooks: Vec<InMemoryWorkbook>) -> Vec<Box<dyn TabularSource>> {
    workbooks
        .into_iter()
        .map(|w| Box::new(w) as Box<dyn TabularSource>)
        .collect()
}

/// 把标准夹具写成 CSV 目录工作簿
///
/// # 参数
/// - base: 基础目录
/// - dir_name: 工作簿目录名，如 "TMC-101.d"
pub fn write_csv_workbook(base: &Path, dir_name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = base.join(dir_name);
    fs::create_dir_all(&dir)?;

    for (name, rows) in fixture_sheets() {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(dir.join(format!("{}.csv", name)))?;
        for row in rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
    }

    Ok(dir)
}

/// 表行数
pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |row| row.get(0))
        .unwrap()
}

/// 外键悬空的行数（PRAGMA foreign_key_check）
pub fn dangling_foreign_keys(conn: &Connection) -> usize {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check").unwrap();
    let rows = stmt.query_map([], |_| Ok(())).unwrap();
    rows.count()
}
