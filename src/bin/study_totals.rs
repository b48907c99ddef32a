// ==========================================
// 交通调查入库系统 - 总量核对工具
// ==========================================
// 用途: 入库后逐个调查比对工作簿 "Grand Total" 与库内分时计数之和
// 配置: 与主程序相同的环境变量
// 退出码: 存在不一致时返回 1
// ==========================================

use anyhow::Context;
use traffic_study_loader::config::LoaderConfig;
use traffic_study_loader::db::open_sqlite_connection;
use traffic_study_loader::{logging, reconcile, LoadOrchestrator};

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = LoaderConfig::from_env().context("无法从环境变量加载配置")?;
    let conn = open_sqlite_connection(&config.db_connection_string)
        .with_context(|| format!("无法打开数据库: {}", config.db_connection_string))?;

    let breakdown_sheet = config.vehicle_breakdown_sheet.clone();
    let sources = LoadOrchestrator::new(&conn, config).open_sources()?;
    let results = reconcile(&conn, &sources, &breakdown_sheet)?;

    let mut mismatches = 0;
    for result in &results {
        let status = if result.is_consistent() { "OK" } else { "MISMATCH" };
        println!(
            "{:>10}  workbook={:>8}  database={:>8}  {}",
            result.miovision_id, result.workbook_total, result.database_total, status
        );
        if !result.is_consistent() {
            mismatches += 1;
        }
    }

    tracing::info!(studies = results.len(), mismatches, "总量核对完成");
    if mismatches > 0 {
        std::process::exit(1);
    }
    Ok(())
}
