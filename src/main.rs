// ==========================================
// 交通调查入库系统 - 命令行入口
// ==========================================
// 配置: 环境变量（见 config::config_keys），可选第一个参数为 JSON 配置文件
// 日志: RUST_LOG 控制级别；LOG_FORMAT=json 输出 JSON 行
// ==========================================

use anyhow::Context;
use traffic_study_loader::config::LoaderConfig;
use traffic_study_loader::db::open_sqlite_connection;
use traffic_study_loader::{logging, LoadOrchestrator, APP_NAME, VERSION};

fn main() -> anyhow::Result<()> {
    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    let config = match std::env::args().nth(1) {
        Some(path) => LoaderConfig::from_json_file(&path)
            .with_context(|| format!("无法加载配置文件: {}", path))?,
        None => LoaderConfig::from_env().context("无法从环境变量加载配置")?,
    };

    tracing::info!(
        base_folder = %config.base_folder,
        initialize_setup = config.initialize_setup,
        "配置已加载"
    );

    let conn = open_sqlite_connection(&config.db_connection_string)
        .with_context(|| format!("无法打开数据库: {}", config.db_connection_string))?;

    let summary = LoadOrchestrator::new(&conn, config).run()?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
