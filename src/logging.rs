// ==========================================
// 交通调查入库系统 - 日志
// ==========================================
// 输出: 文本（默认）/ JSON 行（LOG_FORMAT=json，由 main 选择）
// 级别: RUST_LOG 覆盖默认指令
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的过滤指令
pub const DEFAULT_DIRECTIVES: &str = "info";

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// 文本日志
///
/// # 环境变量
/// - RUST_LOG: 例如 `RUST_LOG=traffic_study_loader::engine=debug` 查看逐文件写入
pub fn init() {
    fmt()
        .with_env_filter(env_filter(DEFAULT_DIRECTIVES))
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// JSON 行日志，携带当前 span（含 run_id）
pub fn init_json() {
    fmt()
        .with_env_filter(env_filter(DEFAULT_DIRECTIVES))
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .init();
}

/// 测试日志：集成测试开头调用，多个测试重复调用时只有第一次生效
pub fn init_test() {
    let subscriber = fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("traffic_study_loader=debug"))
        .with_target(false);
    let _ = subscriber.try_init();
}
