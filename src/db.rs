// ==========================================
// 交通调查入库系统 - SQLite 连接初始化
// ==========================================
// 职责: 解析连接串并打开入库用的连接
// 连接串: 文件路径 / :memory: / sqlite://<path> / sqlite:<path>
// 约束: 入库连接一律开启外键，层级表的父子顺序由数据库兜底
// ==========================================

use rusqlite::Connection;
use std::time::Duration;
use tracing::debug;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const IN_MEMORY: &str = ":memory:";
const URL_SCHEMES: [&str; 2] = ["sqlite://", "sqlite:"];

/// 新连接的统一设置：开启外键（层级表依赖它拒绝孤儿行），并设置忙等待
///
/// 两项都只对当前连接生效，打开连接后必须调用
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
}

/// 连接串 → 数据库文件路径（或 :memory:）
pub fn database_path(connection_string: &str) -> &str {
    let trimmed = connection_string.trim();
    URL_SCHEMES
        .iter()
        .find_map(|scheme| trimmed.strip_prefix(scheme))
        .unwrap_or(trimmed)
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(connection_string: &str) -> rusqlite::Result<Connection> {
    let path = database_path(connection_string);
    let conn = if path == IN_MEMORY {
        Connection::open_in_memory()?
    } else {
        Connection::open(path)?
    };
    configure_sqlite_connection(&conn)?;
    debug!(path = %path, "数据库连接已打开");
    Ok(conn)
}
