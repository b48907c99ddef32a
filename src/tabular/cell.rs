// ==========================================
// 交通调查入库系统 - 单元格与网格
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

static EMPTY_CELL: Cell = Cell::Empty;

/// 文本单元格可识别的日期时间格式
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

// ==========================================
// Cell - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// 空单元格或纯空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 文本表示（去首尾空白）；空单元格返回 None
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.to_string().trim().to_string())
    }

    /// 日期时间：原生日期单元格，或可按已知格式解析的文本
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::DateTime(dt) => Some(*dt),
            Cell::Text(s) => parse_datetime_text(s.trim()),
            _ => None,
        }
    }

    /// 浮点数：数值单元格，或可解析的文本
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// 整数计数：整数、整值浮点数或整数文本
    ///
    /// 小数、空值、负数均返回 None
    pub fn as_count(&self) -> Option<i64> {
        let value = match self {
            Cell::Int(i) => *i,
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
            Cell::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<i64>() {
                    Ok(v) => v,
                    Err(_) => {
                        let f = trimmed.parse::<f64>().ok()?;
                        if !f.is_finite() || f.fract() != 0.0 {
                            return None;
                        }
                        f as i64
                    }
                }
            }
            _ => return None,
        };

        (value >= 0).then_some(value)
    }

    /// 从 CSV 文本推断单元格类型
    pub fn infer(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Cell::Float(f);
        }
        if let Some(dt) = parse_datetime_text(trimmed) {
            return Cell::DateTime(dt);
        }
        Cell::Text(raw.to_string())
    }
}

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from(value.as_str())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

// ==========================================
// Grid - 工作表网格（行优先，行长可不一致）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// 最宽行的列数
    pub fn width(&self) -> usize {
        self.width_from(0)
    }

    /// 从 first_row 起（含）最宽行的列数；标题行等不参与列跨度时使用
    pub fn width_from(&self, first_row: usize) -> usize {
        self.rows
            .iter()
            .skip(first_row)
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// 读取单元格；越界视为空单元格
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}
