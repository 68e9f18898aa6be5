// ==========================================
// 年度产能分析 - 数据清洗器
// ==========================================
// 职责: 表头 / 标识 / 数值单元格标准化
// 红线: 数值列中的非数字文本按缺失处理并记录警告，不中断导入
// ==========================================

use crate::importer::sheet::CellValue;
use tracing::warn;

/// 非机台列的表头
const NON_MACHINE_HEADERS: [&str; 4] = ["Operations", "Total", "Operator", "Unnamed: 0"];

pub struct DataCleaner;

impl DataCleaner {
    pub fn new() -> Self {
        Self
    }

    /// 标识文本: 整数值不带小数部分（1001 而非 1001.0），空白为 None
    pub fn key_text(&self, cell: &CellValue) -> Option<String> {
        match cell {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }

    /// 表头文本（空白表头返回空串）
    pub fn header_text(&self, cell: &CellValue) -> String {
        self.key_text(cell).unwrap_or_default()
    }

    /// 空白或占位表头（Unnamed: N / _EMPTY*）
    pub fn is_placeholder_header(&self, header: &str) -> bool {
        let trimmed = header.trim();
        trimmed.is_empty() || trimmed.starts_with("Unnamed:") || trimmed.starts_with("_EMPTY")
    }

    /// 机台列识别: 排除占位表头与 Operations/Total/Operator 等标签列
    pub fn is_machine_header(&self, header: &str) -> bool {
        !self.is_placeholder_header(header) && !NON_MACHINE_HEADERS.contains(&header.trim())
    }

    /// 数值单元格
    ///
    /// # 参数
    /// - table / column / key: 仅用于警告日志定位
    pub fn number(&self, cell: &CellValue, table: &str, column: &str, key: &str) -> Option<f64> {
        match cell {
            CellValue::Empty => None,
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Bool(_) => {
                warn!(table, column, key, "数值列出现布尔值，按缺失处理");
                None
            }
            CellValue::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match strip_thousands(trimmed).map(|t| t.parse::<f64>()) {
                    Some(Ok(n)) if n.is_finite() => Some(n),
                    _ => {
                        warn!(table, column, key, raw_value = %raw, "数值列出现非数字文本，按缺失处理");
                        None
                    }
                }
            }
        }
    }
}

/// 去掉千分位逗号；逗号不符合三位分组（如小数逗号 "1,5"）时返回 None
fn strip_thousands(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }

    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    if fraction.map_or(false, |f| f.contains(',')) {
        return None;
    }

    let mut groups = integer.split(',');
    let first = groups.next()?;
    let first_ok = (1..=3).contains(&first.len()) && first.bytes().all(|b| b.is_ascii_digit());
    let rest_ok = groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));
    if first_ok && rest_ok {
        Some(text.replace(',', ""))
    } else {
        None
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
