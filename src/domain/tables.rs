// ==========================================
// 年度产能分析 - 输入表模型
// ==========================================
// 职责: 数据加载协作方交付的七张逻辑表（已通过结构校验）
// 红线: 加载后不可变，所有派生值都从这里重建
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 工作表名称与标识列（与输入工作簿一致）
// ==========================================
pub mod sheet_names {
    pub const QUANTITIES: &str = "Quantities";
    pub const AVG_PARTS_PER_LOT: &str = "Avg Parts per Lot";
    pub const MACHINING_RATES: &str = "Machining Rates";
    pub const SETUP_RATES: &str = "Setup Rates";
    pub const VENDOR_TIME: &str = "Vendor Time";
    pub const MACHINE_ALLOCATION: &str = "Machine Allocation";
    pub const SETUP_ALLOCATION: &str = "Setup Allocation";

    /// 全部必需工作表（加载顺序）
    pub const REQUIRED: [&str; 7] = [
        QUANTITIES,
        AVG_PARTS_PER_LOT,
        MACHINING_RATES,
        SETUP_RATES,
        VENDOR_TIME,
        MACHINE_ALLOCATION,
        SETUP_ALLOCATION,
    ];
}

pub mod key_columns {
    pub const PART_NUMBER: &str = "Part Number";
    pub const OPERATIONS: &str = "Operations";
    pub const VENDOR_DAYS: &str = "Vendor Time per Lot (Business Days)";
}

// ==========================================
// KeyedRow / KeyedTable - 以标识列为键的数值矩阵
// ==========================================
// 用于: Quantities / Avg Parts per Lot / Machining Rates / Setup Rates / Machine Allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedRow {
    pub key: String,
    pub values: Vec<Option<f64>>, // 与 columns 一一对应，空白/非数值为 None
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "KeyedTableData", into = "KeyedTableData")]
pub struct KeyedTable {
    key_column: String,
    columns: Vec<String>,
    rows: Vec<KeyedRow>,
    row_index: HashMap<String, usize>,
    column_index: HashMap<String, usize>,
}

/// 序列化形态（索引在反序列化时重建）
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeyedTableData {
    key_column: String,
    columns: Vec<String>,
    rows: Vec<KeyedRow>,
}

impl From<KeyedTableData> for KeyedTable {
    fn from(data: KeyedTableData) -> Self {
        KeyedTable::new(data.key_column, data.columns, data.rows)
    }
}

impl From<KeyedTable> for KeyedTableData {
    fn from(table: KeyedTable) -> Self {
        KeyedTableData {
            key_column: table.key_column,
            columns: table.columns,
            rows: table.rows,
        }
    }
}

impl KeyedTable {
    /// 构造表并建立行/列索引
    ///
    /// 重复键以首次出现为准（与按行扫描的查找语义一致）
    pub fn new(key_column: impl Into<String>, columns: Vec<String>, rows: Vec<KeyedRow>) -> Self {
        let mut row_index = HashMap::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            if row_index.contains_key(&row.key) {
                tracing::warn!(key = %row.key, "重复标识，后出现的行在查找中被忽略");
                continue;
            }
            row_index.insert(row.key.clone(), idx);
        }

        let mut column_index = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            column_index.entry(column.clone()).or_insert(idx);
        }

        Self {
            key_column: key_column.into(),
            columns,
            rows,
            row_index,
            column_index,
        }
    }

    /// 空表（仅表头）
    pub fn empty(key_column: impl Into<String>, columns: Vec<String>) -> Self {
        Self::new(key_column, columns, Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[KeyedRow] {
        &self.rows
    }

    /// 按表内顺序返回所有行键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.key.as_str())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    pub fn row(&self, key: &str) -> Option<&KeyedRow> {
        self.row_index.get(key).map(|&idx| &self.rows[idx])
    }

    /// 查找单元格数值；行、列任一缺失或单元格为空时返回 None
    pub fn value(&self, key: &str, column: &str) -> Option<f64> {
        let row = self.row(key)?;
        let col = *self.column_index.get(column)?;
        row.values.get(col).copied().flatten()
    }
}

impl PartialEq for KeyedTable {
    fn eq(&self, other: &Self) -> bool {
        self.key_column == other.key_column
            && self.columns == other.columns
            && self.rows == other.rows
    }
}

// ==========================================
// VendorLeadTime - 外协周期（工作日/批）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorLeadTime {
    pub part_number: String,
    pub business_days: Option<f64>, // 空白 = 无外协依赖（不是 0）
}

// ==========================================
// OperatorCell - Setup Allocation 单元格原值
// ==========================================
// 三种形态: 名字 / 逗号分隔名单 / 数字编号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OperatorCell {
    Text(String),
    Number(f64),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupAllocationEntry {
    pub machine: String,
    pub cell: OperatorCell,
}

// ==========================================
// InputTables - 七张逻辑表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputTables {
    pub quantities: KeyedTable,        // 零件 × 年度 → 数量
    pub avg_parts_per_lot: KeyedTable, // 零件 × 年度 → 平均批量
    pub machining_rates: KeyedTable,   // 零件 × 工序 → 分钟/件
    pub setup_rates: KeyedTable,       // 零件 × 工序 → 分钟/批
    pub vendor_time: Vec<VendorLeadTime>,
    pub machine_allocation: KeyedTable, // 工序 × 机台 → 权重
    pub setup_allocation: Vec<SetupAllocationEntry>,
}

impl InputTables {
    /// 年度列（按列顺序即时间顺序）
    pub fn years(&self) -> &[String] {
        self.quantities.columns()
    }

    /// 工序列表（取自 Machining Rates 列）
    pub fn operations(&self) -> &[String] {
        self.machining_rates.columns()
    }

    /// 机台列表（取自 Machine Allocation 列，占位列已在加载时剔除）
    pub fn allocation_machines(&self) -> &[String] {
        self.machine_allocation.columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> KeyedTable {
        KeyedTable::new(
            "Part Number",
            vec!["2025".to_string(), "2026".to_string()],
            vec![
                KeyedRow { key: "P1".to_string(), values: vec![Some(10.0), None] },
                KeyedRow { key: "P2".to_string(), values: vec![Some(20.0), Some(5.0)] },
                KeyedRow { key: "P1".to_string(), values: vec![Some(99.0), Some(99.0)] },
            ],
        )
    }

    #[test]
    fn test_value_lookup_by_key_and_column() {
        let table = sample_table();
        assert_eq!(table.value("P2", "2026"), Some(5.0));
        assert_eq!(table.value("P1", "2026"), None);
        assert_eq!(table.value("P3", "2025"), None);
        assert_eq!(table.value("P1", "2030"), None);
    }

    #[test]
    fn test_duplicate_key_first_wins() {
        let table = sample_table();
        assert_eq!(table.value("P1", "2025"), Some(10.0));
        assert_eq!(table.rows().len(), 3);
    }
}
