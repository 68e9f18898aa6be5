// ==========================================
// 年度产能分析 - 类型化表构建
// ==========================================
// 职责: Workbook → InputTables（七张逻辑表）
// 红线: 缺表 → MissingTable；缺关键列 → SchemaMismatch；其余数据缺口只记录日志
// ==========================================

use crate::domain::tables::{
    key_columns, sheet_names, InputTables, KeyedRow, KeyedTable, OperatorCell,
    SetupAllocationEntry, VendorLeadTime,
};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet::{CellValue, RawSheet, Workbook};
use tracing::{debug, info};

pub struct TableBuilder {
    cleaner: DataCleaner,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner::new(),
        }
    }

    /// 构建全部输入表
    ///
    /// # 返回
    /// - Err(MissingTable): 列出全部缺失的工作表
    /// - Err(SchemaMismatch): 第一张缺少关键列的工作表
    pub fn build(&self, workbook: &Workbook) -> ImportResult<InputTables> {
        let missing: Vec<String> = sheet_names::REQUIRED
            .iter()
            .filter(|name| workbook.sheet(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingTable(missing));
        }

        let sheet = |name: &str| {
            workbook
                .sheet(name)
                .ok_or_else(|| ImportError::MissingTable(vec![name.to_string()]))
        };

        let tables = InputTables {
            quantities: self.part_table(sheet(sheet_names::QUANTITIES)?)?,
            avg_parts_per_lot: self.part_table(sheet(sheet_names::AVG_PARTS_PER_LOT)?)?,
            machining_rates: self.part_table(sheet(sheet_names::MACHINING_RATES)?)?,
            setup_rates: self.part_table(sheet(sheet_names::SETUP_RATES)?)?,
            vendor_time: self.vendor_time(sheet(sheet_names::VENDOR_TIME)?)?,
            machine_allocation: self.machine_allocation(sheet(sheet_names::MACHINE_ALLOCATION)?)?,
            setup_allocation: self.setup_allocation(sheet(sheet_names::SETUP_ALLOCATION)?),
        };

        info!(
            years = tables.years().len(),
            parts = tables.quantities.rows().len(),
            operations = tables.operations().len(),
            machines = tables.allocation_machines().len(),
            "输入表构建完成"
        );
        Ok(tables)
    }

    // ==========================================
    // 通用: 标识列 + 数值列
    // ==========================================

    /// 零件表: Part Number + 其余非占位列
    pub fn part_table(&self, sheet: &RawSheet) -> ImportResult<KeyedTable> {
        self.keyed_table(sheet, key_columns::PART_NUMBER, |header| {
            !self.cleaner.is_placeholder_header(header)
        })
    }

    /// 机台分配表: Operations + 机台列
    pub fn machine_allocation(&self, sheet: &RawSheet) -> ImportResult<KeyedTable> {
        self.keyed_table(sheet, key_columns::OPERATIONS, |header| {
            self.cleaner.is_machine_header(header)
        })
    }

    fn keyed_table<F>(&self, sheet: &RawSheet, key_column: &str, include: F) -> ImportResult<KeyedTable>
    where
        F: Fn(&str) -> bool,
    {
        let headers: Vec<String> = sheet.headers.iter().map(|h| self.cleaner.header_text(h)).collect();
        let key_idx = find_column(sheet, &headers, key_column)?;

        let value_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| *idx != key_idx && include(header.as_str()))
            .map(|(idx, header)| (idx, header.clone()))
            .collect();

        let mut rows = Vec::with_capacity(sheet.rows.len());
        let mut dropped = 0usize;
        for row_idx in 0..sheet.rows.len() {
            let key = match self.cleaner.key_text(sheet.cell(row_idx, key_idx)) {
                Some(k) => k,
                None => {
                    dropped += 1;
                    continue;
                }
            };
            let values = value_columns
                .iter()
                .map(|(col_idx, column)| {
                    self.cleaner
                        .number(sheet.cell(row_idx, *col_idx), &sheet.name, column, &key)
                })
                .collect();
            rows.push(KeyedRow { key, values });
        }

        if dropped > 0 {
            debug!(table = %sheet.name, dropped, "标识为空的行已丢弃");
        }

        let columns = value_columns.into_iter().map(|(_, header)| header).collect();
        Ok(KeyedTable::new(key_column, columns, rows))
    }

    // ==========================================
    // Vendor Time
    // ==========================================
    pub fn vendor_time(&self, sheet: &RawSheet) -> ImportResult<Vec<VendorLeadTime>> {
        let headers: Vec<String> = sheet.headers.iter().map(|h| self.cleaner.header_text(h)).collect();
        let key_idx = find_column(sheet, &headers, key_columns::PART_NUMBER)?;
        let days_idx = find_column(sheet, &headers, key_columns::VENDOR_DAYS)?;

        let entries = (0..sheet.rows.len())
            .filter_map(|row_idx| {
                let part_number = self.cleaner.key_text(sheet.cell(row_idx, key_idx))?;
                let business_days = self.cleaner.number(
                    sheet.cell(row_idx, days_idx),
                    &sheet.name,
                    key_columns::VENDOR_DAYS,
                    &part_number,
                );
                Some(VendorLeadTime {
                    part_number,
                    business_days,
                })
            })
            .collect();
        Ok(entries)
    }

    // ==========================================
    // Setup Allocation（单行: 机台列 → 操作员）
    // ==========================================
    pub fn setup_allocation(&self, sheet: &RawSheet) -> Vec<SetupAllocationEntry> {
        sheet
            .headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| {
                let machine = self.cleaner.header_text(header);
                if !self.cleaner.is_machine_header(&machine) {
                    return None;
                }
                let cell = match sheet.cell(0, idx) {
                    CellValue::Empty => OperatorCell::Empty,
                    CellValue::Number(n) => OperatorCell::Number(*n),
                    CellValue::Text(s) if s.trim().is_empty() => OperatorCell::Empty,
                    CellValue::Text(s) => OperatorCell::Text(s.trim().to_string()),
                    CellValue::Bool(b) => OperatorCell::Text(b.to_string()),
                };
                Some(SetupAllocationEntry { machine, cell })
            })
            .collect()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn find_column(sheet: &RawSheet, headers: &[String], column: &str) -> ImportResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ImportError::SchemaMismatch {
            table: sheet.name.clone(),
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mapping_builder::parse_operator_cell;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    #[test]
    fn test_part_table_keys_and_columns() {
        let sheet = RawSheet::new(
            "Quantities",
            vec![text("Part Number"), num(2025.0), num(2026.0), CellValue::Empty],
            vec![
                vec![num(1001.0), num(100.0), text("abc"), num(7.0)],
                vec![CellValue::Empty, num(5.0), num(5.0)],
                vec![text("P-2"), num(40.0)],
            ],
        );
        let table = TableBuilder::new().part_table(&sheet).unwrap();

        assert_eq!(table.columns(), &["2025".to_string(), "2026".to_string()]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.value("1001", "2025"), Some(100.0));
        assert_eq!(table.value("1001", "2026"), None);
        assert_eq!(table.value("P-2", "2026"), None);
    }

    #[test]
    fn test_machine_allocation_excludes_placeholder_columns() {
        let sheet = RawSheet::new(
            "Machine Allocation",
            vec![text("Operations"), text("M1"), text("Total"), text("Unnamed: 4"), text("M2")],
            vec![vec![text("Milling"), num(1.0), num(3.0), CellValue::Empty, num(2.0)]],
        );
        let table = TableBuilder::new().machine_allocation(&sheet).unwrap();
        assert_eq!(table.columns(), &["M1".to_string(), "M2".to_string()]);
        assert_eq!(table.value("Milling", "M2"), Some(2.0));
    }

    #[test]
    fn test_setup_allocation_single_row() {
        let sheet = RawSheet::new(
            "Setup Allocation",
            vec![text("Operator"), text("M1"), text("M2"), text("M3")],
            vec![vec![text("Operator"), num(1.0), text("Alice, Bob")]],
        );
        let entries = TableBuilder::new().setup_allocation(&sheet);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].cell, OperatorCell::Number(1.0));
        assert_eq!(entries[1].cell, OperatorCell::Text("Alice, Bob".to_string()));
        assert_eq!(entries[2].cell, OperatorCell::Empty);
    }

    #[test]
    fn test_setup_allocation_text_digits_stay_text() {
        // 工作簿中的文本单元格 "7" 是操作员名字，不是数字编号
        let sheet = RawSheet::new(
            "Setup Allocation",
            vec![text("M1")],
            vec![vec![text(" 7 ")]],
        );
        let entries = TableBuilder::new().setup_allocation(&sheet);
        assert_eq!(entries[0].cell, OperatorCell::Text("7".to_string()));

        let assignment = parse_operator_cell(&entries[0].cell).unwrap();
        assert_eq!(assignment.operators, vec!["7".to_string()]);
    }

    #[test]
    fn test_missing_key_column_is_schema_mismatch() {
        let sheet = RawSheet::new("Vendor Time", vec![text("Part Number")], vec![]);
        match TableBuilder::new().vendor_time(&sheet) {
            Err(ImportError::SchemaMismatch { table, column }) => {
                assert_eq!(table, "Vendor Time");
                assert_eq!(column, key_columns::VENDOR_DAYS);
            }
            other => panic!("期望 SchemaMismatch，实际 {:?}", other),
        }
    }

    #[test]
    fn test_missing_tables_listed_together() {
        let workbook = Workbook {
            sheets: vec![RawSheet::new("Quantities", vec![text("Part Number")], vec![])],
        };
        match TableBuilder::new().build(&workbook) {
            Err(ImportError::MissingTable(missing)) => {
                assert_eq!(missing.len(), 6);
                assert!(!missing.contains(&"Quantities".to_string()));
            }
            other => panic!("期望 MissingTable，实际 {:?}", other),
        }
    }
}
