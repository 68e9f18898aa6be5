// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
// 同一份数据可构建为 InputTables，也可写出为 CSV 目录供导入层使用
// ==========================================

use capacity_analyzer::domain::tables::{
    key_columns, sheet_names, InputTables, KeyedRow, KeyedTable, OperatorCell,
    SetupAllocationEntry, VendorLeadTime,
};
use std::error::Error;
use std::path::Path;

// ==========================================
// 零件数据
// ==========================================
struct PartFixture {
    part_number: String,
    quantities: Vec<Option<f64>>,
    lot_sizes: Vec<Option<f64>>,
    machining_rates: Vec<Option<f64>>,
    setup_rates: Vec<Option<f64>>,
    vendor_days: Option<f64>,
}

// ==========================================
// InputsBuilder
// ==========================================
pub struct InputsBuilder {
    years: Vec<String>,
    operations: Vec<String>,
    machines: Vec<String>,
    parts: Vec<PartFixture>,
    allocations: Vec<(String, Vec<Option<f64>>)>,
    operators: Vec<(String, String)>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl InputsBuilder {
    pub fn new(years: &[&str], operations: &[&str], machines: &[&str]) -> Self {
        Self {
            years: strings(years),
            operations: strings(operations),
            machines: strings(machines),
            parts: Vec::new(),
            allocations: Vec::new(),
            operators: Vec::new(),
        }
    }

    /// 添加零件
    ///
    /// quantities / lot_sizes 按年度顺序，machining / setup 按工序顺序
    pub fn part(
        mut self,
        part_number: &str,
        quantities: &[Option<f64>],
        lot_sizes: &[Option<f64>],
        machining: &[Option<f64>],
        setup: &[Option<f64>],
        vendor_days: Option<f64>,
    ) -> Self {
        self.parts.push(PartFixture {
            part_number: part_number.to_string(),
            quantities: quantities.to_vec(),
            lot_sizes: lot_sizes.to_vec(),
            machining_rates: machining.to_vec(),
            setup_rates: setup.to_vec(),
            vendor_days,
        });
        self
    }

    /// 工序机台权重（按机台顺序）
    pub fn allocation(mut self, operation: &str, weights: &[Option<f64>]) -> Self {
        self.allocations.push((operation.to_string(), weights.to_vec()));
        self
    }

    /// 机台操作员原始单元格（名字 / 逗号名单 / 数字编号）
    pub fn operator(mut self, machine: &str, cell: &str) -> Self {
        self.operators.push((machine.to_string(), cell.to_string()));
        self
    }

    fn part_table(&self, columns: &[String], pick: impl Fn(&PartFixture) -> &Vec<Option<f64>>) -> KeyedTable {
        let rows = self
            .parts
            .iter()
            .map(|p| KeyedRow {
                key: p.part_number.clone(),
                values: pick(p).clone(),
            })
            .collect();
        KeyedTable::new(key_columns::PART_NUMBER, columns.to_vec(), rows)
    }

    /// 构建输入表（不经过导入层）
    pub fn build(&self) -> InputTables {
        InputTables {
            quantities: self.part_table(&self.years, |p| &p.quantities),
            avg_parts_per_lot: self.part_table(&self.years, |p| &p.lot_sizes),
            machining_rates: self.part_table(&self.operations, |p| &p.machining_rates),
            setup_rates: self.part_table(&self.operations, |p| &p.setup_rates),
            vendor_time: self
                .parts
                .iter()
                .map(|p| VendorLeadTime {
                    part_number: p.part_number.clone(),
                    business_days: p.vendor_days,
                })
                .collect(),
            machine_allocation: KeyedTable::new(
                key_columns::OPERATIONS,
                self.machines.clone(),
                self.allocations
                    .iter()
                    .map(|(op, weights)| KeyedRow {
                        key: op.clone(),
                        values: weights.clone(),
                    })
                    .collect(),
            ),
            setup_allocation: self
                .operators
                .iter()
                .map(|(machine, raw)| SetupAllocationEntry {
                    machine: machine.clone(),
                    cell: if raw.trim().is_empty() {
                        OperatorCell::Empty
                    } else {
                        match raw.trim().parse::<f64>() {
                            Ok(n) => OperatorCell::Number(n),
                            Err(_) => OperatorCell::Text(raw.clone()),
                        }
                    },
                })
                .collect(),
        }
    }

    // ==========================================
    // CSV 目录输出
    // ==========================================

    /// 写出七个 <表名>.csv 文件
    pub fn write_csv_dir(&self, dir: &Path) -> Result<(), Box<dyn Error>> {
        self.write_part_sheet(dir, sheet_names::QUANTITIES, &self.years, |p| &p.quantities)?;
        self.write_part_sheet(dir, sheet_names::AVG_PARTS_PER_LOT, &self.years, |p| &p.lot_sizes)?;
        self.write_part_sheet(dir, sheet_names::MACHINING_RATES, &self.operations, |p| &p.machining_rates)?;
        self.write_part_sheet(dir, sheet_names::SETUP_RATES, &self.operations, |p| &p.setup_rates)?;

        let mut vendor = csv::Writer::from_path(dir.join(format!("{}.csv", sheet_names::VENDOR_TIME)))?;
        vendor.write_record([key_columns::PART_NUMBER, key_columns::VENDOR_DAYS])?;
        for p in &self.parts {
            vendor.write_record([p.part_number.clone(), format_cell(p.vendor_days)])?;
        }
        vendor.flush()?;

        // Machine Allocation: 末尾带 Total 列与空表头列，导入时应被剔除
        let mut allocation =
            csv::Writer::from_path(dir.join(format!("{}.csv", sheet_names::MACHINE_ALLOCATION)))?;
        let mut header = vec![key_columns::OPERATIONS.to_string()];
        header.extend(self.machines.iter().cloned());
        header.push("Total".to_string());
        header.push(String::new());
        allocation.write_record(&header)?;
        for (op, weights) in &self.allocations {
            let total: f64 = weights.iter().flatten().sum();
            let mut record = vec![op.clone()];
            record.extend(weights.iter().map(|w| format_cell(*w)));
            record.push(total.to_string());
            record.push(String::new());
            allocation.write_record(&record)?;
        }
        allocation.flush()?;

        // Setup Allocation: 首列为标签列
        let mut setup = csv::Writer::from_path(dir.join(format!("{}.csv", sheet_names::SETUP_ALLOCATION)))?;
        let mut header = vec!["Operator".to_string()];
        header.extend(self.operators.iter().map(|(m, _)| m.clone()));
        setup.write_record(&header)?;
        let mut record = vec!["Operator".to_string()];
        record.extend(self.operators.iter().map(|(_, cell)| cell.clone()));
        setup.write_record(&record)?;
        setup.flush()?;

        Ok(())
    }

    fn write_part_sheet(
        &self,
        dir: &Path,
        sheet: &str,
        columns: &[String],
        pick: impl Fn(&PartFixture) -> &Vec<Option<f64>>,
    ) -> Result<(), Box<dyn Error>> {
        let mut writer = csv::Writer::from_path(dir.join(format!("{}.csv", sheet)))?;
        let mut header = vec![key_columns::PART_NUMBER.to_string()];
        header.extend(columns.iter().cloned());
        writer.write_record(&header)?;
        for p in &self.parts {
            let mut record = vec![p.part_number.clone()];
            record.extend(pick(p).iter().map(|v| format_cell(*v)));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

// ==========================================
// 标准场景
// ==========================================

/// 三年度 / 三工序 / 三机台的标准数据
///
/// - Milling: M1/M2 各 50%
/// - Turning: 仅 M3
/// - Deburr: 无机台分配（N/A 行）
/// - P1 外协 2 个工作日/批
pub fn standard_inputs() -> InputsBuilder {
    InputsBuilder::new(&["2025", "2026", "2027"], &["Milling", "Turning", "Deburr"], &["M1", "M2", "M3"])
        .part(
            "1001",
            &[Some(100.0), Some(200.0), None],
            &[Some(30.0), Some(50.0), Some(50.0)],
            &[Some(2.0), Some(1.0), Some(0.5)],
            &[Some(30.0), Some(20.0), None],
            Some(2.0),
        )
        .part(
            "1002",
            &[Some(40.0), Some(0.0), Some(10.0)],
            &[Some(0.0), Some(10.0), Some(10.0)],
            &[Some(3.0), None, None],
            &[Some(15.0), None, None],
            None,
        )
        .allocation("Milling", &[Some(2.0), Some(2.0), None])
        .allocation("Turning", &[None, None, Some(1.0)])
        .allocation("Deburr", &[None, None, None])
        .operator("M1", "Alice, Bob")
        .operator("M2", "Alice")
        .operator("M3", "3")
}
