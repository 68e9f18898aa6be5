// ==========================================
// 年度产能分析 - 映射构建器
// ==========================================
// 职责: 输入表 → 外协时间 / 工序机台分配 / 机台操作员 三类映射
// 输入: InputTables（已通过结构校验）
// 输出: CapacityMappings（构建后只读）
// ==========================================

use crate::config::CapacitySettings;
use crate::domain::mapping::{CapacityMappings, OperationAllocation, OperatorAssignment};
use crate::domain::tables::{InputTables, KeyedTable, OperatorCell, SetupAllocationEntry, VendorLeadTime};
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ==========================================
// MappingBuilder
// ==========================================
pub struct MappingBuilder {
    vendor_day_minutes: f64,
}

impl MappingBuilder {
    /// # 参数
    /// - vendor_day_minutes: 外协工作日长度（分钟），如 18h × 60
    pub fn new(vendor_day_minutes: f64) -> Self {
        Self { vendor_day_minutes }
    }

    pub fn from_settings(settings: &CapacitySettings) -> Self {
        Self::new(settings.vendor_day_minutes())
    }

    /// 构建全部映射
    pub fn build(&self, tables: &InputTables) -> CapacityMappings {
        let mappings = CapacityMappings {
            vendor_minutes: self.build_vendor_minutes(&tables.vendor_time),
            allocations: self.build_allocations(&tables.machine_allocation),
            operators: self.build_operators(&tables.setup_allocation),
        };

        info!(
            vendor_parts = mappings.vendor_minutes.len(),
            allocated_operations = mappings.allocations.len(),
            staffed_machines = mappings.operators.len(),
            "映射构建完成"
        );
        mappings
    }

    // ==========================================
    // 外协时间
    // ==========================================

    /// 零件 → 每批外协分钟数
    ///
    /// 空白单元格不生成条目（无外协依赖），与 0 天区分
    pub fn build_vendor_minutes(&self, entries: &[VendorLeadTime]) -> HashMap<String, f64> {
        let mut vendor_minutes = HashMap::with_capacity(entries.len());
        for entry in entries {
            let days = match entry.business_days {
                Some(d) if d.is_finite() => d,
                _ => {
                    debug!(part_number = %entry.part_number, "外协时间为空，视为无外协依赖");
                    continue;
                }
            };

            if vendor_minutes.contains_key(&entry.part_number) {
                warn!(part_number = %entry.part_number, "外协时间重复，保留首条");
                continue;
            }
            vendor_minutes.insert(entry.part_number.clone(), days * self.vendor_day_minutes);
        }
        vendor_minutes
    }

    // ==========================================
    // 工序 → 机台分配
    // ==========================================

    /// 扫描每个工序行的机台列，收集正权重并归一化
    ///
    /// 总权重为 0 的工序不生成条目
    pub fn build_allocations(&self, table: &KeyedTable) -> HashMap<String, OperationAllocation> {
        let mut allocations = HashMap::new();
        for row in table.rows() {
            if allocations.contains_key(&row.key) {
                continue;
            }

            let weights: Vec<(String, f64)> = table
                .columns()
                .iter()
                .zip(row.values.iter())
                .filter_map(|(machine, value)| value.map(|w| (machine.clone(), w)))
                .collect();

            match OperationAllocation::normalize(row.key.clone(), weights) {
                Some(allocation) => {
                    allocations.insert(row.key.clone(), allocation);
                }
                None => {
                    debug!(operation = %row.key, "工序无正权重机台，不生成分配");
                }
            }
        }
        allocations
    }

    // ==========================================
    // 机台 → 操作员
    // ==========================================

    pub fn build_operators(&self, entries: &[SetupAllocationEntry]) -> HashMap<String, OperatorAssignment> {
        let mut operators = HashMap::with_capacity(entries.len());
        for entry in entries {
            match parse_operator_cell(&entry.cell) {
                Some(assignment) => {
                    operators.entry(entry.machine.clone()).or_insert(assignment);
                }
                None => {
                    debug!(machine = %entry.machine, "机台未配置操作员");
                }
            }
        }
        operators
    }
}

/// 解析 Setup Allocation 单元格
///
/// - 文本: 去空白；含逗号时拆分为多名操作员
/// - 数字: 渲染为 "Operator {n}"
/// - 空白: None
pub fn parse_operator_cell(cell: &OperatorCell) -> Option<OperatorAssignment> {
    match cell {
        OperatorCell::Empty => None,
        OperatorCell::Number(n) if !n.is_finite() => None,
        OperatorCell::Number(n) => {
            let label = if n.fract() == 0.0 {
                format!("Operator {}", *n as i64)
            } else {
                format!("Operator {}", n)
            };
            Some(OperatorAssignment::single(label))
        }
        OperatorCell::Text(raw) => {
            let operators: Vec<String> = raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
            if operators.is_empty() {
                None
            } else {
                Some(OperatorAssignment { operators })
            }
        }
    }
}
