// ==========================================
// 年度产能分析 - 跨表一致性校验
// ==========================================
// 职责: 零件号 / 工序 / 机台 三个标识空间的跨表比对
// 红线: 只报告不阻断；下游对缺失标识按"无数据"处理
// ==========================================

use crate::domain::tables::{sheet_names, InputTables};
use crate::domain::validation::{Discrepancy, ValidationReport, ValidationSection};
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

// ==========================================
// CrossValidator
// ==========================================
pub struct CrossValidator;

impl CrossValidator {
    pub fn new() -> Self {
        Self
    }

    /// 执行三类标识校验
    pub fn validate(&self, tables: &InputTables) -> ValidationReport {
        let report = ValidationReport {
            part_numbers: self.validate_part_numbers(tables),
            operations: self.validate_operations(tables),
            machines: self.validate_machines(tables),
        };

        if report.has_warnings() {
            warn!(
                part_number_issues = report.part_numbers.discrepancies.len(),
                operation_issues = report.operations.discrepancies.len(),
                machine_issues = report.machines.discrepancies.len(),
                "跨表校验发现不一致"
            );
        } else {
            info!("跨表校验通过");
        }
        report
    }

    /// 零件号: 五张零件表的标识列
    pub fn validate_part_numbers(&self, tables: &InputTables) -> ValidationSection {
        let universes: Vec<(&str, HashSet<&str>)> = vec![
            (sheet_names::QUANTITIES, tables.quantities.keys().collect()),
            (sheet_names::AVG_PARTS_PER_LOT, tables.avg_parts_per_lot.keys().collect()),
            (sheet_names::MACHINING_RATES, tables.machining_rates.keys().collect()),
            (sheet_names::SETUP_RATES, tables.setup_rates.keys().collect()),
            (
                sheet_names::VENDOR_TIME,
                tables.vendor_time.iter().map(|v| v.part_number.as_str()).collect(),
            ),
        ];
        compare_universes(&universes)
    }

    /// 工序: 两张费率表的列 + 机台分配表的行
    pub fn validate_operations(&self, tables: &InputTables) -> ValidationSection {
        let universes: Vec<(&str, HashSet<&str>)> = vec![
            (
                sheet_names::MACHINING_RATES,
                tables.machining_rates.columns().iter().map(|c| c.as_str()).collect(),
            ),
            (
                sheet_names::SETUP_RATES,
                tables.setup_rates.columns().iter().map(|c| c.as_str()).collect(),
            ),
            (sheet_names::MACHINE_ALLOCATION, tables.machine_allocation.keys().collect()),
        ];
        compare_universes(&universes)
    }

    /// 机台: 机台分配表的列 + 换型分配表的列
    pub fn validate_machines(&self, tables: &InputTables) -> ValidationSection {
        let universes: Vec<(&str, HashSet<&str>)> = vec![
            (
                sheet_names::MACHINE_ALLOCATION,
                tables.allocation_machines().iter().map(|c| c.as_str()).collect(),
            ),
            (
                sheet_names::SETUP_ALLOCATION,
                tables.setup_allocation.iter().map(|e| e.machine.as_str()).collect(),
            ),
        ];
        compare_universes(&universes)
    }
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 求并集，并列出每个标识缺失的表（标识按字典序，表按传入顺序）
fn compare_universes(universes: &[(&str, HashSet<&str>)]) -> ValidationSection {
    let all: BTreeSet<&str> = universes
        .iter()
        .flat_map(|(_, ids)| ids.iter().copied())
        .collect();

    let discrepancies = all
        .into_iter()
        .filter_map(|identifier| {
            let missing_in: Vec<String> = universes
                .iter()
                .filter(|(_, ids)| !ids.contains(identifier))
                .map(|(name, _)| name.to_string())
                .collect();
            if missing_in.is_empty() {
                None
            } else {
                Some(Discrepancy {
                    identifier: identifier.to_string(),
                    missing_in,
                })
            }
        })
        .collect();

    ValidationSection::from_discrepancies(discrepancies)
}
