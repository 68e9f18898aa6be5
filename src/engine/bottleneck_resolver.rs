// ==========================================
// 年度产能分析 - 瓶颈识别
// ==========================================
// 职责: 按机台汇总串行工时，识别瓶颈机台并计算年度总需求
// 公式: total = 瓶颈机台总工时 + Σ 其他机台最小工序块 + 外协时间
// 红线: N/A 行不参与机台汇总，但参与外协批次统计
// ==========================================

use crate::domain::capacity::{BottleneckAnalysis, MachineLoad};
use crate::domain::mapping::CapacityMappings;
use crate::domain::types::UtilizationLevel;
use crate::domain::workload::{WorkRow, YearWorkload};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// BottleneckResolver
// ==========================================
pub struct BottleneckResolver<'a> {
    mappings: &'a CapacityMappings,
    available_minutes: f64,
}

#[derive(Default)]
struct OperationTotals {
    on_machine: f64,
    setup: f64,
}

impl OperationTotals {
    fn combined(&self) -> f64 {
        self.on_machine + self.setup
    }
}

impl<'a> BottleneckResolver<'a> {
    pub fn new(mappings: &'a CapacityMappings, available_minutes: f64) -> Self {
        Self {
            mappings,
            available_minutes,
        }
    }

    /// 年度瓶颈分析
    ///
    /// # 返回
    /// - None: 无任何机台有正工时（空年度）
    #[instrument(skip(self, workload), fields(year = %workload.year, rows = workload.rows.len()))]
    pub fn resolve(&self, workload: &YearWorkload) -> Option<BottleneckAnalysis> {
        let loads = machine_loads(&workload.rows, self.available_minutes);
        let vendor_minutes = self.vendor_minutes(&workload.rows);
        let analysis = summarize(&workload.year, loads, vendor_minutes);

        match &analysis {
            Some(a) => debug!(
                bottleneck = %a.bottleneck_machine,
                bottleneck_minutes = a.bottleneck_minutes,
                other_machines_min = a.other_machines_min,
                vendor_minutes = a.vendor_minutes,
                total_required_minutes = a.total_required_minutes,
                "瓶颈识别完成"
            ),
            None => debug!("年度无机台工时，视为无数据"),
        }
        analysis
    }

    /// 外协总分钟 = Σ 每批外协分钟 × 该零件批次数
    ///
    /// 批次数取该零件任一行（各工序相同）
    pub fn vendor_minutes(&self, rows: &[WorkRow]) -> f64 {
        let mut lots_by_part: BTreeMap<&str, u64> = BTreeMap::new();
        for row in rows {
            lots_by_part.entry(row.part_number.as_str()).or_insert(row.lot_count);
        }

        lots_by_part
            .into_iter()
            .filter_map(|(part, lots)| {
                self.mappings
                    .vendor_minutes_per_lot(part)
                    .map(|per_lot| per_lot * lots as f64)
            })
            .sum()
    }
}

/// 按机台汇总（按机台标识字典序）
///
/// 每台机台: 总工时 + 按工序汇总后的最小工序块
pub fn machine_loads(rows: &[WorkRow], available_minutes: f64) -> Vec<MachineLoad> {
    let mut grouped: BTreeMap<&str, BTreeMap<&str, OperationTotals>> = BTreeMap::new();
    for row in rows {
        let machine = match row.machine.as_deref() {
            Some(m) => m,
            None => continue,
        };
        let totals = grouped
            .entry(machine)
            .or_default()
            .entry(row.operation.as_str())
            .or_default();
        totals.on_machine += row.on_machine_minutes;
        totals.setup += row.setup_minutes;
    }

    grouped
        .into_iter()
        .map(|(machine, operations)| {
            let on_machine_minutes: f64 = operations.values().map(|t| t.on_machine).sum();
            let setup_minutes: f64 = operations.values().map(|t| t.setup).sum();
            let combined_minutes = on_machine_minutes + setup_minutes;
            let min_operation_minutes = operations
                .values()
                .map(|t| t.combined())
                .fold(f64::INFINITY, f64::min);
            let utilization = if available_minutes > 0.0 {
                combined_minutes / available_minutes
            } else {
                0.0
            };

            MachineLoad {
                machine: machine.to_string(),
                on_machine_minutes,
                setup_minutes,
                combined_minutes,
                min_operation_minutes: if min_operation_minutes.is_finite() {
                    min_operation_minutes
                } else {
                    0.0
                },
                operation_count: operations.len(),
                utilization,
                level: UtilizationLevel::from_fraction(utilization),
            }
        })
        .collect()
}

/// 由机台负荷与外协时间汇总年度需求
///
/// 并列最大时取字典序最小的机台
pub fn summarize(year: &str, mut loads: Vec<MachineLoad>, vendor_minutes: f64) -> Option<BottleneckAnalysis> {
    loads.sort_by(|a, b| a.machine.cmp(&b.machine));

    if !loads.iter().any(|l| l.combined_minutes > 0.0) {
        return None;
    }

    let mut bottleneck = &loads[0];
    for load in &loads[1..] {
        if load.combined_minutes > bottleneck.combined_minutes {
            bottleneck = load;
        }
    }
    let bottleneck_machine = bottleneck.machine.clone();
    let bottleneck_minutes = bottleneck.combined_minutes;

    let other_machines_min: f64 = loads
        .iter()
        .filter(|l| l.machine != bottleneck_machine)
        .map(|l| l.min_operation_minutes)
        .sum();

    Some(BottleneckAnalysis {
        year: year.to_string(),
        total_required_minutes: bottleneck_minutes + other_machines_min + vendor_minutes,
        machine_loads: loads,
        bottleneck_machine,
        bottleneck_minutes,
        other_machines_min,
        vendor_minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapping::OperatorAssignment;

    fn load(machine: &str, combined: f64, min_op: f64) -> MachineLoad {
        MachineLoad {
            machine: machine.to_string(),
            on_machine_minutes: combined,
            setup_minutes: 0.0,
            combined_minutes: combined,
            min_operation_minutes: min_op,
            operation_count: 1,
            utilization: 0.0,
            level: UtilizationLevel::Normal,
        }
    }

    fn work_row(part: &str, operation: &str, machine: Option<&str>, on: f64, setup: f64, lots: u64) -> WorkRow {
        WorkRow::new(
            part,
            operation,
            machine.map(|m| m.to_string()),
            OperatorAssignment::unassigned(),
            10.0,
            1.0,
            1.0,
            on,
            lots,
            setup,
            100.0,
        )
    }

    #[test]
    fn test_bottleneck_selection() {
        let loads = vec![load("A", 500.0, 50.0), load("B", 900.0, 200.0), load("C", 300.0, 30.0)];
        let analysis = summarize("2025", loads, 0.0).unwrap();

        assert_eq!(analysis.bottleneck_machine, "B");
        assert_eq!(analysis.bottleneck_minutes, 900.0);
        assert_eq!(analysis.other_machines_min, 80.0);
        assert_eq!(analysis.total_required_minutes, 980.0);

        let with_vendor = summarize(
            "2025",
            vec![load("A", 500.0, 50.0), load("B", 900.0, 200.0), load("C", 300.0, 30.0)],
            20.0,
        )
        .unwrap();
        assert_eq!(with_vendor.total_required_minutes, 1000.0);
    }

    #[test]
    fn test_tie_break_is_lexicographic() {
        let loads = vec![load("M9", 700.0, 10.0), load("M2", 700.0, 20.0), load("M5", 100.0, 5.0)];
        let analysis = summarize("2025", loads, 0.0).unwrap();
        assert_eq!(analysis.bottleneck_machine, "M2");
        assert_eq!(analysis.other_machines_min, 15.0);
    }

    #[test]
    fn test_no_positive_machine_is_empty_year() {
        assert!(summarize("2025", vec![], 100.0).is_none());
        assert!(summarize("2025", vec![load("A", 0.0, 0.0)], 0.0).is_none());
    }

    #[test]
    fn test_machine_loads_group_by_operation() {
        let rows = vec![
            work_row("P1", "Milling", Some("M1"), 100.0, 20.0, 2),
            work_row("P2", "Milling", Some("M1"), 50.0, 10.0, 1),
            work_row("P1", "Turning", Some("M1"), 30.0, 5.0, 2),
            work_row("P1", "Deburr", None, 999.0, 0.0, 2),
        ];
        let loads = machine_loads(&rows, 1000.0);

        assert_eq!(loads.len(), 1);
        let m1 = &loads[0];
        assert_eq!(m1.combined_minutes, 215.0);
        assert_eq!(m1.on_machine_minutes, 180.0);
        assert_eq!(m1.setup_minutes, 35.0);
        assert_eq!(m1.min_operation_minutes, 35.0); // Turning 30 + 5
        assert_eq!(m1.operation_count, 2);
        assert!((m1.utilization - 0.215).abs() < 1e-12);
    }

    #[test]
    fn test_vendor_minutes_per_part_lots() {
        let mut mappings = CapacityMappings::default();
        mappings.vendor_minutes.insert("P1".to_string(), 2.0 * 18.0 * 60.0);

        let rows = vec![
            work_row("P1", "Milling", Some("M1"), 10.0, 0.0, 3),
            work_row("P1", "Turning", Some("M2"), 10.0, 0.0, 3),
            work_row("P2", "Milling", Some("M1"), 10.0, 0.0, 5),
        ];
        let resolver = BottleneckResolver::new(&mappings, 272_160.0);
        assert_eq!(resolver.vendor_minutes(&rows), 6480.0);
    }
}
