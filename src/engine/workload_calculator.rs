// ==========================================
// 年度产能分析 - 年度工作量计算
// ==========================================
// 职责: (零件 × 工序) 展开为按机台分配的工作行
// 输入: 年度 + 效率系数 e ∈ (0, 1]
// 输出: YearWorkload
// 红线: e 作为除数同时作用于加工与换型时间
// ==========================================

use crate::domain::mapping::{CapacityMappings, OperatorAssignment};
use crate::domain::tables::InputTables;
use crate::domain::workload::{WorkRow, YearWorkload};
use crate::engine::error::{check_efficiency, EngineError, EngineResult};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// 批次数 = ceil(数量 / 批量)；批量缺失或 <= 0 时为 0
pub fn lot_count(quantity: f64, lot_size: Option<f64>) -> u64 {
    match lot_size {
        Some(size) if size.is_finite() && size > 0.0 && quantity > 0.0 => {
            (quantity / size).ceil() as u64
        }
        _ => 0,
    }
}

// ==========================================
// WorkloadCalculator
// ==========================================
pub struct WorkloadCalculator<'a> {
    tables: &'a InputTables,
    mappings: &'a CapacityMappings,
}

impl<'a> WorkloadCalculator<'a> {
    pub fn new(tables: &'a InputTables, mappings: &'a CapacityMappings) -> Self {
        Self { tables, mappings }
    }

    /// 计算单年度全部工作行
    ///
    /// # 规则
    /// 1. 数量为空/0 的零件跳过
    /// 2. 加工费率为空/0 的 (零件, 工序) 跳过，不输出零值行
    /// 3. 工序无机台分配 → 一行 N/A，分配比例 100
    /// 4. 否则按分配比例拆分加工与换型时间
    #[instrument(skip(self), fields(rows = tracing::field::Empty))]
    pub fn calculate(&self, year: &str, efficiency: f64) -> EngineResult<YearWorkload> {
        check_efficiency(efficiency)?;
        if !self.tables.quantities.has_column(year) {
            return Err(EngineError::UnknownYear(year.to_string()));
        }

        let mut rows = Vec::new();
        let mut seen_parts = HashSet::new();

        for part_number in self.tables.quantities.keys() {
            if !seen_parts.insert(part_number) {
                continue;
            }

            let quantity = match self.tables.quantities.value(part_number, year) {
                Some(q) if q.is_finite() && q > 0.0 => q,
                _ => continue,
            };

            let lot_size = self.tables.avg_parts_per_lot.value(part_number, year);
            let lots = lot_count(quantity, lot_size);

            for operation in self.tables.operations() {
                let machining_rate = match self.tables.machining_rates.value(part_number, operation) {
                    Some(r) if r.is_finite() && r != 0.0 => r,
                    _ => continue,
                };
                let setup_rate = self
                    .tables
                    .setup_rates
                    .value(part_number, operation)
                    .filter(|r| r.is_finite())
                    .unwrap_or(0.0);

                let total_machine_minutes = quantity * machining_rate / efficiency;
                let total_setup_minutes = lots as f64 * setup_rate / efficiency;

                match self.mappings.allocation(operation) {
                    None => {
                        rows.push(WorkRow::new(
                            part_number,
                            operation,
                            None,
                            OperatorAssignment::unassigned(),
                            quantity,
                            machining_rate,
                            setup_rate,
                            total_machine_minutes,
                            lots,
                            total_setup_minutes,
                            100.0,
                        ));
                    }
                    Some(allocation) => {
                        for share in &allocation.shares {
                            rows.push(WorkRow::new(
                                part_number,
                                operation,
                                Some(share.machine.clone()),
                                self.mappings.operator_for(&share.machine),
                                quantity,
                                machining_rate,
                                setup_rate,
                                total_machine_minutes * share.percentage,
                                lots,
                                total_setup_minutes * share.percentage,
                                share.percentage * 100.0,
                            ));
                        }
                    }
                }
            }
        }

        tracing::Span::current().record("rows", rows.len());
        debug!(year, efficiency, rows = rows.len(), "年度工作行计算完成");

        Ok(YearWorkload {
            year: year.to_string(),
            efficiency,
            rows,
        })
    }
}
