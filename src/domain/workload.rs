// ==========================================
// 年度产能分析 - 工作行模型
// ==========================================
// 职责: (零件 × 工序 × 机台) 展开后的派生工作行
// 红线: 换型与加工在同一机台上串行，combined = on_machine + setup
// ==========================================

use crate::domain::mapping::OperatorAssignment;
use crate::domain::types::NOT_APPLICABLE;
use serde::{Deserialize, Serialize};

// ==========================================
// WorkRow - 派生工作行（不落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRow {
    pub part_number: String,
    pub operation: String,
    pub machine: Option<String>, // None = 工序无机台分配
    pub operator: OperatorAssignment,
    pub quantity: f64,
    pub machining_rate: f64, // 分钟/件
    pub setup_rate: f64,     // 分钟/批
    pub on_machine_minutes: f64,
    pub lot_count: u64,
    pub setup_minutes: f64,
    pub combined_minutes: f64,
    pub allocation_pct: f64, // 0-100
}

impl WorkRow {
    /// 构造工作行，combined_minutes 始终由两项相加得出
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        part_number: &str,
        operation: &str,
        machine: Option<String>,
        operator: OperatorAssignment,
        quantity: f64,
        machining_rate: f64,
        setup_rate: f64,
        on_machine_minutes: f64,
        lot_count: u64,
        setup_minutes: f64,
        allocation_pct: f64,
    ) -> Self {
        Self {
            part_number: part_number.to_string(),
            operation: operation.to_string(),
            machine,
            operator,
            quantity,
            machining_rate,
            setup_rate,
            on_machine_minutes,
            lot_count,
            setup_minutes,
            combined_minutes: on_machine_minutes + setup_minutes,
            allocation_pct,
        }
    }

    pub fn machine_label(&self) -> &str {
        self.machine.as_deref().unwrap_or(NOT_APPLICABLE)
    }

    pub fn is_unassigned(&self) -> bool {
        self.machine.is_none()
    }
}

// ==========================================
// YearWorkload - 单年度工作行集合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearWorkload {
    pub year: String,
    pub efficiency: f64,
    pub rows: Vec<WorkRow>,
}

impl YearWorkload {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 未分配机台的工作行
    pub fn unassigned_rows(&self) -> impl Iterator<Item = &WorkRow> {
        self.rows.iter().filter(|r| r.is_unassigned())
    }
}
