// ==========================================
// 年度产能分析 - 映射结构
// ==========================================
// 职责: 外协时间 / 工序→机台分配 / 机台→操作员 三类查找结构
// 生命周期: 每次加载构建一次，之后只读
// ==========================================

use crate::domain::types::NOT_APPLICABLE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// MachineShare - 工序在某机台上的分配份额
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineShare {
    pub machine: String,
    pub weight: f64,     // 原始权重
    pub percentage: f64, // 归一化份额 (0, 1]
}

// ==========================================
// OperationAllocation - 单工序的机台分配
// ==========================================
// 不变量: shares 非空且 percentage 之和为 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationAllocation {
    pub operation: String,
    pub shares: Vec<MachineShare>,
}

impl OperationAllocation {
    /// 由 (机台, 原始权重) 构造；非正权重丢弃，总权重为 0 时返回 None
    pub fn normalize(operation: impl Into<String>, weights: Vec<(String, f64)>) -> Option<Self> {
        let positive: Vec<(String, f64)> = weights
            .into_iter()
            .filter(|(_, w)| w.is_finite() && *w > 0.0)
            .collect();

        let total: f64 = positive.iter().map(|(_, w)| w).sum();
        if positive.is_empty() || total <= 0.0 {
            return None;
        }

        let shares = positive
            .into_iter()
            .map(|(machine, weight)| MachineShare {
                machine,
                weight,
                percentage: weight / total,
            })
            .collect();

        Some(Self {
            operation: operation.into(),
            shares,
        })
    }

    pub fn percentage_sum(&self) -> f64 {
        self.shares.iter().map(|s| s.percentage).sum()
    }
}

// ==========================================
// OperatorAssignment - 机台的操作员名单
// ==========================================
// 空名单 = 未分配（显示为 N/A）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorAssignment {
    pub operators: Vec<String>,
}

impl OperatorAssignment {
    pub fn unassigned() -> Self {
        Self::default()
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self {
            operators: vec![name.into()],
        }
    }

    pub fn is_assigned(&self) -> bool {
        !self.operators.is_empty()
    }

    /// 同机台操作员数（换型时间按人数平均分摊）
    pub fn headcount(&self) -> usize {
        self.operators.len()
    }
}

impl fmt::Display for OperatorAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operators.is_empty() {
            write!(f, "{}", NOT_APPLICABLE)
        } else {
            write!(f, "{}", self.operators.join(", "))
        }
    }
}

// ==========================================
// CapacityMappings - 映射汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityMappings {
    /// 零件 → 每批外协分钟数（无条目 = 无外协依赖）
    pub vendor_minutes: HashMap<String, f64>,
    /// 工序 → 机台分配（无条目 = 未分配，下游使用 N/A 行）
    pub allocations: HashMap<String, OperationAllocation>,
    /// 机台 → 操作员
    pub operators: HashMap<String, OperatorAssignment>,
}

impl CapacityMappings {
    pub fn vendor_minutes_per_lot(&self, part_number: &str) -> Option<f64> {
        self.vendor_minutes.get(part_number).copied()
    }

    pub fn allocation(&self, operation: &str) -> Option<&OperationAllocation> {
        self.allocations.get(operation)
    }

    /// 机台操作员；未配置时返回未分配
    pub fn operator_for(&self, machine: &str) -> OperatorAssignment {
        self.operators.get(machine).cloned().unwrap_or_default()
    }
}
