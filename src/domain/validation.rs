// ==========================================
// 年度产能分析 - 跨表校验结果
// ==========================================
// 红线: 校验结果只报告，不阻断计算
// ==========================================

use crate::domain::types::ValidationStatus;
use serde::{Deserialize, Serialize};

/// 一个标识在哪些表中缺失
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub identifier: String,
    pub missing_in: Vec<String>,
}

/// 单个标识空间（零件号/工序/机台）的校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSection {
    pub status: ValidationStatus,
    pub discrepancies: Vec<Discrepancy>,
}

impl ValidationSection {
    pub fn from_discrepancies(discrepancies: Vec<Discrepancy>) -> Self {
        let status = if discrepancies.is_empty() {
            ValidationStatus::Ok
        } else {
            ValidationStatus::Warning
        };
        Self {
            status,
            discrepancies,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ValidationStatus::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub part_numbers: ValidationSection,
    pub operations: ValidationSection,
    pub machines: ValidationSection,
}

impl ValidationReport {
    pub fn has_warnings(&self) -> bool {
        !(self.part_numbers.is_ok() && self.operations.is_ok() && self.machines.is_ok())
    }

    pub fn warning_count(&self) -> usize {
        self.part_numbers.discrepancies.len()
            + self.operations.discrepancies.len()
            + self.machines.discrepancies.len()
    }

    /// (标识空间名称, 校验结果)
    pub fn sections(&self) -> [(&'static str, &ValidationSection); 3] {
        [
            ("part_numbers", &self.part_numbers),
            ("operations", &self.operations),
            ("machines", &self.machines),
        ]
    }
}
