// ==========================================
// 年度产能分析 - 领域类型定义
// ==========================================
// 职责: 状态枚举、哨兵常量、利用率分级
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 未分配机台/操作员的显示哨兵
pub const NOT_APPLICABLE: &str = "N/A";

// ==========================================
// 溢出状态 (Overflow Status)
// ==========================================
// 每个年度在一次重分配过程中只确定一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStatus {
    NoData,       // 该年度无有效工作行
    Normal,       // 需求 < 可用产能
    OverCapacity, // 需求 >= 可用产能，溢出已全部前移
    Critical,     // 前移后仍有无法消化的溢出
}

impl fmt::Display for OverflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowStatus::NoData => write!(f, "no_data"),
            OverflowStatus::Normal => write!(f, "normal"),
            OverflowStatus::OverCapacity => write!(f, "over_capacity"),
            OverflowStatus::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 校验状态 (Validation Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Ok,
    Warning,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Ok => write!(f, "ok"),
            ValidationStatus::Warning => write!(f, "warning"),
        }
    }
}

// ==========================================
// 利用率分级 (Utilization Level)
// ==========================================
// 阈值: < 80% 正常, <= 100% 偏高, > 100% 超载
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationLevel {
    Normal,
    High,
    Overloaded,
}

impl UtilizationLevel {
    pub const HIGH_THRESHOLD: f64 = 0.8;

    /// 根据利用率（0.0 起，1.0 = 满负荷）分级
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < Self::HIGH_THRESHOLD {
            UtilizationLevel::Normal
        } else if fraction <= 1.0 {
            UtilizationLevel::High
        } else {
            UtilizationLevel::Overloaded
        }
    }
}

impl fmt::Display for UtilizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilizationLevel::Normal => write!(f, "normal"),
            UtilizationLevel::High => write!(f, "high"),
            UtilizationLevel::Overloaded => write!(f, "overloaded"),
        }
    }
}
