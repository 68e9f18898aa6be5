// ==========================================
// 年度产能分析 - 产能结果模型
// ==========================================
// 职责: 机台负荷、瓶颈分析、溢出前移轨迹、年度产能结果
// ==========================================

use crate::domain::types::{OverflowStatus, UtilizationLevel};
use serde::{Deserialize, Serialize};

// ==========================================
// MachineLoad - 单机台年度负荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineLoad {
    pub machine: String,
    pub on_machine_minutes: f64,
    pub setup_minutes: f64,
    pub combined_minutes: f64,
    /// 按工序汇总后的最小工序块（非瓶颈时计入总需求的下限）
    pub min_operation_minutes: f64,
    pub operation_count: usize,
    pub utilization: f64, // combined / 可用产能
    pub level: UtilizationLevel,
}

// ==========================================
// BottleneckAnalysis - 年度瓶颈分析
// ==========================================
// total_required = bottleneck + Σ 其他机台最小工序块 + 外协
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckAnalysis {
    pub year: String,
    pub machine_loads: Vec<MachineLoad>, // 按机台标识字典序
    pub bottleneck_machine: String,
    pub bottleneck_minutes: f64,
    pub other_machines_min: f64,
    pub vendor_minutes: f64,
    pub total_required_minutes: f64,
}

impl BottleneckAnalysis {
    pub fn machine_load(&self, machine: &str) -> Option<&MachineLoad> {
        self.machine_loads.iter().find(|m| m.machine == machine)
    }
}

// ==========================================
// OverflowPull - 一次前移记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverflowPull {
    pub year: String,           // 接收年度
    pub minutes: f64,           // 前移分钟数
    pub resulting_fraction: f64, // 接收年度前移后的利用率
}

// ==========================================
// YearAdjustment - 单年度重分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAdjustment {
    pub year: String,
    pub raw_minutes: Option<f64>, // None = 无数据
    pub adjusted_minutes: f64,    // 扣除前移出去的部分 + 从未来年度接收的部分
    pub status: OverflowStatus,
    pub initial_overflow: f64,    // 重分配前的溢出
    pub residual_overflow: f64,   // 无法消化的剩余溢出
    pub pulled_from: Vec<OverflowPull>,
    pub received_from_future: f64,
}

impl YearAdjustment {
    pub fn pulled_total(&self) -> f64 {
        self.pulled_from.iter().map(|p| p.minutes).sum()
    }

    pub fn is_critical(&self) -> bool {
        self.status == OverflowStatus::Critical
    }
}

// ==========================================
// RedistributionPlan - 全部年度的重分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedistributionPlan {
    pub available_minutes: f64,
    pub years: Vec<YearAdjustment>, // 时间顺序
}

impl RedistributionPlan {
    pub fn year(&self, year: &str) -> Option<&YearAdjustment> {
        self.years.iter().find(|y| y.year == year)
    }

    /// 无法消化溢出的年度
    pub fn unaccommodated(&self) -> Vec<&YearAdjustment> {
        self.years.iter().filter(|y| y.is_critical()).collect()
    }

    pub fn has_unaccommodated(&self) -> bool {
        self.years.iter().any(|y| y.is_critical())
    }
}

// ==========================================
// OperatorLoad - 操作员年度换型时间
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorLoad {
    pub operator: String,
    pub setup_minutes: f64,
}

// ==========================================
// CapacityResult - 年度产能结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityResult {
    pub year: String,
    pub available_minutes: f64,
    pub analysis: Option<BottleneckAnalysis>, // None = 该年度无数据
    pub adjustment: YearAdjustment,
}

impl CapacityResult {
    pub fn has_data(&self) -> bool {
        self.analysis.is_some()
    }

    pub fn raw_total_minutes(&self) -> Option<f64> {
        self.analysis.as_ref().map(|a| a.total_required_minutes)
    }

    pub fn adjusted_minutes(&self) -> f64 {
        self.adjustment.adjusted_minutes
    }

    /// 调整后利用率（1.0 = 满负荷）
    pub fn utilization(&self) -> f64 {
        if self.available_minutes <= 0.0 {
            return 0.0;
        }
        self.adjustment.adjusted_minutes / self.available_minutes
    }

    /// 重分配前利用率
    pub fn raw_utilization(&self) -> Option<f64> {
        if self.available_minutes <= 0.0 {
            return None;
        }
        self.raw_total_minutes().map(|m| m / self.available_minutes)
    }

    pub fn is_critical(&self) -> bool {
        self.adjustment.is_critical()
    }
}
