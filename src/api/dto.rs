// ==========================================
// 年度产能分析 - 展示层数据传输对象
// ==========================================
// 职责: 将引擎结果转换为展示用视图（小时 / 百分比 / 负荷等级）
// 红线: 只做单位换算与字段整理，不重新计算业务结果
// ==========================================

use crate::domain::capacity::{CapacityResult, MachineLoad, OperatorLoad, OverflowPull};
use crate::domain::types::{OverflowStatus, UtilizationLevel, ValidationStatus};
use crate::domain::validation::{Discrepancy, ValidationReport};
use crate::engine::analyzer::CapacityReport;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: f64 = 60.0;

fn to_hours(minutes: f64) -> f64 {
    minutes / MINUTES_PER_HOUR
}

fn to_pct(fraction: f64) -> f64 {
    fraction * 100.0
}

// ==========================================
// 机台负荷卡片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineLoadView {
    pub machine: String,
    pub on_machine_hours: f64,
    pub setup_hours: f64,
    pub combined_hours: f64,
    pub utilization_pct: f64,
    pub level: UtilizationLevel,
    pub is_bottleneck: bool,
}

impl MachineLoadView {
    pub fn from_load(load: &MachineLoad, bottleneck_machine: &str) -> Self {
        Self {
            machine: load.machine.clone(),
            on_machine_hours: to_hours(load.on_machine_minutes),
            setup_hours: to_hours(load.setup_minutes),
            combined_hours: to_hours(load.combined_minutes),
            utilization_pct: to_pct(load.utilization),
            level: load.level,
            is_bottleneck: load.machine == bottleneck_machine,
        }
    }
}

// ==========================================
// 操作员换型时间
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorLoadView {
    pub operator: String,
    pub setup_minutes: f64,
    pub setup_hours: f64,
}

impl From<&OperatorLoad> for OperatorLoadView {
    fn from(load: &OperatorLoad) -> Self {
        Self {
            operator: load.operator.clone(),
            setup_minutes: load.setup_minutes,
            setup_hours: to_hours(load.setup_minutes),
        }
    }
}

// ==========================================
// 溢出前移记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverflowPullView {
    pub year: String,
    pub minutes: f64,
    pub resulting_pct: f64,
}

impl From<&OverflowPull> for OverflowPullView {
    fn from(pull: &OverflowPull) -> Self {
        Self {
            year: pull.year.clone(),
            minutes: pull.minutes,
            resulting_pct: to_pct(pull.resulting_fraction),
        }
    }
}

// ==========================================
// 年度产能视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCapacityView {
    pub year: String,
    pub status: OverflowStatus,
    pub has_data: bool,
    pub available_minutes: f64,
    pub raw_total_minutes: Option<f64>,
    pub adjusted_minutes: f64,
    pub raw_utilization_pct: Option<f64>,
    pub utilization_pct: f64,
    pub bottleneck_machine: Option<String>,
    pub bottleneck_minutes: Option<f64>,
    pub other_machines_min: Option<f64>,
    pub vendor_minutes: Option<f64>,
    pub pulled_into: Vec<OverflowPullView>, // 本年度溢出前移到的更早年度
    pub received_from_future: f64,
    pub residual_overflow: f64,
    pub machines: Vec<MachineLoadView>,
}

impl From<&CapacityResult> for YearCapacityView {
    fn from(result: &CapacityResult) -> Self {
        let analysis = result.analysis.as_ref();
        let bottleneck = analysis.map(|a| a.bottleneck_machine.as_str()).unwrap_or("");

        Self {
            year: result.year.clone(),
            status: result.adjustment.status,
            has_data: result.has_data(),
            available_minutes: result.available_minutes,
            raw_total_minutes: result.raw_total_minutes(),
            adjusted_minutes: result.adjusted_minutes(),
            raw_utilization_pct: result.raw_utilization().map(to_pct),
            utilization_pct: to_pct(result.utilization()),
            bottleneck_machine: analysis.map(|a| a.bottleneck_machine.clone()),
            bottleneck_minutes: analysis.map(|a| a.bottleneck_minutes),
            other_machines_min: analysis.map(|a| a.other_machines_min),
            vendor_minutes: analysis.map(|a| a.vendor_minutes),
            pulled_into: result.adjustment.pulled_from.iter().map(OverflowPullView::from).collect(),
            received_from_future: result.adjustment.received_from_future,
            residual_overflow: result.adjustment.residual_overflow,
            machines: analysis
                .map(|a| {
                    a.machine_loads
                        .iter()
                        .map(|load| MachineLoadView::from_load(load, bottleneck))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

// ==========================================
// 校验结果视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSectionView {
    pub name: String,
    pub status: ValidationStatus,
    pub discrepancies: Vec<Discrepancy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationView {
    pub has_warnings: bool,
    pub warning_count: usize,
    pub sections: Vec<ValidationSectionView>,
}

impl From<&ValidationReport> for ValidationView {
    fn from(report: &ValidationReport) -> Self {
        Self {
            has_warnings: report.has_warnings(),
            warning_count: report.warning_count(),
            sections: report
                .sections()
                .iter()
                .map(|(name, section)| ValidationSectionView {
                    name: name.to_string(),
                    status: section.status,
                    discrepancies: section.discrepancies.clone(),
                })
                .collect(),
        }
    }
}

// ==========================================
// 全量报告视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReportView {
    pub generated_at: NaiveDateTime,
    pub efficiency: f64,
    pub available_minutes: f64,
    pub validation: ValidationView,
    pub years: Vec<YearCapacityView>,
    pub critical_years: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<&CapacityReport> for CapacityReportView {
    fn from(report: &CapacityReport) -> Self {
        Self {
            generated_at: report.generated_at,
            efficiency: report.efficiency,
            available_minutes: report.available_minutes,
            validation: ValidationView::from(&report.validation),
            years: report
                .years
                .iter()
                .map(|y| YearCapacityView::from(&y.result))
                .collect(),
            critical_years: report.critical_years().into_iter().map(String::from).collect(),
            warnings: report.warnings.clone(),
        }
    }
}
