// ==========================================
// 年度产能分析 - 分析编排器
// ==========================================
// 用途: 协调映射构建、跨表校验、年度工作量、瓶颈识别、溢出前移
// 流程: load → build mappings → validate → per-year calculate → redistribute
// 红线: 校验问题不阻断计算，仅以警告形式附在结果上
// 红线: 效率系数变化时从工作量计算起全量重算，无增量路径
// ==========================================

use crate::config::CapacitySettings;
use crate::domain::capacity::{CapacityResult, OperatorLoad, RedistributionPlan};
use crate::domain::mapping::CapacityMappings;
use crate::domain::tables::InputTables;
use crate::domain::validation::ValidationReport;
use crate::domain::workload::YearWorkload;
use crate::engine::bottleneck_resolver::BottleneckResolver;
use crate::engine::cross_validator::CrossValidator;
use crate::engine::error::{check_efficiency, EngineError, EngineResult};
use crate::engine::mapping_builder::MappingBuilder;
use crate::engine::operator_load::aggregate_operator_loads;
use crate::engine::overflow_redistributor::OverflowRedistributor;
use crate::engine::workload_calculator::WorkloadCalculator;
use crate::perf::PerfGuard;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// ==========================================
// YearReport - 单年度输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    pub result: CapacityResult,
    pub workload: YearWorkload,
    pub operator_loads: Vec<OperatorLoad>,
}

// ==========================================
// CapacityReport - 全部年度分析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub generated_at: NaiveDateTime,
    pub efficiency: f64,
    pub available_minutes: f64,
    pub validation: ValidationReport,
    pub years: Vec<YearReport>, // Quantities 列顺序
    pub plan: RedistributionPlan,
    pub warnings: Vec<String>,
}

impl CapacityReport {
    pub fn year(&self, year: &str) -> Option<&YearReport> {
        self.years.iter().find(|y| y.result.year == year)
    }

    pub fn critical_years(&self) -> Vec<&str> {
        self.years
            .iter()
            .filter(|y| y.result.is_critical())
            .map(|y| y.result.year.as_str())
            .collect()
    }
}

// ==========================================
// CapacityAnalyzer - 分析编排器
// ==========================================
pub struct CapacityAnalyzer {
    tables: InputTables,
    settings: CapacitySettings,
    mappings: CapacityMappings,
    validation: ValidationReport,
}

impl CapacityAnalyzer {
    /// 创建分析器；映射与校验结果在此一次性构建，之后只读
    ///
    /// # 参数
    /// - tables: 已通过结构校验的输入表
    /// - settings: 产能参数（可用产能、外协工作日长度）
    pub fn new(tables: InputTables, settings: &CapacitySettings) -> Self {
        let mappings = MappingBuilder::from_settings(settings).build(&tables);
        let validation = CrossValidator::new().validate(&tables);

        info!(
            years = tables.years().len(),
            operations = tables.operations().len(),
            validation_warnings = validation.warning_count(),
            "产能分析器已初始化"
        );

        Self {
            tables,
            settings: settings.clone(),
            mappings,
            validation,
        }
    }

    pub fn tables(&self) -> &InputTables {
        &self.tables
    }

    pub fn settings(&self) -> &CapacitySettings {
        &self.settings
    }

    pub fn years(&self) -> &[String] {
        self.tables.years()
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn mappings(&self) -> &CapacityMappings {
        &self.mappings
    }

    pub fn available_minutes(&self) -> f64 {
        self.settings.available_capacity_minutes()
    }

    /// 单年度工作行
    pub fn workload(&self, year: &str, efficiency: f64) -> EngineResult<YearWorkload> {
        WorkloadCalculator::new(&self.tables, &self.mappings).calculate(year, efficiency)
    }

    /// 单年度产能结果
    ///
    /// 溢出前移依赖更早年度的状态，因此按全部年度计算后取出目标年度
    pub fn compute(&self, year: &str, efficiency: f64) -> EngineResult<CapacityResult> {
        if !self.tables.quantities.has_column(year) {
            return Err(EngineError::UnknownYear(year.to_string()));
        }
        let report = self.analyze(efficiency)?;
        report
            .years
            .into_iter()
            .find(|y| y.result.year == year)
            .map(|y| y.result)
            .ok_or_else(|| EngineError::UnknownYear(year.to_string()))
    }

    /// 全部年度分析
    #[instrument(skip(self), fields(years = self.tables.years().len()))]
    pub fn analyze(&self, efficiency: f64) -> EngineResult<CapacityReport> {
        let _perf = PerfGuard::new("analyze_capacity");
        check_efficiency(efficiency)?;
        let available_minutes = self.available_minutes();
        let redistributor = OverflowRedistributor::new(available_minutes)?;
        let resolver = BottleneckResolver::new(&self.mappings, available_minutes);

        // ===== 阶段 1: 年度工作量 + 瓶颈 =====
        let mut per_year = Vec::with_capacity(self.years().len());
        for year in self.years() {
            let workload = self.workload(year, efficiency)?;
            let analysis = resolver.resolve(&workload);
            let operator_loads = aggregate_operator_loads(&workload);
            per_year.push((workload, analysis, operator_loads));
        }

        // ===== 阶段 2: 溢出前移 =====
        let raw_totals: Vec<(String, Option<f64>)> = per_year
            .iter()
            .map(|(workload, analysis, _)| {
                (
                    workload.year.clone(),
                    analysis.as_ref().map(|a| a.total_required_minutes),
                )
            })
            .collect();
        let plan = redistributor.redistribute(&raw_totals);

        // ===== 阶段 3: 组装 =====
        let years: Vec<YearReport> = per_year
            .into_iter()
            .zip(plan.years.iter())
            .map(|((workload, analysis, operator_loads), adjustment)| YearReport {
                result: CapacityResult {
                    year: workload.year.clone(),
                    available_minutes,
                    analysis,
                    adjustment: adjustment.clone(),
                },
                workload,
                operator_loads,
            })
            .collect();

        let warnings = self.collect_warnings(&plan);
        if plan.has_unaccommodated() {
            warn!(critical_years = plan.unaccommodated().len(), "存在无法消化的产能溢出");
        }
        info!(
            efficiency,
            available_minutes,
            warnings = warnings.len(),
            "产能分析完成"
        );

        Ok(CapacityReport {
            generated_at: Utc::now().naive_utc(),
            efficiency,
            available_minutes,
            validation: self.validation.clone(),
            years,
            plan,
            warnings,
        })
    }

    fn collect_warnings(&self, plan: &RedistributionPlan) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, section) in self.validation.sections() {
            for discrepancy in &section.discrepancies {
                warnings.push(format!(
                    "{} '{}' missing in: {}",
                    name,
                    discrepancy.identifier,
                    discrepancy.missing_in.join(", ")
                ));
            }
        }
        for year in plan.unaccommodated() {
            warnings.push(format!(
                "Year {}: {:.0} minutes of overflow could not be accommodated",
                year.year, year.residual_overflow
            ));
        }
        warnings
    }
}
