// ==========================================
// 年度产能分析 - 产能分析 API
// ==========================================
// 职责: 面向展示层的门面，持有已加载的输入与当前效率系数
// 红线: 效率系数由调用方显式设置，无全局状态
// ==========================================

use crate::api::dto::{CapacityReportView, OperatorLoadView, ValidationView, YearCapacityView};
use crate::api::error::{ApiError, ApiResult};
use crate::config::CapacitySettings;
use crate::domain::tables::InputTables;
use crate::domain::workload::WorkRow;
use crate::engine::analyzer::{CapacityAnalyzer, CapacityReport};
use crate::importer::CapacityImporter;
use std::path::Path;
use tracing::info;

// ==========================================
// CapacityApi - 产能分析 API
// ==========================================
pub struct CapacityApi {
    analyzer: CapacityAnalyzer,
    efficiency: f64,
}

impl CapacityApi {
    /// 从文件加载输入并创建 API 实例
    ///
    /// # 参数
    /// - path: Excel 工作簿或 CSV 目录
    /// - settings: 产能参数（初始效率系数取 settings.efficiency）
    pub fn load<P: AsRef<Path>>(path: P, settings: &CapacitySettings) -> ApiResult<Self> {
        settings.validate()?;
        let tables = CapacityImporter::new().import(path)?;
        Self::from_tables(tables, settings)
    }

    /// 从已构建的输入表创建 API 实例
    pub fn from_tables(tables: InputTables, settings: &CapacitySettings) -> ApiResult<Self> {
        settings.validate()?;
        Ok(Self {
            analyzer: CapacityAnalyzer::new(tables, settings),
            efficiency: settings.efficiency,
        })
    }

    pub fn analyzer(&self) -> &CapacityAnalyzer {
        &self.analyzer
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// 调整效率系数（范围 [0.1, 1.0]），后续查询全量重算
    pub fn set_efficiency(&mut self, efficiency: f64) -> ApiResult<()> {
        self.analyzer
            .settings()
            .clone()
            .with_efficiency(efficiency)
            .validate()?;
        info!(from = self.efficiency, to = efficiency, "效率系数已调整");
        self.efficiency = efficiency;
        Ok(())
    }

    pub fn years(&self) -> Vec<String> {
        self.analyzer.years().to_vec()
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub fn validation(&self) -> ValidationView {
        ValidationView::from(self.analyzer.validation())
    }

    pub fn report(&self) -> ApiResult<CapacityReport> {
        Ok(self.analyzer.analyze(self.efficiency)?)
    }

    pub fn report_view(&self) -> ApiResult<CapacityReportView> {
        Ok(CapacityReportView::from(&self.report()?))
    }

    /// 报告 JSON（含工作行与操作员负荷）
    pub fn report_json(&self) -> ApiResult<String> {
        Ok(serde_json::to_string_pretty(&self.report()?)?)
    }

    pub fn year_view(&self, year: &str) -> ApiResult<YearCapacityView> {
        self.ensure_year(year)?;
        let result = self.analyzer.compute(year, self.efficiency)?;
        Ok(YearCapacityView::from(&result))
    }

    pub fn work_rows(&self, year: &str) -> ApiResult<Vec<WorkRow>> {
        self.ensure_year(year)?;
        Ok(self.analyzer.workload(year, self.efficiency)?.rows)
    }

    pub fn operator_loads(&self, year: &str) -> ApiResult<Vec<OperatorLoadView>> {
        self.ensure_year(year)?;
        let workload = self.analyzer.workload(year, self.efficiency)?;
        Ok(crate::engine::aggregate_operator_loads(&workload)
            .iter()
            .map(OperatorLoadView::from)
            .collect())
    }

    fn ensure_year(&self, year: &str) -> ApiResult<()> {
        if year.trim().is_empty() {
            return Err(ApiError::InvalidInput("年度不能为空".to_string()));
        }
        if !self.analyzer.years().iter().any(|y| y == year) {
            return Err(ApiError::NotFound(format!("年度 {} 不存在", year)));
        }
        Ok(())
    }
}
