// ==========================================
// 年度产能分析 - API 层
// ==========================================
// 职责: 提供展示层接口（CLI / 报告导出）
// ==========================================

pub mod capacity_api;
pub mod dto;
pub mod error;

// 重导出核心类型
pub use capacity_api::CapacityApi;
pub use dto::{
    CapacityReportView, MachineLoadView, OperatorLoadView, OverflowPullView, ValidationSectionView,
    ValidationView, YearCapacityView,
};
pub use error::{ApiError, ApiResult};
