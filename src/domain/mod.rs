// ==========================================
// 年度产能分析 - 领域模型层
// ==========================================
// 职责: 定义输入表、映射、工作行、产能结果等领域类型
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod capacity;
pub mod mapping;
pub mod tables;
pub mod types;
pub mod validation;
pub mod workload;

// 重导出核心类型
pub use capacity::{
    BottleneckAnalysis, CapacityResult, MachineLoad, OperatorLoad, OverflowPull,
    RedistributionPlan, YearAdjustment,
};
pub use mapping::{CapacityMappings, MachineShare, OperationAllocation, OperatorAssignment};
pub use tables::{
    InputTables, KeyedRow, KeyedTable, OperatorCell, SetupAllocationEntry, VendorLeadTime,
};
pub use types::{OverflowStatus, UtilizationLevel, ValidationStatus, NOT_APPLICABLE};
pub use validation::{Discrepancy, ValidationReport, ValidationSection};
pub use workload::{WorkRow, YearWorkload};
