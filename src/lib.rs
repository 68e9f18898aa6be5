// ==========================================
// 年度产能分析 - 核心库
// ==========================================
// 职责: 年度产能利用率计算、瓶颈识别、溢出前移（提前开工）
// 流程: 导入 → 映射 → 校验 → 年度计算 → 溢出重分配
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 输入表与结果类型
pub mod domain;

// 引擎层 - 产能计算
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 产能参数
pub mod config;

// 日志系统
pub mod logging;

// 性能计时
pub mod perf;

// API 层 - 展示接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{OverflowStatus, UtilizationLevel, ValidationStatus};

// 领域实体
pub use domain::{
    BottleneckAnalysis, CapacityMappings, CapacityResult, InputTables, OperatorLoad,
    RedistributionPlan, ValidationReport, WorkRow, YearAdjustment, YearWorkload,
};

// 配置
pub use config::CapacitySettings;

// 引擎
pub use engine::{
    BottleneckResolver, CapacityAnalyzer, CapacityReport, CrossValidator, MappingBuilder,
    OverflowRedistributor, WorkloadCalculator,
};

// 导入
pub use importer::CapacityImporter;

// API
pub use api::CapacityApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "年度产能分析";
