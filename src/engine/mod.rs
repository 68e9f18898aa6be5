// ==========================================
// 年度产能分析 - 引擎层
// ==========================================
// 职责: 映射构建、跨表校验、工作量计算、瓶颈识别、溢出前移
// 红线: 引擎不读文件；输入表由导入层提供，结果为纯派生值
// ==========================================

pub mod analyzer;
pub mod bottleneck_resolver;
pub mod cross_validator;
pub mod error;
pub mod mapping_builder;
pub mod operator_load;
pub mod overflow_redistributor;
pub mod workload_calculator;

// 重导出核心引擎
pub use analyzer::{CapacityAnalyzer, CapacityReport, YearReport};
pub use bottleneck_resolver::BottleneckResolver;
pub use cross_validator::CrossValidator;
pub use error::{EngineError, EngineResult};
pub use mapping_builder::{parse_operator_cell, MappingBuilder};
pub use operator_load::aggregate_operator_loads;
pub use overflow_redistributor::OverflowRedistributor;
pub use workload_calculator::{lot_count, WorkloadCalculator};
