// ==========================================
// 年度产能分析 - 配置层
// ==========================================
// 职责: 产能参数（效率、可用产能、外协日长度）加载与校验
// 来源: 默认值 / JSON 文件 / 环境变量
// ==========================================

pub mod capacity_settings;
pub mod error;

// 重导出核心配置
pub use capacity_settings::{config_keys, CapacitySettings};
pub use error::{ConfigError, ConfigResult};
