// ==========================================
// 年度产能分析 - 配置错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("效率系数超出范围: {value}（允许 [{min}, {max}]）")]
    EfficiencyOutOfRange { value: f64, min: f64, max: f64 },

    #[error("配置值必须为正数 (key: {key}): {value}")]
    NonPositive { key: String, value: f64 },

    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
