// ==========================================
// 年度产能分析 - 引擎错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("效率系数无效: {0}（必须在 (0, 1] 区间内）")]
    InvalidEfficiency(f64),

    #[error("未知年度: {0}")]
    UnknownYear(String),

    #[error("可用产能无效: {0}（必须为正数）")]
    InvalidCapacity(f64),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// 校验效率系数 e ∈ (0, 1]
pub(crate) fn check_efficiency(efficiency: f64) -> EngineResult<()> {
    if efficiency.is_finite() && efficiency > 0.0 && efficiency <= 1.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidEfficiency(efficiency))
    }
}

/// 校验可用产能 > 0
pub(crate) fn check_capacity(available_minutes: f64) -> EngineResult<()> {
    if available_minutes.is_finite() && available_minutes > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidCapacity(available_minutes))
    }
}
