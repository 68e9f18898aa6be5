// ==========================================
// 年度产能分析 - API层错误类型
// ==========================================
// 职责: 汇总导入/配置/引擎错误，转换为调用方可读的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 下层错误
    // ==========================================
    #[error("输入数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("计算失败: {0}")]
    Engine(#[from] EngineError),

    #[error("结果序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
