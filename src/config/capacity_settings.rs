// ==========================================
// 年度产能分析 - 产能参数配置
// ==========================================
// 职责: 效率系数、年度可用产能、外协工作日长度
// 来源: 默认值 → JSON 文件 / 环境变量覆写
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// 默认值
// ==========================================
pub const DEFAULT_EFFICIENCY: f64 = 0.85;
pub const DEFAULT_BUSINESS_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_BUSINESS_HOURS_PER_DAY: f64 = 18.0;
pub const DEFAULT_VENDOR_DAY_HOURS: f64 = 18.0;

pub const MIN_EFFICIENCY: f64 = 0.1;
pub const MAX_EFFICIENCY: f64 = 1.0;

// ==========================================
// CapacitySettings - 产能参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitySettings {
    /// 效率系数，同时作用于加工与换型时间（作为除数）
    pub efficiency: f64,

    /// 年度工作日
    pub business_days_per_year: f64,

    /// 每工作日小时数
    pub business_hours_per_day: f64,

    /// 外协周期换算用的工作日长度（小时）
    pub vendor_day_hours: f64,
}

impl Default for CapacitySettings {
    fn default() -> Self {
        Self {
            efficiency: DEFAULT_EFFICIENCY,
            business_days_per_year: DEFAULT_BUSINESS_DAYS_PER_YEAR,
            business_hours_per_day: DEFAULT_BUSINESS_HOURS_PER_DAY,
            vendor_day_hours: DEFAULT_VENDOR_DAY_HOURS,
        }
    }
}

impl CapacitySettings {
    /// 年度可用产能（分钟）= 工作日 × 小时 × 60
    ///
    /// 默认 252 × 18 × 60 = 272,160
    pub fn available_capacity_minutes(&self) -> f64 {
        self.business_days_per_year * self.business_hours_per_day * 60.0
    }

    /// 外协工作日长度（分钟）
    pub fn vendor_day_minutes(&self) -> f64 {
        self.vendor_day_hours * 60.0
    }

    /// 替换效率系数（不校验，调用方随后 validate）
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// 校验配置
    ///
    /// # 规则
    /// - efficiency ∈ [0.1, 1.0]
    /// - 工作日/小时/外协日长度 > 0
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.efficiency.is_finite()
            || self.efficiency < MIN_EFFICIENCY
            || self.efficiency > MAX_EFFICIENCY
        {
            return Err(ConfigError::EfficiencyOutOfRange {
                value: self.efficiency,
                min: MIN_EFFICIENCY,
                max: MAX_EFFICIENCY,
            });
        }

        let positives = [
            (config_keys::BUSINESS_DAYS_PER_YEAR, self.business_days_per_year),
            (config_keys::BUSINESS_HOURS_PER_DAY, self.business_hours_per_day),
            (config_keys::VENDOR_DAY_HOURS, self.vendor_day_hours),
        ];
        for (key, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive {
                    key: key.to_string(),
                    value,
                });
            }
        }

        Ok(())
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 从 JSON 字符串加载（缺省字段使用默认值）
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let settings: CapacitySettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "加载产能配置文件");
        Self::from_json_str(&raw)
    }

    /// 从环境变量加载，未设置或格式错误时使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试注入）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            efficiency: read_f64(&lookup, config_keys::EFFICIENCY, defaults.efficiency),
            business_days_per_year: read_f64(
                &lookup,
                config_keys::BUSINESS_DAYS_PER_YEAR,
                defaults.business_days_per_year,
            ),
            business_hours_per_day: read_f64(
                &lookup,
                config_keys::BUSINESS_HOURS_PER_DAY,
                defaults.business_hours_per_day,
            ),
            vendor_day_hours: read_f64(&lookup, config_keys::VENDOR_DAY_HOURS, defaults.vendor_day_hours),
        }
    }
}

fn read_f64<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse::<f64>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = key,
                raw_value = %raw,
                "配置值格式错误，使用默认值"
            );
            default
        }),
    }
}

// ==========================================
// 配置键常量（环境变量名）
// ==========================================
pub mod config_keys {
    pub const EFFICIENCY: &str = "CAPACITY_EFFICIENCY";
    pub const BUSINESS_DAYS_PER_YEAR: &str = "CAPACITY_BUSINESS_DAYS_PER_YEAR";
    pub const BUSINESS_HOURS_PER_DAY: &str = "CAPACITY_BUSINESS_HOURS_PER_DAY";
    pub const VENDOR_DAY_HOURS: &str = "CAPACITY_VENDOR_DAY_HOURS";
}
