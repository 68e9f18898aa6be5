// ==========================================
// 年度产能分析 - 溢出前移（提前开工）
// ==========================================
// 职责: 超产能年度的溢出按"最近优先"前移到更早年度的剩余产能
// 输入: 按时间顺序的 (年度, 原始总需求)，None 表示无数据
// 输出: RedistributionPlan
// 红线: 严格顺序执行，后续年度依赖前面年度的 adjusted 状态
// 红线: 无法消化的溢出必须上报为 critical，不得截断
// ==========================================

use crate::domain::capacity::{OverflowPull, RedistributionPlan, YearAdjustment};
use crate::domain::types::OverflowStatus;
use crate::engine::error::{check_capacity, EngineResult};
use tracing::{debug, instrument, warn};

// ==========================================
// OverflowRedistributor
// ==========================================
pub struct OverflowRedistributor {
    available_minutes: f64,
}

impl OverflowRedistributor {
    pub fn new(available_minutes: f64) -> EngineResult<Self> {
        check_capacity(available_minutes)?;
        Ok(Self { available_minutes })
    }

    pub fn available_minutes(&self) -> f64 {
        self.available_minutes
    }

    /// 执行一次完整的重分配
    ///
    /// # 参数
    /// - raw_totals: 按时间顺序的 (年度, 原始总需求分钟)
    ///
    /// # 返回
    /// 与输入同序的年度调整结果；对相同输入重复调用结果一致
    #[instrument(skip(self, raw_totals), fields(years = raw_totals.len(), available = self.available_minutes))]
    pub fn redistribute(&self, raw_totals: &[(String, Option<f64>)]) -> RedistributionPlan {
        let capacity = self.available_minutes;
        let mut years: Vec<YearAdjustment> = Vec::with_capacity(raw_totals.len());

        for (year, raw) in raw_totals {
            let raw_minutes = match raw {
                Some(minutes) => *minutes,
                None => {
                    years.push(YearAdjustment {
                        year: year.clone(),
                        raw_minutes: None,
                        adjusted_minutes: 0.0,
                        status: OverflowStatus::NoData,
                        initial_overflow: 0.0,
                        residual_overflow: 0.0,
                        pulled_from: Vec::new(),
                        received_from_future: 0.0,
                    });
                    continue;
                }
            };

            if raw_minutes < capacity {
                years.push(YearAdjustment {
                    year: year.clone(),
                    raw_minutes: Some(raw_minutes),
                    adjusted_minutes: raw_minutes,
                    status: OverflowStatus::Normal,
                    initial_overflow: 0.0,
                    residual_overflow: 0.0,
                    pulled_from: Vec::new(),
                    received_from_future: 0.0,
                });
                continue;
            }

            let initial_overflow = raw_minutes - capacity;
            let mut overflow = initial_overflow;
            let mut pulled_from = Vec::new();

            // 最近的更早年度优先
            for prev in years.iter_mut().rev() {
                if overflow <= 0.0 {
                    break;
                }
                let spare = capacity - prev.adjusted_minutes;
                if spare <= 0.0 {
                    continue;
                }

                let pull = overflow.min(spare);
                prev.adjusted_minutes += pull;
                prev.received_from_future += pull;
                overflow -= pull;

                debug!(
                    from = %year,
                    into = %prev.year,
                    minutes = pull,
                    "溢出前移"
                );
                pulled_from.push(OverflowPull {
                    year: prev.year.clone(),
                    minutes: pull,
                    resulting_fraction: prev.adjusted_minutes / capacity,
                });
            }

            let residual_overflow = overflow.max(0.0);
            let status = if residual_overflow > 0.0 {
                warn!(
                    year = %year,
                    residual_overflow,
                    "溢出无法被更早年度消化"
                );
                OverflowStatus::Critical
            } else {
                OverflowStatus::OverCapacity
            };

            let mut adjustment = YearAdjustment {
                year: year.clone(),
                raw_minutes: Some(raw_minutes),
                adjusted_minutes: raw_minutes,
                status,
                initial_overflow,
                residual_overflow,
                pulled_from,
                received_from_future: 0.0,
            };
            adjustment.adjusted_minutes -= adjustment.pulled_total();
            years.push(adjustment);
        }

        RedistributionPlan {
            available_minutes: capacity,
            years,
        }
    }
}
