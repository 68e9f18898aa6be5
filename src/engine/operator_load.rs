// ==========================================
// 年度产能分析 - 操作员换型负荷
// ==========================================
// 职责: 按操作员汇总年度换型时间
// 红线: 多名操作员共用机台时平均分摊；未分配操作员的行不计入
// ==========================================

use crate::domain::capacity::OperatorLoad;
use crate::domain::workload::YearWorkload;
use std::collections::HashMap;

/// 汇总操作员换型分钟（按分钟降序，同值按姓名升序）
pub fn aggregate_operator_loads(workload: &YearWorkload) -> Vec<OperatorLoad> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for row in &workload.rows {
        if !row.operator.is_assigned() {
            continue;
        }
        let share = row.setup_minutes / row.operator.headcount() as f64;
        for operator in &row.operator.operators {
            *totals.entry(operator.as_str()).or_insert(0.0) += share;
        }
    }

    let mut loads: Vec<OperatorLoad> = totals
        .into_iter()
        .map(|(operator, setup_minutes)| OperatorLoad {
            operator: operator.to_string(),
            setup_minutes,
        })
        .collect();
    loads.sort_by(|a, b| {
        b.setup_minutes
            .total_cmp(&a.setup_minutes)
            .then_with(|| a.operator.cmp(&b.operator))
    });
    loads
}
