// ==========================================
// 年度产能分析 - 命令行入口
// ==========================================
// 用法:
//   capacity-analyzer [inputs_path] [efficiency] [--json] [--log-json]
//
// - inputs_path: Excel 工作簿或 CSV 目录（默认 inputs.xlsx）
// - efficiency: 效率系数 [0.1, 1.0]（默认取 CAPACITY_EFFICIENCY 或 0.85）
// - --json: 输出完整 JSON 报告
// - --log-json: 日志以 JSON 行输出到 stderr
// ==========================================

use anyhow::{Context, Result};
use capacity_analyzer::api::{CapacityApi, CapacityReportView, YearCapacityView};
use capacity_analyzer::config::CapacitySettings;
use capacity_analyzer::domain::types::{OverflowStatus, ValidationStatus};
use capacity_analyzer::{logging, APP_NAME, VERSION};

const DEFAULT_INPUTS: &str = "inputs.xlsx";

fn main() -> Result<()> {
    let mut json = false;
    let mut log_json = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--log-json" => log_json = true,
            _ => positional.push(arg),
        }
    }

    if log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let inputs_path = positional
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_INPUTS.to_string());

    let mut settings = CapacitySettings::from_env();
    if let Some(raw) = positional.get(1) {
        let efficiency: f64 = raw
            .trim()
            .parse()
            .with_context(|| format!("效率系数格式错误: {}", raw))?;
        settings = settings.with_efficiency(efficiency);
    }

    tracing::info!(app = APP_NAME, version = VERSION, inputs = %inputs_path, "启动产能分析");

    let api = CapacityApi::load(&inputs_path, &settings)
        .with_context(|| format!("无法加载输入数据: {}", inputs_path))?;

    if json {
        println!("{}", api.report_json()?);
        return Ok(());
    }

    let view = api.report_view()?;
    print_report(&api, &view)?;
    Ok(())
}

fn print_report(api: &CapacityApi, view: &CapacityReportView) -> Result<()> {
    println!("==================================================");
    println!("{} v{}", APP_NAME, VERSION);
    println!(
        "效率系数: {:.0}%  年度可用产能: {:.0} 分钟",
        view.efficiency * 100.0,
        view.available_minutes
    );
    println!("==================================================");

    // ===== 数据校验 =====
    println!("\n数据校验:");
    for section in &view.validation.sections {
        match section.status {
            ValidationStatus::Ok => println!("  {}: OK", section.name),
            ValidationStatus::Warning => {
                println!("  {}: WARNING ({})", section.name, section.discrepancies.len());
                for d in &section.discrepancies {
                    println!("    - {} 缺失于: {}", d.identifier, d.missing_in.join(", "));
                }
            }
        }
    }

    // ===== 年度产能 =====
    println!("\n年度产能:");
    for year in &view.years {
        println!("  {}", year_line(year));
    }

    // ===== 溢出前移 =====
    println!("\n溢出分配:");
    let mut any_pull = false;
    for year in &view.years {
        for pull in &year.pulled_into {
            any_pull = true;
            println!(
                "  {} → {}: {:.0} 分钟（接收年度利用率 {:.1}%）",
                year.year, pull.year, pull.minutes, pull.resulting_pct
            );
        }
        if year.status == OverflowStatus::Critical {
            println!("  {}: {:.0} 分钟无法消化", year.year, year.residual_overflow);
        }
    }
    if !any_pull && view.critical_years.is_empty() {
        println!("  无溢出");
    }

    // ===== 操作员换型时间 =====
    println!("\n操作员换型时间:");
    for year in &view.years {
        let loads = api.operator_loads(&year.year)?;
        if loads.is_empty() {
            continue;
        }
        let parts: Vec<String> = loads
            .iter()
            .map(|l| format!("{} {:.1}h", l.operator, l.setup_hours))
            .collect();
        println!("  {}: {}", year.year, parts.join(", "));
    }

    if !view.warnings.is_empty() {
        println!("\n警告 ({}):", view.warnings.len());
        for warning in &view.warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}

fn year_line(year: &YearCapacityView) -> String {
    if !year.has_data {
        if year.received_from_future > 0.0 {
            return format!(
                "{}: 无数据（接收未来溢出 {:.0} 分钟, {:.1}%）",
                year.year, year.received_from_future, year.utilization_pct
            );
        }
        return format!("{}: 无数据", year.year);
    }

    let raw_pct = year.raw_utilization_pct.unwrap_or(0.0);
    let bottleneck = year.bottleneck_machine.as_deref().unwrap_or("N/A");
    let status = match year.status {
        OverflowStatus::Normal => "normal",
        OverflowStatus::OverCapacity => "over_capacity",
        OverflowStatus::Critical => "CRITICAL",
        OverflowStatus::NoData => "no_data",
    };
    format!(
        "{}: {:.1}% → {:.1}%  瓶颈 {}  外协 {:.0} 分钟  [{}]",
        year.year, raw_pct, year.utilization_pct, bottleneck,
        year.vendor_minutes.unwrap_or(0.0), status
    )
}
