// ==========================================
// 导入层 + API 集成测试
// ==========================================
// 测试范围:
// 1. CSV 目录导入与直接构建的输入表一致
// 2. 占位列剔除 / 数字操作员编号
// 3. 缺表 / 缺关键列 / 路径错误
// 4. CapacityApi 端到端查询
// ==========================================

mod helpers;

use capacity_analyzer::api::{ApiError, CapacityApi};
use capacity_analyzer::config::CapacitySettings;
use capacity_analyzer::domain::tables::{sheet_names, OperatorCell};
use capacity_analyzer::domain::types::OverflowStatus;
use capacity_analyzer::importer::{CapacityImporter, ImportError};
use capacity_analyzer::logging;
use helpers::test_data_builder::standard_inputs;
use std::fs;
use tempfile::tempdir;

fn csv_path(dir: &std::path::Path, sheet: &str) -> std::path::PathBuf {
    dir.join(format!("{}.csv", sheet))
}

// ==========================================
// 测试 1: CSV 导入
// ==========================================

#[test]
fn test_csv_import_matches_built_tables() {
    logging::init_test();
    println!("\n=== 测试: CSV 目录导入 ===");

    let dir = tempdir().unwrap();
    let inputs = standard_inputs();
    inputs.write_csv_dir(dir.path()).unwrap();

    let imported = CapacityImporter::new().import(dir.path()).unwrap();
    let expected = inputs.build();

    assert_eq!(imported.years(), expected.years());
    assert_eq!(imported.operations(), expected.operations());
    assert_eq!(
        imported.allocation_machines(),
        &["M1".to_string(), "M2".to_string(), "M3".to_string()],
        "Total 列与空表头列应被剔除"
    );
    assert_eq!(imported, expected, "导入结果应与直接构建一致");

    println!("✓ 导入结果与构建数据一致");
}

#[test]
fn test_csv_import_operator_cells() {
    logging::init_test();
    println!("\n=== 测试: 换型分配单元格 ===");

    let dir = tempdir().unwrap();
    standard_inputs().write_csv_dir(dir.path()).unwrap();
    let tables = CapacityImporter::new().import(dir.path()).unwrap();

    let machines: Vec<&str> = tables.setup_allocation.iter().map(|e| e.machine.as_str()).collect();
    assert_eq!(machines, vec!["M1", "M2", "M3"], "标签列不应作为机台");
    assert_eq!(tables.setup_allocation[0].cell, OperatorCell::Text("Alice, Bob".to_string()));
    assert_eq!(tables.setup_allocation[2].cell, OperatorCell::Number(3.0), "数字编号按数值处理");

    println!("✓ 操作员单元格解析正确");
}

// ==========================================
// 测试 2: 导入错误
// ==========================================

#[test]
fn test_missing_sheet_reported() {
    logging::init_test();
    println!("\n=== 测试: 缺失工作表 ===");

    let dir = tempdir().unwrap();
    standard_inputs().write_csv_dir(dir.path()).unwrap();
    fs::remove_file(csv_path(dir.path(), sheet_names::VENDOR_TIME)).unwrap();
    fs::remove_file(csv_path(dir.path(), sheet_names::SETUP_RATES)).unwrap();

    match CapacityImporter::new().import(dir.path()) {
        Err(ImportError::MissingTable(missing)) => {
            assert_eq!(missing.len(), 2);
            assert!(missing.contains(&sheet_names::VENDOR_TIME.to_string()));
            assert!(missing.contains(&sheet_names::SETUP_RATES.to_string()));
        }
        other => panic!("期望 MissingTable，实际 {:?}", other),
    }

    println!("✓ 缺失工作表一次性报告");
}

#[test]
fn test_missing_key_column_reported() {
    logging::init_test();
    println!("\n=== 测试: 缺失关键列 ===");

    let dir = tempdir().unwrap();
    standard_inputs().write_csv_dir(dir.path()).unwrap();
    fs::write(csv_path(dir.path(), sheet_names::QUANTITIES), "Part,2025\n1001,100\n").unwrap();

    match CapacityImporter::new().import(dir.path()) {
        Err(ImportError::SchemaMismatch { table, column }) => {
            assert_eq!(table, sheet_names::QUANTITIES);
            assert_eq!(column, "Part Number");
        }
        other => panic!("期望 SchemaMismatch，实际 {:?}", other),
    }

    println!("✓ 缺失关键列被拒绝");
}

#[test]
fn test_bad_paths_rejected() {
    logging::init_test();
    println!("\n=== 测试: 路径错误 ===");

    let dir = tempdir().unwrap();
    assert!(matches!(
        CapacityImporter::new().import(dir.path().join("nope.xlsx")),
        Err(ImportError::FileNotFound(_))
    ));

    let txt = dir.path().join("inputs.txt");
    fs::write(&txt, "not a workbook").unwrap();
    assert!(matches!(
        CapacityImporter::new().import(&txt),
        Err(ImportError::UnsupportedFormat(_))
    ));

    println!("✓ 不存在路径与不支持格式被拒绝");
}

// ==========================================
// 测试 3: CapacityApi
// ==========================================

#[test]
fn test_api_load_and_query() {
    logging::init_test();
    println!("\n=== 测试: CapacityApi 端到端 ===");

    let dir = tempdir().unwrap();
    standard_inputs().write_csv_dir(dir.path()).unwrap();

    let settings = CapacitySettings::default().with_efficiency(1.0);
    let mut api = CapacityApi::load(dir.path(), &settings).unwrap();
    assert_eq!(api.years(), vec!["2025", "2026", "2027"]);
    assert!(!api.validation().has_warnings);

    let view = api.year_view("2025").unwrap();
    assert_eq!(view.status, OverflowStatus::Normal);
    assert_eq!(view.bottleneck_machine.as_deref(), Some("M1"));
    assert!((view.raw_total_minutes.unwrap() - 9260.0).abs() < 1e-9);
    assert_eq!(view.machines.len(), 3);
    assert!(view.machines.iter().any(|m| m.machine == "M1" && m.is_bottleneck));

    let loads = api.operator_loads("2025").unwrap();
    assert_eq!(loads[0].operator, "Alice");
    assert!((loads[0].setup_hours - 1.5).abs() < 1e-9, "90 分钟 = 1.5 小时");

    assert_eq!(api.work_rows("2026").unwrap().len(), 4);

    api.set_efficiency(0.5).unwrap();
    let view = api.year_view("2025").unwrap();
    assert!((view.raw_total_minutes.unwrap() - 9880.0).abs() < 1e-9);

    assert!(matches!(api.set_efficiency(0.05), Err(ApiError::Config(_))));
    assert!((api.efficiency() - 0.5).abs() < 1e-12, "非法效率不应生效");

    println!("✓ API 查询与效率调整正确");
}

#[test]
fn test_api_report_json_and_errors() {
    logging::init_test();
    println!("\n=== 测试: 报告 JSON 与查询错误 ===");

    let api = CapacityApi::from_tables(standard_inputs().build(), &CapacitySettings::default()).unwrap();

    let json = api.report_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["years"].as_array().map(|y| y.len()), Some(3));
    assert!(value["plan"]["years"].is_array());
    assert!(value["validation"].is_object());

    let view = api.report_view().unwrap();
    assert!(view.critical_years.is_empty());
    assert_eq!(view.validation.sections.len(), 3);

    assert!(matches!(api.year_view("1999"), Err(ApiError::NotFound(_))));
    assert!(matches!(api.year_view("  "), Err(ApiError::InvalidInput(_))));

    println!("✓ 报告 JSON 与错误分类正确");
}
