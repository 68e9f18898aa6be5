// ==========================================
// 年度产能分析 - 导入层
// ==========================================
// 职责: 外部表格数据 → 类型化输入表
// 支持: Excel 工作簿, CSV 目录
// ==========================================

// 模块声明
pub mod capacity_importer;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod sheet;
pub mod table_builder;

// 重导出核心类型
pub use capacity_importer::CapacityImporter;
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvDirectoryParser, ExcelParser, UniversalWorkbookParser, WorkbookParser};
pub use sheet::{CellValue, RawSheet, Workbook};
pub use table_builder::TableBuilder;
