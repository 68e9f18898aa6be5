// ==========================================
// 年度产能分析 - 输入数据导入器
// ==========================================
// 职责: 整合导入流程，从文件到类型化输入表
// 流程: 解析 → 表头/单元格清洗 → 结构校验 → InputTables
// ==========================================

use crate::domain::tables::InputTables;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{UniversalWorkbookParser, WorkbookParser};
use crate::importer::table_builder::TableBuilder;
use crate::perf::PerfGuard;
use std::path::Path;
use tracing::{info, instrument};

// ==========================================
// CapacityImporter - 输入数据导入器
// ==========================================
pub struct CapacityImporter {
    parser: Box<dyn WorkbookParser>,
    builder: TableBuilder,
}

impl CapacityImporter {
    /// 默认导入器（按路径自动选择 Excel / CSV 目录）
    pub fn new() -> Self {
        Self::with_parser(Box::new(UniversalWorkbookParser))
    }

    /// # 参数
    /// - parser: 工作簿解析器
    pub fn with_parser(parser: Box<dyn WorkbookParser>) -> Self {
        Self {
            parser,
            builder: TableBuilder::new(),
        }
    }

    /// 导入输入表
    ///
    /// # 返回
    /// - Ok(InputTables): 结构完整的七张表
    /// - Err: 文件错误 / 缺表 / 缺关键列
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import<P: AsRef<Path>>(&self, path: P) -> ImportResult<InputTables> {
        let _perf = PerfGuard::new("import_inputs");

        let workbook = self.parser.parse_workbook(path.as_ref())?;
        let tables = self.builder.build(&workbook)?;

        info!(
            sheets = workbook.sheets.len(),
            years = tables.years().len(),
            "输入数据导入完成"
        );
        Ok(tables)
    }
}

impl Default for CapacityImporter {
    fn default() -> Self {
        Self::new()
    }
}
