// ==========================================
// 年度产能分析 - 工作簿解析器
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls/.ods) / CSV 目录（每张表一个 <表名>.csv）
// 输出: Workbook（表头 + 原始单元格，不做类型推断以外的清洗）
// ==========================================

use crate::domain::tables::sheet_names;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet::{CellValue, RawSheet, Workbook};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// WorkbookParser Trait
// ==========================================
// 实现者: ExcelParser / CsvDirectoryParser / UniversalWorkbookParser
pub trait WorkbookParser {
    /// 解析输入源为工作簿
    ///
    /// # 返回
    /// - Err(FileNotFound): 路径不存在
    /// - Err(UnsupportedFormat): 格式不匹配
    fn parse_workbook(&self, path: &Path) -> ImportResult<Workbook>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    pub const EXTENSIONS: [&'static str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Error(_) => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::String(s) => CellValue::Text(s.trim().to_string()),
            other => CellValue::Text(other.to_string().trim().to_string()),
        }
    }
}

impl WorkbookParser for ExcelParser {
    fn parse_workbook(&self, path: &Path) -> ImportResult<Workbook> {
        ensure_exists(path)?;

        let ext = extension_of(path);
        if !Self::EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;
        let names = workbook.sheet_names().to_vec();
        if names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook.worksheet_range(&name)?;
            let mut rows = range.rows();

            // 空工作表: 保留表名，后续由结构校验报缺列
            let headers: Vec<CellValue> = match rows.next() {
                Some(header_row) => header_row.iter().map(Self::convert_cell).collect(),
                None => Vec::new(),
            };

            let data: Vec<Vec<CellValue>> = rows
                .map(|row| row.iter().map(Self::convert_cell).collect::<Vec<_>>())
                .filter(|row: &Vec<CellValue>| !row.iter().all(CellValue::is_empty))
                .collect();

            debug!(sheet = %name, columns = headers.len(), rows = data.len(), "读取工作表");
            sheets.push(RawSheet::new(name, headers, data));
        }

        info!(path = %path.display(), sheets = sheets.len(), "Excel 工作簿解析完成");
        Ok(Workbook { sheets })
    }
}

// ==========================================
// CSV 目录 Parser 实现
// ==========================================
pub struct CsvDirectoryParser;

impl CsvDirectoryParser {
    /// 读取单个 CSV 文件（第一行为表头）
    pub fn parse_sheet(&self, name: &str, file_path: &Path) -> ImportResult<RawSheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_path(file_path)?;

        let mut records = reader.records();
        let headers: Vec<CellValue> = match records.next() {
            Some(record) => record?
                .iter()
                .map(|h| text_cell(h.trim_start_matches('\u{feff}')))
                .collect(),
            None => Vec::new(),
        };

        // CSV 无单元格类型: Setup Allocation 中的数字文本视为数字编号（与 Excel 数值单元格一致）
        let numeric_text = name == sheet_names::SETUP_ALLOCATION;

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|raw| {
                    let cell = text_cell(raw);
                    if numeric_text {
                        numeric_cell(cell)
                    } else {
                        cell
                    }
                })
                .collect();

            // 跳过完全空白的行
            if row.iter().all(CellValue::is_empty) {
                continue;
            }
            rows.push(row);
        }

        Ok(RawSheet::new(name, headers, rows))
    }
}

fn numeric_cell(cell: CellValue) -> CellValue {
    match cell {
        CellValue::Text(s) => match s.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(s),
        },
        other => other,
    }
}

fn text_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

impl WorkbookParser for CsvDirectoryParser {
    fn parse_workbook(&self, path: &Path) -> ImportResult<Workbook> {
        ensure_exists(path)?;
        if !path.is_dir() {
            return Err(ImportError::UnsupportedFormat(path.display().to_string()));
        }

        // 只读取已知表名；缺失的表由结构校验统一报告
        let mut sheets = Vec::new();
        for name in sheet_names::REQUIRED {
            let file_path = path.join(format!("{}.csv", name));
            if !file_path.is_file() {
                debug!(sheet = name, "CSV 文件不存在");
                continue;
            }
            sheets.push(self.parse_sheet(name, &file_path)?);
        }

        info!(path = %path.display(), sheets = sheets.len(), "CSV 目录解析完成");
        Ok(Workbook { sheets })
    }
}

// ==========================================
// 通用解析器（根据路径自动选择）
// ==========================================
pub struct UniversalWorkbookParser;

impl WorkbookParser for UniversalWorkbookParser {
    fn parse_workbook(&self, path: &Path) -> ImportResult<Workbook> {
        ensure_exists(path)?;
        if path.is_dir() {
            return CsvDirectoryParser.parse_workbook(path);
        }

        let ext = extension_of(path);
        if ExcelParser::EXTENSIONS.contains(&ext.as_str()) {
            ExcelParser.parse_workbook(path)
        } else {
            Err(ImportError::UnsupportedFormat(ext))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_csv_directory_reads_known_sheets() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Quantities.csv"),
            "\u{feff}Part Number,2025,2026\n1001,100,\n\n1002, 40 ,50\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.csv"), "a,b\n1,2\n").unwrap();

        let workbook = CsvDirectoryParser.parse_workbook(dir.path()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Quantities"]);

        let sheet = workbook.sheet("Quantities").unwrap();
        assert_eq!(sheet.headers[0], CellValue::Text("Part Number".to_string()));
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.cell(0, 2), &CellValue::Empty);
        assert_eq!(sheet.cell(1, 1), &CellValue::Text("40".to_string()));
        assert_eq!(sheet.cell(5, 5), &CellValue::Empty);
    }

    #[test]
    fn test_csv_setup_allocation_digits_become_numbers() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Setup Allocation.csv"),
            "Operator,M1,M2\nOperator,3,\"Alice, Bob\"\n",
        )
        .unwrap();

        let workbook = CsvDirectoryParser.parse_workbook(dir.path()).unwrap();
        let sheet = workbook.sheet("Setup Allocation").unwrap();
        assert_eq!(sheet.headers[1], CellValue::Text("M1".to_string()));
        assert_eq!(sheet.cell(0, 1), &CellValue::Number(3.0));
        assert_eq!(sheet.cell(0, 2), &CellValue::Text("Alice, Bob".to_string()));
    }

    #[test]
    fn test_missing_path_and_unsupported_format() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("inputs.xlsx");
        assert!(matches!(
            UniversalWorkbookParser.parse_workbook(&missing),
            Err(ImportError::FileNotFound(_))
        ));

        let text_file = dir.path().join("inputs.txt");
        fs::write(&text_file, "hello").unwrap();
        assert!(matches!(
            UniversalWorkbookParser.parse_workbook(&text_file),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_corrupt_excel_file_reports_parse_error() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("inputs.xlsx");
        fs::write(&bogus, "not a zip archive").unwrap();
        assert!(matches!(
            ExcelParser.parse_workbook(&bogus),
            Err(ImportError::ExcelParseError(_))
        ));
    }
}
