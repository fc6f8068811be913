// ==========================================
// 个别指导排课系统 - 导入层
// ==========================================
// 职责: 外部工作簿 → 网格与名册（ScheduleContext）
// 支持: Excel (.xlsx), CSV 目录
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod workbook_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{open_source, CsvDirectory, ExcelWorkbook, SheetSource, SheetTable};
pub use workbook_importer::{parse_header_date, WorkbookImporter};
