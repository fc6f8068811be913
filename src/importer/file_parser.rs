// ==========================================
// 个别指导排课系统 - 表格读取器
// ==========================================
// 支持: Excel (.xlsx，多工作表) / CSV 目录（每个工作表一个 <表名>.csv）
// 输出: SheetTable（保持列顺序，单元格已 trim）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// ==========================================
// SheetTable - 单个工作表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// 取单元格，越界视为空
    pub fn cell(row: &[String], index: usize) -> &str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
}

// ==========================================
// SheetSource - 工作表来源
// ==========================================
pub trait SheetSource {
    fn sheet_names(&self) -> Vec<String>;

    fn read_sheet(&mut self, name: &str) -> ImportResult<SheetTable>;

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|s| s == name)
    }
}

/// 组装 SheetTable: 首行为表头，跳过完全空白的行
fn build_table(name: &str, mut rows: impl Iterator<Item = Vec<String>>) -> SheetTable {
    let headers = rows.next().unwrap_or_default();
    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();
    SheetTable {
        name: name.to_string(),
        headers,
        rows,
    }
}

// ==========================================
// Excel 工作簿
// ==========================================
pub struct ExcelWorkbook {
    workbook: Xlsx<BufReader<File>>,
}

impl ExcelWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("xlsx") {
            return Err(ImportError::UnsupportedFormat(ext.to_string()));
        }

        let workbook: Xlsx<_> = open_workbook(path)?;
        Ok(Self { workbook })
    }
}

/// 单元格 → 文本；日期单元格统一为 YYYY-MM-DD
fn cell_to_string(cell: &Data) -> String {
    let text = match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    };
    text.trim().to_string()
}

impl SheetSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<SheetTable> {
        if !self.has_sheet(name) {
            return Err(ImportError::SheetNotFound(name.to_string()));
        }
        let range = self.workbook.worksheet_range(name)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
        Ok(build_table(name, rows))
    }
}

// ==========================================
// CSV 目录
// ==========================================
pub struct CsvDirectory {
    dir: PathBuf,
    sheets: Vec<String>,
}

impl CsvDirectory {
    pub fn open<P: AsRef<Path>>(dir: P) -> ImportResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ImportError::FileNotFound(dir.display().to_string()));
        }

        let mut sheets = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sheets.push(stem.to_string());
            }
        }
        sheets.sort();

        Ok(Self {
            dir: dir.to_path_buf(),
            sheets,
        })
    }
}

impl SheetSource for CsvDirectory {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.clone()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<SheetTable> {
        if !self.has_sheet(name) {
            return Err(ImportError::SheetNotFound(name.to_string()));
        }

        let file = File::open(self.dir.join(format!("{}.csv", name)))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        Ok(build_table(name, rows.into_iter()))
    }
}

// ==========================================
// 按路径选择来源
// ==========================================
pub fn open_source<P: AsRef<Path>>(path: P) -> ImportResult<Box<dyn SheetSource>> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(Box::new(CsvDirectory::open(path)?));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "xlsx" => Ok(Box::new(ExcelWorkbook::open(path)?)),
        _ if !path.exists() => Err(ImportError::FileNotFound(path.display().to_string())),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}
