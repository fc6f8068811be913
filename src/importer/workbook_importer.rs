// ==========================================
// 个别指导排课系统 - 工作簿导入器
// ==========================================
// 职责: 按工作簿布局把 SheetTable 解释为网格和名册
// 流程: 先生シフト → 生徒希望数 → シフト_<生徒名>
// 红线: 不解释记号（〇/△/数字），记号留给提取器
// ==========================================

use crate::config::{ScheduleConfig, WorkbookLayout};
use crate::domain::calendar::CalendarWindow;
use crate::domain::grid::{TokenGrid, TokenRow};
use crate::domain::student::StudentDemand;
use crate::domain::types::Subject;
use crate::engine::orchestrator::{ScheduleContext, ScheduleInputs};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{SheetSource, SheetTable};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// 解析日期表头
///
/// 接受 `YYYY-MM-DD`、`YYYY/MM/DD`（可带 `(曜日)` 后缀、可带时间部分），
/// 以及 `MM/DD(...)`（在窗口内查找对应日期）。其余返回 None。
pub fn parse_header_date(header: &str, window: &CalendarWindow) -> Option<NaiveDate> {
    let head = header.split(['(', '（']).next().unwrap_or("").trim();
    let head = head.split_whitespace().next()?;

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(head, format) {
            return Some(date);
        }
    }

    let (month, day) = head.split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    window
        .dates()
        .find(|date| date.month() == month && date.day() == day)
}

/// 单科课时上限，超出视为输入错误
const MAX_SUBJECT_HOURS: u32 = 10_000;

/// 解析课时数；空白为 0，非数字、负数、超上限返回 None
fn parse_hours(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= f64::from(MAX_SUBJECT_HOURS) => {
            Some(value.floor() as u32)
        }
        _ => None,
    }
}

// ==========================================
// WorkbookImporter - 工作簿导入器
// ==========================================
pub struct WorkbookImporter<'a> {
    layout: &'a WorkbookLayout,
    subjects: &'a [Subject],
    window: CalendarWindow,
}

impl<'a> WorkbookImporter<'a> {
    pub fn new(config: &'a ScheduleConfig) -> ImportResult<Self> {
        Ok(Self {
            layout: &config.workbook,
            subjects: &config.subjects,
            window: config.window()?,
        })
    }

    /// 读取全部输入表，生成运行上下文
    #[instrument(skip_all)]
    pub fn import<S: SheetSource + ?Sized>(
        source: &mut S,
        config: &ScheduleConfig,
    ) -> ImportResult<ScheduleContext> {
        let importer = WorkbookImporter::new(config)?;
        let inputs = importer.read_inputs(source)?;
        Ok(ScheduleContext {
            config: config.clone(),
            inputs,
        })
    }

    pub fn read_inputs<S: SheetSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> ImportResult<ScheduleInputs> {
        // ==========================================
        // 先生シフト（必需）
        // ==========================================
        let tutor_table = source.read_sheet(&self.layout.tutor_sheet)?;
        let tutor_grid = self.token_grid(&tutor_table)?;
        if tutor_grid.is_empty() {
            warn!(sheet = %tutor_table.name, "先生シフト没有讲次行，容量为空");
        }
        info!(
            sheet = %tutor_table.name,
            rows = tutor_grid.rows.len(),
            "先生シフト读取完成"
        );

        // ==========================================
        // 生徒希望数（必需）
        // ==========================================
        let demand_table = source.read_sheet(&self.layout.demand_sheet)?;
        let roster = self.roster(&demand_table)?;
        info!(sheet = %demand_table.name, students = roster.len(), "生徒希望数读取完成");

        // ==========================================
        // 学生出勤表（可缺）
        // ==========================================
        let mut student_grids = BTreeMap::new();
        for student in &roster {
            if student_grids.contains_key(&student.name) {
                continue;
            }
            let sheet = self.layout.student_sheet_name(&student.name);
            if !source.has_sheet(&sheet) {
                warn!(student = %student.name, sheet = %sheet, "学生出勤表不存在");
                continue;
            }
            let table = source.read_sheet(&sheet)?;
            student_grids.insert(student.name.clone(), self.token_grid(&table)?);
        }

        info!(
            student_sheets = student_grids.len(),
            missing = roster.len().saturating_sub(student_grids.len()),
            "学生出勤表读取完成"
        );

        Ok(ScheduleInputs {
            tutor_grid,
            roster,
            student_grids,
        })
    }

    /// 表头 → 日期映射（讲次列除外）
    ///
    /// 非日期表头依次取 start_date 起的下一天，超出窗口的列忽略。
    pub fn map_date_columns(&self, table: &SheetTable, period_index: usize) -> Vec<(usize, NaiveDate)> {
        let mut cursor = 0usize;
        let mut columns = Vec::new();

        for (index, header) in table.headers.iter().enumerate() {
            if index == period_index {
                continue;
            }
            let date = match parse_header_date(header, &self.window) {
                Some(date) => {
                    if !self.window.contains(date) {
                        debug!(sheet = %table.name, %date, "列日期在窗口外");
                    }
                    Some(date)
                }
                None => {
                    let date = self.window.nth_date(cursor);
                    cursor += 1;
                    date
                }
            };
            match date {
                Some(date) => columns.push((index, date)),
                None => warn!(sheet = %table.name, header = %header, "无法确定列日期，已忽略"),
            }
        }

        columns
    }

    /// 讲次行 × 日期列 → TokenGrid
    pub fn token_grid(&self, table: &SheetTable) -> ImportResult<TokenGrid> {
        let period_index = table
            .column_index(&self.layout.period_column)
            .ok_or_else(|| ImportError::MissingColumn {
                sheet: table.name.clone(),
                column: self.layout.period_column.clone(),
            })?;
        let columns = self.map_date_columns(table, period_index);

        let rows = table
            .rows
            .iter()
            .map(|row| {
                let cells = columns
                    .iter()
                    .map(|(index, date)| (*date, SheetTable::cell(row, *index).to_string()))
                    .collect();
                TokenRow {
                    period: SheetTable::cell(row, period_index).to_string(),
                    cells,
                }
            })
            .collect();

        Ok(TokenGrid::new(rows))
    }

    /// 生徒希望数 → 名册（表中顺序）
    pub fn roster(&self, table: &SheetTable) -> ImportResult<Vec<StudentDemand>> {
        let name_index = table
            .column_index(&self.layout.student_column)
            .ok_or_else(|| ImportError::MissingColumn {
                sheet: table.name.clone(),
                column: self.layout.student_column.clone(),
            })?;

        let subject_columns: Vec<(&Subject, Option<usize>)> = self
            .subjects
            .iter()
            .map(|subject| (subject, table.column_index(subject.as_str())))
            .collect();
        for (subject, index) in &subject_columns {
            if index.is_none() {
                warn!(sheet = %table.name, subject = %subject, "科目列不存在，按 0 课时处理");
            }
        }

        let mut roster = Vec::new();
        for (row_number, row) in table.rows.iter().enumerate() {
            let name = SheetTable::cell(row, name_index).trim();
            if name.is_empty() {
                debug!(row = row_number + 2, "学生名为空，跳过");
                continue;
            }

            let mut student = StudentDemand::new(name);
            for (subject, index) in &subject_columns {
                let raw = index.map(|i| SheetTable::cell(row, i)).unwrap_or("");
                let hours = parse_hours(raw).unwrap_or_else(|| {
                    warn!(student = %name, subject = %subject, value = %raw, "课时无效，按 0 处理");
                    0
                });
                student = student.with_subject((*subject).clone(), hours);
            }
            roster.push(student);
        }

        Ok(roster)
    }
}
