// ==========================================
// 个别指导排课系统 - 结果导出
// ==========================================
// 时间割: 行 = 讲次 1..=6，列 = 日期 `YYYY/MM/DD(Ddd)`
//         单元格 = `生徒名(科目)` 换行拼接；开讲无人 = 空；休讲 = ×
// 未消化: 生徒名,科目,不足
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::calendar::CalendarWindow;
use crate::domain::schedule::{Assignment, ScheduleMap, UnscheduledItem};
use crate::domain::types::{Period, SlotKey, Subject};
use crate::engine::calendar_policy::CalendarPolicy;
use crate::engine::orchestrator::ScheduleOutcome;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Writer};
use std::io::{Read, Write};

pub const PERIOD_HEADER: &str = "講";
pub const CLOSED_MARK: &str = "×";
const DATE_HEADER_FORMAT: &str = "%Y/%m/%d(%a)";

pub fn format_date_header(date: NaiveDate) -> String {
    date.format(DATE_HEADER_FORMAT).to_string()
}

fn parse_date_header(header: &str) -> Option<NaiveDate> {
    let head = header.split('(').next()?.trim();
    NaiveDate::parse_from_str(head, "%Y/%m/%d").ok()
}

/// `山田(数学)` → Assignment
///
/// 先按已配置科目匹配后缀（最长者优先），科目名可含括号；
/// 无匹配时按最后一个 `(` 切分。
fn parse_assignment(text: &str, subjects: &[Subject]) -> Option<Assignment> {
    let text = text.trim();
    let configured = subjects
        .iter()
        .filter_map(|subject| {
            let student = text.strip_suffix(&format!("({})", subject.as_str()))?;
            Some((student, subject))
        })
        .filter(|(student, _)| !student.is_empty())
        .max_by_key(|(_, subject)| subject.as_str().len());
    if let Some((student, subject)) = configured {
        return Some(Assignment::new(student, subject.clone()));
    }

    let body = text.strip_suffix(')')?;
    let open = body.rfind('(')?;
    let (student, subject) = (&body[..open], &body[open + 1..]);
    if student.is_empty() || subject.is_empty() {
        return None;
    }
    Some(Assignment::new(student, Subject::new(subject)))
}

// ==========================================
// 时间割
// ==========================================

/// 写出时间割网格（窗口内每天一列）
pub fn write_schedule_grid<W: Write>(
    writer: W,
    schedule: &ScheduleMap,
    window: &CalendarWindow,
    policy: &CalendarPolicy,
) -> ApiResult<()> {
    let dates: Vec<NaiveDate> = window.dates().collect();
    let mut csv = Writer::from_writer(writer);

    let mut header = vec![PERIOD_HEADER.to_string()];
    header.extend(dates.iter().map(|d| format_date_header(*d)));
    csv.write_record(&header)?;

    for period in Period::all() {
        let mut record = vec![period.number().to_string()];
        for date in &dates {
            let assignments = schedule.get(&SlotKey::new(*date, period));
            let cell = if !assignments.is_empty() {
                assignments
                    .iter()
                    .map(Assignment::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            } else if policy.is_open(*date, period) {
                String::new()
            } else {
                CLOSED_MARK.to_string()
            };
            record.push(cell);
        }
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// 读回时间割网格（只恢复有学生的时段）
///
/// `subjects` 为配置的科目表，用于切分含括号的科目名。
pub fn read_schedule_grid<R: Read>(reader: R, subjects: &[Subject]) -> ApiResult<ScheduleMap> {
    let mut csv = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv.headers()?.clone();
    if headers.get(0) != Some(PERIOD_HEADER) {
        return Err(ApiError::InvalidInput(format!(
            "时间割首列应为 {}",
            PERIOD_HEADER
        )));
    }
    let dates = headers
        .iter()
        .skip(1)
        .map(|h| {
            parse_date_header(h)
                .ok_or_else(|| ApiError::InvalidInput(format!("无法解析日期表头: {}", h)))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let mut schedule = ScheduleMap::new();
    for record in csv.records() {
        let record = record?;
        let raw_period = record.get(0).unwrap_or("");
        let period = Period::parse(raw_period)
            .ok_or_else(|| ApiError::InvalidInput(format!("无效讲次: {}", raw_period)))?;

        for (date, cell) in dates.iter().zip(record.iter().skip(1)) {
            let cell = cell.trim();
            if cell.is_empty() || cell == CLOSED_MARK {
                continue;
            }
            let key = SlotKey::new(*date, period);
            for line in cell.lines().filter(|l| !l.trim().is_empty()) {
                let assignment = parse_assignment(line, subjects).ok_or_else(|| {
                    ApiError::InvalidInput(format!("无法解析单元格 {}: {}", key, line))
                })?;
                schedule.push(key, assignment);
            }
        }
    }

    Ok(schedule)
}

// ==========================================
// 未消化 / JSON
// ==========================================

pub fn write_unscheduled<W: Write>(writer: W, items: &[UnscheduledItem]) -> ApiResult<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["生徒名", "科目", "不足"])?;
    for item in items {
        let hours = item.unmet_hours.to_string();
        csv.write_record([item.student.as_str(), item.subject.as_str(), hours.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_outcome_json<W: Write>(writer: W, outcome: &ScheduleOutcome) -> ApiResult<()> {
    serde_json::to_writer_pretty(writer, outcome)?;
    Ok(())
}
