// ==========================================
// 个别指导排课系统 - 容量/出勤提取引擎
// ==========================================
// 职责: 原始标记网格 → TutorCapacity + StudentAvailability
// 输入: 讲师网格 + 各学生网格 + 开讲日历
// 输出: ExtractedInputs（含跳过统计）
// 红线: 无法识别的标记一律视为"无容量 / 不可出勤"
//       休讲时段上的标记直接丢弃
// ==========================================

use crate::config::MarkerSet;
use crate::domain::capacity::{StudentAvailability, TutorCapacity};
use crate::domain::grid::TokenGrid;
use crate::domain::types::Period;
use crate::engine::calendar_policy::CalendarPolicy;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// 标记分类（纯函数）
// ==========================================

/// 讲师标记 → 容量
///
/// # 优先级
/// 1. 含十进制数字 → 首个数字串的整数值
/// 2. 含 full 标记 → 2
/// 3. 含 partial 标记 → 1
/// 4. 其他 → None（容量未设定，按 0 处理）
pub fn classify_tutor_token(token: &str, markers: &MarkerSet) -> Option<u32> {
    if let Some(number) = first_number(token) {
        return Some(number);
    }
    if contains_any(token, &markers.tutor_full) {
        return Some(2);
    }
    if contains_any(token, &markers.tutor_partial) {
        return Some(1);
    }
    None
}

/// 学生标记 → 是否可出勤（二值）
pub fn classify_student_token(token: &str, markers: &MarkerSet) -> bool {
    contains_any(token, &markers.student_available)
}

fn contains_any(token: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|marker| !marker.is_empty() && token.contains(marker.as_str()))
}

/// 首个 ASCII 数字串；超出 u32 时取 u32::MAX
fn first_number(token: &str) -> Option<u32> {
    let start = token.find(|c: char| c.is_ascii_digit())?;
    let digits: String = token[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

// ==========================================
// ExtractionReport - 提取统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// 讲次字段无效而跳过的行
    pub skipped_rows: usize,
    /// 落在休讲时段而丢弃的非空单元格
    pub discarded_closed_cells: usize,
    /// 非空但无法识别为容量的讲师单元格
    pub unrecognized_tutor_tokens: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedInputs {
    pub capacity: TutorCapacity,
    pub availability: StudentAvailability,
    pub report: ExtractionReport,
}

// ==========================================
// AvailabilityExtractor - 提取引擎
// ==========================================
pub struct AvailabilityExtractor<'a> {
    policy: &'a CalendarPolicy,
    markers: &'a MarkerSet,
}

impl<'a> AvailabilityExtractor<'a> {
    pub fn new(policy: &'a CalendarPolicy, markers: &'a MarkerSet) -> Self {
        Self { policy, markers }
    }

    /// 提取讲师容量与全部学生出勤
    #[instrument(skip_all, fields(students = student_grids.len()))]
    pub fn extract(
        &self,
        tutor_grid: &TokenGrid,
        student_grids: &BTreeMap<String, TokenGrid>,
    ) -> ExtractedInputs {
        let mut report = ExtractionReport::default();
        let capacity = self.extract_tutor(tutor_grid, &mut report);

        let mut availability = StudentAvailability::new();
        for (student, grid) in student_grids {
            self.extract_student(student, grid, &mut availability, &mut report);
        }

        debug!(
            capacity_entries = capacity.len(),
            availability_entries = availability.len(),
            available_slots = availability.available_count(),
            skipped_rows = report.skipped_rows,
            discarded_closed_cells = report.discarded_closed_cells,
            unrecognized_tutor_tokens = report.unrecognized_tutor_tokens,
            "提取完成"
        );

        ExtractedInputs {
            capacity,
            availability,
            report,
        }
    }

    /// 讲师网格 → 容量表
    pub fn extract_tutor(&self, grid: &TokenGrid, report: &mut ExtractionReport) -> TutorCapacity {
        let mut capacity = TutorCapacity::new();

        for row in &grid.rows {
            let Some(period) = Period::parse(&row.period) else {
                debug!(period = %row.period, "讲师表: 讲次无效，跳过该行");
                report.skipped_rows += 1;
                continue;
            };

            for (date, raw) in &row.cells {
                let token = raw.trim();
                if !self.policy.is_open(*date, period) {
                    if !token.is_empty() {
                        report.discarded_closed_cells += 1;
                    }
                    continue;
                }

                match classify_tutor_token(token, self.markers) {
                    Some(value) => capacity.set(*date, period, value),
                    None if !token.is_empty() => report.unrecognized_tutor_tokens += 1,
                    None => {}
                }
            }
        }

        capacity
    }

    /// 学生网格 → 出勤表（写入 availability）
    pub fn extract_student(
        &self,
        student: &str,
        grid: &TokenGrid,
        availability: &mut StudentAvailability,
        report: &mut ExtractionReport,
    ) {
        for row in &grid.rows {
            let Some(period) = Period::parse(&row.period) else {
                debug!(student, period = %row.period, "学生表: 讲次无效，跳过该行");
                report.skipped_rows += 1;
                continue;
            };

            for (date, raw) in &row.cells {
                let token = raw.trim();
                if !self.policy.is_open(*date, period) {
                    if !token.is_empty() {
                        report.discarded_closed_cells += 1;
                    }
                    continue;
                }
                availability.set(
                    student,
                    *date,
                    period,
                    classify_student_token(token, self.markers),
                );
            }
        }
    }
}
