// ==========================================
// 个别指导排课系统 - 结果汇总
// ==========================================
// 职责: 引擎结束后，从需求跟踪器导出未消化列表
// 顺序: 名簿顺序 → 科目名升序
// ==========================================

use crate::domain::schedule::{ScheduleMap, UnscheduledItem};
use crate::engine::demand::DemandTracker;
use serde::Serialize;

/// 学生课时收支
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentTotals {
    pub student: String,
    pub initial: u32,
    pub assigned: u32,
    pub residual: u32,
}

pub struct ResultSummarizer;

impl ResultSummarizer {
    /// 未消化列表: 每个剩余 > 0 的 (学生, 科目) 一条
    pub fn unscheduled(demand: &DemandTracker) -> Vec<UnscheduledItem> {
        demand
            .students()
            .filter_map(|student| demand.residual(student).map(|subjects| (student, subjects)))
            .flat_map(|(student, subjects)| {
                subjects
                    .iter()
                    .filter(|(_, hours)| **hours > 0)
                    .map(move |(subject, hours)| UnscheduledItem {
                        student: student.to_string(),
                        subject: subject.clone(),
                        unmet_hours: *hours,
                    })
            })
            .collect()
    }

    /// 每名学生: 初始需求 / 已排人次 / 剩余
    pub fn student_totals(demand: &DemandTracker, schedule: &ScheduleMap) -> Vec<StudentTotals> {
        demand
            .students()
            .map(|student| StudentTotals {
                student: student.to_string(),
                initial: demand.initial_total(student),
                assigned: schedule.assignments_for(student) as u32,
                residual: demand.remaining(student),
            })
            .collect()
    }
}
