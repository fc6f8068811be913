// ==========================================
// 个别指导排课系统 - 排课窗口领域模型
// ==========================================
// 职责: 排课期间 [start_date, end_date]（闭区间）
// 红线: end_date < start_date 的窗口不可构造
// ==========================================

use chrono::{Days, NaiveDate};
use serde::Serialize;

// ==========================================
// CalendarWindow - 排课窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl CalendarWindow {
    /// 构造窗口，end < start 返回 None
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Option<Self> {
        if end_date < start_date {
            return None;
        }
        Some(Self {
            start_date,
            end_date,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// 窗口天数（含首尾）
    pub fn day_count(&self) -> usize {
        (self.end_date - self.start_date).num_days() as usize + 1
    }

    /// 按日期升序遍历窗口
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end_date;
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= end)
    }

    /// 窗口内第 offset 天（0 起），越界返回 None
    pub fn nth_date(&self, offset: usize) -> Option<NaiveDate> {
        let date = self.start_date.checked_add_days(Days::new(offset as u64))?;
        self.contains(date).then_some(date)
    }
}
