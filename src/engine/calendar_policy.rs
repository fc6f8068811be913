// ==========================================
// 个别指导排课系统 - 开讲日历引擎
// ==========================================
// 职责: 日期 → 开讲讲次集合
// 规则: 例外表无条件优先（空列表 = 全日休讲），否则按基础周规则
// 红线: 纯函数，不读取任何外部状态
// ==========================================

use crate::config::CalendarConfig;
use crate::domain::calendar::CalendarWindow;
use crate::domain::capacity::{Slot, TutorCapacity};
use crate::domain::types::{Period, SlotKey};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet, HashSet};

// ==========================================
// CalendarPolicy - 开讲日历
// ==========================================
#[derive(Debug, Clone)]
pub struct CalendarPolicy {
    holidays: HashSet<NaiveDate>,
    closed_weekdays: HashSet<Weekday>,
    weekend_weekdays: HashSet<Weekday>,
    weekend_periods: BTreeSet<Period>,
    weekday_periods: BTreeSet<Period>,
    overrides: BTreeMap<NaiveDate, BTreeSet<Period>>,
}

impl CalendarPolicy {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            holidays: config.holidays.iter().copied().collect(),
            closed_weekdays: config.closed_weekdays.iter().copied().collect(),
            weekend_weekdays: config.weekend_weekdays.iter().copied().collect(),
            weekend_periods: config.weekend_periods.iter().copied().collect(),
            weekday_periods: config.weekday_periods.iter().copied().collect(),
            overrides: config
                .overrides
                .iter()
                .map(|(date, periods)| (*date, periods.iter().copied().collect()))
                .collect(),
        }
    }

    /// 某日开讲讲次
    ///
    /// # 顺序
    /// 1. 例外表（含空列表）
    /// 2. 休讲日 / 休讲星期 → 空
    /// 3. 周末星期 → weekend_periods
    /// 4. 其余 → weekday_periods
    pub fn open_periods(&self, date: NaiveDate) -> BTreeSet<Period> {
        if let Some(periods) = self.overrides.get(&date) {
            return periods.clone();
        }
        self.base_periods(date)
    }

    /// 基础周规则（忽略例外表）
    pub fn base_periods(&self, date: NaiveDate) -> BTreeSet<Period> {
        let weekday = date.weekday();
        if self.holidays.contains(&date) || self.closed_weekdays.contains(&weekday) {
            BTreeSet::new()
        } else if self.weekend_weekdays.contains(&weekday) {
            self.weekend_periods.clone()
        } else {
            self.weekday_periods.clone()
        }
    }

    pub fn is_open(&self, date: NaiveDate, period: Period) -> bool {
        match self.overrides.get(&date) {
            Some(periods) => periods.contains(&period),
            None => self.base_periods(date).contains(&period),
        }
    }

    /// 构造可排课时段: 窗口内开讲且容量 > 0，按 (date, period) 升序
    ///
    /// 休讲时段上登记的容量不会产生时段
    pub fn build_slots(&self, window: &CalendarWindow, capacity: &TutorCapacity) -> Vec<Slot> {
        window
            .dates()
            .flat_map(|date| {
                self.open_periods(date)
                    .into_iter()
                    .map(move |period| (date, period))
            })
            .filter_map(|(date, period)| {
                let cap = capacity.get(date, period);
                (cap > 0).then(|| Slot::new(SlotKey::new(date, period), cap))
            })
            .collect()
    }
}
