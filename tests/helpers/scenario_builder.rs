// ==========================================
// 排课场景构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tutor_schedule::config::{EngineStrategy, ScheduleConfig};
use tutor_schedule::domain::{Period, StudentDemand, TokenGrid, TokenRow};
use tutor_schedule::engine::{ScheduleContext, ScheduleInputs};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// 2025-12 的日期
pub fn dec(day: u32) -> NaiveDate {
    date(2025, 12, day)
}

type Cells = BTreeMap<u8, Vec<(NaiveDate, String)>>;

fn to_grid(cells: Cells) -> TokenGrid {
    TokenGrid::new(
        cells
            .into_iter()
            .map(|(period, cells)| TokenRow {
                period: period.to_string(),
                cells,
            })
            .collect(),
    )
}

// ==========================================
// ScenarioBuilder
// ==========================================

pub struct ScenarioBuilder {
    config: ScheduleConfig,
    tutor: Cells,
    roster: Vec<StudentDemand>,
    students: BTreeMap<String, Cells>,
}

impl ScenarioBuilder {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let mut config = ScheduleConfig::default();
        config.calendar.start_date = start;
        config.calendar.end_date = end;
        Self {
            config,
            tutor: Cells::new(),
            roster: Vec::new(),
            students: BTreeMap::new(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.engine.seed = seed;
        self
    }

    pub fn strategy(mut self, strategy: EngineStrategy) -> Self {
        self.config.engine.strategy = strategy;
        self
    }

    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.config.engine.max_iterations = max_iterations;
        self
    }

    pub fn override_periods(mut self, date: NaiveDate, periods: &[u8]) -> Self {
        let periods = periods.iter().filter_map(|p| Period::new(*p)).collect();
        self.config.calendar.overrides.insert(date, periods);
        self
    }

    pub fn tutor(mut self, date: NaiveDate, period: u8, token: &str) -> Self {
        self.tutor
            .entry(period)
            .or_default()
            .push((date, token.to_string()));
        self
    }

    /// 窗口内每天 1..=6 讲都填同一记号（休讲格由提取器丢弃）
    pub fn tutor_everywhere(mut self, token: &str) -> Self {
        for date in self.window_dates() {
            for period in 1..=6 {
                self = self.tutor(date, period, token);
            }
        }
        self
    }

    pub fn student(mut self, name: &str, subjects: &[(&str, u32)]) -> Self {
        let demand = subjects
            .iter()
            .fold(StudentDemand::new(name), |s, (subject, hours)| {
                s.with_subject(*subject, *hours)
            });
        self.roster.push(demand);
        self.students.entry(name.to_string()).or_default();
        self
    }

    pub fn available(mut self, name: &str, date: NaiveDate, period: u8, token: &str) -> Self {
        self.students
            .entry(name.to_string())
            .or_default()
            .entry(period)
            .or_default()
            .push((date, token.to_string()));
        self
    }

    pub fn available_everywhere(mut self, name: &str) -> Self {
        for date in self.window_dates() {
            for period in 1..=6 {
                self = self.available(name, date, period, "〇");
            }
        }
        self
    }

    /// 不给该学生出勤表
    pub fn without_sheet(mut self, name: &str) -> Self {
        self.students.remove(name);
        self
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    fn window_dates(&self) -> Vec<NaiveDate> {
        self.config
            .calendar
            .start_date
            .iter_days()
            .take_while(|d| *d <= self.config.calendar.end_date)
            .collect()
    }

    pub fn build(self) -> ScheduleContext {
        ScheduleContext {
            config: self.config,
            inputs: ScheduleInputs {
                tutor_grid: to_grid(self.tutor),
                roster: self.roster,
                student_grids: self
                    .students
                    .into_iter()
                    .map(|(name, cells)| (name, to_grid(cells)))
                    .collect(),
            },
        }
    }
}
