// ==========================================
// 个别指导排课系统 - 排课配置
// ==========================================
// 职责: 排课期间、开讲规则、科目、引擎参数、标记字符、表格布局
// 格式: JSON（全部字段有默认值，可只写需要覆盖的部分）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::calendar::CalendarWindow;
use crate::domain::types::{Period, Subject};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 参考部署的排课期间（冬期讲习）
fn reference_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn periods(numbers: &[u8]) -> Vec<Period> {
    numbers.iter().copied().filter_map(Period::new).collect()
}

// ==========================================
// ScheduleConfig - 排课配置总表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub calendar: CalendarConfig,
    pub subjects: Vec<Subject>,
    pub engine: EngineConfig,
    pub markers: MarkerSet,
    pub workbook: WorkbookLayout,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            subjects: ["国語", "数学", "英語", "理科", "社会"]
                .into_iter()
                .map(Subject::from)
                .collect(),
            engine: EngineConfig::default(),
            markers: MarkerSet::default(),
            workbook: WorkbookLayout::default(),
        }
    }
}

impl ScheduleConfig {
    /// 校验配置（排课开始前必须通过）
    ///
    /// # 规则
    /// - end_date 不得早于 start_date
    /// - 科目非空且不重复
    /// - daily_cap、max_iterations 必须 > 0
    pub fn validate(&self) -> ConfigResult<()> {
        self.window()?;

        if self.subjects.is_empty() {
            return Err(ConfigError::EmptySubjects);
        }
        let mut seen = HashSet::new();
        for subject in &self.subjects {
            if subject.as_str().trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "subjects".to_string(),
                    message: "科目名不能为空".to_string(),
                });
            }
            if !seen.insert(subject.as_str()) {
                return Err(ConfigError::DuplicateSubject(subject.to_string()));
            }
        }

        if self.engine.daily_cap == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.daily_cap".to_string(),
                message: "每日上限必须大于 0".to_string(),
            });
        }
        if self.engine.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.max_iterations".to_string(),
                message: "迭代上限必须大于 0".to_string(),
            });
        }
        if self.workbook.sheet_name_max_chars == 0 {
            return Err(ConfigError::InvalidValue {
                key: "workbook.sheet_name_max_chars".to_string(),
                message: "工作表名长度上限必须大于 0".to_string(),
            });
        }

        Ok(())
    }

    /// 排课窗口
    pub fn window(&self) -> ConfigResult<CalendarWindow> {
        CalendarWindow::new(self.calendar.start_date, self.calendar.end_date).ok_or(
            ConfigError::InvalidWindow {
                start: self.calendar.start_date,
                end: self.calendar.end_date,
            },
        )
    }
}

// ==========================================
// CalendarConfig - 开讲日历
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    // ===== 基础周规则 =====
    /// 全日休讲的日期
    pub holidays: Vec<NaiveDate>,
    /// 全日休讲的星期
    pub closed_weekdays: Vec<Weekday>,
    /// 按"周末"开讲的星期
    pub weekend_weekdays: Vec<Weekday>,
    pub weekend_periods: Vec<Period>,
    pub weekday_periods: Vec<Period>,

    // ===== 例外表 =====
    /// 日期 → 开讲讲次（空列表表示全日休讲），优先于基础规则
    pub overrides: BTreeMap<NaiveDate, Vec<Period>>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_date: reference_date(2025, 12, 1),
            end_date: reference_date(2026, 1, 31),
            holidays: Vec::new(),
            closed_weekdays: vec![Weekday::Sun],
            weekend_weekdays: vec![Weekday::Sat],
            weekend_periods: periods(&[2, 3, 4, 5, 6]),
            weekday_periods: periods(&[4, 5, 6]),
            overrides: BTreeMap::new(),
        }
    }
}

// ==========================================
// EngineConfig - 引擎参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStrategy {
    /// 迭代优先级（每排一人重新评分所有时段）
    Iterative,
    /// 旧版单遍（按日期、讲次顺序一次填满）
    SinglePass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 每名学生每日排课上限
    pub daily_cap: u32,
    /// 迭代上限（保证终止）
    pub max_iterations: u32,
    /// 平局随机数种子
    pub seed: u64,
    pub strategy: EngineStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_cap: 3,
            max_iterations: 3000,
            seed: 42,
            strategy: EngineStrategy::Iterative,
        }
    }
}

// ==========================================
// MarkerSet - 出勤标记字符
// ==========================================
// 讲师: 含数字 → 该数字；含 full → 2；含 partial → 1
// 学生: 含 student_available 任一 → 可出勤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    pub tutor_full: Vec<String>,
    pub tutor_partial: Vec<String>,
    pub student_available: Vec<String>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        let full: Vec<String> = ["〇", "○", "OK", "全"].iter().map(|s| s.to_string()).collect();
        let partial: Vec<String> = ["△", "▲", "半"].iter().map(|s| s.to_string()).collect();
        let student_available = full
            .iter()
            .chain(partial.iter())
            .cloned()
            .chain(["1", "2", "3"].iter().map(|s| s.to_string()))
            .collect();

        Self {
            tutor_full: full,
            tutor_partial: partial,
            student_available,
        }
    }
}

// ==========================================
// WorkbookLayout - 输入表格布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookLayout {
    pub tutor_sheet: String,
    pub demand_sheet: String,
    /// 学生出勤表名 = 前缀 + 学生名（截断到 sheet_name_max_chars 个字符）
    pub student_sheet_prefix: String,
    pub sheet_name_max_chars: usize,
    pub period_column: String,
    pub student_column: String,
}

impl Default for WorkbookLayout {
    fn default() -> Self {
        Self {
            tutor_sheet: "先生シフト".to_string(),
            demand_sheet: "生徒希望数".to_string(),
            student_sheet_prefix: "シフト_".to_string(),
            sheet_name_max_chars: 31,
            period_column: "講".to_string(),
            student_column: "生徒名".to_string(),
        }
    }
}

impl WorkbookLayout {
    /// 学生出勤表名
    pub fn student_sheet_name(&self, student: &str) -> String {
        format!("{}{}", self.student_sheet_prefix, student)
            .chars()
            .take(self.sheet_name_max_chars)
            .collect()
    }
}
