// ==========================================
// 个别指导排课系统 - 排课结果领域模型
// ==========================================
// 职责: ScheduleMap (date, period) → [(student, subject)]
//       UnscheduledItem 未消化需求
// 红线: 每个时段列表长度 ≤ 容量，同一时段内学生不重复
// ==========================================

use crate::domain::types::{Period, SlotKey, Subject};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// Assignment - 单次排课
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub student: String,
    pub subject: Subject,
}

impl Assignment {
    pub fn new(student: impl Into<String>, subject: Subject) -> Self {
        Self {
            student: student.into(),
            subject,
        }
    }
}

// 表格单元格格式: 山田(数学)
impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.student, self.subject)
    }
}

// ==========================================
// ScheduleEntry - 序列化用的扁平条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub period: Period,
    pub assignments: Vec<Assignment>,
}

// ==========================================
// ScheduleMap - 时间割
// ==========================================
// JSON 中以 ScheduleEntry 列表表示（元组键无法作为 JSON 对象键）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<ScheduleEntry>", from = "Vec<ScheduleEntry>")]
pub struct ScheduleMap {
    slots: BTreeMap<SlotKey, Vec<Assignment>>,
}

impl ScheduleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个（暂时为空的）时段
    pub fn open_slot(&mut self, key: SlotKey) {
        self.slots.entry(key).or_default();
    }

    /// 追加排课，返回追加后该时段人数
    pub fn push(&mut self, key: SlotKey, assignment: Assignment) -> usize {
        let list = self.slots.entry(key).or_default();
        list.push(assignment);
        list.len()
    }

    pub fn get(&self, key: &SlotKey) -> &[Assignment] {
        self.slots.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 时段已排人数（未登记视为 0）
    pub fn occupancy(&self, key: &SlotKey) -> usize {
        self.slots.get(key).map_or(0, Vec::len)
    }

    pub fn contains_student(&self, key: &SlotKey, student: &str) -> bool {
        self.get(key).iter().any(|a| a.student == student)
    }

    /// 按 (date, period) 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &Vec<Assignment>)> {
        self.slots.iter()
    }

    /// 已登记时段数（含空时段）
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// 排课总人次
    pub fn assignment_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// 某学生的排课总人次
    pub fn assignments_for(&self, student: &str) -> usize {
        self.slots
            .values()
            .flat_map(|list| list.iter())
            .filter(|a| a.student == student)
            .count()
    }

    /// 某学生在某日的排课人次
    pub fn daily_count(&self, student: &str, date: NaiveDate) -> usize {
        self.slots
            .iter()
            .filter(|(key, _)| key.date == date)
            .flat_map(|(_, list)| list.iter())
            .filter(|a| a.student == student)
            .count()
    }
}

impl From<ScheduleMap> for Vec<ScheduleEntry> {
    fn from(map: ScheduleMap) -> Self {
        map.slots
            .into_iter()
            .map(|(key, assignments)| ScheduleEntry {
                date: key.date,
                period: key.period,
                assignments,
            })
            .collect()
    }
}

impl From<Vec<ScheduleEntry>> for ScheduleMap {
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        let mut map = ScheduleMap::new();
        for entry in entries {
            let key = SlotKey::new(entry.date, entry.period);
            map.open_slot(key);
            for assignment in entry.assignments {
                map.push(key, assignment);
            }
        }
        map
    }
}

// ==========================================
// UnscheduledItem - 未消化需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledItem {
    pub student: String,
    pub subject: Subject,
    pub unmet_hours: u32,
}
