// ==========================================
// 个别指导排课系统 - 时间割审计
// ==========================================
// 职责: 对产出的时间割复核全部硬约束
//       容量 / 开讲 / 同时段重复 / 每日上限 / 出勤
// 用途: 编排器运行后自检；测试中作为性质断言
// ==========================================

use crate::domain::capacity::{StudentAvailability, TutorCapacity};
use crate::domain::schedule::ScheduleMap;
use crate::domain::types::SlotKey;
use crate::engine::calendar_policy::CalendarPolicy;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditViolation {
    CapacityExceeded {
        slot: SlotKey,
        assigned: usize,
        capacity: u32,
    },
    ClosedPeriod {
        slot: SlotKey,
    },
    DuplicateStudent {
        slot: SlotKey,
        student: String,
    },
    DailyCapExceeded {
        student: String,
        date: NaiveDate,
        count: u32,
        cap: u32,
    },
    Unavailable {
        slot: SlotKey,
        student: String,
    },
}

impl fmt::Display for AuditViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditViolation::CapacityExceeded {
                slot,
                assigned,
                capacity,
            } => write!(f, "CAPACITY_EXCEEDED: slot={} ({} > {})", slot, assigned, capacity),
            AuditViolation::ClosedPeriod { slot } => write!(f, "CLOSED_PERIOD: slot={}", slot),
            AuditViolation::DuplicateStudent { slot, student } => {
                write!(f, "DUPLICATE_STUDENT: slot={}, student={}", slot, student)
            }
            AuditViolation::DailyCapExceeded {
                student,
                date,
                count,
                cap,
            } => write!(
                f,
                "DAILY_CAP_EXCEEDED: student={}, date={} ({} > {})",
                student, date, count, cap
            ),
            AuditViolation::Unavailable { slot, student } => {
                write!(f, "UNAVAILABLE: slot={}, student={}", slot, student)
            }
        }
    }
}

pub struct ScheduleAuditor<'a> {
    pub policy: &'a CalendarPolicy,
    pub capacity: &'a TutorCapacity,
    pub availability: &'a StudentAvailability,
    pub daily_cap: u32,
}

impl<'a> ScheduleAuditor<'a> {
    /// 复核时间割，返回全部违规（空 = 通过）
    pub fn audit(&self, schedule: &ScheduleMap) -> Vec<AuditViolation> {
        let mut violations = Vec::new();
        let mut daily: HashMap<(&str, NaiveDate), u32> = HashMap::new();

        for (key, assignments) in schedule.iter() {
            if assignments.is_empty() {
                continue;
            }

            let capacity = self.capacity.get(key.date, key.period);
            if assignments.len() > capacity as usize {
                violations.push(AuditViolation::CapacityExceeded {
                    slot: *key,
                    assigned: assignments.len(),
                    capacity,
                });
            }

            if !self.policy.is_open(key.date, key.period) {
                violations.push(AuditViolation::ClosedPeriod { slot: *key });
            }

            let mut seen = HashSet::new();
            for assignment in assignments {
                let student = assignment.student.as_str();
                if !seen.insert(student) {
                    violations.push(AuditViolation::DuplicateStudent {
                        slot: *key,
                        student: student.to_string(),
                    });
                }
                if !self.availability.is_available(student, *key) {
                    violations.push(AuditViolation::Unavailable {
                        slot: *key,
                        student: student.to_string(),
                    });
                }
                *daily.entry((student, key.date)).or_insert(0) += 1;
            }
        }

        let mut over_cap: Vec<_> = daily
            .into_iter()
            .filter(|(_, count)| *count > self.daily_cap)
            .collect();
        over_cap.sort();
        violations.extend(over_cap.into_iter().map(|((student, date), count)| {
            AuditViolation::DailyCapExceeded {
                student: student.to_string(),
                date,
                count,
                cap: self.daily_cap,
            }
        }));

        violations
    }
}
