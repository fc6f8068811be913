// ==========================================
// 个别指导排课系统 - 需求跟踪器
// ==========================================
// 职责: 每名学生各科剩余课时，随排课单调递减
// 选科: 剩余最多的科目优先，平局按科目名降序
// ==========================================

use crate::domain::student::StudentDemand;
use crate::domain::types::Subject;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

#[derive(Debug, Clone)]
struct DemandState {
    name: String,
    initial_total: u32,
    remaining_total: u32,
    subjects: BTreeMap<Subject, u32>,
}

// ==========================================
// DemandTracker - 需求跟踪器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DemandTracker {
    // 保持名簿顺序
    students: Vec<DemandState>,
    index: HashMap<String, usize>,
}

impl DemandTracker {
    /// 从名簿初始化
    ///
    /// 同名学生的需求合并到首次出现的条目
    pub fn new(roster: &[StudentDemand]) -> Self {
        let mut tracker = Self::default();

        for student in roster {
            match tracker.index.get(&student.name) {
                Some(&idx) => {
                    warn!(student = %student.name, "名簿中学生重复，需求已合并");
                    let state = &mut tracker.students[idx];
                    for (subject, hours) in &student.demand {
                        let count = state.subjects.entry(subject.clone()).or_insert(0);
                        *count = count.saturating_add(*hours);
                    }
                    state.initial_total = state.initial_total.saturating_add(student.total());
                    state.remaining_total = state.remaining_total.saturating_add(student.total());
                }
                None => {
                    tracker
                        .index
                        .insert(student.name.clone(), tracker.students.len());
                    tracker.students.push(DemandState {
                        name: student.name.clone(),
                        initial_total: student.total(),
                        remaining_total: student.total(),
                        subjects: student.demand.clone(),
                    });
                }
            }
        }

        tracker
    }

    fn state(&self, student: &str) -> Option<&DemandState> {
        self.index.get(student).map(|&idx| &self.students[idx])
    }

    /// 学生名（名簿顺序）
    pub fn students(&self) -> impl Iterator<Item = &str> {
        self.students.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// 剩余总课时（未知学生为 0）
    pub fn remaining(&self, student: &str) -> u32 {
        self.state(student).map_or(0, |s| s.remaining_total)
    }

    pub fn has_remaining(&self, student: &str) -> bool {
        self.remaining(student) > 0
    }

    pub fn initial_total(&self, student: &str) -> u32 {
        self.state(student).map_or(0, |s| s.initial_total)
    }

    /// 各科剩余课时
    pub fn residual(&self, student: &str) -> Option<&BTreeMap<Subject, u32>> {
        self.state(student).map(|s| &s.subjects)
    }

    pub fn total_remaining(&self) -> u32 {
        self.students
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.remaining_total))
    }

    /// 扣减一课时
    ///
    /// # 返回
    /// - true: 已扣减
    /// - false: 学生/科目未知或该科已为 0（不做任何修改）
    pub fn decrement(&mut self, student: &str, subject: &Subject) -> bool {
        let Some(&idx) = self.index.get(student) else {
            return false;
        };
        let state = &mut self.students[idx];
        match state.subjects.get_mut(subject) {
            Some(count) if *count > 0 => {
                *count -= 1;
                state.remaining_total = state.remaining_total.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// 选科: 剩余 > 0 中最多者，平局取科目名较大者
    pub fn pick_subject(&self, student: &str) -> Option<Subject> {
        self.state(student)?
            .subjects
            .iter()
            .filter(|(_, count)| **count > 0)
            .max_by(|(sa, ca), (sb, cb)| ca.cmp(cb).then_with(|| sa.cmp(sb)))
            .map(|(subject, _)| subject.clone())
    }
}
