// ==========================================
// 个别指导排课系统 - 学生需求领域模型
// ==========================================
// 职责: 学生名 + 各科希望课时数
// ==========================================

use crate::domain::types::Subject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// StudentDemand - 学生科目需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDemand {
    pub name: String,
    pub demand: BTreeMap<Subject, u32>,
}

impl StudentDemand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            demand: BTreeMap::new(),
        }
    }

    /// 追加科目需求（同科目累加，饱和于 u32::MAX）
    pub fn with_subject(mut self, subject: impl Into<Subject>, hours: u32) -> Self {
        let count = self.demand.entry(subject.into()).or_insert(0);
        *count = count.saturating_add(hours);
        self
    }

    /// 全科目需求合计（饱和）
    pub fn total(&self) -> u32 {
        self.demand
            .values()
            .fold(0u32, |acc, hours| acc.saturating_add(*hours))
    }
}
