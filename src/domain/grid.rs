// ==========================================
// 个别指导排课系统 - 出勤标记网格
// ==========================================
// 职责: "讲次行 × 日期列" 的原始标记（讲师表 / 学生表共用）
// 说明: 讲次字段保持原始文本，由提取器逐行校验
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单行: 讲次原文 + 各日期单元格原文
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRow {
    pub period: String,
    pub cells: Vec<(NaiveDate, String)>,
}

impl TokenRow {
    pub fn new(period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            cells: Vec::new(),
        }
    }

    pub fn with_cell(mut self, date: NaiveDate, token: impl Into<String>) -> Self {
        self.cells.push((date, token.into()));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrid {
    pub rows: Vec<TokenRow>,
}

impl TokenGrid {
    pub fn new(rows: Vec<TokenRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
