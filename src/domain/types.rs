// ==========================================
// 个别指导排课系统 - 领域类型定义
// ==========================================
// 职责: 讲次 (Period)、科目 (Subject)、时段键 (SlotKey)
// 红线: Period 只能取 1..=6，越界值在构造时拒绝
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 讲次 (Period)
// ==========================================
// 每日固定的授课时段编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Period(u8);

impl Period {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 6;

    /// 构造讲次，越界返回 None
    pub fn new(number: u8) -> Option<Self> {
        if (Self::FIRST..=Self::LAST).contains(&number) {
            Some(Self(number))
        } else {
            None
        }
    }

    /// 从表格单元格解析讲次
    ///
    /// 接受 "3"、" 3 "、"3.0"（Excel 数值单元格）；
    /// 空值、非整数、越界一律返回 None（调用方跳过该行）
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(n) = trimmed.parse::<u8>() {
            return Self::new(n);
        }

        // Excel 数值单元格可能带小数点
        let value = trimmed.parse::<f64>().ok()?;
        if value.fract() != 0.0 || value < 0.0 || value > u8::MAX as f64 {
            return None;
        }
        Self::new(value as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// 同日前一讲
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).and_then(Self::new)
    }

    /// 同日后一讲
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).and_then(Self::new)
    }

    /// 全部讲次（升序）
    pub fn all() -> impl Iterator<Item = Period> {
        (Self::FIRST..=Self::LAST).map(Period)
    }
}

impl TryFrom<u8> for Period {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Period::new(value).ok_or_else(|| {
            format!(
                "讲次越界: {} (允许范围 {}..={})",
                value,
                Period::FIRST,
                Period::LAST
            )
        })
    }
}

impl From<Period> for u8 {
    fn from(period: Period) -> Self {
        period.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// 科目 (Subject)
// ==========================================
// 科目集合由配置决定（参考部署: 国語/数学/英語/理科/社会）
// 排序按名称字典序，选科平局时按名称降序
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Subject {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ==========================================
// 时段键 (SlotKey)
// ==========================================
// 排序: 先日期后讲次
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub period: Period,
}

impl SlotKey {
    pub fn new(date: NaiveDate, period: Period) -> Self {
        Self { date, period }
    }

    /// 同日前一讲的时段键
    pub fn prev(self) -> Option<Self> {
        self.period.prev().map(|p| Self::new(self.date, p))
    }

    /// 同日后一讲的时段键
    pub fn next(self) -> Option<Self> {
        self.period.next().map(|p| Self::new(self.date, p))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.date, self.period)
    }
}
