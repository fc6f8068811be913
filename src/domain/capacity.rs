// ==========================================
// 个别指导排课系统 - 容量与出勤领域模型
// ==========================================
// 职责: 讲师容量 (date, period) → 人数
//       学生出勤 (student, date, period) → 可否
// 红线: 缺失的出勤记录一律视为"不可出勤"，缺失的容量一律视为 0
// ==========================================

use crate::domain::types::{Period, SlotKey};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ==========================================
// TutorCapacity - 讲师容量表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TutorCapacity {
    entries: BTreeMap<SlotKey, u32>,
}

impl TutorCapacity {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置容量（同一时段重复设置时以最后一次为准）
    pub fn set(&mut self, date: NaiveDate, period: Period, capacity: u32) {
        self.entries.insert(SlotKey::new(date, period), capacity);
    }

    /// 查询容量，缺失视为 0
    pub fn get(&self, date: NaiveDate, period: Period) -> u32 {
        self.entries
            .get(&SlotKey::new(date, period))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &u32)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// StudentAvailability - 学生出勤表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StudentAvailability {
    entries: HashMap<String, HashMap<SlotKey, bool>>,
}

impl StudentAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, student: &str, date: NaiveDate, period: Period, available: bool) {
        self.entries
            .entry(student.to_string())
            .or_default()
            .insert(SlotKey::new(date, period), available);
    }

    /// 查询出勤，缺失视为不可出勤
    pub fn is_available(&self, student: &str, key: SlotKey) -> bool {
        self.entries
            .get(student)
            .and_then(|slots| slots.get(&key))
            .copied()
            .unwrap_or(false)
    }

    /// 可出勤的时段数
    pub fn available_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|slots| slots.values())
            .filter(|v| **v)
            .count()
    }

    /// 已记录的 (student, slot) 条目数
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// Slot - 可排课时段
// ==========================================
// 仅由开讲且容量 > 0 的 (date, period) 构成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub key: SlotKey,
    pub capacity: u32,
}

impl Slot {
    pub fn new(key: SlotKey, capacity: u32) -> Self {
        Self { key, capacity }
    }

    /// 已占用 occupied 人时是否还能再排一人
    pub fn has_room(&self, occupied: usize) -> bool {
        occupied < self.capacity as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(d: u32, p: u8) -> SlotKey {
        SlotKey::new(
            NaiveDate::from_ymd_opt(2025, 12, d).unwrap(),
            Period::new(p).unwrap(),
        )
    }

    #[test]
    fn test_capacity_absent_is_zero() {
        let mut capacity = TutorCapacity::new();
        let k = key(2, 4);
        capacity.set(k.date, k.period, 2);
        assert_eq!(capacity.get(k.date, k.period), 2);
        assert_eq!(capacity.get(k.date, Period::new(5).unwrap()), 0);
    }

    #[test]
    fn test_availability_absent_is_false() {
        let mut availability = StudentAvailability::new();
        availability.set("山田", key(2, 4).date, key(2, 4).period, true);
        availability.set("山田", key(2, 5).date, key(2, 5).period, false);

        assert!(availability.is_available("山田", key(2, 4)));
        assert!(!availability.is_available("山田", key(2, 5)));
        assert!(!availability.is_available("山田", key(2, 6)));
        assert!(!availability.is_available("田中", key(2, 4)));
        assert_eq!(availability.available_count(), 1);
    }

    #[test]
    fn test_slot_room() {
        let slot = Slot::new(key(2, 4), 2);
        assert!(slot.has_room(0));
        assert!(slot.has_room(1));
        assert!(!slot.has_room(2));
        assert!(!Slot::new(key(2, 4), 0).has_room(0));
    }
}
