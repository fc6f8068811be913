// ==========================================
// 个别指导排课系统 - 时段/候选优先级
// ==========================================
// 职责: 时段评分（连堂奖励 + 当日负载）与候选学生排序
// 评分: 前一讲已有人 +100，后一讲已有人 +100，
//       当日总人次 ×10，另加 [0,1) 随机平局值
// 红线: 已满时段不参与评分
// ==========================================

use crate::domain::capacity::Slot;
use crate::domain::schedule::ScheduleMap;
use crate::domain::types::SlotKey;
use crate::engine::demand::DemandTracker;
use crate::engine::tie_breaker::TieBreaker;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

/// 相邻讲次已有排课时的奖励
pub const NEIGHBOUR_BONUS: i64 = 100;
/// 当日每一人次的奖励
pub const DAILY_LOAD_WEIGHT: i64 = 10;

// ==========================================
// SlotScore - 时段得分
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotScore {
    /// 结构分（连堂 + 当日负载）
    pub structural: i64,
    /// 平局值
    pub tie: f64,
}

impl SlotScore {
    /// 总分（结构分 + 平局值）
    pub fn total(&self) -> f64 {
        self.structural as f64 + self.tie
    }

    /// 降序比较: 结构分优先，其次平局值
    fn cmp_desc(&self, other: &Self) -> Ordering {
        other
            .structural
            .cmp(&self.structural)
            .then_with(|| other.tie.total_cmp(&self.tie))
    }
}

/// 结构分
pub fn structural_score(
    key: SlotKey,
    schedule: &ScheduleMap,
    daily_totals: &HashMap<NaiveDate, u32>,
) -> i64 {
    let occupied = |neighbour: Option<SlotKey>| {
        neighbour.is_some_and(|k| schedule.occupancy(&k) > 0)
    };

    let mut score = 0;
    if occupied(key.prev()) {
        score += NEIGHBOUR_BONUS;
    }
    if occupied(key.next()) {
        score += NEIGHBOUR_BONUS;
    }
    score + DAILY_LOAD_WEIGHT * i64::from(daily_totals.get(&key.date).copied().unwrap_or(0))
}

/// 时段排序
///
/// 已满时段剔除；其余每个时段按原顺序抽取一个平局值，
/// 再按 (结构分, 平局值) 降序稳定排序
pub fn rank_slots<'s, T: TieBreaker>(
    slots: &'s [Slot],
    schedule: &ScheduleMap,
    daily_totals: &HashMap<NaiveDate, u32>,
    tie_breaker: &mut T,
) -> Vec<(&'s Slot, SlotScore)> {
    let mut ranked: Vec<(&Slot, SlotScore)> = slots
        .iter()
        .filter(|slot| slot.has_room(schedule.occupancy(&slot.key)))
        .map(|slot| {
            let score = SlotScore {
                structural: structural_score(slot.key, schedule, daily_totals),
                tie: tie_breaker.draw(),
            };
            (slot, score)
        })
        .collect();

    ranked.sort_by(|(_, a), (_, b)| a.cmp_desc(b));
    ranked
}

/// 候选学生排序: 剩余课时降序，其次平局值降序
///
/// 每名候选按原顺序抽取一个平局值
pub fn rank_candidates<'c, T: TieBreaker>(
    candidates: Vec<&'c str>,
    demand: &DemandTracker,
    tie_breaker: &mut T,
) -> Vec<&'c str> {
    let mut keyed: Vec<(&str, u32, f64)> = candidates
        .into_iter()
        .map(|name| (name, demand.remaining(name), tie_breaker.draw()))
        .collect();

    keyed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.total_cmp(&a.2)));
    keyed.into_iter().map(|(name, _, _)| name).collect()
}
