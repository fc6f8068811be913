// ==========================================
// 个别指导排课系统 - 排课引擎
// ==========================================
// 职责: 在容量/出勤/每日上限约束下，把学生需求分配到时段
// 输入: 可排课时段 + 出勤表 + 需求跟踪器 + 平局随机源
// 输出: ScheduleMap + EngineStats
// 红线: 引擎从不失败，排不下的需求保留在需求跟踪器中
// ==========================================

use crate::config::EngineConfig;
use crate::domain::capacity::{Slot, StudentAvailability};
use crate::domain::schedule::{Assignment, ScheduleMap};
use crate::domain::types::SlotKey;
use crate::engine::demand::DemandTracker;
use crate::engine::priority::{rank_candidates, rank_slots};
use crate::engine::tie_breaker::TieBreaker;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

// ==========================================
// EngineStats / EngineRun - 运行结果
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// 执行的外层迭代数（单遍模式为访问的时段数）
    pub iterations: u32,
    /// 成功排课人次
    pub assignments: u32,
    /// 是否在迭代上限前达到不动点
    pub converged: bool,
}

#[derive(Debug, Clone)]
pub struct EngineRun {
    pub schedule: ScheduleMap,
    pub stats: EngineStats,
}

// ==========================================
// DailyLedger - 当日计数
// ==========================================
#[derive(Debug, Default)]
struct DailyLedger<'s> {
    per_student: HashMap<(&'s str, NaiveDate), u32>,
    per_date: HashMap<NaiveDate, u32>,
}

impl<'s> DailyLedger<'s> {
    fn student_count(&self, student: &'s str, date: NaiveDate) -> u32 {
        self.per_student.get(&(student, date)).copied().unwrap_or(0)
    }

    fn record(&mut self, student: &'s str, date: NaiveDate) {
        *self.per_student.entry((student, date)).or_insert(0) += 1;
        *self.per_date.entry(date).or_insert(0) += 1;
    }
}

// ==========================================
// AssignmentEngine - 排课引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct AssignmentEngine {
    daily_cap: u32,
    max_iterations: u32,
}

impl AssignmentEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            daily_cap: config.daily_cap,
            max_iterations: config.max_iterations,
        }
    }

    pub fn daily_cap(&self) -> u32 {
        self.daily_cap
    }

    // ==========================================
    // 迭代优先级模式
    // ==========================================

    /// 迭代排课
    ///
    /// 每次外层迭代:
    /// 1) 对所有未满时段评分并排序
    /// 2) 依序找到第一个有候选学生的时段
    /// 3) 候选按剩余课时降序（平局随机）取首位，选其剩余最多的科目
    /// 4) 每次迭代只排一人；整轮扫描无排课即终止
    #[instrument(skip_all, fields(slots = slots.len(), students = demand.len()))]
    pub fn run<T: TieBreaker>(
        &self,
        slots: &[Slot],
        availability: &StudentAvailability,
        demand: &mut DemandTracker,
        tie_breaker: &mut T,
    ) -> EngineRun {
        let students: Vec<String> = demand.students().map(str::to_string).collect();
        let mut schedule = ScheduleMap::new();
        for slot in slots {
            schedule.open_slot(slot.key);
        }

        let mut ledger = DailyLedger::default();
        let mut stats = EngineStats::default();

        while stats.iterations < self.max_iterations {
            stats.iterations += 1;

            let progressed = self.assign_one(
                slots,
                availability,
                demand,
                &students,
                &mut schedule,
                &mut ledger,
                tie_breaker,
            );
            if !progressed {
                stats.converged = true;
                break;
            }
            stats.assignments += 1;
        }

        info!(
            iterations = stats.iterations,
            assignments = stats.assignments,
            converged = stats.converged,
            residual = demand.total_remaining(),
            "迭代排课完成"
        );

        EngineRun { schedule, stats }
    }

    /// 单次迭代，返回是否排入一人
    #[allow(clippy::too_many_arguments)]
    fn assign_one<'s, T: TieBreaker>(
        &self,
        slots: &[Slot],
        availability: &StudentAvailability,
        demand: &mut DemandTracker,
        students: &'s [String],
        schedule: &mut ScheduleMap,
        ledger: &mut DailyLedger<'s>,
        tie_breaker: &mut T,
    ) -> bool {
        let ranked = rank_slots(slots, schedule, &ledger.per_date, tie_breaker);

        for (slot, score) in ranked {
            let candidates = self.candidates(slot.key, students, availability, demand, schedule, ledger);
            if candidates.is_empty() {
                continue;
            }

            for student in rank_candidates(candidates, demand, tie_breaker) {
                let Some(subject) = demand.pick_subject(student) else {
                    continue;
                };
                demand.decrement(student, &subject);
                ledger.record(student, slot.key.date);
                debug!(
                    slot = %slot.key,
                    student,
                    subject = %subject,
                    score = score.total(),
                    "排课"
                );
                schedule.push(slot.key, Assignment::new(student, subject));
                return true;
            }
        }

        false
    }

    /// 时段候选: 有剩余需求、未达每日上限、可出勤、尚未在该时段
    fn candidates<'s>(
        &self,
        key: SlotKey,
        students: &'s [String],
        availability: &StudentAvailability,
        demand: &DemandTracker,
        schedule: &ScheduleMap,
        ledger: &DailyLedger<'s>,
    ) -> Vec<&'s str> {
        students
            .iter()
            .map(String::as_str)
            .filter(|student| demand.has_remaining(student))
            .filter(|student| ledger.student_count(student, key.date) < self.daily_cap)
            .filter(|student| availability.is_available(student, key))
            .filter(|student| !schedule.contains_student(&key, student))
            .collect()
    }

    // ==========================================
    // 旧版单遍模式
    // ==========================================

    /// 单遍排课（按日期、讲次顺序，一次填满每个时段）
    ///
    /// 候选按剩余课时降序稳定排序（同剩余保持名簿顺序），不使用随机源。
    /// 仅作为降级模式保留，结果与迭代模式不可互换
    #[instrument(skip_all, fields(slots = slots.len(), students = demand.len()))]
    pub fn run_single_pass(
        &self,
        slots: &[Slot],
        availability: &StudentAvailability,
        demand: &mut DemandTracker,
    ) -> EngineRun {
        let students: Vec<String> = demand.students().map(str::to_string).collect();
        let mut ordered: Vec<Slot> = slots.to_vec();
        ordered.sort_by_key(|slot| slot.key);

        let mut schedule = ScheduleMap::new();
        let mut ledger = DailyLedger::default();
        let mut stats = EngineStats::default();

        for slot in &ordered {
            schedule.open_slot(slot.key);
            stats.iterations += 1;

            let mut candidates =
                self.candidates(slot.key, &students, availability, demand, &schedule, &ledger);
            candidates.sort_by_key(|student| std::cmp::Reverse(demand.remaining(student)));

            for student in candidates {
                if !slot.has_room(schedule.occupancy(&slot.key)) {
                    break;
                }
                let Some(subject) = demand.pick_subject(student) else {
                    continue;
                };
                demand.decrement(student, &subject);
                ledger.record(student, slot.key.date);
                schedule.push(slot.key, Assignment::new(student, subject));
                stats.assignments += 1;
            }
        }
        stats.converged = true;

        info!(
            slots_visited = stats.iterations,
            assignments = stats.assignments,
            residual = demand.total_remaining(),
            "单遍排课完成"
        );

        EngineRun { schedule, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::StudentDemand;
    use crate::domain::types::{Period, Subject};
    use crate::engine::tie_breaker::{SeededTieBreaker, SequenceTieBreaker};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
    }

    fn key(d: u32, p: u8) -> SlotKey {
        SlotKey::new(date(d), Period::new(p).unwrap())
    }

    fn engine() -> AssignmentEngine {
        AssignmentEngine::new(&EngineConfig::default())
    }

    fn available_everywhere(students: &[&str], slots: &[Slot]) -> StudentAvailability {
        let mut availability = StudentAvailability::new();
        for student in students {
            for slot in slots {
                availability.set(student, slot.key.date, slot.key.period, true);
            }
        }
        availability
    }

    #[test]
    fn test_two_students_share_capacity_two_slot() {
        let slots = vec![Slot::new(key(1, 4), 2)];
        let availability = available_everywhere(&["山田", "田中"], &slots);
        let mut demand = DemandTracker::new(&[
            StudentDemand::new("山田").with_subject("数学", 1),
            StudentDemand::new("田中").with_subject("数学", 1),
        ]);

        let run = engine().run(&slots, &availability, &mut demand, &mut SeededTieBreaker::new(42));

        assert_eq!(run.schedule.occupancy(&key(1, 4)), 2);
        assert_eq!(demand.remaining("山田"), 0);
        assert_eq!(demand.remaining("田中"), 0);
        assert_eq!(run.stats.assignments, 2);
        assert!(run.stats.converged);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let slots = vec![Slot::new(key(1, 4), 1), Slot::new(key(1, 5), 2)];
        let names = ["山田", "田中", "高橋", "佐藤"];
        let availability = available_everywhere(&names, &slots);
        let roster: Vec<_> = names
            .iter()
            .map(|n| StudentDemand::new(*n).with_subject("英語", 5))
            .collect();
        let mut demand = DemandTracker::new(&roster);

        let run = engine().run(&slots, &availability, &mut demand, &mut SeededTieBreaker::new(7));

        assert_eq!(run.schedule.occupancy(&key(1, 4)), 1);
        assert_eq!(run.schedule.occupancy(&key(1, 5)), 2);
        assert_eq!(demand.total_remaining(), 20 - 3);
    }

    #[test]
    fn test_daily_cap_enforced() {
        let slots: Vec<_> = (1..=6).map(|p| Slot::new(key(1, p), 1)).collect();
        let availability = available_everywhere(&["山田"], &slots);
        let mut demand = DemandTracker::new(&[StudentDemand::new("山田").with_subject("数学", 10)]);

        let run = engine().run(&slots, &availability, &mut demand, &mut SeededTieBreaker::new(42));

        assert_eq!(run.schedule.daily_count("山田", date(1)), 3);
        assert_eq!(demand.remaining("山田"), 7);
    }

    #[test]
    fn test_contiguous_block_preferred() {
        // 一名学生 2 课时，同日 4/5/6 讲均可；第一次排入后，相邻讲次得分更高
        let slots: Vec<_> = (4..=6).map(|p| Slot::new(key(1, p), 1)).collect();
        let availability = available_everywhere(&["山田"], &slots);
        let mut demand = DemandTracker::new(&[StudentDemand::new("山田").with_subject("数学", 2)]);

        // 平局值全为 0: 第一次排入第4讲（稳定排序），第二次第5讲（+100 连堂）
        let run = engine().run(&slots, &availability, &mut demand, &mut SequenceTieBreaker::zeros());

        assert_eq!(run.schedule.occupancy(&key(1, 4)), 1);
        assert_eq!(run.schedule.occupancy(&key(1, 5)), 1);
        assert_eq!(run.schedule.occupancy(&key(1, 6)), 0);
    }

    #[test]
    fn test_daily_load_attracts_same_day() {
        // 两日各一个时段，学生两日都可出勤、需求 2
        // 第一次排入 12/1 后，12/1 其他时段因当日负载 +10 优先
        let slots = vec![
            Slot::new(key(1, 4), 1),
            Slot::new(key(1, 6), 1),
            Slot::new(key(2, 4), 1),
        ];
        let availability = available_everywhere(&["山田"], &slots);
        let mut demand = DemandTracker::new(&[StudentDemand::new("山田").with_subject("数学", 2)]);

        let run = engine().run(&slots, &availability, &mut demand, &mut SequenceTieBreaker::zeros());

        assert_eq!(run.schedule.occupancy(&key(1, 4)), 1);
        assert_eq!(run.schedule.occupancy(&key(1, 6)), 1);
        assert_eq!(run.schedule.occupancy(&key(2, 4)), 0);
    }

    #[test]
    fn test_highest_remaining_student_first() {
        let slots = vec![Slot::new(key(1, 4), 1)];
        let availability = available_everywhere(&["山田", "田中"], &slots);
        let mut demand = DemandTracker::new(&[
            StudentDemand::new("山田").with_subject("数学", 1),
            StudentDemand::new("田中").with_subject("数学", 4),
        ]);

        let run = engine().run(&slots, &availability, &mut demand, &mut SeededTieBreaker::new(42));
        assert_eq!(run.schedule.get(&key(1, 4))[0].student, "田中");
        assert_eq!(
            run.schedule.get(&key(1, 4))[0].subject,
            Subject::from("数学")
        );
    }

    #[test]
    fn test_unavailable_student_never_placed() {
        let slots = vec![Slot::new(key(1, 4), 2)];
        let mut availability = StudentAvailability::new();
        availability.set("山田", date(1), Period::new(4).unwrap(), false);
        let mut demand = DemandTracker::new(&[
            StudentDemand::new("山田").with_subject("数学", 1),
            StudentDemand::new("田中").with_subject("数学", 1),
        ]);

        let run = engine().run(&slots, &availability, &mut demand, &mut SeededTieBreaker::new(42));
        assert_eq!(run.schedule.assignment_count(), 0);
        assert_eq!(demand.total_remaining(), 2);
        assert!(run.stats.converged);
        assert_eq!(run.stats.iterations, 1);
    }

    #[test]
    fn test_iteration_ceiling_bounds_run() {
        let slots: Vec<_> = (4..=6).map(|p| Slot::new(key(1, p), 2)).collect();
        let availability = available_everywhere(&["山田", "田中"], &slots);
        let mut demand = DemandTracker::new(&[
            StudentDemand::new("山田").with_subject("数学", 3),
            StudentDemand::new("田中").with_subject("数学", 3),
        ]);

        let config = EngineConfig {
            max_iterations: 2,
            ..EngineConfig::default()
        };
        let run = AssignmentEngine::new(&config).run(
            &slots,
            &availability,
            &mut demand,
            &mut SeededTieBreaker::new(42),
        );
        assert_eq!(run.stats.iterations, 2);
        assert_eq!(run.stats.assignments, 2);
        assert!(!run.stats.converged);
        assert_eq!(demand.total_remaining(), 4);
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let slots: Vec<_> = (1..=5)
            .flat_map(|d| (4..=6).map(move |p| Slot::new(key(d, p), 2)))
            .collect();
        let names = ["山田", "田中", "高橋", "佐藤", "鈴木"];
        let availability = available_everywhere(&names, &slots);
        let roster: Vec<_> = names
            .iter()
            .map(|n| StudentDemand::new(*n).with_subject("数学", 3).with_subject("英語", 3))
            .collect();

        let mut first = DemandTracker::new(&roster);
        let mut second = DemandTracker::new(&roster);
        let a = engine().run(&slots, &availability, &mut first, &mut SeededTieBreaker::new(42));
        let b = engine().run(&slots, &availability, &mut second, &mut SeededTieBreaker::new(42));

        assert_eq!(a.schedule, b.schedule);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_single_pass_fills_in_order() {
        let slots = vec![Slot::new(key(2, 4), 1), Slot::new(key(1, 4), 1)];
        let availability = available_everywhere(&["山田", "田中"], &slots);
        let mut demand = DemandTracker::new(&[
            StudentDemand::new("山田").with_subject("数学", 1),
            StudentDemand::new("田中").with_subject("英語", 2),
        ]);

        let run = engine().run_single_pass(&slots, &availability, &mut demand);

        // 12/1 先处理；田中剩余更多
        assert_eq!(run.schedule.get(&key(1, 4))[0].student, "田中");
        // 12/2: 田中剩余 1 = 山田剩余 1，按名簿顺序取山田
        assert_eq!(run.schedule.get(&key(2, 4))[0].student, "山田");
        assert_eq!(run.stats.assignments, 2);
        assert_eq!(run.stats.iterations, 2);
        assert_eq!(demand.total_remaining(), 1);
    }

    #[test]
    fn test_single_pass_respects_daily_cap() {
        let slots: Vec<_> = (1..=6).map(|p| Slot::new(key(6, p), 2)).collect();
        let availability = available_everywhere(&["山田"], &slots);
        let mut demand = DemandTracker::new(&[StudentDemand::new("山田").with_subject("数学", 6)]);

        let run = engine().run_single_pass(&slots, &availability, &mut demand);
        assert_eq!(run.schedule.daily_count("山田", date(6)), 3);
        assert_eq!(demand.remaining("山田"), 3);
    }
}
