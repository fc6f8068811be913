// ==========================================
// 引擎集成测试
// ==========================================
// 职责: 验证 开讲日历 → 提取 → 排课 → 汇总 → 审计 的整体性质
// 场景: 硬约束、需求守恒、可复现、典型边界
// ==========================================

mod helpers;

use chrono::NaiveDate;
use helpers::scenario_builder::*;
use std::collections::HashMap;
use tutor_schedule::config::EngineStrategy;
use tutor_schedule::domain::{Period, SlotKey};
use tutor_schedule::engine::{
    AvailabilityExtractor, CalendarPolicy, ScheduleContext, ScheduleOutcome, SequenceTieBreaker,
};
use tutor_schedule::ScheduleApi;

// ==========================================
// 测试辅助函数
// ==========================================

fn run(context: &ScheduleContext) -> ScheduleOutcome {
    ScheduleApi::new().run(context).unwrap()
}

fn slot(date: NaiveDate, period: u8) -> SlotKey {
    SlotKey::new(date, Period::new(period).unwrap())
}

/// 独立复核全部硬约束
fn assert_hard_constraints(context: &ScheduleContext, outcome: &ScheduleOutcome) {
    let policy = CalendarPolicy::new(&context.config.calendar);
    let extracted = AvailabilityExtractor::new(&policy, &context.config.markers)
        .extract(&context.inputs.tutor_grid, &context.inputs.student_grids);

    let mut daily: HashMap<(String, NaiveDate), u32> = HashMap::new();
    for (key, assignments) in outcome.schedule.iter() {
        assert!(
            policy.open_periods(key.date).contains(&key.period),
            "休讲时段出现在时间割: {}",
            key
        );
        assert!(
            assignments.len() as u32 <= extracted.capacity.get(key.date, key.period),
            "超容量: {}",
            key
        );
        for assignment in assignments {
            assert!(
                extracted.availability.is_available(&assignment.student, *key),
                "不可出勤: {} @ {}",
                assignment.student,
                key
            );
            *daily
                .entry((assignment.student.clone(), key.date))
                .or_insert(0) += 1;
        }
    }
    for ((student, date), count) in &daily {
        assert!(*count <= 3, "{} 在 {} 排了 {} 次", student, date, count);
    }
    assert!(outcome.audit.is_empty(), "审计违规: {:?}", outcome.audit);
}

/// 初始需求 = 已排 + 未消化
fn assert_demand_conserved(context: &ScheduleContext, outcome: &ScheduleOutcome) {
    for student in &context.inputs.roster {
        let assigned = outcome.schedule.assignments_for(&student.name) as u32;
        let residual: u32 = outcome
            .unscheduled
            .iter()
            .filter(|item| item.student == student.name)
            .map(|item| item.unmet_hours)
            .sum();
        assert_eq!(student.total(), assigned + residual, "{}", student.name);
    }
    for totals in &outcome.student_totals {
        assert_eq!(totals.initial, totals.assigned + totals.residual);
    }
}

/// 两周、四名学生、出勤各不相同
fn two_week_scenario() -> ScenarioBuilder {
    let mut builder = ScenarioBuilder::new(dec(1), dec(14))
        .tutor_everywhere("〇")
        .tutor(dec(3), 4, "△")
        .student("山田", &[("数学", 10), ("英語", 5)])
        .available_everywhere("山田")
        .student("田中", &[("国語", 4)])
        .student("高橋", &[("理科", 8), ("数学", 2)])
        .student("鈴木", &[("社会", 2)])
        .without_sheet("鈴木");

    for day in 1..=7 {
        builder = builder
            .available("田中", dec(day), 4, "OK")
            .available("田中", dec(day), 5, "1");
    }
    for day in [6, 13] {
        for period in 2..=6 {
            builder = builder.available("高橋", dec(day), period, "△");
        }
    }
    builder
}

// ==========================================
// 硬约束 + 需求守恒
// ==========================================

#[test]
fn test_iterative_run_respects_hard_constraints() {
    tutor_schedule::logging::init_test();
    let context = two_week_scenario().build();
    let outcome = run(&context);

    assert_hard_constraints(&context, &outcome);
    assert_demand_conserved(&context, &outcome);
    assert!(outcome.stats.converged);
    assert_eq!(outcome.stats.assignments as usize, outcome.schedule.assignment_count());

    // 鈴木 没有出勤表，全部未消化
    assert!(outcome
        .unscheduled
        .iter()
        .any(|i| i.student == "鈴木" && i.unmet_hours == 2));
    // 山田 全时段可出勤，需求可以全部满足
    assert!(outcome.unscheduled.iter().all(|i| i.student != "山田"));
}

#[test]
fn test_single_pass_respects_hard_constraints() {
    let context = two_week_scenario()
        .strategy(EngineStrategy::SinglePass)
        .build();
    let outcome = run(&context);

    assert_hard_constraints(&context, &outcome);
    assert_demand_conserved(&context, &outcome);
}

// ==========================================
// 可复现
// ==========================================

#[test]
fn test_same_seed_same_schedule() {
    let context = two_week_scenario().seed(7).build();
    let first = run(&context);
    let second = run(&context);

    assert_eq!(
        serde_json::to_string(&first.schedule).unwrap(),
        serde_json::to_string(&second.schedule).unwrap()
    );
    assert_eq!(first.unscheduled, second.unscheduled);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_injected_tie_breaker_is_reproducible() {
    let context = two_week_scenario().build();
    let api = ScheduleApi::new();

    let first = api
        .run_with(&context, &mut SequenceTieBreaker::new(vec![0.3, 0.9, 0.1]))
        .unwrap();
    let second = api
        .run_with(&context, &mut SequenceTieBreaker::new(vec![0.3, 0.9, 0.1]))
        .unwrap();

    assert_eq!(first.schedule, second.schedule);
    assert_hard_constraints(&context, &first);
}

// ==========================================
// 典型场景
// ==========================================

#[test]
fn test_two_students_share_capacity_two_slot() {
    let context = ScenarioBuilder::new(dec(1), dec(1))
        .override_periods(dec(1), &[4])
        .tutor(dec(1), 4, "2")
        .student("山田", &[("数学", 1)])
        .available("山田", dec(1), 4, "〇")
        .student("田中", &[("数学", 1)])
        .available("田中", dec(1), 4, "〇")
        .build();
    let outcome = run(&context);

    let assigned = outcome.schedule.get(&slot(dec(1), 4));
    assert_eq!(assigned.len(), 2);
    assert!(assigned.iter().any(|a| a.student == "山田"));
    assert!(assigned.iter().any(|a| a.student == "田中"));
    assert!(outcome.unscheduled.is_empty());
}

#[test]
fn test_student_available_only_when_closed() {
    let context = ScenarioBuilder::new(dec(1), dec(2))
        .tutor_everywhere("〇")
        .student("山田", &[("数学", 2)])
        // 平日 1 讲休讲
        .available("山田", dec(1), 1, "〇")
        .available("山田", dec(2), 2, "〇")
        .build();
    let outcome = run(&context);

    assert_eq!(outcome.schedule.assignments_for("山田"), 0);
    assert_eq!(outcome.unscheduled.len(), 1);
    assert_eq!(outcome.unscheduled[0].student, "山田");
    assert_eq!(outcome.unscheduled[0].unmet_hours, 2);
    assert!(outcome.extraction.discarded_closed_cells >= 2);
}

#[test]
fn test_zero_or_missing_capacity_gets_no_students() {
    let context = ScenarioBuilder::new(dec(1), dec(1))
        .tutor(dec(1), 4, "0")
        .tutor(dec(1), 6, "×")
        .student("山田", &[("数学", 3)])
        .available_everywhere("山田")
        .student("田中", &[("英語", 3)])
        .available_everywhere("田中")
        .build();
    let outcome = run(&context);

    assert_eq!(outcome.schedule.assignment_count(), 0);
    assert_eq!(outcome.schedule.slot_count(), 0);
    assert_eq!(outcome.extraction.unrecognized_tutor_tokens, 1);
    assert_demand_conserved(&context, &outcome);
}

#[test]
fn test_daily_cap_bounds_large_demand() {
    // 12/01(Mon)..12/07(Sun): 平日 3 讲，周六 5 讲，周日休讲
    let context = ScenarioBuilder::new(dec(1), dec(7))
        .tutor_everywhere("〇")
        .student("山田", &[("数学", 30)])
        .available_everywhere("山田")
        .build();
    let outcome = run(&context);

    let usable_days = 6;
    assert_eq!(outcome.schedule.assignments_for("山田"), 3 * usable_days);
    assert_eq!(outcome.unscheduled[0].unmet_hours, 30 - 3 * usable_days as u32);
    for day in 1..=7 {
        assert!(outcome.schedule.daily_count("山田", dec(day)) <= 3);
    }
    assert_eq!(outcome.schedule.daily_count("山田", dec(7)), 0);
}

#[test]
fn test_empty_override_closes_whole_day() {
    let context = ScenarioBuilder::new(dec(1), dec(2))
        .override_periods(dec(1), &[])
        .tutor_everywhere("〇")
        .student("山田", &[("数学", 6)])
        .available_everywhere("山田")
        .build();
    let outcome = run(&context);

    assert!(outcome.schedule.iter().all(|(key, _)| key.date == dec(2)));
    assert_eq!(outcome.schedule.assignments_for("山田"), 3);
    assert_hard_constraints(&context, &outcome);
}

#[test]
fn test_single_tutor_day_is_filled_contiguously() {
    // 周六 2..=6 讲开讲，容量 1
    let context = ScenarioBuilder::new(dec(6), dec(6))
        .tutor_everywhere("△")
        .student("山田", &[("数学", 3)])
        .available_everywhere("山田")
        .build();
    let outcome = run(&context);

    let mut periods: Vec<u8> = outcome
        .schedule
        .iter()
        .filter(|(_, assignments)| !assignments.is_empty())
        .map(|(key, _)| key.period.number())
        .collect();
    periods.sort();

    assert_eq!(periods.len(), 3);
    assert_eq!(periods[2] - periods[0], 2, "不连续: {:?}", periods);
}

#[test]
fn test_iteration_ceiling_stops_early() {
    let context = ScenarioBuilder::new(dec(1), dec(7))
        .max_iterations(5)
        .tutor_everywhere("〇")
        .student("山田", &[("数学", 30)])
        .available_everywhere("山田")
        .build();
    let outcome = run(&context);

    assert_eq!(outcome.stats.assignments, 5);
    assert!(!outcome.stats.converged);
    assert_demand_conserved(&context, &outcome);
}
