// ==========================================
// 个别指导排课系统 - 引擎编排器
// ==========================================
// 用途: 协调 开讲日历 → 提取 → 排课 → 汇总 → 审计
// 红线: 不读取任何全局状态，全部输入来自 ScheduleInputs
// ==========================================

use crate::config::{ConfigResult, EngineStrategy, MarkerSet, ScheduleConfig};
use crate::domain::calendar::CalendarWindow;
use crate::domain::grid::TokenGrid;
use crate::domain::schedule::{ScheduleMap, UnscheduledItem};
use crate::domain::student::StudentDemand;
use crate::engine::assignment::{AssignmentEngine, EngineStats};
use crate::engine::audit::{AuditViolation, ScheduleAuditor};
use crate::engine::calendar_policy::CalendarPolicy;
use crate::engine::demand::DemandTracker;
use crate::engine::extractor::{AvailabilityExtractor, ExtractionReport};
use crate::engine::summarizer::{ResultSummarizer, StudentTotals};
use crate::engine::tie_breaker::{SeededTieBreaker, TieBreaker};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

// ==========================================
// ScheduleInputs / ScheduleContext - 运行上下文
// ==========================================

/// 一次排课的输入表
#[derive(Debug, Clone, Default)]
pub struct ScheduleInputs {
    pub tutor_grid: TokenGrid,
    pub roster: Vec<StudentDemand>,
    /// 学生名 → 出勤网格（没有出勤表的学生不出现在此）
    pub student_grids: BTreeMap<String, TokenGrid>,
}

/// 显式运行上下文: 配置 + 输入表
#[derive(Debug, Clone, Default)]
pub struct ScheduleContext {
    pub config: ScheduleConfig,
    pub inputs: ScheduleInputs,
}

// ==========================================
// ScheduleOutcome - 排课结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    pub run_id: Uuid,
    pub schedule: ScheduleMap,
    pub unscheduled: Vec<UnscheduledItem>,
    pub stats: EngineStats,
    pub extraction: ExtractionReport,
    pub student_totals: Vec<StudentTotals>,
    /// 审计违规（正常应为空）
    pub audit: Vec<AuditViolation>,
}

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
pub struct ScheduleOrchestrator {
    window: CalendarWindow,
    policy: CalendarPolicy,
    engine: AssignmentEngine,
    markers: MarkerSet,
    strategy: EngineStrategy,
    seed: u64,
}

impl ScheduleOrchestrator {
    /// 创建编排器（配置在此校验，窗口无效时拒绝）
    pub fn new(config: &ScheduleConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            window: config.window()?,
            policy: CalendarPolicy::new(&config.calendar),
            engine: AssignmentEngine::new(&config.engine),
            markers: config.markers.clone(),
            strategy: config.engine.strategy,
            seed: config.engine.seed,
        })
    }

    pub fn policy(&self) -> &CalendarPolicy {
        &self.policy
    }

    pub fn window(&self) -> &CalendarWindow {
        &self.window
    }

    /// 使用配置种子执行排课
    pub fn execute(&self, inputs: &ScheduleInputs) -> ScheduleOutcome {
        let mut tie_breaker = SeededTieBreaker::new(self.seed);
        self.execute_with(inputs, &mut tie_breaker)
    }

    /// 使用注入的随机源执行排课
    pub fn execute_with<T: TieBreaker>(
        &self,
        inputs: &ScheduleInputs,
        tie_breaker: &mut T,
    ) -> ScheduleOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("schedule_run", %run_id, strategy = ?self.strategy);
        let _guard = span.enter();

        info!(
            start_date = %self.window.start_date(),
            end_date = %self.window.end_date(),
            students = inputs.roster.len(),
            student_sheets = inputs.student_grids.len(),
            "开始排课"
        );

        // ==========================================
        // 步骤1: 提取容量与出勤
        // ==========================================
        let extractor = AvailabilityExtractor::new(&self.policy, &self.markers);
        let extracted = extractor.extract(&inputs.tutor_grid, &inputs.student_grids);

        for student in &inputs.roster {
            if !inputs.student_grids.contains_key(&student.name) {
                debug!(student = %student.name, "没有出勤表，视为全部不可出勤");
            }
        }

        // ==========================================
        // 步骤2: 构造时段并排课
        // ==========================================
        let slots = self.policy.build_slots(&self.window, &extracted.capacity);
        let mut demand = DemandTracker::new(&inputs.roster);

        let run = match self.strategy {
            EngineStrategy::Iterative => {
                self.engine
                    .run(&slots, &extracted.availability, &mut demand, tie_breaker)
            }
            EngineStrategy::SinglePass => {
                self.engine
                    .run_single_pass(&slots, &extracted.availability, &mut demand)
            }
        };

        // ==========================================
        // 步骤3: 汇总 + 审计
        // ==========================================
        let unscheduled = ResultSummarizer::unscheduled(&demand);
        let student_totals = ResultSummarizer::student_totals(&demand, &run.schedule);

        let auditor = ScheduleAuditor {
            policy: &self.policy,
            capacity: &extracted.capacity,
            availability: &extracted.availability,
            daily_cap: self.engine.daily_cap(),
        };
        let audit = auditor.audit(&run.schedule);
        for violation in &audit {
            error!(%violation, "时间割审计失败");
        }

        info!(
            slots = slots.len(),
            assignments = run.stats.assignments,
            unscheduled_items = unscheduled.len(),
            residual_hours = demand.total_remaining(),
            "排课结束"
        );

        ScheduleOutcome {
            run_id,
            schedule: run.schedule,
            unscheduled,
            stats: run.stats,
            extraction: extracted.report,
            student_totals,
            audit,
        }
    }
}
