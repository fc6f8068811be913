// ==========================================
// 个别指导排课系统 - 引擎层
// ==========================================
// 职责: 开讲日历、容量/出勤提取、需求跟踪、排课、汇总、审计
// 红线: 引擎不做 I/O，不因需求排不下而报错
// ==========================================

pub mod assignment;
pub mod audit;
pub mod calendar_policy;
pub mod demand;
pub mod extractor;
pub mod orchestrator;
pub mod priority;
pub mod summarizer;
pub mod tie_breaker;

// 重导出核心引擎
pub use assignment::{AssignmentEngine, EngineRun, EngineStats};
pub use audit::{AuditViolation, ScheduleAuditor};
pub use calendar_policy::CalendarPolicy;
pub use demand::DemandTracker;
pub use extractor::{
    classify_student_token, classify_tutor_token, AvailabilityExtractor, ExtractedInputs,
    ExtractionReport,
};
pub use orchestrator::{ScheduleContext, ScheduleInputs, ScheduleOrchestrator, ScheduleOutcome};
pub use priority::{rank_candidates, rank_slots, structural_score, SlotScore};
pub use summarizer::{ResultSummarizer, StudentTotals};
pub use tie_breaker::{SeededTieBreaker, SequenceTieBreaker, TieBreaker};
