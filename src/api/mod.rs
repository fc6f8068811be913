// ==========================================
// 个别指导排课系统 - API 层
// ==========================================
// 职责: 提供排课入口与结果导出，供命令行调用
// ==========================================

pub mod error;
pub mod export;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export::{
    format_date_header, read_schedule_grid, write_outcome_json, write_schedule_grid,
    write_unscheduled,
};
pub use schedule_api::{ExportPaths, ScheduleApi};

// 运行上下文与结果在引擎层定义，这里一并导出
pub use crate::engine::orchestrator::{ScheduleContext, ScheduleOutcome};
