// ==========================================
// 个别指导排课系统 - 核心库
// ==========================================
// 流程: 工作簿 → 网格/名册 → 开讲日历 → 容量/出勤 → 迭代排课 → 时间割 + 未消化
// 系统定位: 排课草案（最终由教室人工确认）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 日历/科目/引擎参数
pub mod config;

// 导入层 - 外部工作簿
pub mod importer;

// 引擎层 - 排课规则
pub mod engine;

// API 层 - 对外入口与导出
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Assignment, CalendarWindow, Period, ScheduleMap, SlotKey, StudentDemand, Subject, TokenGrid,
    TokenRow, UnscheduledItem,
};

// 配置
pub use config::{ConfigManager, ScheduleConfig};

// 引擎
pub use engine::{
    AssignmentEngine, AvailabilityExtractor, CalendarPolicy, DemandTracker, ResultSummarizer,
    ScheduleContext, ScheduleInputs, ScheduleOrchestrator, ScheduleOutcome,
};

// API
pub use api::{ApiError, ApiResult, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "個別指導 時間割作成";
