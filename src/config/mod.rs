// ==========================================
// 个别指导排课系统 - 配置层
// ==========================================
// 职责: 排课配置的定义、加载与校验
// 存储: JSON 文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod schedule_config;

// 重导出核心配置类型
pub use config_manager::{ConfigManager, CONFIG_PATH_ENV};
pub use error::{ConfigError, ConfigResult};
pub use schedule_config::{
    CalendarConfig, EngineConfig, EngineStrategy, MarkerSet, ScheduleConfig, WorkbookLayout,
};
