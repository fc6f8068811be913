// ==========================================
// 个别指导排课系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 文件相关错误 =====
    #[error("配置文件读取失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),

    // ===== 校验错误 =====
    #[error("排课期间无效: end_date={end} 早于 start_date={start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("科目列表为空")]
    EmptySubjects,

    #[error("科目重复: {0}")]
    DuplicateSubject(String),

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
