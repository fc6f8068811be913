// ==========================================
// 个别指导排课系统 - API层错误类型
// ==========================================
// 职责: 汇总配置/导入/导出错误，给出用户可读的原因
// 说明: 排不下的需求不是错误，记录在 ScheduleOutcome.unscheduled
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 读写错误
    // ==========================================
    #[error("CSV 读写失败: {0}")]
    Csv(String),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),
}

// ==========================================
// 从 csv::Error 转换
// 目的: IO 类 CSV 错误保留为 Io，其余归为 Csv（读写两个方向共用）
// ==========================================
impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => ApiError::Io(io),
                other => ApiError::Csv(format!("{:?}", other)),
            }
        } else {
            ApiError::Csv(err.to_string())
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
