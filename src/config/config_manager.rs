// ==========================================
// 个别指导排课系统 - 配置管理器
// ==========================================
// 职责: 配置加载、默认路径解析、快照导出
// 存储: JSON 文件（只读，核心从不修改配置）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::schedule_config::ScheduleConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 显式指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "TUTOR_SCHEDULE_CONFIG";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ScheduleConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用内置默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: ScheduleConfig::default(),
            source: None,
        }
    }

    /// 从 JSON 文件加载并校验
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut manager = Self::from_json_str(&raw)?;
        manager.source = Some(path.to_path_buf());
        info!(path = %path.display(), "配置文件已加载");
        Ok(manager)
    }

    /// 加载配置；文件不存在时回退到内置默认值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "配置文件不存在，使用内置默认配置");
            Ok(Self::with_defaults())
        }
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: ScheduleConfig = serde_json::from_str(raw)?;
        config.validate()?;
        debug!(
            start_date = %config.calendar.start_date,
            end_date = %config.calendar.end_date,
            subjects = config.subjects.len(),
            overrides = config.calendar.overrides.len(),
            "配置解析完成"
        );
        Ok(Self {
            config,
            source: None,
        })
    }

    /// 默认配置路径
    ///
    /// # 顺序
    /// 1. 环境变量 TUTOR_SCHEDULE_CONFIG
    /// 2. 用户配置目录/tutor-schedule/schedule.json
    /// 3. ./schedule.json
    pub fn default_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        match dirs::config_dir() {
            Some(dir) => dir.join("tutor-schedule").join("schedule.json"),
            None => PathBuf::from("./schedule.json"),
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn into_config(self) -> ScheduleConfig {
        self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 配置快照（格式化 JSON），随排课结果一起记录
    pub fn snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }
}
