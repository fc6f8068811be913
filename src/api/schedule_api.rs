// ==========================================
// 个别指导排课系统 - 排课 API
// ==========================================
// 职责: 导入 → 排课 → 导出 的对外入口
// 说明: 审计违规写入日志与结果，不转为错误
// ==========================================

use crate::api::error::ApiResult;
use crate::api::export::{write_outcome_json, write_schedule_grid, write_unscheduled};
use crate::config::ScheduleConfig;
use crate::engine::orchestrator::{ScheduleContext, ScheduleOrchestrator, ScheduleOutcome};
use crate::engine::tie_breaker::TieBreaker;
use crate::importer::{open_source, WorkbookImporter};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const SCHEDULE_FILE: &str = "schedule.csv";
pub const UNSCHEDULED_FILE: &str = "unscheduled.csv";
pub const OUTCOME_FILE: &str = "outcome.json";

/// 导出文件路径
#[derive(Debug, Clone, Serialize)]
pub struct ExportPaths {
    pub schedule_csv: PathBuf,
    pub unscheduled_csv: PathBuf,
    pub outcome_json: PathBuf,
}

// ==========================================
// ScheduleApi - 排课 API
// ==========================================
#[derive(Debug, Default)]
pub struct ScheduleApi;

impl ScheduleApi {
    pub fn new() -> Self {
        Self
    }

    /// 按上下文执行一次排课（配置种子）
    pub fn run(&self, context: &ScheduleContext) -> ApiResult<ScheduleOutcome> {
        let orchestrator = ScheduleOrchestrator::new(&context.config)?;
        Ok(orchestrator.execute(&context.inputs))
    }

    /// 按上下文执行一次排课（注入随机源）
    pub fn run_with<T: TieBreaker>(
        &self,
        context: &ScheduleContext,
        tie_breaker: &mut T,
    ) -> ApiResult<ScheduleOutcome> {
        let orchestrator = ScheduleOrchestrator::new(&context.config)?;
        Ok(orchestrator.execute_with(&context.inputs, tie_breaker))
    }

    /// 从工作簿（.xlsx 或 CSV 目录）导入后排课
    #[instrument(skip(self, config), fields(path = %path.as_ref().display()))]
    pub fn run_from_path<P: AsRef<Path>>(
        &self,
        path: P,
        config: &ScheduleConfig,
    ) -> ApiResult<(ScheduleContext, ScheduleOutcome)> {
        let mut source = open_source(path.as_ref())?;
        let context = WorkbookImporter::import(source.as_mut(), config)?;
        let outcome = self.run(&context)?;
        Ok((context, outcome))
    }

    /// 写出 schedule.csv / unscheduled.csv / outcome.json
    pub fn export_to_dir<P: AsRef<Path>>(
        &self,
        dir: P,
        config: &ScheduleConfig,
        outcome: &ScheduleOutcome,
    ) -> ApiResult<ExportPaths> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let orchestrator = ScheduleOrchestrator::new(config)?;
        let paths = ExportPaths {
            schedule_csv: dir.join(SCHEDULE_FILE),
            unscheduled_csv: dir.join(UNSCHEDULED_FILE),
            outcome_json: dir.join(OUTCOME_FILE),
        };

        write_schedule_grid(
            BufWriter::new(File::create(&paths.schedule_csv)?),
            &outcome.schedule,
            orchestrator.window(),
            orchestrator.policy(),
        )?;
        write_unscheduled(
            BufWriter::new(File::create(&paths.unscheduled_csv)?),
            &outcome.unscheduled,
        )?;
        write_outcome_json(
            BufWriter::new(File::create(&paths.outcome_json)?),
            outcome,
        )?;

        info!(dir = %dir.display(), run_id = %outcome.run_id, "结果已导出");
        Ok(paths)
    }
}
