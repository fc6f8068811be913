// ==========================================
// 个别指导排课系统 - 命令行入口
// ==========================================
// 用法: tutor-schedule <input.xlsx|csv目录> [config.json] [输出目录]
// 输出: schedule.csv / unscheduled.csv / outcome.json
// ==========================================

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tutor_schedule::config::ConfigManager;
use tutor_schedule::{logging, ScheduleApi, APP_NAME, VERSION};

const DEFAULT_OUTPUT_DIR: &str = "output";

fn usage() -> String {
    format!(
        "{} v{}\n用法: tutor-schedule <input.xlsx|csv目录> [config.json] [输出目录]",
        APP_NAME, VERSION
    )
}

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!(usage());
    };
    let config_path = args.next().map(PathBuf::from);
    let output_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    // 显式指定的配置必须存在；默认路径不存在时使用内置默认值
    let manager = match &config_path {
        Some(path) => ConfigManager::load(path)
            .with_context(|| format!("无法加载配置: {}", path.display()))?,
        None => {
            let path = ConfigManager::default_config_path();
            ConfigManager::load_or_default(&path)
                .with_context(|| format!("无法加载配置: {}", path.display()))?
        }
    };
    match manager.source() {
        Some(path) => tracing::info!(config = %path.display(), "配置已加载"),
        None => tracing::info!("使用内置默认配置"),
    }
    tracing::debug!(snapshot = %manager.snapshot()?, "配置快照");
    let config = manager.into_config();

    let api = ScheduleApi::new();
    let (_, outcome) = api
        .run_from_path(&input, &config)
        .with_context(|| format!("排课失败: {}", input.display()))?;
    let paths = api
        .export_to_dir(&output_dir, &config, &outcome)
        .with_context(|| format!("导出失败: {}", output_dir.display()))?;

    println!("时间割:   {}", paths.schedule_csv.display());
    println!("未消化:   {}", paths.unscheduled_csv.display());
    println!("运行结果: {}", paths.outcome_json.display());
    println!(
        "排课 {} 人次，未消化 {} 项，审计违规 {} 项",
        outcome.stats.assignments,
        outcome.unscheduled.len(),
        outcome.audit.len()
    );

    if !outcome.audit.is_empty() {
        bail!("时间割审计失败: {} 项违规", outcome.audit.len());
    }
    Ok(())
}
