//! 日志初始化
//!
//! 进程入口处调用一次：同时输出到终端和日志文件

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::utils::logging::write_log_header;

/// 初始化全局日志
///
/// 过滤级别优先取 `RUST_LOG`，否则按 `verbose_logging` 选择 debug 或 info。
pub fn init(config: &Config) -> Result<()> {
    write_log_header(&config.output_log_file)
        .with_context(|| format!("无法写入日志文件: {}", config.output_log_file))?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.output_log_file)
        .with_context(|| format!("无法打开日志文件: {}", config.output_log_file))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.verbose_logging)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()
        .context("日志初始化失败")?;

    Ok(())
}

// chromiumoxide 会对未识别的 CDP 消息输出大量日志
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{},chromiumoxide=error", level)
}
