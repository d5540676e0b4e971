//! 日志工具模块
//!
//! 提供日志文件头与启动信息的输出

use std::fs::OpenOptions;
use std::io::Write;

use anyhow::Result;
use tracing::info;

use crate::config::Config;

/// 在日志文件末尾写入本次运行的文件头
///
/// # 参数
/// - `log_file_path`: 日志文件路径，不存在时创建
///
/// # 返回
/// 文件无法打开或写入时返回错误
pub fn write_log_header(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n学习日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    file.write_all(log_header.as_bytes())?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置，账号脱敏后输出
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 自动学习模式");
    info!("👤 账号: {}", mask_username(&config.username));
    info!("🎯 目标学时: {}", config.target_hours);
    info!("⏱️ 课程间隔: {} 秒", config.course_interval_secs);
    match config.browser_debug_port {
        Some(port) => info!("🌐 浏览器: 连接调试端口 {}", port),
        None => info!(
            "🌐 浏览器: 启动新实例{}",
            if config.headless { " (无头)" } else { "" }
        ),
    }
    info!("{}", "=".repeat(60));
}

/// 账号脱敏
///
/// # 参数
/// - `username`: 原始账号
///
/// # 返回
/// 只保留首尾各两位，不超过四位时全部隐藏
pub fn mask_username(username: &str) -> String {
    let chars: Vec<char> = username.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}
