use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppError, BrowserError};

const LAUNCH_ARGS: [&str; 5] = [
    "--disable-gpu",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--mute-audio",
    // 视频无需用户手势即可自动播放
    "--autoplay-policy=no-user-gesture-required",
];

/// 启动浏览器并打开门户首页
pub async fn launch_browser(config: &Config) -> Result<(Browser, Page, JoinHandle<()>)> {
    info!(
        "🚀 启动浏览器 ({})...",
        if config.headless { "无头模式" } else { "有界面模式" }
    );

    let browser_config = build_browser_config(config)?;

    let (browser, handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::Browser(BrowserError::LaunchFailed(e))
    })?;
    debug!("浏览器启动成功");

    let handler_task = super::spawn_handler(handler);

    // 等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page(config.portal_url.as_str()).await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::Browser(BrowserError::PageCreationFailed(e))
    })?;

    info!("✅ 浏览器已打开: {}", config.portal_url);

    Ok((browser, page, handler_task))
}

fn build_browser_config(config: &Config) -> Result<BrowserConfig, AppError> {
    let mut builder = BrowserConfig::builder();
    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(executable) = &config.chrome_executable {
        debug!("使用浏览器: {}", executable);
        builder = builder.chrome_executable(executable);
    }

    builder
        .window_size(1366, 768)
        .args(LAUNCH_ARGS)
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            AppError::Browser(BrowserError::ConfigurationFailed(e))
        })
}
