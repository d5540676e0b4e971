use anyhow::Result;
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::error::{AppError, BrowserError};

/// 页面来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// 用户已打开的标签页
    Reused,
    /// 本程序新建的标签页
    Created,
}

/// 连接到已开启远程调试的浏览器并获取页面
///
/// 优先复用地址以 `target_url` 开头的标签页（通常已经手动登录过），
/// 找不到时新建标签页并导航过去。
///
/// # 参数
/// - `port`: 浏览器远程调试端口
/// - `target_url`: 门户地址前缀
///
/// # 返回
/// 浏览器、页面、事件处理任务，以及页面是复用的还是新建的
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: &str,
) -> Result<(Browser, Page, JoinHandle<()>, PageSource)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::Browser(BrowserError::ConnectionFailed { port, source: e })
    })?;
    debug!("浏览器连接成功");

    let handler_task = super::spawn_handler(handler);

    // 等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    for p in pages {
        if let Ok(Some(url)) = p.url().await {
            debug!("检查页面: {}", url);
            if url.starts_with(target_url) {
                info!("✓ 复用已打开的页面: {}", url);
                return Ok((browser, p, handler_task, PageSource::Reused));
            }
        }
    }

    debug!("未找到匹配的页面，将创建新页面");
    let page = browser.new_page(target_url).await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        AppError::Browser(BrowserError::PageCreationFailed(e))
    })?;
    info!("已导航到: {}", target_url);

    Ok((browser, page, handler_task, PageSource::Created))
}
