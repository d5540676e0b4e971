//! 浏览器会话 - 基础设施层
//!
//! 唯一持有 Browser 的地方，程序启动时创建一次，清理时关闭一次

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::browser::{self, PageSource};
use crate::config::Config;
use crate::infrastructure::JsExecutor;

/// 可关闭的会话
#[async_trait]
pub trait SessionHandle: Send {
    /// 释放会话资源
    async fn close(&mut self) -> Result<()>;
}

/// 会话来源，决定清理时关闭什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionMode {
    /// 本程序启动的浏览器，关闭时整体退出
    Launched,
    /// 连接的外部浏览器，本程序新建的标签页，关闭时只关闭该标签页
    Connected,
    /// 连接的外部浏览器，复用用户已打开的标签页，关闭时保留
    Attached,
}

impl SessionMode {
    fn from_page_source(source: PageSource) -> Self {
        match source {
            PageSource::Reused => SessionMode::Attached,
            PageSource::Created => SessionMode::Connected,
        }
    }

    fn closes_browser(self) -> bool {
        self == SessionMode::Launched
    }

    fn closes_page(self) -> bool {
        self == SessionMode::Connected
    }
}

/// 浏览器会话
pub struct DriverSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    mode: SessionMode,
}

impl DriverSession {
    /// 按配置启动或连接浏览器
    pub async fn open(config: &Config) -> Result<Self> {
        let session = match config.browser_debug_port {
            Some(port) => {
                let (browser, page, handler, source) =
                    browser::connect_to_browser_and_page(port, &config.portal_url).await?;
                Self {
                    browser,
                    page,
                    handler,
                    mode: SessionMode::from_page_source(source),
                }
            }
            None => {
                let (browser, page, handler) = browser::launch_browser(config).await?;
                Self {
                    browser,
                    page,
                    handler,
                    mode: SessionMode::Launched,
                }
            }
        };
        Ok(session)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 基于当前页面创建执行器
    pub fn executor(&self) -> JsExecutor {
        JsExecutor::new(self.page.clone())
    }
}

#[async_trait]
impl SessionHandle for DriverSession {
    async fn close(&mut self) -> Result<()> {
        let result: Result<()> = if self.mode.closes_browser() {
            async {
                self.browser.close().await?;
                self.browser.wait().await?;
                Ok(())
            }
            .await
        } else if self.mode.closes_page() {
            self.page.clone().close().await.map_err(Into::into)
        } else {
            debug!("保留用户已打开的标签页");
            Ok(())
        };
        self.handler.abort();
        result?;
        info!("浏览器会话已结束");
        Ok(())
    }
}
