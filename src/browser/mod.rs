//! 浏览器获取：启动新浏览器或连接已打开的浏览器

pub mod connection;
pub mod launcher;

pub use connection::{connect_to_browser_and_page, PageSource};
pub use launcher::launch_browser;

use chromiumoxide::Handler;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

/// 在后台处理浏览器事件，出错即退出
pub(crate) fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if let Err(e) = h {
                debug!("浏览器事件处理结束: {}", e);
                break;
            }
        }
    })
}
