use anyhow::Result;
use shuake::{logger, App, Config};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(&config)?;

    // 初始化并运行应用
    let outcome = App::initialize(config).await?.run().await;

    // 未达标或登录失败只作为最终状态记录，不视为程序错误
    if outcome.succeeded() {
        info!("程序执行完成");
    } else {
        error!("程序执行失败");
    }

    Ok(())
}
