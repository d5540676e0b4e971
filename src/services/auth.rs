//! 登录服务 - 业务能力层

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::config::{Config, LoginSelectors};
use crate::error::AppError;
use crate::infrastructure::JsExecutor;

/// 等待登录表单出现的最长时间
const FORM_WAIT: Duration = Duration::from_secs(15);

/// 登录能力
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// 登录门户
    ///
    /// # 参数
    /// - `username` / `password`: 账号密码
    /// - `max_retries`: 最多尝试次数，为 0 时直接失败
    ///
    /// # 返回
    /// 任意一次成功即为 `true`
    async fn login(&self, username: &str, password: &str, max_retries: u32) -> bool;
}

/// 通过门户登录表单登录
pub struct PortalAuthenticator {
    executor: JsExecutor,
    login_url: String,
    selectors: LoginSelectors,
    retry_delay: Duration,
    settle: Duration,
}

impl PortalAuthenticator {
    /// 创建登录器
    ///
    /// # 参数
    /// - `executor`: 会话页面的执行器
    /// - `config`: 提供登录地址、选择器与等待时间
    pub fn new(executor: JsExecutor, config: &Config) -> Self {
        Self {
            executor,
            login_url: config.login_url.clone(),
            selectors: config.selectors.clone(),
            retry_delay: config.login_retry_delay(),
            settle: config.login_settle(),
        }
    }

    /// 单次登录尝试
    async fn try_login(&self, username: &str, password: &str) -> Result<bool> {
        self.executor.goto(&self.login_url).await?;

        // 连接已登录的浏览器时无需再次填写表单
        if self.executor.exists(&self.selectors.logged_in).await? {
            info!("检测到已登录状态");
            return Ok(true);
        }

        self.executor
            .wait_for_selector(&self.selectors.username, FORM_WAIT)
            .await?;

        self.fill(&self.selectors.username, username).await?;
        self.fill(&self.selectors.password, password).await?;
        debug!("已填写账号密码");

        let clicked: bool = self
            .executor
            .eval_as(build_click_script(&self.selectors.submit)?)
            .await?;
        if !clicked {
            return Err(AppError::element_not_found(&self.selectors.submit).into());
        }

        sleep(self.settle).await;
        self.executor.exists(&self.selectors.logged_in).await
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let filled: bool = self
            .executor
            .eval_as(build_fill_script(selector, value)?)
            .await?;
        if !filled {
            return Err(AppError::element_not_found(selector).into());
        }
        Ok(())
    }
}

#[async_trait]
impl Authenticator for PortalAuthenticator {
    async fn login(&self, username: &str, password: &str, max_retries: u32) -> bool {
        let logged_in = login_with_retries(max_retries, self.retry_delay, |_| {
            self.try_login(username, password)
        })
        .await;
        if logged_in {
            info!("✅ 登录成功: {}", username);
        }
        logged_in
    }
}

/// 按次数重试登录，两次尝试之间等待 `delay`
///
/// # 参数
/// - `max_retries`: 最多尝试次数，为 0 时不做任何尝试
/// - `delay`: 两次尝试之间的等待时间，最后一次失败后不再等待
/// - `attempt`: 单次尝试，参数为从 1 开始的序号；`Ok(false)` 与 `Err` 都算失败
///
/// # 返回
/// 任意一次尝试返回 `Ok(true)` 即为 `true`
pub(crate) async fn login_with_retries<F, Fut>(
    max_retries: u32,
    delay: Duration,
    mut attempt: F,
) -> bool
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    for n in 1..=max_retries {
        info!("🔐 正在登录 (第 {}/{} 次)...", n, max_retries);

        match attempt(n).await {
            Ok(true) => return true,
            Ok(false) => warn!("⚠️ 登录未成功 (第 {}/{} 次)", n, max_retries),
            Err(e) => warn!("⚠️ 登录出错 (第 {}/{} 次): {}", n, max_retries, e),
        }

        if n < max_retries {
            sleep(delay).await;
        }
    }

    warn!("登录已尝试 {} 次，均未成功", max_retries);
    false
}

/// 填写输入框并触发 input/change 事件，让前端框架感知到输入
fn build_fill_script(selector: &str, value: &str) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({});
            if (!el) return false;
            el.focus();
            el.value = {};
            el.dispatchEvent(new Event("input", {{ bubbles: true }}));
            el.dispatchEvent(new Event("change", {{ bubbles: true }}));
            return true;
        }})()
        "#,
        serde_json::to_string(selector)?,
        serde_json::to_string(value)?
    ))
}

fn build_click_script(selector: &str) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({});
            if (!el) return false;
            el.click();
            return true;
        }})()
        "#,
        serde_json::to_string(selector)?
    ))
}
