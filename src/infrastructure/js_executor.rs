//! JS 执行器 - 基础设施层
//!
//! 持有页面句柄，只暴露"导航 / 执行 JS / 等待元素 / 页内请求"的能力

use anyhow::Result;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::error::AppError;

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// JS 执行器
///
/// 职责：
/// - 持有 Page 句柄（Page 内部是 Arc，clone 很廉价）
/// - 暴露 eval() 等页面能力
/// - 不认识专栏 / 课程，不处理业务流程
#[derive(Clone)]
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建执行器
    ///
    /// # 参数
    /// - `page`: 已打开的页面，执行器与会话共享同一个标签页
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 导航到指定地址
    ///
    /// # 参数
    /// - `url`: 目标地址
    ///
    /// # 返回
    /// 导航失败时返回 `NavigationFailed`
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    ///
    /// # 参数
    /// - `js_code`: 要执行的 JavaScript 代码
    ///
    /// # 返回
    /// 返回 JSON 值
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self
            .page
            .evaluate(js_code.into())
            .await
            .map_err(AppError::from)?;
        let json_value: JsonValue = result.into_value().map_err(AppError::from)?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    ///
    /// # 参数
    /// - `js_code`: 要执行的 JavaScript 代码
    ///
    /// # 返回
    /// 返回反序列化后的类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value).map_err(AppError::from)?;
        Ok(typed_value)
    }

    /// 页面上是否存在匹配的元素
    ///
    /// # 参数
    /// - `selector`: CSS 选择器
    ///
    /// # 返回
    /// 存在为 `true`
    pub async fn exists(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        self.eval_as(js_code).await
    }

    /// 轮询等待元素出现
    ///
    /// # 参数
    /// - `selector`: CSS 选择器
    /// - `timeout`: 最长等待时间
    ///
    /// # 返回
    /// 超时返回 `ElementNotFound`
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            // 页面跳转过程中执行脚本可能失败，视为元素尚未出现
            if let Ok(true) = self.exists(selector).await {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::element_not_found(selector).into());
            }
            sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    /// 在页面内发起 GET 请求，携带当前登录 Cookie
    ///
    /// # 参数
    /// - `url`: 接口完整地址
    ///
    /// # 返回
    /// 响应 JSON；请求或解析失败时为 null
    pub async fn fetch_json(&self, url: &str) -> Result<JsonValue> {
        let js_code = build_fetch_script(url)?;
        self.eval(js_code).await
    }
}

/// 构建页内 fetch 脚本
pub(crate) fn build_fetch_script(url: &str) -> Result<String> {
    Ok(format!(
        r#"
        (async () => {{
            try {{
                const res = await fetch({}, {{
                    method: "GET",
                    headers: {{
                        "Accept": "application/json, text/plain, */*"
                    }},
                    credentials: "include"
                }});
                return await res.json();
            }} catch (err) {{
                console.error("API请求失败:", err);
                return null;
            }}
        }})()
        "#,
        serde_json::to_string(url)?
    ))
}
