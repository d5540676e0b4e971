//! 学习进度接口 - 业务能力层
//!
//! 通过页面内 fetch 调用门户接口（携带登录 Cookie），查询学时、专栏与课程

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError};
use crate::infrastructure::JsExecutor;
use crate::models::{Course, StudyProgress, Subject};

/// 学习进度查询能力
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// 查询总学时、已完成学时与完成百分比
    async fn study_hours(&self) -> Result<StudyProgress>;

    /// 按接口返回顺序列出专栏
    async fn subjects(&self) -> Result<Vec<Subject>>;

    /// 按接口返回顺序列出专栏下的课程
    ///
    /// # 参数
    /// - `subject_id`: 专栏 ID
    async fn courses(&self, subject_id: &str) -> Result<Vec<Course>>;
}

/// 门户接口客户端
#[derive(Clone)]
pub struct PortalApiClient {
    executor: JsExecutor,
    base_url: String,
    study_hours_path: String,
    subjects_path: String,
    courses_path: String,
}

impl PortalApiClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - `executor`: 已登录页面的执行器，请求在页面内发出
    /// - `config`: 提供接口地址与路径
    pub fn new(executor: JsExecutor, config: &Config) -> Self {
        Self {
            executor,
            base_url: config.api_base_url.clone(),
            study_hours_path: config.study_hours_path.clone(),
            subjects_path: config.subjects_path.clone(),
            courses_path: config.courses_path.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// 请求接口并取出 `data` 字段
    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        let response = self.executor.fetch_json(&url).await?;
        debug!("接口 {} 返回: {}", url, response);

        let data = extract_data(&url, response)?;
        let typed = serde_json::from_value(data).map_err(AppError::from)?;
        Ok(typed)
    }
}

#[async_trait]
impl ProgressApi for PortalApiClient {
    async fn study_hours(&self) -> Result<StudyProgress> {
        self.get_data(&self.study_hours_path).await
    }

    async fn subjects(&self) -> Result<Vec<Subject>> {
        let data: JsonValue = self.get_data(&self.subjects_path).await?;
        let subjects = serde_json::from_value(unwrap_list(data)).map_err(AppError::from)?;
        Ok(subjects)
    }

    async fn courses(&self, subject_id: &str) -> Result<Vec<Course>> {
        let path = self.courses_path.replace("{subject_id}", subject_id);
        let data: JsonValue = self.get_data(&path).await?;
        let courses = serde_json::from_value(unwrap_list(data)).map_err(AppError::from)?;
        Ok(courses)
    }
}

/// 检查响应外层 `{code, message, data}` 并取出 data
///
/// `code` 缺失、为 0 或 200 视为成功。
///
/// # 参数
/// - `endpoint`: 接口地址，仅用于错误信息
/// - `response`: 页内请求得到的 JSON
///
/// # 返回
/// 响应为 null 时返回 `EmptyResponse`，`code` 表示失败时返回 `BadResponse`
pub(crate) fn extract_data(endpoint: &str, response: JsonValue) -> Result<JsonValue, AppError> {
    if response.is_null() {
        return Err(AppError::Api(ApiError::EmptyResponse {
            endpoint: endpoint.to_string(),
        }));
    }

    if let Some(code) = response.get("code").and_then(|v| v.as_i64()) {
        if code != 0 && code != 200 {
            let message = response
                .get("message")
                .or_else(|| response.get("msg"))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            return Err(AppError::bad_response(endpoint, Some(code), message));
        }
    }

    match response.get("data") {
        Some(data) if !data.is_null() => Ok(data.clone()),
        _ => Err(AppError::Api(ApiError::EmptyResponse {
            endpoint: endpoint.to_string(),
        })),
    }
}

/// 列表数据可能直接是数组，也可能包在 `list` / `records` 里
fn unwrap_list(data: JsonValue) -> JsonValue {
    if data.is_array() {
        return data;
    }
    for key in ["list", "records", "rows"] {
        if let Some(list) = data.get(key).filter(|v| v.is_array()) {
            return list.clone();
        }
    }
    data
}
