//! 课程学习服务 - 业务能力层
//!
//! 打开课程页面，静音播放视频直到结束；结束后查询学时判断是否已达标

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::JsExecutor;
use crate::models::{Course, LearnOutcome};
use crate::services::ProgressApi;

/// 单门课程学习能力
#[async_trait]
pub trait CourseLearner: Send + Sync {
    /// 学习一门课程
    ///
    /// # 参数
    /// - `course`: 要学习的课程
    /// - `subject_id`: 所属专栏 ID
    ///
    /// # 返回
    /// 学完后达到目标为 `TargetReached`，学完为 `Success`，否则为 `Failure`
    async fn learn_course(&self, course: &Course, subject_id: &str) -> LearnOutcome;
}

/// 视频播放状态
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoState {
    current_time: f64,
    duration: f64,
    ended: bool,
    paused: bool,
}

/// 观看课程视频的学习器
pub struct VideoCourseLearner<P> {
    executor: JsExecutor,
    progress: P,
    course_url_template: String,
    video_selector: String,
    video_wait: Duration,
    poll_interval: Duration,
    max_duration: Duration,
    target_hours: f64,
}

impl<P: ProgressApi> VideoCourseLearner<P> {
    /// 创建学习器
    ///
    /// # 参数
    /// - `executor`: 会话页面的执行器
    /// - `progress`: 课程学完后查询学时用
    /// - `config`: 提供课程地址模板、视频选择器、轮询间隔与目标学时
    pub fn new(executor: JsExecutor, progress: P, config: &Config) -> Self {
        Self {
            executor,
            progress,
            course_url_template: config.course_url_template.clone(),
            video_selector: config.video_selector.clone(),
            video_wait: config.video_wait(),
            poll_interval: config.video_poll_interval(),
            max_duration: config.max_course_duration(),
            target_hours: config.target_hours,
        }
    }

    /// 播放视频直到结束，超过最长观看时间返回 `false`
    async fn watch(&self, course: &Course, subject_id: &str) -> Result<bool> {
        let url = course_url(&self.course_url_template, &course.id, subject_id);
        self.executor.goto(&url).await?;
        self.executor
            .wait_for_selector(&self.video_selector, self.video_wait)
            .await?;

        let script = build_video_script(&self.video_selector)?;
        let started = Instant::now();

        loop {
            let state: Option<VideoState> = self.executor.eval_as(script.as_str()).await?;
            let state = state.ok_or_else(|| AppError::element_not_found(&self.video_selector))?;

            if state.ended {
                info!("✓ 视频播放完毕: {}", course.display_name());
                return Ok(true);
            }
            debug!(
                "播放进度: {:.0}/{:.0} 秒{}",
                state.current_time,
                state.duration,
                if state.paused { " (已暂停，尝试恢复)" } else { "" }
            );

            if started.elapsed() >= self.max_duration {
                return Ok(false);
            }
            sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl<P: ProgressApi> CourseLearner for VideoCourseLearner<P> {
    async fn learn_course(&self, course: &Course, subject_id: &str) -> LearnOutcome {
        info!("📺 开始学习课程: {}", course.display_name());

        let watched = self.watch(course, subject_id).await;
        finish_course(
            watched,
            course,
            &self.progress,
            self.target_hours,
            self.max_duration,
        )
        .await
    }
}

/// 根据观看结果得出课程学习结果
///
/// # 参数
/// - `watched`: 观看结果，`Ok(false)` 表示超过最长观看时间
/// - `course`: 当前课程，仅用于日志
/// - `progress`: 学时查询接口，只在视频播放完毕后调用
/// - `target_hours`: 目标学时
/// - `max_duration`: 单门课程最长观看时间，仅用于日志
///
/// # 返回
/// 播放完毕时由 [`judge_target`] 决定；超时或出错为 `Failure`
pub async fn finish_course<P: ProgressApi + ?Sized>(
    watched: Result<bool>,
    course: &Course,
    progress: &P,
    target_hours: f64,
    max_duration: Duration,
) -> LearnOutcome {
    match watched {
        Ok(true) => judge_target(progress, target_hours).await,
        Ok(false) => {
            warn!(
                "⏰ 课程 {} 超过最长观看时间 {} 分钟，放弃",
                course.display_name(),
                max_duration.as_secs() / 60
            );
            LearnOutcome::Failure
        }
        Err(e) => {
            warn!("❌ 课程 {} 学习失败: {}", course.display_name(), e);
            LearnOutcome::Failure
        }
    }
}

/// 课程学完后查询学时，判断是否已达标
///
/// # 参数
/// - `progress`: 学时查询接口
/// - `target_hours`: 目标学时
///
/// # 返回
/// 已完成学时不低于目标时为 `TargetReached`；学时无法解析或查询失败时
/// 课程本身已学完，仍为 `Success`
pub async fn judge_target<P: ProgressApi + ?Sized>(
    progress: &P,
    target_hours: f64,
) -> LearnOutcome {
    match progress.study_hours().await {
        Ok(progress) => match progress.completed() {
            Some(hours) if hours >= target_hours => {
                info!("🎯 已完成 {} 学时，达到目标", hours);
                LearnOutcome::TargetReached
            }
            Some(hours) => {
                info!("当前已完成 {} 学时", hours);
                LearnOutcome::Success
            }
            None => LearnOutcome::Success,
        },
        Err(e) => {
            warn!("查询学时失败: {}", e);
            LearnOutcome::Success
        }
    }
}

fn course_url(template: &str, course_id: &str, subject_id: &str) -> String {
    template
        .replace("{course_id}", course_id)
        .replace("{subject_id}", subject_id)
}

/// 静音并保持播放，返回当前播放状态；找不到视频时返回 null
fn build_video_script(selector: &str) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const v = document.querySelector({});
            if (!v) return null;
            v.muted = true;
            if (v.paused && !v.ended) {{
                v.play().catch(() => {{}});
            }}
            return {{
                currentTime: v.currentTime || 0,
                duration: isFinite(v.duration) ? v.duration : 0,
                ended: v.ended,
                paused: v.paused
            }};
        }})()
        "#,
        serde_json::to_string(selector)?
    ))
}
