//! 学习流程总控 - 编排层
//!
//! ## 职责
//!
//! 1. **登录**：按配置次数重试，失败即结束
//! 2. **进度检查**：开始时、每个专栏之后、全部结束时三处检查目标学时
//! 3. **遍历专栏**：按接口返回顺序逐个交给 `subject_processor`
//! 4. **提前结束**：任何一处达标立即宣布完成并停止，后续专栏/课程不再处理
//! 5. **资源清理**：无论从哪条路径结束都关闭会话一次，关闭失败不影响结果

use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::config::Config;
use crate::infrastructure::SessionHandle;
use crate::models::{LearnOutcome, StudyProgress};
use crate::orchestrator::subject_processor::learn_subject;
use crate::services::{Authenticator, CourseLearner, ProgressApi};

/// 一次运行的最终结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// 已达到目标学时
    TargetReached { completed_hours: Option<f64> },
    /// 所有专栏处理完毕但未达标
    Exhausted { completed_hours: Option<f64> },
    /// 登录失败
    LoginFailed,
    /// 运行中出现未处理的错误
    Aborted,
}

impl RunOutcome {
    /// 是否正常结束（未达标但处理完所有专栏也算正常结束）
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            RunOutcome::TargetReached { .. } | RunOutcome::Exhausted { .. }
        )
    }
}

/// 运行参数
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub username: String,
    pub password: String,
    pub login_retry_count: u32,
    pub course_interval: Duration,
    pub target_hours: f64,
    pub completion_delay: Duration,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            login_retry_count: config.login_retry_count,
            course_interval: config.course_interval(),
            target_hours: config.target_hours,
            completion_delay: config.completion_delay(),
        }
    }
}

/// 学习流程总控
pub struct StudyRunner<S, A, P, L> {
    session: S,
    auth: A,
    api: P,
    learner: L,
    settings: RunSettings,
    span: Span,
}

impl<S, A, P, L> StudyRunner<S, A, P, L>
where
    S: SessionHandle,
    A: Authenticator,
    P: ProgressApi,
    L: CourseLearner,
{
    pub fn new(session: S, auth: A, api: P, learner: L, settings: RunSettings) -> Self {
        let span = info_span!("study_run", user = %settings.username);
        Self {
            session,
            auth,
            api,
            learner,
            settings,
            span,
        }
    }

    /// 运行完整流程，结束前总会清理会话
    pub async fn run(mut self) -> RunOutcome {
        let span = self.span.clone();
        async move {
            let outcome = match self.drive().await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("程序执行出错: {:#}", e);
                    RunOutcome::Aborted
                }
            };
            self.cleanup().await;
            outcome
        }
        .instrument(span)
        .await
    }

    async fn drive(&self) -> Result<RunOutcome> {
        let settings = &self.settings;

        if !self
            .auth
            .login(
                &settings.username,
                &settings.password,
                settings.login_retry_count,
            )
            .await
        {
            error!("登录失败，程序退出");
            return Ok(RunOutcome::LoginFailed);
        }

        // ========== 开始前检查 ==========
        let progress = self.api.study_hours().await?;
        match progress.completed() {
            Some(hours) if self.reached(hours) => return Ok(self.finish(Some(hours)).await),
            Some(_) => {}
            None => warn!("无法解析已完成学时 ({})，继续学习", progress.completed_hours),
        }
        self.log_progress(&progress);

        // ========== 遍历专栏 ==========
        let subjects = self.api.subjects().await?;
        info!("📚 共 {} 个专栏", subjects.len());

        for (index, subject) in subjects.iter().enumerate() {
            log_subject_start(index + 1, subjects.len());

            let result =
                learn_subject(&self.api, &self.learner, subject, settings.course_interval).await;
            match result {
                LearnOutcome::TargetReached => return Ok(self.finish(None).await),
                LearnOutcome::Success => info!("✅ 专栏完成: {}", subject.name),
                LearnOutcome::Failure => warn!("❌ 专栏学习失败: {}", subject.name),
            }

            let progress = self.api.study_hours().await?;
            match progress.completed() {
                Some(hours) if self.reached(hours) => return Ok(self.finish(Some(hours)).await),
                Some(hours) => info!("当前已完成{}学时", hours),
                None => warn!("无法解析已完成学时 ({})，继续学习", progress.completed_hours),
            }
        }

        // ========== 最终检查 ==========
        let progress = self.api.study_hours().await?;
        let outcome = match progress.completed() {
            Some(hours) if self.reached(hours) => self.finish(Some(hours)).await,
            Some(hours) => {
                info!("学习结束，最终完成{}学时", hours);
                RunOutcome::Exhausted {
                    completed_hours: Some(hours),
                }
            }
            None => {
                info!("学习结束，无法获取最终学时");
                RunOutcome::Exhausted {
                    completed_hours: None,
                }
            }
        };
        Ok(outcome)
    }

    fn reached(&self, completed_hours: f64) -> bool {
        completed_hours >= self.settings.target_hours
    }

    /// 宣布完成并停顿片刻，之后不再做任何学习
    async fn finish(&self, completed_hours: Option<f64>) -> RunOutcome {
        let target = self.settings.target_hours;
        match completed_hours {
            Some(hours) => info!("🎉 已完成{}学时，达到目标{}学时", hours, target),
            None => info!("🎉 已完成目标{}学时", target),
        }
        info!("🎉🎉🎉 恭喜！已完成{}学时目标 🎉🎉🎉", target);
        info!(
            "程序将在{}秒后自动退出...",
            self.settings.completion_delay.as_secs()
        );
        sleep(self.settings.completion_delay).await;

        RunOutcome::TargetReached { completed_hours }
    }

    /// 关闭会话，失败时忽略
    async fn cleanup(&mut self) {
        if let Err(e) = self.session.close().await {
            debug!("关闭浏览器失败（已忽略）: {:#}", e);
        }
    }

    fn log_progress(&self, progress: &StudyProgress) {
        info!(
            "当前进度: 已完成{}学时 / 共{}学时 ({}%) (目标{}学时)",
            progress.completed_hours,
            progress.total_hours,
            progress.percentage,
            self.settings.target_hours
        );
    }
}

fn log_subject_start(index: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📖 第 {}/{} 个专栏", index, total);
}
