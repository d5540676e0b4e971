//! 应用装配 - 编排层
//!
//! 持有唯一的浏览器会话，把同一个页面分发给各个服务

use anyhow::{Context, Result};

use crate::config::Config;
use crate::infrastructure::DriverSession;
use crate::orchestrator::study_runner::{RunOutcome, RunSettings, StudyRunner};
use crate::services::{PortalApiClient, PortalAuthenticator, VideoCourseLearner};
use crate::utils::logging::log_startup;

type PortalRunner = StudyRunner<
    DriverSession,
    PortalAuthenticator,
    PortalApiClient,
    VideoCourseLearner<PortalApiClient>,
>;

/// 应用主结构
pub struct App {
    runner: PortalRunner,
}

impl App {
    /// 初始化应用，浏览器会话创建失败直接返回错误
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let session = DriverSession::open(&config)
            .await
            .context("无法创建浏览器会话")?;

        let executor = session.executor();
        let api = PortalApiClient::new(executor.clone(), &config);
        let auth = PortalAuthenticator::new(executor.clone(), &config);
        let learner = VideoCourseLearner::new(executor, api.clone(), &config);

        let runner = StudyRunner::new(
            session,
            auth,
            api,
            learner,
            RunSettings::from_config(&config),
        );

        Ok(Self { runner })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> RunOutcome {
        self.runner.run().await
    }
}
