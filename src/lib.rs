//! # Shuake
//!
//! 自动完成学习平台学时要求：登录门户，查询学时，遍历专栏与课程并播放课程视频，
//! 直到已完成学时达到目标（默认 90 学时）或没有可学的课程。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动新浏览器或连接已打开的浏览器
//! - `DriverSession` - 唯一的 Browser 持有者，启动时创建一次，结束时关闭一次
//! - `JsExecutor` - 页面能力：导航、执行 JS、等待元素、页内请求
//!
//! ### ② 业务能力层（Services）
//! - `Authenticator` - 登录（有限次重试）
//! - `ProgressApi` - 查询学时、专栏、课程
//! - `CourseLearner` - 学习单门课程，返回 `LearnOutcome`
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/study_runner` - 整体流程与达标判断
//! - `orchestrator/subject_processor` - 单个专栏的课程循环
//! - `orchestrator/app` - 装配以上组件
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::AppError;
pub use infrastructure::{DriverSession, JsExecutor, SessionHandle};
pub use models::{Course, HoursValue, LearnOutcome, StudyProgress, Subject};
pub use orchestrator::{learn_subject, App, RunOutcome, RunSettings, StudyRunner};
pub use services::{Authenticator, CourseLearner, ProgressApi};
