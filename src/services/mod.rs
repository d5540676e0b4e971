//! 业务能力层
//!
//! 每个服务只描述"我能做什么"：登录、查询学时与课程、学习一门课程。
//! 编排层只依赖这里的 trait，便于替换实现。

pub mod auth;
pub mod course_learner;
pub mod progress_api;

pub use auth::{Authenticator, PortalAuthenticator};
pub use course_learner::{finish_course, judge_target, CourseLearner, VideoCourseLearner};
pub use progress_api::{PortalApiClient, ProgressApi};
