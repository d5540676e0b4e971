//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用装配
//! - 创建浏览器会话（唯一的 Browser 持有者）
//! - 基于同一页面装配登录、进度查询、课程学习三个服务
//!
//! ### `study_runner` - 整体学习流程
//! - 登录 → 查询学时 → 遍历专栏 → 复查学时
//! - 在开始、每个专栏之后、结束时三处检查是否达到目标学时
//! - 无论从哪条路径结束，都只清理一次会话
//!
//! ### `subject_processor` - 单个专栏
//! - 过滤出需要学习的课程，逐门学习
//! - 课程之间按配置间隔等待
//!
//! ## 层次关系
//!
//! ```text
//! study_runner (处理 Vec<Subject>)
//!     ↓
//! subject_processor (处理 Vec<Course>)
//!     ↓
//! services (能力层：auth / progress_api / course_learner)
//!     ↓
//! infrastructure (基础设施：DriverSession / JsExecutor)
//! ```

pub mod app;
pub mod study_runner;
pub mod subject_processor;

pub use app::App;
pub use study_runner::{RunOutcome, RunSettings, StudyRunner};
pub use subject_processor::{learn_subject, CourseStats};
