//! 单个专栏处理器 - 编排层
//!
//! 遍历专栏下需要学习的课程，逐门交给课程学习器

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::models::{Course, LearnOutcome, Subject};
use crate::services::{CourseLearner, ProgressApi};

/// 课程学习统计
#[derive(Debug, Default)]
pub struct CourseStats {
    pub succeeded: usize,
    pub failed: usize,
}

/// 学习单个专栏
///
/// # 返回
/// - `TargetReached`：某门课程学完后总学时已达标，剩余课程不再处理
/// - `Success`：至少一门课程学习成功，或没有需要学习的课程
/// - `Failure`：所有课程都失败，或获取课程列表出错
pub async fn learn_subject<P, L>(
    api: &P,
    learner: &L,
    subject: &Subject,
    course_interval: Duration,
) -> LearnOutcome
where
    P: ProgressApi + ?Sized,
    L: CourseLearner + ?Sized,
{
    info!("处理专栏: {}", subject.name);

    let courses = match api.courses(&subject.id).await {
        Ok(courses) => courses,
        Err(e) => {
            error!("学习专栏时出错: {:#}", e);
            return LearnOutcome::Failure;
        }
    };

    let to_study: Vec<&Course> = courses.iter().filter(|c| c.is_eligible()).collect();
    debug!(
        "专栏 {} 共 {} 门课程，跳过 {} 门（已学完或需考试）",
        subject.name,
        courses.len(),
        courses.len() - to_study.len()
    );

    if to_study.is_empty() {
        info!("没有需要学习的课程");
        return LearnOutcome::Success;
    }

    let total = to_study.len();
    info!("找到 {} 门需要学习的课程", total);

    let mut stats = CourseStats::default();

    for (index, course) in to_study.iter().enumerate() {
        match learner.learn_course(course, &subject.id).await {
            LearnOutcome::TargetReached => return LearnOutcome::TargetReached,
            LearnOutcome::Success => {
                stats.succeeded += 1;
                info!("进度: {}/{}", stats.succeeded, total);

                if index + 1 < total {
                    info!(
                        "等待{}秒后开始下一门课程...",
                        course_interval.as_secs()
                    );
                    sleep(course_interval).await;
                }
            }
            LearnOutcome::Failure => {
                stats.failed += 1;
                warn!("课程学习失败，继续下一门: {}", course.display_name());
            }
        }
    }

    log_subject_complete(subject, &stats, total);

    LearnOutcome::from_success(stats.succeeded > 0)
}

fn log_subject_complete(subject: &Subject, stats: &CourseStats, total: usize) {
    info!(
        "本专栏完成: {}/{} (失败 {}) - {}",
        stats.succeeded, total, stats.failed, subject.name
    );
}
