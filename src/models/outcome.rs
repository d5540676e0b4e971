/// 学习结果
///
/// `TargetReached` 表示总学时已达标，调用方应立即停止所有后续学习，
/// 与普通的成功/失败区分开。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    /// 学习成功
    Success,
    /// 已达到目标学时
    TargetReached,
    /// 学习失败
    Failure,
}

impl LearnOutcome {
    /// 由成功与否构造普通结果
    pub fn from_success(success: bool) -> Self {
        if success {
            LearnOutcome::Success
        } else {
            LearnOutcome::Failure
        }
    }
}
