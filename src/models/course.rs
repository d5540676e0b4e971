use serde::Deserialize;

use super::subject::deserialize_id;

/// 课程
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Course {
    #[serde(alias = "courseId", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "courseName", alias = "title")]
    pub name: String,
    /// 是否还需要学习
    #[serde(default, alias = "needStudy")]
    pub need_study: bool,
    /// 是否带考试（带考试的课程不自动学习）
    #[serde(default, alias = "hasTest")]
    pub has_test: bool,
}

impl Course {
    pub fn new(id: impl Into<String>, need_study: bool, has_test: bool) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            need_study,
            has_test,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 需要学习且没有考试的课程才会被自动学习
    pub fn is_eligible(&self) -> bool {
        self.need_study && !self.has_test
    }

    /// 日志中显示的名称
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
