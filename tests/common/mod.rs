//! 测试用的内存实现，记录每一次调用

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shuake::{
    Authenticator, Course, CourseLearner, LearnOutcome, ProgressApi, RunSettings, SessionHandle,
    StudyProgress, StudyRunner, Subject,
};

pub const COURSE_INTERVAL: Duration = Duration::from_secs(10);
pub const COMPLETION_DELAY: Duration = Duration::from_secs(3);

/// 调用记录
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// 课程学习记录，形如 "A/a1"
    pub fn learned(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| e.strip_prefix("learn:").map(str::to_string))
            .collect()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| e.as_str() == entry).count()
    }
}

pub struct FakeSession {
    pub journal: Journal,
    pub fail: bool,
}

#[async_trait]
impl SessionHandle for FakeSession {
    async fn close(&mut self) -> Result<()> {
        self.journal.push("close");
        if self.fail {
            Err(anyhow!("浏览器已退出"))
        } else {
            Ok(())
        }
    }
}

pub struct FakeAuth {
    pub journal: Journal,
    pub succeed: bool,
}

#[async_trait]
impl Authenticator for FakeAuth {
    async fn login(&self, _username: &str, _password: &str, max_retries: u32) -> bool {
        self.journal.push(format!("login:{}", max_retries));
        self.succeed
    }
}

/// 按顺序返回预设学时，用完后重复最后一个
pub struct FakeApi {
    pub journal: Journal,
    hours: Mutex<VecDeque<String>>,
    last_hours: Mutex<String>,
    subjects: Vec<Subject>,
    courses: HashMap<String, Vec<Course>>,
    pub fail_subjects: bool,
    pub fail_hours: bool,
}

impl FakeApi {
    pub fn new(journal: Journal, hours: &[&str]) -> Self {
        Self {
            journal,
            hours: Mutex::new(hours.iter().map(|h| h.to_string()).collect()),
            last_hours: Mutex::new(String::new()),
            subjects: Vec::new(),
            courses: HashMap::new(),
            fail_subjects: false,
            fail_hours: false,
        }
    }

    pub fn with_subject(mut self, id: &str, courses: Vec<Course>) -> Self {
        self.subjects.push(Subject::new(id, format!("专栏{}", id)));
        self.courses.insert(id.to_string(), courses);
        self
    }
}

#[async_trait]
impl ProgressApi for FakeApi {
    async fn study_hours(&self) -> Result<StudyProgress> {
        self.journal.push("hours");
        if self.fail_hours {
            return Err(anyhow!("学时接口返回错误"));
        }
        let mut last = self.last_hours.lock().unwrap();
        if let Some(next) = self.hours.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(StudyProgress::new("120", last.as_str(), ""))
    }

    async fn subjects(&self) -> Result<Vec<Subject>> {
        self.journal.push("subjects");
        if self.fail_subjects {
            return Err(anyhow!("接口超时"));
        }
        Ok(self.subjects.clone())
    }

    async fn courses(&self, subject_id: &str) -> Result<Vec<Course>> {
        self.journal.push(format!("courses:{}", subject_id));
        self.courses
            .get(subject_id)
            .cloned()
            .ok_or_else(|| anyhow!("专栏不存在: {}", subject_id))
    }
}

/// 默认每门课程都学习成功，可按课程 ID 指定结果
pub struct FakeLearner {
    pub journal: Journal,
    outcomes: HashMap<String, LearnOutcome>,
}

impl FakeLearner {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            outcomes: HashMap::new(),
        }
    }

    pub fn with_outcome(mut self, course_id: &str, outcome: LearnOutcome) -> Self {
        self.outcomes.insert(course_id.to_string(), outcome);
        self
    }
}

#[async_trait]
impl CourseLearner for FakeLearner {
    async fn learn_course(&self, course: &Course, subject_id: &str) -> LearnOutcome {
        self.journal
            .push(format!("learn:{}/{}", subject_id, course.id));
        self.outcomes
            .get(&course.id)
            .copied()
            .unwrap_or(LearnOutcome::Success)
    }
}

/// 需要学习的课程
pub fn course(id: &str) -> Course {
    Course::new(id, true, false)
}

pub fn settings() -> RunSettings {
    RunSettings {
        username: "tester".to_string(),
        password: "secret".to_string(),
        login_retry_count: 3,
        course_interval: COURSE_INTERVAL,
        target_hours: 90.0,
        completion_delay: COMPLETION_DELAY,
    }
}

pub fn runner(
    journal: &Journal,
    login_ok: bool,
    api: FakeApi,
    learner: FakeLearner,
) -> StudyRunner<FakeSession, FakeAuth, FakeApi, FakeLearner> {
    StudyRunner::new(
        FakeSession {
            journal: journal.clone(),
            fail: false,
        },
        FakeAuth {
            journal: journal.clone(),
            succeed: login_ok,
        },
        api,
        learner,
        settings(),
    )
}
