mod common;

use anyhow::anyhow;
use common::*;
use shuake::services::{finish_course, judge_target};
use shuake::LearnOutcome;
use tokio::time::Duration;

const TARGET: f64 = 90.0;
const MAX_DURATION: Duration = Duration::from_secs(120 * 60);

#[tokio::test]
async fn test_target_reached_when_hours_meet_target() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["90"]);

    assert_eq!(judge_target(&api, TARGET).await, LearnOutcome::TargetReached);

    let api = FakeApi::new(journal.clone(), &["95.5"]);
    assert_eq!(judge_target(&api, TARGET).await, LearnOutcome::TargetReached);
}

#[tokio::test]
async fn test_below_target_is_success() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["89.5"]);

    assert_eq!(judge_target(&api, TARGET).await, LearnOutcome::Success);
    assert_eq!(journal.count("hours"), 1);
}

#[tokio::test]
async fn test_unparseable_hours_is_success() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["N/A"]);

    assert_eq!(judge_target(&api, TARGET).await, LearnOutcome::Success);
}

#[tokio::test]
async fn test_hours_query_error_is_success() {
    let journal = Journal::default();
    let mut api = FakeApi::new(journal.clone(), &["95"]);
    api.fail_hours = true;

    assert_eq!(judge_target(&api, TARGET).await, LearnOutcome::Success);
    assert_eq!(journal.count("hours"), 1);
}

#[tokio::test]
async fn test_finished_video_checks_target() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["92"]);

    let outcome = finish_course(Ok(true), &course("c1"), &api, TARGET, MAX_DURATION).await;

    assert_eq!(outcome, LearnOutcome::TargetReached);
    assert_eq!(journal.count("hours"), 1);
}

#[tokio::test]
async fn test_timeout_is_failure_without_hours_query() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["95"]);

    let outcome = finish_course(Ok(false), &course("c1"), &api, TARGET, MAX_DURATION).await;

    assert_eq!(outcome, LearnOutcome::Failure);
    assert_eq!(journal.count("hours"), 0);
}

#[tokio::test]
async fn test_watch_error_is_failure_without_hours_query() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["95"]);

    let outcome = finish_course(
        Err(anyhow!("未找到页面元素: video")),
        &course("c1"),
        &api,
        TARGET,
        MAX_DURATION,
    )
    .await;

    assert_eq!(outcome, LearnOutcome::Failure);
    assert!(journal.entries().is_empty());
}
