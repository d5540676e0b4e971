mod common;

use common::*;
use shuake::{Course, LearnOutcome, RunOutcome, StudyRunner};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_initial_hours_at_target_stops_before_subjects() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["90"]).with_subject("A", vec![course("a1")]);
    let learner = FakeLearner::new(journal.clone());

    let started = Instant::now();
    let outcome = runner(&journal, true, api, learner).run().await;

    assert_eq!(
        outcome,
        RunOutcome::TargetReached {
            completed_hours: Some(90.0)
        }
    );
    assert!(outcome.succeeded());
    assert_eq!(journal.entries(), vec!["login:3", "hours", "close"]);
    // 宣布完成后会停顿
    assert!(started.elapsed() >= COMPLETION_DELAY);
}

#[tokio::test(start_paused = true)]
async fn test_login_failure_skips_all_work() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10"]).with_subject("A", vec![course("a1")]);
    let learner = FakeLearner::new(journal.clone());

    let outcome = runner(&journal, false, api, learner).run().await;

    assert_eq!(outcome, RunOutcome::LoginFailed);
    assert!(!outcome.succeeded());
    assert_eq!(journal.entries(), vec!["login:3", "close"]);
}

#[tokio::test(start_paused = true)]
async fn test_target_reached_in_course_unwinds_both_loops() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10"])
        .with_subject("A", vec![course("a1"), course("a2"), course("a3")])
        .with_subject("B", vec![course("b1"), course("b2")]);
    let learner =
        FakeLearner::new(journal.clone()).with_outcome("a2", LearnOutcome::TargetReached);

    let outcome = runner(&journal, true, api, learner).run().await;

    assert_eq!(
        outcome,
        RunOutcome::TargetReached {
            completed_hours: None
        }
    );
    assert_eq!(journal.learned(), vec!["A/a1", "A/a2"]);
    assert_eq!(journal.count("courses:B"), 0);
    assert_eq!(journal.count("close"), 1);
    assert_eq!(journal.entries().last().map(String::as_str), Some("close"));
}

#[tokio::test(start_paused = true)]
async fn test_repoll_after_subject_stops_remaining_subjects() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10", "95"])
        .with_subject("A", vec![course("a1")])
        .with_subject("B", vec![course("b1")]);
    let learner = FakeLearner::new(journal.clone());

    let outcome = runner(&journal, true, api, learner).run().await;

    assert_eq!(
        outcome,
        RunOutcome::TargetReached {
            completed_hours: Some(95.0)
        }
    );
    assert_eq!(journal.learned(), vec!["A/a1"]);
    assert_eq!(journal.count("courses:B"), 0);
    assert_eq!(journal.count("close"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_final_poll_reaching_target() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10", "50", "90.5"])
        .with_subject("A", vec![course("a1")]);
    let learner = FakeLearner::new(journal.clone());

    let outcome = runner(&journal, true, api, learner).run().await;

    assert_eq!(
        outcome,
        RunOutcome::TargetReached {
            completed_hours: Some(90.5)
        }
    );
    assert_eq!(journal.count("hours"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unparsable_hours_never_stop_the_run() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["N/A"])
        .with_subject("A", vec![course("a1")])
        .with_subject("B", vec![course("b1")]);
    let learner = FakeLearner::new(journal.clone());

    let outcome = runner(&journal, true, api, learner).run().await;

    assert_eq!(
        outcome,
        RunOutcome::Exhausted {
            completed_hours: None
        }
    );
    assert!(outcome.succeeded());
    assert_eq!(journal.learned(), vec!["A/a1", "B/b1"]);
    // 开始 1 次 + 每个专栏后 1 次 + 结束 1 次
    assert_eq!(journal.count("hours"), 4);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_subjects_report_final_hours() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10", "12", "14"])
        .with_subject("A", vec![course("a1")]);
    let learner = FakeLearner::new(journal.clone());

    let outcome = runner(&journal, true, api, learner).run().await;

    assert_eq!(
        outcome,
        RunOutcome::Exhausted {
            completed_hours: Some(14.0)
        }
    );
    assert!(outcome.succeeded());
}

#[tokio::test(start_paused = true)]
async fn test_subject_failure_does_not_abort_run() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10"])
        .with_subject("A", vec![course("a1")])
        .with_subject("B", vec![course("b1")]);
    let learner = FakeLearner::new(journal.clone()).with_outcome("a1", LearnOutcome::Failure);

    let outcome = runner(&journal, true, api, learner).run().await;

    assert!(matches!(outcome, RunOutcome::Exhausted { .. }));
    assert_eq!(journal.learned(), vec!["A/a1", "B/b1"]);
}

#[tokio::test(start_paused = true)]
async fn test_ineligible_courses_are_never_learned() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10"]).with_subject(
        "A",
        vec![
            Course::new("done", false, false),
            Course::new("exam", true, true),
            course("video"),
        ],
    );
    let learner = FakeLearner::new(journal.clone());

    runner(&journal, true, api, learner).run().await;

    assert_eq!(journal.learned(), vec!["A/video"]);
}

#[tokio::test(start_paused = true)]
async fn test_api_error_aborts_and_still_cleans_up() {
    let journal = Journal::default();
    let mut api = FakeApi::new(journal.clone(), &["10"]).with_subject("A", vec![course("a1")]);
    api.fail_subjects = true;
    let learner = FakeLearner::new(journal.clone());

    let outcome = runner(&journal, true, api, learner).run().await;

    assert_eq!(outcome, RunOutcome::Aborted);
    assert!(!outcome.succeeded());
    assert!(journal.learned().is_empty());
    assert_eq!(journal.count("close"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_failure_does_not_change_outcome() {
    let journal = Journal::default();
    let api = FakeApi::new(journal.clone(), &["10"]).with_subject("A", vec![course("a1")]);
    let learner = FakeLearner::new(journal.clone());

    let runner = StudyRunner::new(
        FakeSession {
            journal: journal.clone(),
            fail: true,
        },
        FakeAuth {
            journal: journal.clone(),
            succeed: true,
        },
        api,
        learner,
        settings(),
    );
    let outcome = runner.run().await;

    assert_eq!(
        outcome,
        RunOutcome::Exhausted {
            completed_hours: Some(10.0)
        }
    );
    assert_eq!(journal.count("close"), 1);
}
