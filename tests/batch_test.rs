mod support;

use std::collections::HashSet;

use mnp_lookup::models::{collect_numbers, normalize, OperatorLabel};
use mnp_lookup::services::CollectingSink;
use mnp_lookup::{AppError, BatchEvent, Config, LookupFlow, Orchestrator};
use support::{Plan, ScriptedLauncher, AIRTEL_LOGO};
use tokio_test::{assert_err, assert_ok};

fn numbers(raw: &[&str]) -> Vec<mnp_lookup::CanonicalNumber> {
    raw.iter().map(|r| normalize(r)).collect()
}

fn orchestrator(launcher: ScriptedLauncher) -> Orchestrator<ScriptedLauncher> {
    Orchestrator::new(LookupFlow::new(launcher, &Config::default()))
}

#[tokio::test]
async fn every_number_yields_one_result_then_a_single_done() {
    let orchestrator = orchestrator(ScriptedLauncher::new());
    let batch = numbers(&["9876543210", "8765432109", "7654321098", "6543210987"]);

    let mut sink = CollectingSink::default();
    let summary = orchestrator
        .start(batch.clone())
        .unwrap()
        .report_to(&mut sink)
        .await
        .unwrap();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.resolved, 4);
    assert_eq!(sink.outcomes.len(), 4);

    let positions: HashSet<usize> = sink.outcomes.iter().map(|o| o.position).collect();
    assert_eq!(positions, (1..=4).collect());

    assert_eq!(sink.done.len(), 1);
    assert!(matches!(sink.events.last(), Some(BatchEvent::Done(_))));

    let expected_current: Vec<String> = batch.iter().map(|n| n.to_string()).collect();
    assert_eq!(sink.current, expected_current);
}

#[tokio::test]
async fn events_for_one_number_precede_the_next() {
    let orchestrator = orchestrator(ScriptedLauncher::new());
    let batch = numbers(&["9876543210", "8765432109", "7654321098"]);

    let mut sink = CollectingSink::default();
    orchestrator
        .start(batch)
        .unwrap()
        .report_to(&mut sink)
        .await
        .unwrap();

    // 每个号码恰好是 Current → Result → Progress
    let per_number: Vec<&[BatchEvent]> = sink.events[..9].chunks(3).collect();
    for (i, chunk) in per_number.iter().enumerate() {
        assert!(matches!(chunk[0], BatchEvent::Current(_)));
        assert!(matches!(&chunk[1], BatchEvent::Result(o) if o.position == i + 1));
        assert!(matches!(chunk[2], BatchEvent::Progress(_)));
    }
    assert_eq!(sink.events.len(), 10);
}

#[tokio::test]
async fn progress_is_monotone_and_ends_at_hundred() {
    let orchestrator = orchestrator(ScriptedLauncher::new());
    let batch = numbers(&["9876543210", "8765432109", "7654321098"]);

    let mut sink = CollectingSink::default();
    orchestrator
        .start(batch)
        .unwrap()
        .report_to(&mut sink)
        .await
        .unwrap();

    assert_eq!(sink.progress, vec![33, 66, 100]);
    assert!(sink.progress.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn one_failure_does_not_stop_the_batch() {
    let launcher = ScriptedLauncher::new()
        .fail_launch(2)
        .with_plan("+917654321098", Plan::Logo(AIRTEL_LOGO.to_string()))
        .with_plan("+916543210987", Plan::Logo("/logo/ZZ/IN.png".to_string()));
    let orchestrator = orchestrator(launcher);
    let batch = numbers(&["9876543210", "8765432109", "7654321098", "6543210987"]);

    let mut sink = CollectingSink::default();
    let summary = orchestrator
        .start(batch)
        .unwrap()
        .report_to(&mut sink)
        .await
        .unwrap();

    let labels: Vec<OperatorLabel> = sink.outcomes.iter().map(|o| o.operator).collect();
    assert_eq!(
        labels,
        vec![
            OperatorLabel::Resolved("Reliance Jio"),
            OperatorLabel::Error,
            OperatorLabel::Resolved("Airtel"),
            OperatorLabel::NotFound,
        ]
    );
    assert_eq!(sink.outcomes[1].display_number, "8765432109");
    assert_eq!(sink.outcomes[1].logo_url, "");
    assert_eq!((summary.resolved, summary.not_found, summary.failed), (2, 1, 1));
}

#[tokio::test]
async fn at_most_one_session_is_alive() {
    let launcher = ScriptedLauncher::new().with_plan("+918765432109", Plan::NoLogo);
    let stats = launcher.stats();
    let orchestrator = orchestrator(launcher);

    orchestrator
        .start(numbers(&["9876543210", "8765432109", "7654321098"]))
        .unwrap()
        .join()
        .await
        .unwrap();

    let stats = stats.lock().unwrap();
    assert_eq!(stats.max_active, 1);
    assert_eq!(stats.launched, 3);
    assert_eq!(stats.closed, 3);
}

#[tokio::test]
async fn second_start_is_refused_while_running() {
    let orchestrator = orchestrator(ScriptedLauncher::new());
    assert!(!orchestrator.is_busy());

    let handle = orchestrator.start(numbers(&["9876543210"])).unwrap();
    assert!(orchestrator.is_busy());
    let err = assert_err!(orchestrator.start(numbers(&["8765432109"])));
    assert!(matches!(err, AppError::BatchInProgress));

    handle.join().await.unwrap();
    assert!(!orchestrator.is_busy());
    assert_ok!(orchestrator.start(numbers(&["8765432109"])));
}

#[tokio::test]
async fn empty_batch_only_completes() {
    let orchestrator = orchestrator(ScriptedLauncher::new());

    let mut sink = CollectingSink::default();
    let summary = orchestrator
        .start(Vec::new())
        .unwrap()
        .report_to(&mut sink)
        .await
        .unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(sink.events.len(), 1);
    assert!(matches!(sink.events[0], BatchEvent::Done(_)));
}

#[tokio::test]
async fn dropped_receiver_does_not_cancel_batch() {
    let launcher = ScriptedLauncher::new();
    let stats = launcher.stats();
    let orchestrator = orchestrator(launcher);

    let summary = orchestrator
        .start(numbers(&["9876543210", "8765432109"]))
        .unwrap()
        .join()
        .await
        .unwrap();

    assert_eq!(summary.completed(), 2);
    assert_eq!(stats.lock().unwrap().closed, 2);
}

#[tokio::test]
async fn duplicate_forms_become_a_batch_of_one() {
    let launcher = ScriptedLauncher::new();
    let stats = launcher.stats();
    let orchestrator = orchestrator(launcher);

    let batch = collect_numbers("9876543210\n+919876543210\n919876543210");
    let summary = orchestrator.start(batch).unwrap().join().await.unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(stats.lock().unwrap().typed, vec!["+919876543210"]);
}
