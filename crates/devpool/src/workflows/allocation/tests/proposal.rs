use std::collections::HashSet;

use super::common::*;
use crate::workflows::allocation::domain::{DeveloperId, RequirementId, ScheduleError};
use crate::workflows::allocation::pool::PoolBrowser;
use crate::workflows::allocation::proposal::{
    BulkRateEditor, ProposalOutcome, RateEditError,
};
use crate::workflows::allocation::AllocationError;

fn select(browser: &mut PoolBrowser, values: &[&str]) {
    for id in ids(values) {
        browser.toggle_selection(&id).expect("known developer");
    }
}

#[test]
fn editor_seeds_base_rates_in_pool_order() {
    let mut browser = browser();
    select(&mut browser, &["dev-b", "dev-a"]);

    let editor = browser.open_rate_editor(schedule()).expect("editor opens");

    let seeded: Vec<(String, f64)> = editor
        .entries()
        .iter()
        .map(|entry| (entry.developer_id.0.clone(), entry.hourly_rate))
        .collect();
    assert_eq!(
        seeded,
        vec![("dev-a".to_string(), 80.0), ("dev-b".to_string(), 150.0)]
    );
}

#[test]
fn editor_requires_a_selection() {
    let browser = browser();
    match browser.open_rate_editor(schedule()) {
        Err(AllocationError::EmptySelection) => {}
        other => panic!("expected empty selection, got {other:?}"),
    }
}

#[test]
fn preview_derives_monthly_rates() {
    let mut browser = browser();
    select(&mut browser, &["dev-a", "dev-c"]);
    let mut editor = browser.open_rate_editor(schedule()).expect("editor opens");

    editor
        .set_rate(&DeveloperId::from("dev-c"), 50.0)
        .expect("rate accepted");
    let preview = editor.preview();

    assert_eq!(preview[0].monthly_rate, 14080.0);
    assert_eq!(preview[1].hourly_rate, 50.0);
    assert_eq!(preview[1].monthly_rate, 8800.0);
    assert!(preview.iter().all(|proposal| proposal.currency == "USD"));

    editor
        .reset_rate(&DeveloperId::from("dev-c"))
        .expect("rate reset");
    assert_eq!(editor.rate_for(&DeveloperId::from("dev-c")), Some(60.0));
}

#[test]
fn editor_rejects_bad_rates_and_strangers() {
    let dev = developer("dev-a", &["React"], 7, 80.0);
    let mut editor = BulkRateEditor::new(
        RequirementId("req-frontend".to_string()),
        schedule(),
        [&dev],
    );

    assert!(matches!(
        editor.set_rate(&DeveloperId::from("dev-a"), -1.0),
        Err(RateEditError::InvalidRate { .. })
    ));
    assert!(matches!(
        editor.set_rate(&DeveloperId::from("dev-a"), f64::INFINITY),
        Err(RateEditError::InvalidRate { .. })
    ));
    assert_eq!(
        editor.set_rate(&DeveloperId::from("dev-z"), 10.0),
        Err(RateEditError::UnknownDeveloper(DeveloperId::from("dev-z")))
    );
}

#[tokio::test]
async fn confirm_proposes_each_selected_developer_in_pool_order() {
    let proposer = RecordingProposer::default();
    let mut browser = browser();
    select(&mut browser, &["dev-b", "dev-c", "dev-a"]);
    let mut editor = browser.open_rate_editor(schedule()).expect("editor opens");
    editor
        .set_rate(&DeveloperId::from("dev-b"), 50.0)
        .expect("rate accepted");

    let report = browser
        .confirm_bulk_proposal(editor, &proposer)
        .await
        .expect("bulk proposal runs");

    assert_eq!(proposer.proposed_ids(), ids(&["dev-a", "dev-c", "dev-b"]));
    assert!(report.all_succeeded());
    assert_eq!(report.succeeded(), 3);

    let calls = proposer.calls();
    assert!(calls
        .iter()
        .all(|(requirement_id, _)| requirement_id.0 == "req-frontend"));
    let (_, ben) = &calls[2];
    assert_eq!(ben.hourly_rate, 50.0);
    assert_eq!(ben.monthly_rate, 8800.0);

    assert!(browser.selected_ids().is_empty());
    assert!(browser.is_finished());
}

#[tokio::test]
async fn partial_failure_keeps_selection_and_attempts_everyone() {
    let proposer = RecordingProposer::failing(&["dev-c"]);
    let mut browser = browser();
    select(&mut browser, &["dev-a", "dev-b", "dev-c"]);
    let editor = browser.open_rate_editor(schedule()).expect("editor opens");

    let report = browser
        .confirm_bulk_proposal(editor, &proposer)
        .await
        .expect("bulk proposal runs");

    assert_eq!(proposer.proposed_ids().len(), 3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed_ids(), ids(&["dev-c"]));
    match &report.results[1].outcome {
        ProposalOutcome::Failed { error } => assert!(error.contains("already engaged")),
        other => panic!("expected failure, got {other:?}"),
    }

    assert_eq!(browser.selected_ids().len(), 3);
    assert!(!browser.is_finished());
}

#[tokio::test]
async fn invalid_schedule_stops_before_any_proposal() {
    let proposer = RecordingProposer::default();
    let mut browser = browser();
    select(&mut browser, &["dev-a"]);
    let mut schedule = schedule();
    schedule.hours_per_day = 0;
    let editor = browser.open_rate_editor(schedule).expect("editor opens");

    match browser.confirm_bulk_proposal(editor, &proposer).await {
        Err(AllocationError::Schedule(ScheduleError::HoursPerDay(0))) => {}
        other => panic!("expected schedule error, got {other:?}"),
    }
    assert!(proposer.calls().is_empty());
    assert_eq!(browser.selected_ids().len(), 1);
}

#[tokio::test]
async fn editor_for_another_requirement_is_rejected() {
    let proposer = RecordingProposer::default();
    let mut browser = browser();
    select(&mut browser, &["dev-a"]);
    let dev = developer("dev-a", &["React"], 7, 80.0);
    let editor = BulkRateEditor::new(RequirementId("req-other".to_string()), schedule(), [&dev]);

    assert!(matches!(
        browser.confirm_bulk_proposal(editor, &proposer).await,
        Err(AllocationError::RequirementMismatch { .. })
    ));
    assert!(proposer.calls().is_empty());
}

#[tokio::test]
async fn queue_submits_one_proposal_at_a_time() {
    let probe = ConcurrencyProbe::default();
    let mut browser = PoolBrowser::new(
        requirement(),
        HashSet::new(),
        bulk_candidates(6),
        settings(2),
    );
    browser.toggle_select_all();
    let editor = browser.open_rate_editor(schedule()).expect("editor opens");

    let mut queue = editor.into_queue(&probe).expect("valid schedule");
    assert_eq!(queue.remaining(), 6);

    let first = queue.next().await.expect("first result");
    assert_eq!(first.developer_id.0, "dev-000");
    assert!(first.is_ok());
    assert_eq!(queue.remaining(), 5);
    assert_eq!(queue.completed().len(), 1);

    let report = queue.run().await;

    assert_eq!(report.results.len(), 6);
    assert_eq!(probe.peak(), 1);
    assert_eq!(
        probe.order(),
        ids(&["dev-000", "dev-001", "dev-002", "dev-003", "dev-004", "dev-005"])
    );
}
