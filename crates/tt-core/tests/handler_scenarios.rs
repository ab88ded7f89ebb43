//! Scenario tests for the session store, aggregator and dashboard together.

use chrono::{DateTime, TimeZone, Utc};
use tt_common::{
    ChangeId, Confidence, Error, Priority, TicketChange, TicketField, TicketId, TicketStatus,
    ValidationStatus,
};
use tt_core::dashboard::{Dashboard, DashboardTab, TabView};
use tt_core::mock::{MockDataset, AI_ACTOR};
use tt_core::stats::compute_stats;
use tt_core::store::TriageStore;
use tt_core::tickets::open_queue;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap()
}

fn session() -> TriageStore {
    TriageStore::from_dataset(MockDataset::generate(20, Some(2026), now())).with_fixed_clock(now())
}

fn priority_change(seq: u64, applied: &str, predicted: &str) -> TicketChange {
    TicketChange {
        id: ChangeId::sequence(seq),
        ticket_id: TicketId::from_sequence(seq),
        field: TicketField::Priority,
        previous_value: "Medium".to_string(),
        new_value: applied.to_string(),
        predicted_value: predicted.to_string(),
        confidence: Confidence::new(0.5),
        timestamp: now(),
        applied_by: AI_ACTOR.to_string(),
    }
}

#[test]
fn priority_accuracy_is_half() {
    let changes = vec![
        priority_change(1, "High", "High"),
        priority_change(2, "Low", "Medium"),
    ];
    let stats = compute_stats(&[], &changes, now());
    assert_eq!(stats.field_accuracy.get(TicketField::Priority), Some(&0.5));
}

#[test]
fn reassign_first_ticket_to_database_team() {
    let mut store = session();
    let id = TicketId::from_sequence(0);
    let before = store.ticket(&id).expect("INC100000 exists").clone();
    let changes_before = store.changes().len();

    let after = store.reassign(&id, "Database Team").expect("reassign").clone();

    assert_eq!(after.assignment_group, "Database Team");
    assert_eq!(after.changes.len(), before.changes.len() + 1);
    assert_eq!(store.changes().len(), changes_before + 1);

    let change = after.changes.last().expect("appended change");
    assert_eq!(change.field, TicketField::AssignmentGroup);
    assert_eq!(change.previous_value, before.assignment_group);
    assert_eq!(change.new_value, "Database Team");
    assert_eq!(change.predicted_value, "Database Team");
    assert_eq!(store.tickets()[0].id, id);
}

#[test]
fn absent_validation_status_is_not_pending() {
    let store = session();
    let stats = store.stats();
    let expected = store
        .tickets()
        .iter()
        .filter(|t| t.validation_status == Some(ValidationStatus::Pending))
        .count();
    assert_eq!(stats.pending_validation, expected);
    assert!(store
        .tickets()
        .iter()
        .filter(|t| t.validation_status.is_none())
        .all(|t| !t.is_pending_validation()));
}

#[test]
fn handlers_on_unknown_ticket_error_without_mutation() {
    let mut store = session();
    let snapshot = store.tickets().to_vec();
    let missing = TicketId::from_sequence(500);

    let results = [
        store.validate(&missing, true).map(|_| ()),
        store.reassign(&missing, "Server Team").map(|_| ()),
        store.set_priority(&missing, Priority::Low).map(|_| ()),
        store.update_description(&missing, "x").map(|_| ()),
        store.reassign_owner(&missing, "Sam Williams").map(|_| ()),
    ];

    for result in results {
        assert!(matches!(result, Err(Error::TicketNotFound { .. })));
    }
    assert_eq!(store.tickets(), snapshot.as_slice());
    assert_eq!(store.changes().len(), 10);
}

#[test]
fn edits_flow_into_dashboard() {
    let mut store = session();
    store
        .set_priority(&TicketId::from_sequence(12), Priority::Critical)
        .expect("set priority");

    let dashboard = Dashboard::build(&store, now());
    match dashboard.view(DashboardTab::Summary) {
        TabView::Summary(summary) => {
            assert_eq!(summary.tickets_with_suggestions, 11);
            assert_eq!(summary.matched_suggestions, 10);
            assert_eq!(summary.automation_rate, 55);
            assert_eq!(summary.accuracy_rate, 91);
        }
        other => panic!("expected summary view, got {:?}", other.tab()),
    }

    match dashboard.view(DashboardTab::Drilldown) {
        TabView::Drilldown(view) => {
            assert_eq!(view.rows.len(), 10);
            assert_eq!(view.total_tickets, 20);
        }
        other => panic!("expected drilldown view, got {:?}", other.tab()),
    }
}

#[test]
fn review_queue_tracks_status() {
    let store = session();
    for ticket in open_queue(store.tickets()) {
        assert!(matches!(
            ticket.status,
            TicketStatus::Open | TicketStatus::InProgress
        ));
    }
}
