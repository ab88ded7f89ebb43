//! Ticket statistics aggregator.
//!
//! [`compute_stats`] is a pure function of the ticket list, the change log
//! and the reference instant. It has no hidden state and returns a fresh
//! snapshot on every call.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tt_common::{
    ChangeId, Confidence, Priority, Ticket, TicketChange, TicketField, TicketId, TicketStatus,
};

/// Length of the trailing change-count window, in calendar days.
pub const CHANGE_WINDOW_DAYS: i64 = 7;

/// Per-field values in first-occurrence order.
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTally<V> {
    entries: Vec<(TicketField, V)>,
}

impl<V> Default for FieldTally<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> FieldTally<V> {
    pub fn get(&self, field: TicketField) -> Option<&V> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TicketField, &V)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }

    pub fn fields(&self) -> impl Iterator<Item = TicketField> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_or_insert_with(&mut self, field: TicketField, init: impl FnOnce() -> V) -> &mut V {
        let idx = match self.entries.iter().position(|(f, _)| *f == field) {
            Some(idx) => idx,
            None => {
                self.entries.push((field, init()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn map<U>(&self, f: impl Fn(&V) -> U) -> FieldTally<U> {
        FieldTally {
            entries: self.entries.iter().map(|(k, v)| (*k, f(v))).collect(),
        }
    }
}

impl<V: Serialize> Serialize for FieldTally<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

/// Number of changes on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub count: usize,
}

/// Ticket count per priority; every priority is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    #[serde(rename = "Critical")]
    pub critical: usize,
    #[serde(rename = "High")]
    pub high: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "Low")]
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Critical => self.critical,
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::Critical => self.critical += 1,
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// How often the model predicted `predicted_value` where `actual_value` was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionPoint {
    pub field: TicketField,
    pub actual_value: String,
    pub predicted_value: String,
    pub count: usize,
}

/// A change whose applied value disagrees with the prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Misclassification {
    pub ticket_id: TicketId,
    pub field: TicketField,
    /// Value before the change.
    pub original_value: String,
    pub predicted_value: String,
}

/// One change joined with its ticket, for the before/after table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeforeAfterComparison {
    pub id: ChangeId,
    pub ticket_id: TicketId,
    pub field: TicketField,
    pub original_value: String,
    pub predicted_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

/// Read-only statistics snapshot consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub resolved_tickets: usize,
    pub pending_validation: usize,
    pub changes_count: usize,
    pub matched_changes_count: usize,
    pub changes_by_field: FieldTally<usize>,
    /// Fraction in `[0, 1]`; fields without changes are absent.
    pub field_accuracy: FieldTally<f64>,
    /// Exactly [`CHANGE_WINDOW_DAYS`] entries, ascending by date.
    pub changes_by_day: Vec<DayCount>,
    pub tickets_by_priority: PriorityCounts,
    /// Changes without a confidence score are not counted.
    pub confidence_buckets: [usize; Confidence::BUCKETS],
    pub confusion_points: Vec<ConfusionPoint>,
    pub misclassifications: Vec<Misclassification>,
    pub before_after_comparisons: Vec<BeforeAfterComparison>,
}

impl TicketStats {
    /// Number of changes inside the trailing window.
    pub fn changes_in_window(&self) -> usize {
        self.changes_by_day.iter().map(|d| d.count).sum()
    }
}

/// The [`CHANGE_WINDOW_DAYS`] calendar dates ending on `today`, ascending.
pub fn window_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..CHANGE_WINDOW_DAYS)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

/// Compute the statistics snapshot.
///
/// `now` fixes "today" for the trailing change window; pass `Utc::now()`
/// outside of tests.
pub fn compute_stats(tickets: &[Ticket], changes: &[TicketChange], now: DateTime<Utc>) -> TicketStats {
    let mut open_tickets = 0;
    let mut pending_validation = 0;
    let mut tickets_by_priority = PriorityCounts::default();
    for ticket in tickets {
        if ticket.is_open() {
            open_tickets += 1;
        }
        if ticket.is_pending_validation() {
            pending_validation += 1;
        }
        tickets_by_priority.bump(ticket.priority);
    }

    let today = now.date_naive();
    let mut changes_by_day: Vec<DayCount> = window_dates(today)
        .into_iter()
        .map(|date| DayCount { date, count: 0 })
        .collect();

    let by_id: HashMap<&TicketId, &Ticket> = tickets.iter().map(|t| (&t.id, t)).collect();

    let mut matched_changes_count = 0;
    let mut changes_by_field: FieldTally<usize> = FieldTally::default();
    // (matches, total)
    let mut accuracy_counts: FieldTally<(usize, usize)> = FieldTally::default();
    let mut confidence_buckets = [0usize; Confidence::BUCKETS];
    let mut confusion_points: Vec<ConfusionPoint> = Vec::new();
    let mut misclassifications = Vec::new();
    let mut before_after_comparisons = Vec::with_capacity(changes.len());

    for change in changes {
        let matched = change.prediction_matched();

        *changes_by_field.entry_or_insert_with(change.field, || 0) += 1;
        let acc = accuracy_counts.entry_or_insert_with(change.field, || (0, 0));
        acc.1 += 1;
        if matched {
            acc.0 += 1;
            matched_changes_count += 1;
        } else {
            misclassifications.push(Misclassification {
                ticket_id: change.ticket_id.clone(),
                field: change.field,
                original_value: change.previous_value.clone(),
                predicted_value: change.predicted_value.clone(),
            });
            match confusion_points.iter_mut().find(|p| {
                p.field == change.field
                    && p.actual_value == change.new_value
                    && p.predicted_value == change.predicted_value
            }) {
                Some(point) => point.count += 1,
                None => confusion_points.push(ConfusionPoint {
                    field: change.field,
                    actual_value: change.new_value.clone(),
                    predicted_value: change.predicted_value.clone(),
                    count: 1,
                }),
            }
        }

        let days_back = (today - change.timestamp.date_naive()).num_days();
        if (0..CHANGE_WINDOW_DAYS).contains(&days_back) {
            let idx = (CHANGE_WINDOW_DAYS - 1 - days_back) as usize;
            changes_by_day[idx].count += 1;
        }

        if let Some(confidence) = change.confidence {
            confidence_buckets[confidence.bucket()] += 1;
        }

        let ticket = by_id.get(&change.ticket_id);
        before_after_comparisons.push(BeforeAfterComparison {
            id: change.id.clone(),
            ticket_id: change.ticket_id.clone(),
            field: change.field,
            original_value: change.previous_value.clone(),
            predicted_value: change.predicted_value.clone(),
            confidence: change.confidence,
            correct: matched,
            description: ticket.map(|t| t.description.clone()),
            created_date: ticket.map(|t| t.created_date),
            status: ticket.map(|t| t.status),
        });
    }

    let field_accuracy = accuracy_counts.map(|&(matches, total)| {
        if total == 0 {
            0.0
        } else {
            matches as f64 / total as f64
        }
    });

    TicketStats {
        total_tickets: tickets.len(),
        open_tickets,
        resolved_tickets: tickets.len() - open_tickets,
        pending_validation,
        changes_count: changes.len(),
        matched_changes_count,
        changes_by_field,
        field_accuracy,
        changes_by_day,
        tickets_by_priority,
        confidence_buckets,
        confusion_points,
        misclassifications,
        before_after_comparisons,
    }
}
