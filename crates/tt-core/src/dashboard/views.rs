//! Per-tab view models.
//!
//! Each view is an owned, serializable snapshot built from [`TicketStats`]
//! and the store contents. Renderers in `crate::output` consume them.

use serde::Serialize;
use tt_common::{Priority, Ticket, TicketField, TicketId};

use crate::mock::SampleCase;
use crate::stats::{
    BeforeAfterComparison, ConfusionPoint, DayCount, FieldTally, Misclassification, TicketStats,
};

/// Minutes of manual triage saved per matched suggestion.
pub const MINUTES_SAVED_PER_MATCH: usize = 5;

/// Drilldown confidence facet labels, one per histogram bucket.
pub const CONFIDENCE_RANGES: [&str; 5] = ["0-20%", "21-40%", "41-60%", "61-80%", "81-100%"];

/// `round(numerator / denominator * 100)`, or 0 when the denominator is 0.
pub fn percent(numerator: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64 * 100.0).round() as u32
}

/// Named value for pie and bar series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
}

impl ChartSlice {
    fn new(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Field accuracy as a whole percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPercent {
    pub field: TicketField,
    pub accuracy: u32,
}

pub(crate) fn field_percents(accuracy: &FieldTally<f64>) -> Vec<FieldPercent> {
    accuracy
        .iter()
        .map(|(field, value)| FieldPercent {
            field,
            accuracy: (value * 100.0).round() as u32,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub resolved_tickets: usize,
    pub pending_validation: usize,
    pub tickets_with_suggestions: usize,
    pub matched_suggestions: usize,
    pub automation_rate: u32,
    pub accuracy_rate: u32,
    pub estimated_minutes_saved: usize,
    pub updated_vs_unchanged: Vec<ChartSlice>,
    pub field_accuracy: Vec<FieldPercent>,
    pub priority_distribution: Vec<ChartSlice>,
    pub changes_by_field: Vec<ChartSlice>,
    pub changes_by_day: Vec<DayCount>,
}

impl SummaryView {
    pub(crate) fn from_stats(stats: &TicketStats) -> Self {
        let total = stats.total_tickets;
        let suggestions = stats.changes_count;
        let matched = stats.matched_changes_count;

        Self {
            total_tickets: total,
            open_tickets: stats.open_tickets,
            resolved_tickets: stats.resolved_tickets,
            pending_validation: stats.pending_validation,
            tickets_with_suggestions: suggestions,
            matched_suggestions: matched,
            automation_rate: percent(suggestions, total),
            accuracy_rate: percent(matched, suggestions),
            estimated_minutes_saved: matched * MINUTES_SAVED_PER_MATCH,
            updated_vs_unchanged: vec![
                ChartSlice::new("Updated Tickets", suggestions),
                ChartSlice::new("Unchanged Tickets", total.saturating_sub(suggestions)),
            ],
            field_accuracy: field_percents(&stats.field_accuracy),
            priority_distribution: Priority::ALL
                .iter()
                .map(|p| ChartSlice::new(p.as_str(), stats.tickets_by_priority.get(*p)))
                .collect(),
            changes_by_field: stats
                .changes_by_field
                .iter()
                .map(|(field, count)| ChartSlice::new(field.as_str(), *count))
                .collect(),
            changes_by_day: stats.changes_by_day.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsView {
    pub field_accuracy: Vec<FieldPercent>,
    pub confusion_points: Vec<ConfusionPoint>,
    pub misclassifications: Vec<Misclassification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub rows: Vec<BeforeAfterComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplesView {
    pub cases: Vec<SampleCase>,
}

/// One row of the drilldown table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrilldownRow {
    pub ticket_id: TicketId,
    pub short_description: String,
    pub priority: Priority,
    pub assignment_group: String,
    pub changes_made: usize,
    /// Mean confidence of the ticket's scored changes, as a percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
}

impl DrilldownRow {
    pub(crate) fn from_ticket(ticket: &Ticket) -> Self {
        let scored: Vec<f64> = ticket
            .changes
            .iter()
            .filter_map(|c| c.confidence.map(|v| v.value()))
            .collect();
        let confidence = if scored.is_empty() {
            None
        } else {
            let mean = scored.iter().sum::<f64>() / scored.len() as f64;
            Some((mean * 100.0).round() as u32)
        };

        Self {
            ticket_id: ticket.id.clone(),
            short_description: ticket.short_description.clone(),
            priority: ticket.priority,
            assignment_group: ticket.assignment_group.clone(),
            changes_made: ticket.changes.len(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrilldownView {
    /// Distinct assignment groups in first-seen order.
    pub groups: Vec<String>,
    pub priorities: Vec<Priority>,
    pub confidence_ranges: Vec<&'static str>,
    pub rows: Vec<DrilldownRow>,
    pub total_tickets: usize,
}

impl DrilldownView {
    pub(crate) fn from_tickets(tickets: &[Ticket], rows: usize) -> Self {
        let mut groups: Vec<String> = Vec::new();
        for ticket in tickets {
            if !groups.contains(&ticket.assignment_group) {
                groups.push(ticket.assignment_group.clone());
            }
        }

        Self {
            groups,
            priorities: Priority::ALL.to_vec(),
            confidence_ranges: CONFIDENCE_RANGES.to_vec(),
            rows: tickets.iter().take(rows).map(DrilldownRow::from_ticket).collect(),
            total_tickets: tickets.len(),
        }
    }
}
