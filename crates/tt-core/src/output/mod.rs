//! Command payload rendering.
//!
//! Every command produces a serializable payload. `json` wraps it in a
//! versioned envelope, `md` renders a Markdown report and `summary` a
//! single line suitable for logs and shell prompts.

pub mod markdown;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tt_common::{OutputFormat, Result, Ticket, SCHEMA_VERSION};

use crate::dashboard::{percent, TabView};
use crate::stats::TicketStats;
use crate::use_cases::UseCasePage;

/// Versioned JSON envelope for a command payload.
pub fn envelope(
    command: &str,
    run_id: &str,
    generated_at: DateTime<Utc>,
    data: &impl Serialize,
) -> Result<Value> {
    Ok(serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": generated_at.to_rfc3339(),
        "command": command,
        "data": serde_json::to_value(data)?,
    }))
}

/// Render a payload in the requested format.
///
/// `markdown` and `summary` are only called for their format.
pub fn render(
    format: OutputFormat,
    command: &str,
    run_id: &str,
    generated_at: DateTime<Utc>,
    data: &impl Serialize,
    markdown: impl FnOnce() -> String,
    summary: impl FnOnce() -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let value = envelope(command, run_id, generated_at, data)?;
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Md => Ok(markdown()),
        OutputFormat::Summary => Ok(summary()),
    }
}

pub fn stats_summary(stats: &TicketStats) -> String {
    format!(
        "tickets={} open={} resolved={} pending={} changes={} accuracy={}%",
        stats.total_tickets,
        stats.open_tickets,
        stats.resolved_tickets,
        stats.pending_validation,
        stats.changes_count,
        percent(stats.matched_changes_count, stats.changes_count)
    )
}

pub fn ticket_list_summary(tickets: &[&Ticket], total: usize) -> String {
    format!("{} of {} tickets", tickets.len(), total)
}

pub fn ticket_summary(ticket: &Ticket) -> String {
    format!(
        "{} [{}] {} / {} / {}",
        ticket.id, ticket.status, ticket.priority, ticket.assignment_group, ticket.short_description
    )
}

pub fn tab_summary(view: &TabView) -> String {
    match view {
        TabView::Summary(s) => format!(
            "summary: automation={}% accuracy={}% saved={}m",
            s.automation_rate, s.accuracy_rate, s.estimated_minutes_saved
        ),
        TabView::Fields(f) => format!(
            "fields: {} fields, {} misclassifications",
            f.field_accuracy.len(),
            f.misclassifications.len()
        ),
        TabView::Comparison(c) => format!("comparison: {} changes", c.rows.len()),
        TabView::Samples(s) => format!(
            "samples: {} cases, {} correct",
            s.cases.len(),
            s.cases.iter().filter(|c| c.correct).count()
        ),
        TabView::Drilldown(d) => format!(
            "drilldown: showing {} of {} tickets",
            d.rows.len(),
            d.total_tickets
        ),
    }
}

pub fn use_case_page_summary(page: &UseCasePage) -> String {
    match page {
        UseCasePage::Found { use_case } => format!("{} {}", use_case.path, use_case.title),
        UseCasePage::NotFound { requested } => format!("use case not found: {}", requested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats;
    use crate::test_utils::{fixed_now, TicketBuilder};
    use tt_common::TicketStatus;

    #[test]
    fn test_envelope_shape() {
        let value = envelope("stats", "run-0123456789ab", fixed_now(), &vec![1, 2]).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["command"], "stats");
        assert_eq!(value["run_id"], "run-0123456789ab");
        assert_eq!(value["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let render_as = |format| {
            render(
                format,
                "x",
                "run-1",
                fixed_now(),
                &"payload",
                || "md".to_string(),
                || "line".to_string(),
            )
            .unwrap()
        };
        assert_eq!(render_as(OutputFormat::Md), "md");
        assert_eq!(render_as(OutputFormat::Summary), "line");
        let json: Value = serde_json::from_str(&render_as(OutputFormat::Json)).unwrap();
        assert_eq!(json["data"], "payload");
    }

    #[test]
    fn test_stats_summary_line() {
        let tickets = vec![
            TicketBuilder::new(0).build(),
            TicketBuilder::new(1).status(TicketStatus::Closed).build(),
        ];
        let line = stats_summary(&compute_stats(&tickets, &[], fixed_now()));
        assert_eq!(
            line,
            "tickets=2 open=1 resolved=1 pending=0 changes=0 accuracy=0%"
        );
    }
}
