//! Markdown renderers.

use tt_common::Ticket;

use crate::config::ResolvedConfig;
use crate::dashboard::{
    ComparisonView, DrilldownView, FieldsView, SamplesView, SummaryView, TabView,
};
use crate::stats::TicketStats;
use crate::tickets::{format_datetime, format_timestamp};
use crate::use_cases::{UseCase, UseCasePage};

/// Escape `|` so free text cannot break a table row.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn confidence_cell(confidence: Option<u32>) -> String {
    confidence.map_or_else(|| "N/A".to_string(), |c| format!("{}%", c))
}

pub fn stats(stats: &TicketStats) -> String {
    let mut out = String::new();
    out.push_str("# Ticket statistics\n\n");
    out.push_str("| Metric | Value |\n");
    out.push_str("|---|---|\n");
    out.push_str(&format!("| Total tickets | {} |\n", stats.total_tickets));
    out.push_str(&format!("| Open | {} |\n", stats.open_tickets));
    out.push_str(&format!("| Resolved | {} |\n", stats.resolved_tickets));
    out.push_str(&format!("| Pending validation | {} |\n", stats.pending_validation));
    out.push_str(&format!("| Changes | {} |\n", stats.changes_count));
    out.push_str(&format!("| Matched predictions | {} |\n", stats.matched_changes_count));

    out.push_str("\n## Changes by field\n\n");
    for (field, count) in stats.changes_by_field.iter() {
        let accuracy = stats.field_accuracy.get(field).copied().unwrap_or(0.0);
        out.push_str(&format!(
            "- {}: {} ({:.0}% accurate)\n",
            field,
            count,
            accuracy * 100.0
        ));
    }

    out.push_str("\n## Changes by day\n\n");
    for day in &stats.changes_by_day {
        out.push_str(&format!("- {}: {}\n", day.date, day.count));
    }

    out.push_str("\n## Confidence\n\n");
    for (label, count) in crate::dashboard::CONFIDENCE_RANGES
        .iter()
        .zip(stats.confidence_buckets.iter())
    {
        out.push_str(&format!("- {}: {}\n", label, count));
    }
    out
}

pub fn ticket_list(tickets: &[&Ticket]) -> String {
    let mut out = String::new();
    out.push_str("# Tickets\n\n");
    if tickets.is_empty() {
        out.push_str("No tickets match.\n");
        return out;
    }
    out.push_str("| ID | Description | Priority | Status | Group | Updated |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for ticket in tickets {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            ticket.id,
            cell(&ticket.short_description),
            ticket.priority,
            ticket.status,
            cell(&ticket.assignment_group),
            format_datetime(ticket.last_updated)
        ));
    }
    out
}

pub fn ticket(ticket: &Ticket) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}: {}\n\n", ticket.id, ticket.short_description));
    out.push_str(&format!("{}\n\n", ticket.description));
    out.push_str(&format!("- Priority: {}\n", ticket.priority));
    out.push_str(&format!("- Status: {}\n", ticket.status));
    out.push_str(&format!("- Assignment group: {}\n", ticket.assignment_group));
    out.push_str(&format!("- Assigned to: {}\n", ticket.assigned_to));
    out.push_str(&format!("- Created: {}\n", format_datetime(ticket.created_date)));
    out.push_str(&format!("- Last updated: {}\n", format_datetime(ticket.last_updated)));
    if let Some(status) = ticket.validation_status {
        out.push_str(&format!("- Validation: {}\n", status));
    }

    if !ticket.changes.is_empty() {
        out.push_str("\n## Changes\n\n");
        out.push_str("| ID | Field | Before | After | Predicted | By | When |\n");
        out.push_str("|---|---|---|---|---|---|---|\n");
        for change in &ticket.changes {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                change.id,
                change.field,
                cell(&change.previous_value),
                cell(&change.new_value),
                cell(&change.predicted_value),
                cell(&change.applied_by),
                format_datetime(change.timestamp)
            ));
        }
    }
    out
}

pub fn tab(view: &TabView) -> String {
    let mut out = format!("# Dashboard: {}\n\n", view.tab().title());
    out.push_str(&match view {
        TabView::Summary(v) => summary_tab(v),
        TabView::Fields(v) => fields_tab(v),
        TabView::Comparison(v) => comparison_tab(v),
        TabView::Samples(v) => samples_tab(v),
        TabView::Drilldown(v) => drilldown_tab(v),
    });
    out
}

fn summary_tab(view: &SummaryView) -> String {
    let mut out = String::new();
    out.push_str(&format!("- Total tickets: {}\n", view.total_tickets));
    out.push_str(&format!("- Auto-update rate: {}%\n", view.automation_rate));
    out.push_str(&format!("- Suggestion accuracy: {}%\n", view.accuracy_rate));
    out.push_str(&format!("- Estimated time saved: {}m\n", view.estimated_minutes_saved));

    out.push_str("\n## Updated vs. unchanged\n\n");
    for slice in &view.updated_vs_unchanged {
        out.push_str(&format!("- {}: {}\n", slice.name, slice.value));
    }

    out.push_str("\n## Accuracy per field\n\n");
    for entry in &view.field_accuracy {
        out.push_str(&format!("- {}: {}%\n", entry.field, entry.accuracy));
    }

    out.push_str("\n## Priority distribution\n\n");
    for slice in &view.priority_distribution {
        out.push_str(&format!("- {}: {}\n", slice.name, slice.value));
    }
    out
}

fn fields_tab(view: &FieldsView) -> String {
    let mut out = String::new();
    out.push_str("## Accuracy per field\n\n");
    for entry in &view.field_accuracy {
        out.push_str(&format!("- {}: {}%\n", entry.field, entry.accuracy));
    }

    out.push_str("\n## Confusion points\n\n");
    if view.confusion_points.is_empty() {
        out.push_str("None.\n");
    }
    for point in &view.confusion_points {
        out.push_str(&format!(
            "- {}: predicted {} for {} ({}x)\n",
            point.field, point.predicted_value, point.actual_value, point.count
        ));
    }

    out.push_str("\n## Misclassifications\n\n");
    if view.misclassifications.is_empty() {
        out.push_str("None.\n");
    }
    for miss in &view.misclassifications {
        out.push_str(&format!(
            "- {} {}: {} -> {}\n",
            miss.ticket_id, miss.field, miss.original_value, miss.predicted_value
        ));
    }
    out
}

fn comparison_tab(view: &ComparisonView) -> String {
    let mut out = String::new();
    out.push_str("| Ticket | Field | Before | Predicted | Confidence | Correct |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for row in &view.rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.ticket_id,
            row.field,
            cell(&row.original_value),
            cell(&row.predicted_value),
            confidence_cell(row.confidence.map(|c| c.percent())),
            if row.correct { "yes" } else { "no" }
        ));
    }
    out
}

fn samples_tab(view: &SamplesView) -> String {
    let mut out = String::new();
    for case in &view.cases {
        let verdict = if case.correct { "correct" } else { "incorrect" };
        out.push_str(&format!("## {} ({})\n\n", case.ticket_id, verdict));
        out.push_str(&format!("{}\n\n", case.description));
        out.push_str(&format!(
            "- {}: {} -> {} ({}% confidence)\n",
            case.field,
            case.original_value,
            case.predicted_value,
            case.confidence.percent()
        ));
        out.push_str(&format!("- Created: {}\n", format_timestamp(&case.created_date)));
        out.push_str(&format!("\n> {}\n\n", case.reasoning));
    }
    out
}

fn drilldown_tab(view: &DrilldownView) -> String {
    let mut out = String::new();
    out.push_str(&format!("- Groups: {}\n", view.groups.join(", ")));
    let priorities: Vec<&str> = view.priorities.iter().map(|p| p.as_str()).collect();
    out.push_str(&format!("- Priorities: {}\n", priorities.join(", ")));
    out.push_str(&format!("- Confidence: {}\n\n", view.confidence_ranges.join(", ")));

    out.push_str("| Ticket ID | Description | Priority | Assignment | Changes Made | Confidence |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for row in &view.rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.ticket_id,
            cell(&row.short_description),
            row.priority,
            cell(&row.assignment_group),
            row.changes_made,
            confidence_cell(row.confidence)
        ));
    }
    out.push_str(&format!("\nShowing {} of {} tickets.\n", view.rows.len(), view.total_tickets));
    out
}

pub fn use_cases(use_cases: &[UseCase]) -> String {
    let mut out = String::new();
    out.push_str("# Use cases\n\n");
    for uc in use_cases {
        out.push_str(&format!("- **{}** (`{}`, {}): {}\n", uc.title, uc.id, uc.path, uc.description));
    }
    out
}

pub fn use_case_page(page: &UseCasePage) -> String {
    match page {
        UseCasePage::Found { use_case } => format!(
            "# {}\n\n{}\n\nThis is a placeholder for the {} functionality.\n",
            use_case.title,
            use_case.description,
            use_case.title.to_lowercase()
        ),
        UseCasePage::NotFound { requested } => {
            format!("# Use Case Not Found\n\nNo use case matches `{}`.\n", requested)
        }
    }
}

pub fn config(resolved: &ResolvedConfig) -> String {
    let mut out = String::new();
    out.push_str("# Configuration\n\n");
    let source = resolved
        .config_path
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string());
    out.push_str(&format!("- Source: {}\n", source));
    out.push_str(&format!("- Config dir: {}\n", resolved.config_dir.display()));
    out.push_str(&format!("- ticket_count: {}\n", resolved.config.ticket_count));
    let seed = resolved
        .config
        .seed
        .map_or_else(|| "random".to_string(), |s| s.to_string());
    out.push_str(&format!("- seed: {}\n", seed));
    out.push_str(&format!("- actor: {}\n", resolved.config.actor));
    out.push_str(&format!("- drilldown_rows: {}\n", resolved.config.drilldown_rows));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Dashboard, DashboardTab};
    use crate::mock::MockDataset;
    use crate::store::TriageStore;
    use crate::test_utils::{fixed_now, TicketBuilder};
    use crate::use_cases::resolve_route;

    fn store() -> TriageStore {
        TriageStore::from_dataset(MockDataset::generate(20, Some(1), fixed_now()))
            .with_fixed_clock(fixed_now())
    }

    #[test]
    fn test_ticket_list_escapes_pipes() {
        let t = TicketBuilder::new(0).short_description("a | b").build();
        let md = ticket_list(&[&t]);
        assert!(md.contains("a \\| b"));
        assert!(md.contains("| INC100000 |"));
    }

    #[test]
    fn test_empty_list() {
        assert!(ticket_list(&[]).contains("No tickets match."));
    }

    #[test]
    fn test_ticket_detail_lists_changes() {
        let store = store();
        let md = ticket(&store.tickets()[0]);
        assert!(md.contains("## Changes"));
        assert!(md.contains("change1"));
        assert!(md.contains("Network Team"));
    }

    #[test]
    fn test_every_tab_renders_heading() {
        let store = store();
        let dashboard = Dashboard::build(&store, fixed_now());
        for t in DashboardTab::ALL {
            let md = tab(&dashboard.view(t));
            assert!(md.starts_with(&format!("# Dashboard: {}", t.title())));
        }
    }

    #[test]
    fn test_samples_tab_formats_dates() {
        let store = store();
        let dashboard = Dashboard::build(&store, fixed_now());
        let md = tab(&dashboard.view(DashboardTab::Samples));
        assert!(md.contains("Apr 14, 2023 10:23 AM"));
        assert!(md.contains("(incorrect)"));
    }

    #[test]
    fn test_stats_table_layout() {
        let md = stats(&store().stats());
        assert!(md.starts_with("# Ticket statistics\n\n| Metric | Value |\n|---|---|\n"));
        assert!(md.contains("| Total tickets | 20 |\n"));
        assert!(md.contains("| Changes | 10 |\n| Matched predictions | 9 |\n"));
        assert!(md.contains("\n## Confidence\n\n- 0-20%: 0\n"));
        assert!(md.ends_with("- 81-100%: 7\n"));
    }

    #[test]
    fn test_stats_lists_seven_days() {
        let md = stats(&store().stats());
        let days = md.lines().filter(|l| l.starts_with("- 2026-")).count();
        assert_eq!(days, 7);
    }

    #[test]
    fn test_use_case_pages() {
        assert!(use_case_page(&resolve_route("cardiac")).starts_with("# Cardiac Assessment"));
        assert!(use_case_page(&resolve_route("nope")).contains("Use Case Not Found"));
    }
}
