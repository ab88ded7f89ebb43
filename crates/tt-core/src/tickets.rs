//! Ticket list filtering and display formatting.

use chrono::{DateTime, Utc};
use tt_common::{Ticket, TicketStatus};

const DISPLAY_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

/// Review-list filter.
///
/// `search` matches case-insensitively against the short description or
/// the ticket id. `status`, when set, must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
}

impl TicketFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                ticket.short_description.to_lowercase().contains(&needle)
                    || ticket.id.as_str().to_lowercase().contains(&needle)
            }
        }
    }

    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        tickets.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Tickets awaiting review: Open and In Progress only.
pub fn open_queue(tickets: &[Ticket]) -> Vec<&Ticket> {
    tickets
        .iter()
        .filter(|t| t.status.is_in_review_queue())
        .collect()
}

/// Render a timestamp as `Oct 16, 2026 9:05 AM` (UTC).
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format(DISPLAY_FORMAT).to_string()
}

/// Render an RFC 3339 string for display; malformed input comes back as-is.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(at) => format_datetime(at.with_timezone(&Utc)),
        Err(_) => raw.to_string(),
    }
}
