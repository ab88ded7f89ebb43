//! Test utilities for tt-core.
//!
//! Builders for tickets and change records with sensible defaults, plus a
//! fixed reference instant so date-dependent assertions are stable.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tt_common::{
    ChangeId, Confidence, Priority, Ticket, TicketChange, TicketField, TicketId, TicketStatus,
    ValidationStatus,
};

/// Assert that two floating point numbers are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        $crate::assert_approx_eq!($a, $b, 1e-9_f64)
    };
    ($a:expr, $b:expr, $epsilon:expr) => {{
        let a: f64 = $a;
        let b: f64 = $b;
        let eps: f64 = $epsilon;
        let diff = (a - b).abs();
        if diff > eps {
            panic!(
                "assertion failed: `(left ~= right)` (left: `{}`, right: `{}`, diff: `{}`, epsilon: `{}`)",
                a, b, diff, eps
            );
        }
    }};
}

/// Reference instant used by unit tests: 2026-10-16 12:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Builder for [`Ticket`]. Defaults to an open Medium ticket with no
/// validation status and no changes.
pub struct TicketBuilder {
    ticket: Ticket,
}

impl TicketBuilder {
    pub fn new(index: u64) -> Self {
        let created = fixed_now() - Duration::days(2);
        Self {
            ticket: Ticket {
                id: TicketId::from_sequence(index),
                short_description: "VPN access problem".to_string(),
                description: format!("Detailed description for ticket {}", index),
                priority: Priority::Medium,
                status: TicketStatus::Open,
                assignment_group: "Network Team".to_string(),
                assigned_to: "Alex Johnson".to_string(),
                created_date: created,
                last_updated: created + Duration::hours(3),
                validation_status: None,
                changes: Vec::new(),
            },
        }
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.ticket.status = status;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.ticket.priority = priority;
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.ticket.assignment_group = group.to_string();
        self
    }

    pub fn short_description(mut self, text: &str) -> Self {
        self.ticket.short_description = text.to_string();
        self
    }

    pub fn pending(mut self) -> Self {
        self.ticket.validation_status = Some(ValidationStatus::Pending);
        self
    }

    pub fn build(self) -> Ticket {
        self.ticket
    }
}

/// Builder for [`TicketChange`]. Defaults to a matched prediction with
/// confidence 0.9 stamped at [`fixed_now`].
pub struct ChangeBuilder {
    change: TicketChange,
}

impl ChangeBuilder {
    pub fn new(sequence: u64, ticket_index: u64, field: TicketField) -> Self {
        Self {
            change: TicketChange {
                id: ChangeId::sequence(sequence),
                ticket_id: TicketId::from_sequence(ticket_index),
                field,
                previous_value: "before".to_string(),
                new_value: "after".to_string(),
                predicted_value: "after".to_string(),
                confidence: Confidence::new(0.9),
                timestamp: fixed_now(),
                applied_by: crate::mock::AI_ACTOR.to_string(),
            },
        }
    }

    /// Set previous, applied and predicted values.
    pub fn values(mut self, previous: &str, applied: &str, predicted: &str) -> Self {
        self.change.previous_value = previous.to_string();
        self.change.new_value = applied.to_string();
        self.change.predicted_value = predicted.to_string();
        self
    }

    pub fn confidence(mut self, value: f64) -> Self {
        self.change.confidence = Confidence::new(value);
        self
    }

    pub fn no_confidence(mut self) -> Self {
        self.change.confidence = None;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.change.timestamp = timestamp;
        self
    }

    pub fn build(self) -> TicketChange {
        self.change
    }
}
