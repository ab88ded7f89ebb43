//! Owned session state for a triage review.
//!
//! The store holds the ticket list, the global change log and the sample
//! cases for one session. Tickets change only through the mutation
//! handlers, which replace a ticket at its index and append exactly one
//! change record to both the ticket and the global log.

use chrono::{DateTime, Utc};
use tt_common::{
    ChangeId, Error, Priority, Result, Ticket, TicketChange, TicketField, TicketId,
    ValidationStatus,
};

use crate::logging::{event_names, Stage};
use crate::mock::{MockDataset, SampleCase, AI_ACTOR};
use crate::stats::{compute_stats, TicketStats};

/// Time source for handler timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    /// Always returns the same instant.
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// A single user-applied edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketEdit {
    Validate(bool),
    Reassign(String),
    SetPriority(Priority),
    UpdateDescription(String),
    ReassignOwner(String),
}

impl TicketEdit {
    pub fn field(&self) -> TicketField {
        match self {
            TicketEdit::Validate(_) => TicketField::ValidationStatus,
            TicketEdit::Reassign(_) => TicketField::AssignmentGroup,
            TicketEdit::SetPriority(_) => TicketField::Priority,
            TicketEdit::UpdateDescription(_) => TicketField::ShortDescription,
            TicketEdit::ReassignOwner(_) => TicketField::AssignedTo,
        }
    }

    fn apply_to(self, ticket: &mut Ticket) {
        match self {
            TicketEdit::Validate(is_valid) => {
                ticket.validation_status = Some(if is_valid {
                    ValidationStatus::Valid
                } else {
                    ValidationStatus::Invalid
                });
            }
            TicketEdit::Reassign(group) => ticket.assignment_group = group,
            TicketEdit::SetPriority(priority) => ticket.priority = priority,
            TicketEdit::UpdateDescription(text) => ticket.short_description = text,
            TicketEdit::ReassignOwner(assignee) => ticket.assigned_to = assignee,
        }
    }
}

/// Ticket collections for one review session.
#[derive(Debug, Clone)]
pub struct TriageStore {
    tickets: Vec<Ticket>,
    changes: Vec<TicketChange>,
    sample_cases: Vec<SampleCase>,
    actor: String,
    clock: Clock,
    next_change: u64,
}

impl TriageStore {
    /// Take ownership of a generated dataset.
    ///
    /// New change ids continue after the highest `change<n>` already present.
    pub fn from_dataset(dataset: MockDataset) -> Self {
        let next_change = dataset
            .changes
            .iter()
            .filter_map(|c| c.id.sequence_number())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            tickets: dataset.tickets,
            changes: dataset.changes,
            sample_cases: dataset.sample_cases,
            actor: AI_ACTOR.to_string(),
            clock: Clock::System,
            next_change,
        }
    }

    /// Label stamped on changes applied through this store.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Shorthand for `with_clock(Clock::Fixed(at))`.
    pub fn with_fixed_clock(self, at: DateTime<Utc>) -> Self {
        self.with_clock(Clock::Fixed(at))
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn changes(&self) -> &[TicketChange] {
        &self.changes
    }

    pub fn sample_cases(&self) -> &[SampleCase] {
        &self.sample_cases
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn ticket(&self, id: &TicketId) -> Result<&Ticket> {
        self.tickets
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| Error::TicketNotFound {
                ticket_id: id.to_string(),
            })
    }

    /// Fresh statistics snapshot as of the store clock.
    pub fn stats(&self) -> TicketStats {
        let stats = compute_stats(&self.tickets, &self.changes, self.clock.now());
        tracing::debug!(
            event = event_names::STATS_COMPUTED,
            stage = %Stage::Aggregate,
            tickets = stats.total_tickets,
            changes = stats.changes_count,
            "statistics computed"
        );
        stats
    }

    pub fn validate(&mut self, id: &TicketId, is_valid: bool) -> Result<&Ticket> {
        self.apply(id, TicketEdit::Validate(is_valid))
    }

    pub fn reassign(&mut self, id: &TicketId, group: impl Into<String>) -> Result<&Ticket> {
        self.apply(id, TicketEdit::Reassign(group.into()))
    }

    pub fn set_priority(&mut self, id: &TicketId, priority: Priority) -> Result<&Ticket> {
        self.apply(id, TicketEdit::SetPriority(priority))
    }

    pub fn update_description(&mut self, id: &TicketId, text: impl Into<String>) -> Result<&Ticket> {
        self.apply(id, TicketEdit::UpdateDescription(text.into()))
    }

    pub fn reassign_owner(&mut self, id: &TicketId, assignee: impl Into<String>) -> Result<&Ticket> {
        self.apply(id, TicketEdit::ReassignOwner(assignee.into()))
    }

    /// Apply one edit and record it.
    ///
    /// An unknown id leaves the store untouched.
    pub fn apply(&mut self, id: &TicketId, edit: TicketEdit) -> Result<&Ticket> {
        let index = self
            .tickets
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| Error::TicketNotFound {
                ticket_id: id.to_string(),
            })?;

        let now = self.clock.now();
        let field = edit.field();
        let current = &self.tickets[index];
        let previous_value = current.field_value(field);

        let mut updated = current.clone();
        edit.apply_to(&mut updated);
        updated.last_updated = now;
        let applied = updated.field_value(field);

        let change = TicketChange {
            id: ChangeId::sequence(self.next_change),
            ticket_id: id.clone(),
            field,
            previous_value,
            new_value: applied.clone(),
            predicted_value: applied,
            confidence: None,
            timestamp: now,
            applied_by: self.actor.clone(),
        };
        self.next_change += 1;

        updated.changes.push(change.clone());
        self.tickets[index] = updated;
        self.changes.push(change);

        tracing::info!(
            event = event_names::TICKET_UPDATED,
            stage = %Stage::Apply,
            ticket_id = %id,
            field = %field,
            "ticket updated"
        );

        Ok(&self.tickets[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixed_now;
    use chrono::Duration;

    fn store() -> TriageStore {
        let generated_at = fixed_now() - Duration::hours(1);
        TriageStore::from_dataset(MockDataset::generate(20, Some(42), generated_at))
            .with_fixed_clock(fixed_now())
    }

    fn id(index: u64) -> TicketId {
        TicketId::from_sequence(index)
    }

    #[test]
    fn test_reassign_records_change() {
        let mut store = store();
        let before = store.ticket(&id(0)).unwrap().clone();

        let after = store.reassign(&id(0), "Database Team").unwrap().clone();

        assert_eq!(after.assignment_group, "Database Team");
        assert_eq!(after.last_updated, fixed_now());
        assert_eq!(after.changes.len(), before.changes.len() + 1);

        let change = after.changes.last().unwrap();
        assert_eq!(change.field, TicketField::AssignmentGroup);
        assert_eq!(change.previous_value, before.assignment_group);
        assert_eq!(change.new_value, "Database Team");
        assert_eq!(change.predicted_value, "Database Team");
        assert_eq!(change.applied_by, AI_ACTOR);
        assert_eq!(change.timestamp, fixed_now());
        assert_eq!(store.changes().last(), Some(change));
    }

    #[test]
    fn test_other_fields_and_position_unchanged() {
        let mut store = store();
        let before = store.ticket(&id(3)).unwrap().clone();

        store.set_priority(&id(3), Priority::Critical).unwrap();

        let after = &store.tickets()[3];
        assert_eq!(after.id, before.id);
        assert_eq!(after.priority, Priority::Critical);
        assert_eq!(after.short_description, before.short_description);
        assert_eq!(after.assignment_group, before.assignment_group);
        assert_eq!(after.assigned_to, before.assigned_to);
        assert_eq!(after.status, before.status);
        assert_eq!(after.created_date, before.created_date);
        assert_eq!(after.validation_status, before.validation_status);
    }

    #[test]
    fn test_change_ids_continue_seed_numbering() {
        let mut store = store();
        store.update_description(&id(1), "Printer offline on floor 3").unwrap();
        store.reassign_owner(&id(1), "Casey Brown").unwrap();

        let ids: Vec<&str> = store.changes()[10..].iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["change11", "change12"]);
        assert_eq!(store.tickets()[1].changes.len(), 3);
    }

    #[test]
    fn test_validate_sets_status_and_records() {
        let mut store = store();
        let previous = store.ticket(&id(4)).unwrap().field_value(TicketField::ValidationStatus);

        let ticket = store.validate(&id(4), false).unwrap();
        assert_eq!(ticket.validation_status, Some(ValidationStatus::Invalid));

        let change = store.changes().last().unwrap();
        assert_eq!(change.field, TicketField::ValidationStatus);
        assert_eq!(change.previous_value, previous);
        assert_eq!(change.new_value, "Invalid");

        store.validate(&id(4), true).unwrap();
        let change = store.changes().last().unwrap();
        assert_eq!(change.previous_value, "Invalid");
        assert_eq!(change.new_value, "Valid");
    }

    #[test]
    fn test_free_text_is_not_validated() {
        let mut store = store();
        let ticket = store.reassign(&id(2), "").unwrap();
        assert_eq!(ticket.assignment_group, "");
    }

    #[test]
    fn test_unknown_ticket_leaves_store_unchanged() {
        let mut store = store();
        let tickets = store.tickets().to_vec();
        let changes = store.changes().len();

        let err = store.reassign(&TicketId("INC999999".into()), "Server Team").unwrap_err();

        assert!(matches!(err, Error::TicketNotFound { .. }));
        assert_eq!(store.tickets(), tickets.as_slice());
        assert_eq!(store.changes().len(), changes);

        store.reassign(&id(0), "Server Team").unwrap();
        assert_eq!(store.changes().last().unwrap().id.as_str(), "change11");
    }

    #[test]
    fn test_ticket_changes_match_global_log_after_edits() {
        let mut store = store();
        store.reassign(&id(0), "Server Team").unwrap();
        store.set_priority(&id(15), Priority::Low).unwrap();
        store.validate(&id(15), true).unwrap();

        for ticket in store.tickets() {
            let expected: Vec<_> = store
                .changes()
                .iter()
                .filter(|c| c.ticket_id == ticket.id)
                .cloned()
                .collect();
            assert_eq!(ticket.changes, expected);
        }
    }

    #[test]
    fn test_stats_reflect_edits() {
        let mut store = store();
        let before = store.stats();
        store.reassign(&id(7), "Security Team").unwrap();
        let after = store.stats();

        assert_eq!(after.changes_count, before.changes_count + 1);
        assert_eq!(after.matched_changes_count, before.matched_changes_count + 1);
        // Handler changes carry no confidence.
        assert_eq!(
            after.confidence_buckets.iter().sum::<usize>(),
            before.confidence_buckets.iter().sum::<usize>()
        );
    }

    #[test]
    fn test_custom_actor() {
        let mut store = store().with_actor("Reviewer");
        store.reassign(&id(0), "Server Team").unwrap();
        assert_eq!(store.changes().last().unwrap().applied_by, "Reviewer");
        assert_eq!(store.actor(), "Reviewer");
    }
}
