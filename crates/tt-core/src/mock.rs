//! Mock dataset generator for the triage review.
//!
//! Produces a randomized but constrained ticket list, the fixed list of
//! AI-applied changes that references the first ten tickets, and the
//! hand-authored narrative sample cases shown on the samples tab.
//!
//! Randomness is injected so a seed gives an identical dataset:
//!
//! ```
//! use tt_core::mock::MockDataset;
//!
//! let now = chrono::Utc::now();
//! let a = MockDataset::generate(20, Some(7), now);
//! let b = MockDataset::generate(20, Some(7), now);
//! assert_eq!(a.tickets, b.tickets);
//! ```

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tt_common::{
    ChangeId, Confidence, Priority, Ticket, TicketChange, TicketField, TicketId, TicketStatus,
    ValidationStatus,
};

/// Actor label stamped on AI-applied changes.
pub const AI_ACTOR: &str = "AI Triage System";

/// Default number of tickets in a session.
pub const DEFAULT_TICKET_COUNT: usize = 20;

/// Assignment groups a ticket can be routed to.
pub const ASSIGNMENT_GROUPS: [&str; 7] = [
    "Network Team",
    "Database Team",
    "Application Support",
    "Server Team",
    "Security Team",
    "Desktop Support",
    "Cloud Infrastructure",
];

/// Engineers a ticket can be assigned to.
pub const USER_NAMES: [&str; 10] = [
    "Alex Johnson",
    "Sam Williams",
    "Jordan Smith",
    "Casey Brown",
    "Taylor Davis",
    "Morgan Wilson",
    "Riley Martinez",
    "Jamie Anderson",
    "Avery Thomas",
    "Jordan Taylor",
];

/// Canned short descriptions.
pub const TICKET_DESCRIPTIONS: [&str; 10] = [
    "Unable to access network drive",
    "Database connection timeout",
    "Application crashes on startup",
    "Server unresponsive",
    "Email delivery issues",
    "Password reset request",
    "Printer not connecting",
    "Data sync failure",
    "VPN access problem",
    "Website loading error",
];

const CREATED_WINDOW_DAYS: i64 = 30;
const UPDATE_WINDOW_DAYS: i64 = 7;
const PENDING_VALIDATION_PROBABILITY: f64 = 0.3;

/// Hand-authored narrative of one model decision, for qualitative review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleCase {
    pub ticket_id: TicketId,
    pub description: String,
    pub field: TicketField,
    pub original_value: String,
    pub predicted_value: String,
    pub confidence: Confidence,
    pub correct: bool,
    pub reasoning: String,
    /// Raw RFC 3339 string; rendered with [`crate::tickets::format_timestamp`].
    pub created_date: String,
}

/// Everything a review session starts from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockDataset {
    pub tickets: Vec<Ticket>,
    pub changes: Vec<TicketChange>,
    pub sample_cases: Vec<SampleCase>,
}

impl MockDataset {
    /// Generate a dataset; `seed = None` draws from OS entropy.
    pub fn generate(count: usize, seed: Option<u64>, now: DateTime<Utc>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::generate_with_rng(count, &mut rng, now)
    }

    pub fn generate_with_rng<R: Rng>(
        count: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Self {
        let mut tickets = generate_mock_tickets(count, rng, now);
        let changes = seed_changes(now);
        attach_changes(&mut tickets, &changes);

        tracing::debug!(
            tickets = tickets.len(),
            changes = changes.len(),
            "mock dataset generated"
        );

        MockDataset {
            tickets,
            changes,
            sample_cases: sample_cases(),
        }
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn random_span<R: Rng>(rng: &mut R, days: i64) -> Duration {
    let millis = rng.random::<f64>() * Duration::days(days).num_milliseconds() as f64;
    Duration::milliseconds(millis as i64)
}

/// Generate `count` tickets with sequential ids starting at `INC100000`.
///
/// Created dates fall in the 30 days before `now`; last-updated dates fall
/// in the 7 days after creation, so `last_updated >= created_date`.
/// Changes are left empty; see [`attach_changes`].
pub fn generate_mock_tickets<R: Rng>(
    count: usize,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<Ticket> {
    (0..count)
        .map(|i| {
            let short_description = pick(rng, &TICKET_DESCRIPTIONS).to_string();
            let description = format!(
                "Detailed description for ticket: {}. The issue requires urgent attention as it affects business operations.",
                short_description
            );
            let priority = Priority::ALL[rng.random_range(0..Priority::ALL.len())];
            let status = TicketStatus::ALL[rng.random_range(0..TicketStatus::ALL.len())];
            let assignment_group = pick(rng, &ASSIGNMENT_GROUPS).to_string();
            let assigned_to = pick(rng, &USER_NAMES).to_string();

            let created_date = now - random_span(rng, CREATED_WINDOW_DAYS);
            let last_updated = created_date + random_span(rng, UPDATE_WINDOW_DAYS);
            let validation_status = rng
                .random_bool(PENDING_VALIDATION_PROBABILITY)
                .then_some(ValidationStatus::Pending);

            Ticket {
                id: TicketId::from_sequence(i as u64),
                short_description,
                description,
                priority,
                status,
                assignment_group,
                assigned_to,
                created_date,
                last_updated,
                validation_status,
                changes: Vec::new(),
            }
        })
        .collect()
}

// (ticket index, field, previous, applied, predicted, confidence %, hours before now)
type SeedRow = (u64, TicketField, &'static str, &'static str, &'static str, u8, i64);

const SEED_CHANGES: [SeedRow; 10] = [
    (0, TicketField::AssignmentGroup, "Desktop Support", "Network Team", "Network Team", 89, 5),
    (1, TicketField::Priority, "Low", "High", "High", 76, 12),
    (
        2,
        TicketField::ShortDescription,
        "System down",
        "Database server unresponsive - critical impact",
        "Database server unresponsive - critical impact",
        94,
        8,
    ),
    (3, TicketField::AssignmentGroup, "Application Support", "Database Team", "Database Team", 82, 24),
    (4, TicketField::Priority, "Medium", "Critical", "Critical", 91, 36),
    (5, TicketField::AssignmentGroup, "Desktop Support", "Server Team", "Security Team", 65, 48),
    (
        6,
        TicketField::ShortDescription,
        "Can't login",
        "Authentication failure after password reset",
        "Authentication failure after password reset",
        88,
        72,
    ),
    (7, TicketField::Priority, "Low", "Medium", "Medium", 73, 96),
    (8, TicketField::AssignmentGroup, "Network Team", "Cloud Infrastructure", "Cloud Infrastructure", 85, 120),
    (
        9,
        TicketField::ShortDescription,
        "Email not working",
        "Exchange server connectivity issues affecting email delivery",
        "Exchange server connectivity issues affecting email delivery",
        92,
        144,
    ),
];

/// The fixed list of AI-applied changes (`change1`..`change10`).
///
/// Only timestamps depend on `now`.
pub fn seed_changes(now: DateTime<Utc>) -> Vec<TicketChange> {
    SEED_CHANGES
        .iter()
        .enumerate()
        .map(
            |(i, &(ticket, field, previous, applied, predicted, confidence, hours_ago))| {
                TicketChange {
                    id: ChangeId::sequence(i as u64 + 1),
                    ticket_id: TicketId::from_sequence(ticket),
                    field,
                    previous_value: previous.to_string(),
                    new_value: applied.to_string(),
                    predicted_value: predicted.to_string(),
                    confidence: Some(Confidence::from_percent(confidence)),
                    timestamp: now - Duration::hours(hours_ago),
                    applied_by: AI_ACTOR.to_string(),
                }
            },
        )
        .collect()
}

/// Set each ticket's `changes` to the subset of `changes` with its id.
pub fn attach_changes(tickets: &mut [Ticket], changes: &[TicketChange]) {
    for ticket in tickets.iter_mut() {
        ticket.changes = changes
            .iter()
            .filter(|c| c.ticket_id == ticket.id)
            .cloned()
            .collect();
    }
}

/// Narrative sample cases for the samples tab.
pub fn sample_cases() -> Vec<SampleCase> {
    let case = |ticket: u64,
                description: &str,
                field: TicketField,
                original: &str,
                predicted: &str,
                confidence: u8,
                correct: bool,
                reasoning: &str,
                created: &str| {
        SampleCase {
            ticket_id: TicketId::from_sequence(ticket),
            description: description.to_string(),
            field,
            original_value: original.to_string(),
            predicted_value: predicted.to_string(),
            confidence: Confidence::from_percent(confidence),
            correct,
            reasoning: reasoning.to_string(),
            created_date: created.to_string(),
        }
    };

    vec![
        case(
            2,
            "Database server unresponsive - critical impact. Users cannot access customer information system.",
            TicketField::Priority,
            "Medium",
            "Critical",
            94,
            true,
            "ML model detected keywords 'unresponsive' and 'critical impact' suggesting high business impact. System mentioned is the customer information system which is tagged as business critical.",
            "2023-04-14T10:23:45Z",
        ),
        case(
            5,
            "User unable to connect to shared drive. Local drive access working fine.",
            TicketField::AssignmentGroup,
            "Desktop Support",
            "Network Team",
            87,
            true,
            "Shared drive access issues typically fall under Network Team responsibility. Similar tickets historically were assigned to Network Team 92% of the time.",
            "2023-04-15T09:17:32Z",
        ),
        case(
            9,
            "Email delivery delayed by several hours for external recipients.",
            TicketField::ShortDescription,
            "Email not working",
            "Exchange server delivery delay affecting external recipients",
            92,
            true,
            "Model identified specific issue (delay) and scope (external only) from description and enhanced the title to be more descriptive and actionable.",
            "2023-04-13T15:42:18Z",
        ),
        case(
            13,
            "Application crashes when generating monthly reports. Error log shows database connection timeout.",
            TicketField::AssignmentGroup,
            "Application Support",
            "Database Team",
            68,
            false,
            "Model detected 'database connection timeout' and assigned to Database Team, but the root cause was actually in the application code that wasn't handling timeouts properly.",
            "2023-04-11T14:33:27Z",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generates_requested_count_with_sequential_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let tickets = generate_mock_tickets(25, &mut rng, now());

        assert_eq!(tickets.len(), 25);
        assert_eq!(tickets[0].id, "INC100000");
        assert_eq!(tickets[24].id, "INC100024");
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_mock_tickets(0, &mut rng, now()).is_empty());
    }

    #[test]
    fn test_generated_fields_stay_in_vocabulary() {
        let mut rng = StdRng::seed_from_u64(99);
        for ticket in generate_mock_tickets(200, &mut rng, now()) {
            assert!(TICKET_DESCRIPTIONS.contains(&ticket.short_description.as_str()));
            assert!(ticket.description.contains(&ticket.short_description));
            assert!(ASSIGNMENT_GROUPS.contains(&ticket.assignment_group.as_str()));
            assert!(USER_NAMES.contains(&ticket.assigned_to.as_str()));
            assert!(ticket.created_date <= now());
            assert!(ticket.created_date >= now() - Duration::days(30));
            assert!(ticket.last_updated >= ticket.created_date);
            assert!(ticket.last_updated <= ticket.created_date + Duration::days(7));
            assert!(matches!(
                ticket.validation_status,
                None | Some(ValidationStatus::Pending)
            ));
            assert!(ticket.changes.is_empty());
        }
    }

    #[test]
    fn test_pending_rate_is_roughly_thirty_percent() {
        let mut rng = StdRng::seed_from_u64(2024);
        let tickets = generate_mock_tickets(2000, &mut rng, now());
        let pending = tickets.iter().filter(|t| t.is_pending_validation()).count();
        assert!((450..=750).contains(&pending), "pending = {pending}");
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = MockDataset::generate(20, Some(7), now());
        let b = MockDataset::generate(20, Some(7), now());
        assert_eq!(a, b);

        let c = MockDataset::generate(20, Some(8), now());
        assert_ne!(a.tickets, c.tickets);
    }

    #[test]
    fn test_seed_changes_are_fixed() {
        let changes = seed_changes(now());

        assert_eq!(changes.len(), 10);
        assert_eq!(changes[0].id.as_str(), "change1");
        assert_eq!(changes[9].id.as_str(), "change10");
        assert_eq!(changes[5].ticket_id, "INC100005");
        assert_eq!(changes[5].new_value, "Server Team");
        assert_eq!(changes[5].predicted_value, "Security Team");
        assert_eq!(changes[0].timestamp, now() - Duration::hours(5));
        let percents: Vec<u32> = changes
            .iter()
            .filter_map(|c| c.confidence.map(|conf| conf.percent()))
            .collect();
        assert_eq!(percents, vec![89, 76, 94, 82, 91, 65, 88, 73, 85, 92]);
        assert!(changes.iter().all(|c| c.applied_by == AI_ACTOR));
    }

    #[test]
    fn test_attach_changes_filters_by_ticket() {
        let dataset = MockDataset::generate(20, Some(3), now());

        for ticket in &dataset.tickets {
            let expected: Vec<_> = dataset
                .changes
                .iter()
                .filter(|c| c.ticket_id == ticket.id)
                .cloned()
                .collect();
            assert_eq!(ticket.changes, expected);
        }
        assert_eq!(dataset.tickets[0].changes.len(), 1);
        assert!(dataset.tickets[10].changes.is_empty());
    }

    #[test]
    fn test_attach_changes_with_fewer_tickets_than_changes() {
        let dataset = MockDataset::generate(3, Some(3), now());
        let attached: usize = dataset.tickets.iter().map(|t| t.changes.len()).sum();
        assert_eq!(attached, 3);
        assert_eq!(dataset.changes.len(), 10);
    }

    #[test]
    fn test_sample_cases() {
        let cases = sample_cases();
        assert_eq!(cases.len(), 4);
        assert_eq!(cases.iter().filter(|c| !c.correct).count(), 1);
        assert_eq!(cases[3].ticket_id, "INC100013");
        let percents: Vec<u32> = cases.iter().map(|c| c.confidence.percent()).collect();
        assert_eq!(percents, vec![94, 87, 92, 68]);
    }
}
