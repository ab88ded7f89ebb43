//! Ticket and change records.
//!
//! These shapes are the contract between the mock generator, the
//! statistics aggregator and the presentation layer. They serialize with
//! camelCase keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::id::{ChangeId, TicketId};

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidPriority(s.to_string()))
    }
}

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    New,
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::New,
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Resolved and Closed tickets are finished; everything else is open.
    pub fn is_resolved(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    /// Statuses shown in the review queue.
    pub fn is_in_review_queue(&self) -> bool {
        matches!(self, TicketStatus::Open | TicketStatus::InProgress)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        TicketStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

/// Human validation verdict on a triaged ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationStatus {
    Valid,
    Invalid,
    Pending,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "Valid",
            ValidationStatus::Invalid => "Invalid",
            ValidationStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket field a change record can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketField {
    AssignmentGroup,
    Priority,
    ShortDescription,
    AssignedTo,
    ValidationStatus,
}

impl TicketField {
    pub const ALL: [TicketField; 5] = [
        TicketField::AssignmentGroup,
        TicketField::Priority,
        TicketField::ShortDescription,
        TicketField::AssignedTo,
        TicketField::ValidationStatus,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketField::AssignmentGroup => "assignmentGroup",
            TicketField::Priority => "priority",
            TicketField::ShortDescription => "shortDescription",
            TicketField::AssignedTo => "assignedTo",
            TicketField::ValidationStatus => "validationStatus",
        }
    }
}

impl fmt::Display for TicketField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidField(s.to_string()))
    }
}

/// Model certainty score, always a finite value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Number of histogram buckets (`0-20%` .. `81-100%`).
    pub const BUCKETS: usize = 5;

    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Confidence(value))
        } else {
            None
        }
    }

    /// Whole-number percentage as a score; values above 100 clamp to 1.0.
    pub fn from_percent(percent: u8) -> Self {
        Confidence(f64::from(percent.min(100)) / 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Histogram bucket: `<=0.2`, `(0.2,0.4]`, `(0.4,0.6]`, `(0.6,0.8]`, `>0.8`.
    pub fn bucket(&self) -> usize {
        match self.0 {
            v if v <= 0.2 => 0,
            v if v <= 0.4 => 1,
            v if v <= 0.6 => 2,
            v if v <= 0.8 => 3,
            _ => 4,
        }
    }

    /// Whole-number percentage for display.
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl TryFrom<f64> for Confidence {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Confidence::new(value).ok_or(Error::InvalidConfidence(value))
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

/// A recorded edit to one ticket field.
///
/// `new_value` is what was applied; `predicted_value` is what the model
/// suggested. They differ when a human overrode the suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketChange {
    pub id: ChangeId,
    pub ticket_id: TicketId,
    pub field: TicketField,
    pub previous_value: String,
    pub new_value: String,
    pub predicted_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    pub timestamp: DateTime<Utc>,
    pub applied_by: String,
}

impl TicketChange {
    /// Whether the applied value agrees with the prediction.
    pub fn prediction_matched(&self) -> bool {
        self.new_value == self.predicted_value
    }
}

/// A support/incident record under triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub short_description: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub assignment_group: String,
    pub assigned_to: String,
    pub created_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_status: Option<ValidationStatus>,
    #[serde(default)]
    pub changes: Vec<TicketChange>,
}

impl Ticket {
    pub fn is_open(&self) -> bool {
        !self.status.is_resolved()
    }

    pub fn is_pending_validation(&self) -> bool {
        self.validation_status == Some(ValidationStatus::Pending)
    }

    /// Current value of `field` rendered as the string a change record stores.
    ///
    /// An absent validation status renders as the empty string.
    pub fn field_value(&self, field: TicketField) -> String {
        match field {
            TicketField::AssignmentGroup => self.assignment_group.clone(),
            TicketField::Priority => self.priority.to_string(),
            TicketField::ShortDescription => self.short_description.clone(),
            TicketField::AssignedTo => self.assigned_to.clone(),
            TicketField::ValidationStatus => self
                .validation_status
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}
