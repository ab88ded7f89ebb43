//! Ticket and change identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// First ticket number handed out by the mock generator.
pub const TICKET_NUMBER_BASE: u64 = 100_000;

const TICKET_PREFIX: &str = "INC";
const CHANGE_PREFIX: &str = "change";

/// Incident ticket identifier.
///
/// Format: `INC<number>`
/// Example: `INC100000`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl TicketId {
    /// Identifier of the `index`-th generated ticket (`INC100000` for 0).
    pub fn from_sequence(index: u64) -> Self {
        TicketId(format!("{}{}", TICKET_PREFIX, TICKET_NUMBER_BASE + index))
    }

    /// Parse and validate a ticket id string.
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix(TICKET_PREFIX)?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(TicketId(s.to_string()))
    }

    /// Numeric part of the id, if it fits in a u64.
    pub fn number(&self) -> Option<u64> {
        self.0.strip_prefix(TICKET_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TicketId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketId::parse(s.trim()).ok_or_else(|| Error::InvalidTicketId(s.to_string()))
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for TicketId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TicketId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Change record identifier.
///
/// Format: `change<sequence>`
/// Example: `change11`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(pub String);

impl ChangeId {
    /// Identifier for the `n`-th change of a session.
    pub fn sequence(n: u64) -> Self {
        ChangeId(format!("{}{}", CHANGE_PREFIX, n))
    }

    /// Sequence number, when the id follows the `change<n>` scheme.
    pub fn sequence_number(&self) -> Option<u64> {
        self.0.strip_prefix(CHANGE_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_id_from_sequence() {
        assert_eq!(TicketId::from_sequence(0).as_str(), "INC100000");
        assert_eq!(TicketId::from_sequence(19).as_str(), "INC100019");
    }

    #[test]
    fn test_ticket_id_parse() {
        assert!(TicketId::parse("INC100000").is_some());
        assert!(TicketId::parse("INC1").is_some());
        assert!(TicketId::parse("INC").is_none());
        assert!(TicketId::parse("inc100000").is_none());
        assert!(TicketId::parse("INC10a000").is_none());
        assert!(TicketId::parse("CHG100000").is_none());
    }

    #[test]
    fn test_ticket_id_from_str_trims() {
        let id: TicketId = " INC100003 ".parse().unwrap();
        assert_eq!(id, "INC100003");
        assert_eq!(id.number(), Some(100_003));

        let err = "TASK-1".parse::<TicketId>().unwrap_err();
        assert_eq!(err.code(), 30);
    }

    #[test]
    fn test_ticket_id_serde_transparent() {
        let id = TicketId::from_sequence(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"INC100007\"");
    }

    #[test]
    fn test_change_id_sequence() {
        let id = ChangeId::sequence(11);
        assert_eq!(id.as_str(), "change11");
        assert_eq!(id.sequence_number(), Some(11));
        assert_eq!(ChangeId("change-abc".into()).sequence_number(), None);
    }
}
