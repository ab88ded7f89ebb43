//! Semantic validation for `triage.toml`.
//!
//! Values that parse but make no sense for a session (an empty actor, a
//! drilldown with no rows) are rejected here.

use thiserror::Error;

use super::TriageConfig;

/// Largest dataset a session will generate.
pub const MAX_TICKET_COUNT: usize = 10_000;

/// Errors that can occur during semantic validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticket_count must be at most {max} (got {value})")]
    TicketCountTooLarge { value: usize, max: usize },

    #[error("actor must not be empty")]
    EmptyActor,

    #[error("drilldown_rows must be positive")]
    ZeroDrilldownRows,
}

impl ValidationError {
    /// Offending config key.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::TicketCountTooLarge { .. } => "ticket_count",
            ValidationError::EmptyActor => "actor",
            ValidationError::ZeroDrilldownRows => "drilldown_rows",
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &TriageConfig) -> Result<(), ValidationError> {
    if config.ticket_count > MAX_TICKET_COUNT {
        return Err(ValidationError::TicketCountTooLarge {
            value: config.ticket_count,
            max: MAX_TICKET_COUNT,
        });
    }
    if config.actor.trim().is_empty() {
        return Err(ValidationError::EmptyActor);
    }
    if config.drilldown_rows == 0 {
        return Err(ValidationError::ZeroDrilldownRows);
    }
    Ok(())
}
