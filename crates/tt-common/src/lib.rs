//! Ticket Triage common types, IDs, and errors.
//!
//! This crate provides the data contract shared by tt-core modules:
//! - Ticket and change records with closed enums for priority, status and field
//! - Ticket and change identity types
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod id;
pub mod output;
pub mod ticket;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use id::{ChangeId, TicketId};
pub use output::OutputFormat;
pub use ticket::{
    Confidence, Priority, Ticket, TicketChange, TicketField, TicketStatus, ValidationStatus,
};

/// Schema version stamped on every JSON payload the CLI emits.
pub const SCHEMA_VERSION: &str = "1.0.0";
