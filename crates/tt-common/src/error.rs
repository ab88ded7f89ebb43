//! Error types for Ticket Triage.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Ticket Not Found
//!   Reason: ticket INC100042 not found
//!   Fix: List the review queue with 'tt-core tickets list --all' and retry with a known ID.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 20,
//!   "category": "lookup",
//!   "message": "ticket INC100042 not found",
//!   "recoverable": false,
//!   "context": { "ticket_id": "INC100042" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Ticket Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Unknown ticket, use case or other lookup misses.
    Lookup,
    /// Values that do not parse into the closed domain types.
    Input,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Lookup => write!(f, "lookup"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Ticket Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Lookup errors (20-29)
    #[error("ticket {ticket_id} not found")]
    TicketNotFound { ticket_id: String },

    #[error("use case '{id}' not found")]
    UseCaseNotFound { id: String },

    // Input errors (30-39)
    #[error("invalid ticket id '{0}' (expected INC<number>)")]
    InvalidTicketId(String),

    #[error("unknown priority '{0}'")]
    InvalidPriority(String),

    #[error("unknown ticket status '{0}'")]
    InvalidStatus(String),

    #[error("unknown ticket field '{0}'")]
    InvalidField(String),

    #[error("confidence {0} is outside [0, 1]")]
    InvalidConfidence(f64),

    #[error("unknown dashboard tab '{0}'")]
    InvalidTab(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Lookup errors
    /// - 30-39: Input errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::TicketNotFound { .. } => 20,
            Error::UseCaseNotFound { .. } => 21,
            Error::InvalidTicketId(_) => 30,
            Error::InvalidPriority(_) => 31,
            Error::InvalidStatus(_) => 32,
            Error::InvalidField(_) => 33,
            Error::InvalidConfidence(_) => 34,
            Error::InvalidTab(_) => 35,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => ErrorCategory::Config,

            Error::TicketNotFound { .. } | Error::UseCaseNotFound { .. } => ErrorCategory::Lookup,

            Error::InvalidTicketId(_)
            | Error::InvalidPriority(_)
            | Error::InvalidStatus(_)
            | Error::InvalidField(_)
            | Error::InvalidConfidence(_)
            | Error::InvalidTab(_) => ErrorCategory::Input,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether retrying with corrected input can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => true,

            // The session holds a fixed set of tickets; nothing will make it appear.
            Error::TicketNotFound { .. } => false,
            Error::UseCaseNotFound { .. } => false,

            Error::InvalidTicketId(_)
            | Error::InvalidPriority(_)
            | Error::InvalidStatus(_)
            | Error::InvalidField(_)
            | Error::InvalidConfidence(_)
            | Error::InvalidTab(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check the directory passed via --config or TICKET_TRIAGE_CONFIG.",
            Error::InvalidConfig(_) => {
                "Fix the offending key in triage.toml or remove it to fall back to the default."
            }
            Error::TicketNotFound { .. } => {
                "List the review queue with 'tt-core tickets list --all' and retry with a known ID."
            }
            Error::UseCaseNotFound { .. } => {
                "List the available use cases with 'tt-core use-cases list'."
            }
            Error::InvalidTicketId(_) => "Ticket IDs look like INC100000.",
            Error::InvalidPriority(_) => "Use one of: Critical, High, Medium, Low.",
            Error::InvalidStatus(_) => "Use one of: New, Open, In Progress, Resolved, Closed.",
            Error::InvalidField(_) => {
                "Use one of: assignmentGroup, priority, shortDescription, assignedTo, validationStatus."
            }
            Error::InvalidConfidence(_) => "Confidence scores must lie between 0 and 1.",
            Error::InvalidTab(_) => {
                "Use one of: summary, fields, comparison, samples, drilldown."
            }
            Error::Io(_) => "Check permissions on the config directory and retry.",
            Error::Json(_) => "Report this as a bug; output serialization should not fail.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig(_) => "Invalid Configuration",
            Error::TicketNotFound { .. } => "Ticket Not Found",
            Error::UseCaseNotFound { .. } => "Use Case Not Found",
            Error::InvalidTicketId(_) => "Invalid Ticket ID",
            Error::InvalidPriority(_) => "Invalid Priority",
            Error::InvalidStatus(_) => "Invalid Status",
            Error::InvalidField(_) => "Invalid Field",
            Error::InvalidConfidence(_) => "Invalid Confidence",
            Error::InvalidTab(_) => "Invalid Dashboard Tab",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., ticket id).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::TicketNotFound { ticket_id } => {
                context.insert("ticket_id".to_string(), serde_json::json!(ticket_id));
            }
            Error::UseCaseNotFound { id } => {
                context.insert("use_case_id".to_string(), serde_json::json!(id));
            }
            Error::InvalidConfidence(value) => {
                context.insert("confidence".to_string(), serde_json::json!(value));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
