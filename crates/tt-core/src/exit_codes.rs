//! Exit codes for the tt-core CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use tt_common::{Error, ErrorCategory};

/// Exit codes for tt-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed.
    Clean = 0,

    /// Invalid arguments or values.
    ArgsError = 10,

    /// Config file missing, malformed or invalid.
    ConfigError = 11,

    /// Ticket or use case not found.
    NotFound = 15,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// I/O error.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// User/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Stable code name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::NotFound => "ERR_NOT_FOUND",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a domain error.
    pub fn for_error(err: &Error) -> Self {
        match (err, err.category()) {
            (Error::Json(_), _) => ExitCode::InternalError,
            (_, ErrorCategory::Config) => ExitCode::ConfigError,
            (_, ErrorCategory::Lookup) => ExitCode::NotFound,
            (_, ErrorCategory::Input) => ExitCode::ArgsError,
            (_, ErrorCategory::Io) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
