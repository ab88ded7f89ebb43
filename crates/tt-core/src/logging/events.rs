//! Structured event vocabulary.
//!
//! Every event carries an `event` field naming what happened; the run span
//! opened by [`LogContext::span`] adds the correlation ids.

use serde::{Deserialize, Serialize};

/// Processing stages of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Mock dataset generation.
    Generate,
    /// Statistics aggregation.
    Aggregate,
    /// Ticket mutation through a handler.
    Apply,
    /// Payload rendering.
    Render,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Generate => "generate",
            Stage::Aggregate => "aggregate",
            Stage::Apply => "apply",
            Stage::Render => "render",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Session data
    pub const SESSION_GENERATED: &str = "session.generated";
    pub const STATS_COMPUTED: &str = "stats.computed";
    pub const TICKET_UPDATED: &str = "ticket.updated";
    pub const TICKET_NOT_FOUND: &str = "ticket.not_found";

    // Rendering
    pub const DASHBOARD_RENDERED: &str = "dashboard.rendered";

    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Correlation ids shared by every event of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Seed of the generated dataset, when one was fixed.
    pub seed: Option<u64>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Root span for the run; enter it so nested events inherit the ids.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("run", run_id = %self.run_id, seed = ?self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [
            Stage::Init,
            Stage::Generate,
            Stage::Aggregate,
            Stage::Apply,
            Stage::Render,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }

    #[test]
    fn test_event_names() {
        assert_eq!(event_names::SESSION_GENERATED, "session.generated");
        assert_eq!(event_names::STATS_COMPUTED, "stats.computed");
        assert_eq!(event_names::TICKET_UPDATED, "ticket.updated");
        assert_eq!(event_names::CONFIG_LOADED, "config.loaded");
    }

    #[test]
    fn test_log_context() {
        let ctx = LogContext::new("run-abc").with_seed(Some(7));
        assert_eq!(ctx.run_id, "run-abc");
        assert_eq!(ctx.seed, Some(7));
        let _entered = ctx.span().entered();
    }
}
