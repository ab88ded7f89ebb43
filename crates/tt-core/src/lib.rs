//! Ticket Triage Core library.
//!
//! Review core for AI-assisted ticket triage: a reproducible mock dataset,
//! a pure statistics aggregator, an owned session store with mutation
//! handlers, and the dashboard view models rendered by the `tt-core` CLI.

pub mod config;
pub mod dashboard;
pub mod exit_codes;
pub mod logging;
pub mod mock;
pub mod output;
pub mod stats;
pub mod store;
pub mod tickets;
pub mod use_cases;

#[cfg(test)]
pub mod test_utils;

pub use dashboard::{Dashboard, DashboardTab, TabView};
pub use mock::{MockDataset, SampleCase};
pub use stats::{compute_stats, TicketStats};
pub use store::{Clock, TicketEdit, TriageStore};
pub use tickets::{format_timestamp, open_queue, TicketFilter};
