//! Analytics dashboard.
//!
//! [`Dashboard::build`] takes one statistics snapshot and answers each tab
//! from it, so every tab of a rendering agrees on the same numbers.

pub mod views;

pub use views::{
    percent, ChartSlice, ComparisonView, DrilldownRow, DrilldownView, FieldPercent, FieldsView,
    SamplesView, SummaryView, CONFIDENCE_RANGES, MINUTES_SAVED_PER_MATCH,
};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tt_common::{Error, Ticket};

use crate::mock::SampleCase;
use crate::stats::{compute_stats, TicketStats};
use crate::store::TriageStore;

/// Default number of tickets in the drilldown table.
pub const DEFAULT_DRILLDOWN_ROWS: usize = 10;

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    #[default]
    Summary,
    Fields,
    Comparison,
    Samples,
    Drilldown,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        DashboardTab::Summary,
        DashboardTab::Fields,
        DashboardTab::Comparison,
        DashboardTab::Samples,
        DashboardTab::Drilldown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardTab::Summary => "summary",
            DashboardTab::Fields => "fields",
            DashboardTab::Comparison => "comparison",
            DashboardTab::Samples => "samples",
            DashboardTab::Drilldown => "drilldown",
        }
    }

    /// Heading shown above the tab.
    pub fn title(&self) -> &'static str {
        match self {
            DashboardTab::Summary => "Summary",
            DashboardTab::Fields => "Fields Analysis",
            DashboardTab::Comparison => "Before / After",
            DashboardTab::Samples => "Sample Cases",
            DashboardTab::Drilldown => "Drilldown",
        }
    }
}

impl fmt::Display for DashboardTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DashboardTab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidTab(s.to_string()))
    }
}

/// One rendered tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", content = "view", rename_all = "lowercase")]
pub enum TabView {
    Summary(SummaryView),
    Fields(FieldsView),
    Comparison(ComparisonView),
    Samples(SamplesView),
    Drilldown(DrilldownView),
}

impl TabView {
    pub fn tab(&self) -> DashboardTab {
        match self {
            TabView::Summary(_) => DashboardTab::Summary,
            TabView::Fields(_) => DashboardTab::Fields,
            TabView::Comparison(_) => DashboardTab::Comparison,
            TabView::Samples(_) => DashboardTab::Samples,
            TabView::Drilldown(_) => DashboardTab::Drilldown,
        }
    }
}

/// A statistics snapshot plus the store data the tabs need.
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    stats: TicketStats,
    tickets: &'a [Ticket],
    sample_cases: &'a [SampleCase],
    drilldown_rows: usize,
}

impl<'a> Dashboard<'a> {
    /// Snapshot the store as of `now`.
    pub fn build(store: &'a TriageStore, now: DateTime<Utc>) -> Self {
        Self {
            stats: compute_stats(store.tickets(), store.changes(), now),
            tickets: store.tickets(),
            sample_cases: store.sample_cases(),
            drilldown_rows: DEFAULT_DRILLDOWN_ROWS,
        }
    }

    pub fn with_drilldown_rows(mut self, rows: usize) -> Self {
        self.drilldown_rows = rows;
        self
    }

    pub fn stats(&self) -> &TicketStats {
        &self.stats
    }

    pub fn summary(&self) -> SummaryView {
        SummaryView::from_stats(&self.stats)
    }

    pub fn fields(&self) -> FieldsView {
        FieldsView {
            field_accuracy: views::field_percents(&self.stats.field_accuracy),
            confusion_points: self.stats.confusion_points.clone(),
            misclassifications: self.stats.misclassifications.clone(),
        }
    }

    pub fn comparison(&self) -> ComparisonView {
        ComparisonView {
            rows: self.stats.before_after_comparisons.clone(),
        }
    }

    pub fn samples(&self) -> SamplesView {
        SamplesView {
            cases: self.sample_cases.to_vec(),
        }
    }

    pub fn drilldown(&self) -> DrilldownView {
        DrilldownView::from_tickets(self.tickets, self.drilldown_rows)
    }

    pub fn view(&self, tab: DashboardTab) -> TabView {
        match tab {
            DashboardTab::Summary => TabView::Summary(self.summary()),
            DashboardTab::Fields => TabView::Fields(self.fields()),
            DashboardTab::Comparison => TabView::Comparison(self.comparison()),
            DashboardTab::Samples => TabView::Samples(self.samples()),
            DashboardTab::Drilldown => TabView::Drilldown(self.drilldown()),
        }
    }
}
