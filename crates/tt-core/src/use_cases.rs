//! Use-case catalogue and route resolution.

use serde::Serialize;

/// A navigable use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UseCase {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub path: &'static str,
}

pub const USE_CASES: [UseCase; 8] = [
    UseCase {
        id: "emergency",
        title: "Emergency Triage",
        description: "Prioritize critical cases in emergency settings",
        path: "/emergency",
    },
    UseCase {
        id: "cardiac",
        title: "Cardiac Assessment",
        description: "Heart-focused evaluation and prioritization",
        path: "/cardiac",
    },
    UseCase {
        id: "general",
        title: "General Triage",
        description: "Everyday patient assessment and categorization",
        path: "/general",
    },
    UseCase {
        id: "vital-signs",
        title: "Vital Signs",
        description: "Monitor and evaluate patient vital signs",
        path: "/vitals",
    },
    UseCase {
        id: "waiting-time",
        title: "Waiting Time",
        description: "Optimize patient waiting time management",
        path: "/waiting",
    },
    UseCase {
        id: "medical-history",
        title: "Medical History",
        description: "Quick access to patient medical records",
        path: "/history",
    },
    UseCase {
        id: "ambulatory",
        title: "Ambulatory Care",
        description: "Outpatient and walk-in prioritization",
        path: "/ambulatory",
    },
    UseCase {
        id: "intake",
        title: "Patient Intake",
        description: "Streamlined new patient registration",
        path: "/intake",
    },
];

/// Result of resolving a use-case route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum UseCasePage {
    Found { use_case: UseCase },
    NotFound { requested: String },
}

/// Look up a use case by exact id.
pub fn find(id: &str) -> Option<&'static UseCase> {
    USE_CASES.iter().find(|uc| uc.id == id)
}

/// Resolve an id or a route path (`/vitals`) to a page.
pub fn resolve_route(route: &str) -> UseCasePage {
    let route = route.trim();
    let hit = find(route).or_else(|| USE_CASES.iter().find(|uc| uc.path == route));
    match hit {
        Some(use_case) => UseCasePage::Found {
            use_case: *use_case,
        },
        None => UseCasePage::NotFound {
            requested: route.to_string(),
        },
    }
}
