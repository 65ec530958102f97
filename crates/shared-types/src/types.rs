use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Severity of a timeline violation. `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub rule_id: String, // e.g., "MISSING_DOFD"
    pub severity: Severity,
    pub field: String,
    pub message: String,
    pub impact: String, // Consequence for the consumer, in plain language
}

/// Everything the engine concludes about one fixed-width record
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimelineReport {
    pub layout_version: String,
    pub account_number: String,
    pub delinquency_date: Option<NaiveDate>,
    pub estimated_removal: Option<NaiveDate>,
    pub violations: Vec<Violation>,
    pub citations: BTreeMap<String, String>, // rule_id -> citation text
}

impl TimelineReport {
    pub fn highest_severity(&self) -> Option<Severity> {
        self.violations.iter().map(|v| v.severity).max()
    }

    pub fn has_violation(&self, rule_id: &str) -> bool {
        self.violations.iter().any(|v| v.rule_id == rule_id)
    }
}
