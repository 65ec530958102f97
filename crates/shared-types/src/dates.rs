//! Normalized calendar values with a confidence grade

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How much correction or inference a normalized value required.
///
/// Ordered so that `High > Medium > Low`; "Medium or better" reads as
/// `tier >= ConfidenceTier::Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// Brute-force digit extraction or bare-year fallback
    Low,
    /// Lower-specificity pattern or OCR glyph substitution
    Medium,
    /// Canonical format matched without substitution
    High,
}

impl ConfidenceTier {
    /// Limit this tier to at most `ceiling`
    pub fn capped_at(self, ceiling: ConfidenceTier) -> ConfidenceTier {
        self.min(ceiling)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

/// Result of normalizing free-form date text.
///
/// Fields are private so the `canonical == None => confidence == Low`
/// invariant holds for every value in circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateValue {
    raw_input: String,
    canonical: Option<NaiveDate>,
    confidence: ConfidenceTier,
}

impl DateValue {
    /// A successfully recovered date
    pub fn recovered(raw_input: &str, date: NaiveDate, confidence: ConfidenceTier) -> Self {
        Self {
            raw_input: raw_input.to_string(),
            canonical: Some(date),
            confidence,
        }
    }

    /// Nothing interpretable could be recovered
    pub fn unrecognized(raw_input: &str) -> Self {
        Self {
            raw_input: raw_input.to_string(),
            canonical: None,
            confidence: ConfidenceTier::Low,
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn canonical(&self) -> Option<NaiveDate> {
        self.canonical
    }

    pub fn confidence(&self) -> ConfidenceTier {
        self.confidence
    }

    pub fn is_recognized(&self) -> bool {
        self.canonical.is_some()
    }

    /// Canonical `YYYY-MM-DD` rendering, if any
    pub fn iso(&self) -> Option<String> {
        self.canonical.map(|d| d.format("%Y-%m-%d").to_string())
    }
}
