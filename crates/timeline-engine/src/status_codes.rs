//! Metro 2 account status codes
//!
//! An immutable code → meaning table handed to the rule engine at
//! construction. Configuration entries extend or override the built-ins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Current,
    Delinquent,
    Collection,
    ChargeOff,
    PaidDerogatory,
    PaidClosed,
    Transferred,
    Deleted,
    Other,
}

impl StatusCategory {
    /// Categories that report a delinquency and so must carry a date of
    /// first delinquency
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            StatusCategory::Delinquent
                | StatusCategory::Collection
                | StatusCategory::ChargeOff
                | StatusCategory::PaidDerogatory
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    pub meaning: String,
    pub category: StatusCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, StatusCode>", into = "BTreeMap<String, StatusCode>")]
pub struct StatusCodeTable {
    codes: BTreeMap<String, StatusCode>,
}

const BUILT_IN_CODES: &[(&str, &str, StatusCategory)] = &[
    ("05", "Account transferred", StatusCategory::Transferred),
    ("11", "Current account", StatusCategory::Current),
    ("13", "Paid or closed, zero balance", StatusCategory::PaidClosed),
    ("61", "Paid in full, was a voluntary surrender", StatusCategory::PaidDerogatory),
    ("62", "Paid in full, was a collection account", StatusCategory::PaidDerogatory),
    ("63", "Paid in full, was a repossession", StatusCategory::PaidDerogatory),
    ("64", "Paid in full, was a charge-off", StatusCategory::PaidDerogatory),
    ("65", "Paid in full, foreclosure started", StatusCategory::PaidDerogatory),
    ("71", "30-59 days past due", StatusCategory::Delinquent),
    ("78", "60-89 days past due", StatusCategory::Delinquent),
    ("80", "90-119 days past due", StatusCategory::Delinquent),
    ("82", "120-149 days past due", StatusCategory::Delinquent),
    ("83", "150-179 days past due", StatusCategory::Delinquent),
    ("84", "180 days or more past due", StatusCategory::Delinquent),
    ("88", "Claim filed with government", StatusCategory::Delinquent),
    ("89", "Deed received in lieu of foreclosure", StatusCategory::Delinquent),
    ("93", "Assigned to internal or external collections", StatusCategory::Collection),
    ("94", "Foreclosure completed", StatusCategory::Delinquent),
    ("95", "Voluntary surrender", StatusCategory::Delinquent),
    ("96", "Merchandise repossessed", StatusCategory::Delinquent),
    ("97", "Unpaid balance reported as a loss (charge-off)", StatusCategory::ChargeOff),
    ("DA", "Delete entire account", StatusCategory::Deleted),
    ("DF", "Delete entire account due to confirmed fraud", StatusCategory::Deleted),
];

impl Default for StatusCodeTable {
    fn default() -> Self {
        let codes = BUILT_IN_CODES
            .iter()
            .map(|(code, meaning, category)| {
                (
                    code.to_string(),
                    StatusCode {
                        meaning: meaning.to_string(),
                        category: *category,
                    },
                )
            })
            .collect();
        Self { codes }
    }
}

impl From<BTreeMap<String, StatusCode>> for StatusCodeTable {
    /// Configured entries layered over the built-in table
    fn from(overrides: BTreeMap<String, StatusCode>) -> Self {
        let mut table = Self::default();
        for (code, entry) in overrides {
            table.codes.insert(code.trim().to_uppercase(), entry);
        }
        table
    }
}

impl From<StatusCodeTable> for BTreeMap<String, StatusCode> {
    fn from(table: StatusCodeTable) -> Self {
        table.codes
    }
}

impl StatusCodeTable {
    pub fn lookup(&self, code: &str) -> Option<&StatusCode> {
        self.codes.get(&code.trim().to_uppercase())
    }

    pub fn category(&self, code: &str) -> StatusCategory {
        self.lookup(code)
            .map(|entry| entry.category)
            .unwrap_or(StatusCategory::Other)
    }

    /// Whether an account in this status must report a delinquency date
    pub fn requires_delinquency_date(&self, code: &str) -> bool {
        self.category(code).is_negative()
    }

    pub fn meaning(&self, code: &str) -> Option<&str> {
        self.lookup(code).map(|entry| entry.meaning.as_str())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
