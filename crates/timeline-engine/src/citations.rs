//! Statutory citations attached to timeline violations

use crate::rules::{
    CLOSED_BEFORE_OPEN, DOFD_AFTER_REPORT, DOFD_BEFORE_OPEN, FUTURE_DOFD, FUTURE_REPORT_DATE,
    MISSING_DOFD, OBSOLETE_ITEM, PAYMENT_BEFORE_OPEN,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FCRA_OBSOLESCENCE: &str = "15 U.S.C. § 1681c(a)(4), (c)(1)";
const FCRA_DELINQUENCY_DATE: &str = "15 U.S.C. § 1681s-2(a)(5)";
const FCRA_ACCURACY: &str = "15 U.S.C. § 1681e(b)";
const FCRA_FURNISHER_ACCURACY: &str = "15 U.S.C. § 1681s-2(a)(1)";

const BUILT_IN_CITATIONS: &[(&str, &str)] = &[
    (OBSOLETE_ITEM, FCRA_OBSOLESCENCE),
    (MISSING_DOFD, FCRA_DELINQUENCY_DATE),
    (FUTURE_DOFD, FCRA_DELINQUENCY_DATE),
    (DOFD_AFTER_REPORT, FCRA_DELINQUENCY_DATE),
    (DOFD_BEFORE_OPEN, FCRA_ACCURACY),
    (FUTURE_REPORT_DATE, FCRA_ACCURACY),
    (CLOSED_BEFORE_OPEN, FCRA_FURNISHER_ACCURACY),
    (PAYMENT_BEFORE_OPEN, FCRA_FURNISHER_ACCURACY),
];

/// rule_id → citation text. Configured entries override the built-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CitationTable {
    citations: BTreeMap<String, String>,
}

impl Default for CitationTable {
    fn default() -> Self {
        let citations = BUILT_IN_CITATIONS
            .iter()
            .map(|(rule_id, text)| (rule_id.to_string(), text.to_string()))
            .collect();
        Self { citations }
    }
}

impl From<BTreeMap<String, String>> for CitationTable {
    fn from(overrides: BTreeMap<String, String>) -> Self {
        let mut table = Self::default();
        table.citations.extend(overrides);
        table
    }
}

impl From<CitationTable> for BTreeMap<String, String> {
    fn from(table: CitationTable) -> Self {
        table.citations
    }
}

impl CitationTable {
    pub fn lookup(&self, rule_id: &str) -> Option<&str> {
        self.citations.get(rule_id).map(String::as_str)
    }

    /// Citations for the given rule ids, skipping rules without one
    pub fn for_rules<'a>(
        &self,
        rule_ids: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<String, String> {
        rule_ids
            .into_iter()
            .filter_map(|id| Some((id.to_string(), self.lookup(id)?.to_string())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }
}
