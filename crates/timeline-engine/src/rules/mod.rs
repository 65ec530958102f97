//! Timeline rules for decoded fixed-width records
//!
//! Each rule is independent and sees the same [`RecordTimeline`]. All
//! registered rules run on every record, so one record can trigger several
//! violations. Evaluation is a pure function of the record, the injected
//! status-code table, and the caller-supplied `now`.

pub mod delinquency;
pub mod obsolescence;
pub mod ordering;
pub mod reporting;

use crate::fixed_width::{
    FixedWidthRecord, ACCOUNT_STATUS, DATE_CLOSED, DATE_OF_ACCOUNT_INFORMATION,
    DATE_OF_FIRST_DELINQUENCY, DATE_OF_LAST_PAYMENT, DATE_OPENED,
};
use crate::normalizer::normalize;
use crate::patterns::is_sentinel_fill;
use crate::status_codes::StatusCodeTable;
use chrono::NaiveDate;
use shared_types::{Severity, Violation};
use tracing::debug;

pub const DOFD_BEFORE_OPEN: &str = "DOFD_BEFORE_OPEN";
pub const MISSING_DOFD: &str = "MISSING_DOFD";
pub const FUTURE_REPORT_DATE: &str = "FUTURE_REPORT_DATE";
pub const OBSOLETE_ITEM: &str = "OBSOLETE_ITEM";
pub const FUTURE_DOFD: &str = "FUTURE_DOFD";
pub const CLOSED_BEFORE_OPEN: &str = "CLOSED_BEFORE_OPEN";
pub const PAYMENT_BEFORE_OPEN: &str = "PAYMENT_BEFORE_OPEN";
pub const DOFD_AFTER_REPORT: &str = "DOFD_AFTER_REPORT";

/// A single timeline consistency check
pub trait TimelineRule: Send + Sync {
    /// Stable identifier used for citation lookup and deduplication
    fn id(&self) -> &'static str;

    fn severity(&self) -> Severity;

    fn check(&self, timeline: &RecordTimeline<'_>) -> Option<Violation>;
}

/// Dates and status pulled out of one decoded record.
///
/// Sentinel fills (blank, all zeros, all nines) and text the normalizer
/// cannot read are absent, not errors.
pub struct RecordTimeline<'a> {
    pub record: &'a FixedWidthRecord,
    pub status_codes: &'a StatusCodeTable,
    pub now: NaiveDate,
    pub status: &'a str,
    pub date_opened: Option<NaiveDate>,
    pub date_of_account_information: Option<NaiveDate>,
    pub date_of_first_delinquency: Option<NaiveDate>,
    pub date_closed: Option<NaiveDate>,
    pub date_of_last_payment: Option<NaiveDate>,
}

impl<'a> RecordTimeline<'a> {
    pub fn new(
        record: &'a FixedWidthRecord,
        status_codes: &'a StatusCodeTable,
        now: NaiveDate,
    ) -> Self {
        Self {
            record,
            status_codes,
            now,
            status: record.get(ACCOUNT_STATUS),
            date_opened: record_date(record, DATE_OPENED),
            date_of_account_information: record_date(record, DATE_OF_ACCOUNT_INFORMATION),
            date_of_first_delinquency: record_date(record, DATE_OF_FIRST_DELINQUENCY),
            date_closed: record_date(record, DATE_CLOSED),
            date_of_last_payment: record_date(record, DATE_OF_LAST_PAYMENT),
        }
    }

    /// Value of a date field by its layout name
    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        match field {
            DATE_OPENED => self.date_opened,
            DATE_OF_ACCOUNT_INFORMATION => self.date_of_account_information,
            DATE_OF_FIRST_DELINQUENCY => self.date_of_first_delinquency,
            DATE_CLOSED => self.date_closed,
            DATE_OF_LAST_PAYMENT => self.date_of_last_payment,
            _ => None,
        }
    }
}

/// Read a date column, treating sentinel fills and unreadable text as absent
pub fn record_date(record: &FixedWidthRecord, field: &str) -> Option<NaiveDate> {
    let raw = record.get(field);
    if is_sentinel_fill(raw) {
        return None;
    }
    normalize(raw).canonical()
}

/// Every built-in rule, in evaluation order
pub fn default_rules() -> Vec<Box<dyn TimelineRule>> {
    let mut rules: Vec<Box<dyn TimelineRule>> = vec![
        Box::new(delinquency::MissingDelinquencyDate),
        Box::new(reporting::FutureReportDate),
        Box::new(reporting::FutureDelinquencyDate),
        Box::new(obsolescence::ObsoleteItem),
    ];
    rules.extend(
        ordering::DATE_ORDER_RULES
            .iter()
            .map(|rule| Box::new(*rule) as Box<dyn TimelineRule>),
    );
    rules
}

/// Evaluates the registered rules against decoded records
pub struct RuleEngine {
    status_codes: StatusCodeTable,
    rules: Vec<Box<dyn TimelineRule>>,
}

impl RuleEngine {
    pub fn new(status_codes: StatusCodeTable) -> Self {
        Self::with_rules(status_codes, default_rules())
    }

    pub fn with_rules(status_codes: StatusCodeTable, rules: Vec<Box<dyn TimelineRule>>) -> Self {
        Self {
            status_codes,
            rules,
        }
    }

    pub fn status_codes(&self) -> &StatusCodeTable {
        &self.status_codes
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    pub fn evaluate(&self, record: &FixedWidthRecord, now: NaiveDate) -> Vec<Violation> {
        let timeline = RecordTimeline::new(record, &self.status_codes, now);

        self.rules
            .iter()
            .filter_map(|rule| {
                let violation = rule.check(&timeline)?;
                debug!(rule = rule.id(), severity = ?violation.severity, "timeline rule fired");
                Some(violation)
            })
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(StatusCodeTable::default())
    }
}

/// Evaluate the built-in rules with the built-in status-code table
pub fn evaluate(record: &FixedWidthRecord, now: NaiveDate) -> Vec<Violation> {
    RuleEngine::default().evaluate(record, now)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn record(pairs: &[(&str, &str)]) -> FixedWidthRecord {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    pub fn check(
        rule: &dyn TimelineRule,
        record: &FixedWidthRecord,
        now: NaiveDate,
    ) -> Option<Violation> {
        let table = StatusCodeTable::default();
        let timeline = RecordTimeline::new(record, &table, now);
        rule.check(&timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{record, ymd};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_record_has_no_violations() {
        let rec = record(&[
            (ACCOUNT_STATUS, "11"),
            (DATE_OPENED, "06152015"),
            (DATE_OF_ACCOUNT_INFORMATION, "05312024"),
            (DATE_OF_LAST_PAYMENT, "05012024"),
        ]);
        assert!(evaluate(&rec, ymd(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_charge_off_without_dofd() {
        let rec = record(&[
            (ACCOUNT_STATUS, "97"),
            (DATE_OPENED, "06152015"),
            (DATE_OF_ACCOUNT_INFORMATION, "05312024"),
            (DATE_OF_FIRST_DELINQUENCY, "00000000"),
        ]);
        let violations = evaluate(&rec, ymd(2024, 6, 1));
        let missing: Vec<_> = violations.iter().filter(|v| v.rule_id == MISSING_DOFD).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Critical);
        assert_eq!(missing[0].field, DATE_OF_FIRST_DELINQUENCY);
    }

    #[test]
    fn test_multiple_rules_fire_together() {
        let rec = record(&[
            (ACCOUNT_STATUS, "97"),
            (DATE_OPENED, "06152015"),
            (DATE_OF_FIRST_DELINQUENCY, "03152014"),
            (DATE_OF_ACCOUNT_INFORMATION, "01012030"),
        ]);
        let ids: Vec<_> = evaluate(&rec, ymd(2024, 6, 1))
            .into_iter()
            .map(|v| v.rule_id)
            .collect();
        assert!(ids.contains(&FUTURE_REPORT_DATE.to_string()));
        assert!(ids.contains(&DOFD_BEFORE_OPEN.to_string()));
        assert!(!ids.contains(&MISSING_DOFD.to_string()));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let rec = record(&[
            (ACCOUNT_STATUS, "93"),
            (DATE_OPENED, "06152019"),
            (DATE_OF_FIRST_DELINQUENCY, "03152015"),
            (DATE_OF_ACCOUNT_INFORMATION, "05312024"),
        ]);
        let engine = RuleEngine::default();
        let now = ymd(2024, 6, 1);
        assert_eq!(engine.evaluate(&rec, now), engine.evaluate(&rec, now));
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let engine = RuleEngine::default();
        let mut ids = engine.rule_ids();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 8);
    }

    #[test]
    fn test_record_date_treats_sentinels_as_absent() {
        let rec = record(&[
            (DATE_CLOSED, "99999999"),
            (DATE_OPENED, "00000000"),
            (DATE_OF_LAST_PAYMENT, "garbage!"),
            (DATE_OF_FIRST_DELINQUENCY, "03152018"),
        ]);
        assert_eq!(record_date(&rec, DATE_CLOSED), None);
        assert_eq!(record_date(&rec, DATE_OPENED), None);
        assert_eq!(record_date(&rec, DATE_OF_LAST_PAYMENT), None);
        assert_eq!(record_date(&rec, DATE_OF_FIRST_DELINQUENCY), Some(ymd(2018, 3, 15)));
    }

    #[test]
    fn test_custom_rule_set() {
        let engine = RuleEngine::with_rules(
            StatusCodeTable::default(),
            vec![Box::new(delinquency::MissingDelinquencyDate)],
        );
        assert_eq!(engine.rule_ids(), vec![MISSING_DOFD]);
    }
}
