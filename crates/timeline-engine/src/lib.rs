pub mod calendar;
pub mod citations;
pub mod config;
pub mod error;
pub mod fixed_width;
pub mod normalizer;
pub mod patterns;
pub mod rules;
pub mod status_codes;
pub mod validator;

pub use calendar::estimate_removal;
pub use citations::CitationTable;
pub use config::EngineConfig;
pub use error::EngineError;
pub use fixed_width::{decode, FixedWidthRecord, RecordLayout};
pub use normalizer::normalize;
pub use rules::{RuleEngine, TimelineRule};
pub use status_codes::StatusCodeTable;
pub use validator::{FieldValidator, ValidationPolicy};

use chrono::NaiveDate;
use shared_types::{FieldInput, FieldVerdict, TimelineReport};
use std::collections::BTreeMap;
use tracing::debug;

/// TimelineEngine entry point
pub struct TimelineEngine {
    layout: RecordLayout,
    validator: FieldValidator,
    rules: RuleEngine,
    citations: CitationTable,
}

impl TimelineEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            layout: RecordLayout::metro2_base(),
            validator: FieldValidator::new(config.validation),
            rules: RuleEngine::new(config.status_codes),
            citations: config.citations,
        }
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Decode one fixed-width line and analyze its timeline
    pub fn analyze_line(&self, line: &str, now: NaiveDate) -> TimelineReport {
        let record = decode(line, &self.layout);
        self.analyze_record(&record, now)
    }

    pub fn analyze_record(&self, record: &FixedWidthRecord, now: NaiveDate) -> TimelineReport {
        let violations = self.rules.evaluate(record, now);
        let delinquency_date = rules::record_date(record, fixed_width::DATE_OF_FIRST_DELINQUENCY);
        let citations = self
            .citations
            .for_rules(violations.iter().map(|v| v.rule_id.as_str()));

        let report = TimelineReport {
            layout_version: self.layout.version().to_string(),
            account_number: record.get(fixed_width::CONSUMER_ACCOUNT_NUMBER).to_string(),
            delinquency_date,
            estimated_removal: delinquency_date.map(estimate_removal),
            violations,
            citations,
        };

        debug!(
            account = %report.account_number,
            violations = report.violations.len(),
            highest = ?report.highest_severity(),
            "analyzed record"
        );
        report
    }

    /// Validate a map of extracted fields (field name → value)
    pub fn validate_fields(
        &self,
        fields: &BTreeMap<String, FieldInput>,
        now: NaiveDate,
    ) -> Vec<FieldVerdict> {
        self.validator.validate_all(fields, now)
    }
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_width::{
        ACCOUNT_STATUS, CONSUMER_ACCOUNT_NUMBER, DATE_OF_ACCOUNT_INFORMATION,
        DATE_OF_FIRST_DELINQUENCY, DATE_OPENED, METRO2_BASE_LENGTH,
    };
    use shared_types::{Severity, VerdictSeverity};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(fields: &[(&str, &str)]) -> String {
        let layout = RecordLayout::metro2_base();
        let mut chars = vec![' '; METRO2_BASE_LENGTH];
        for (name, value) in fields {
            let spec = layout.field(name).unwrap();
            for (i, c) in value.chars().enumerate() {
                chars[spec.start + i] = c;
            }
        }
        chars.into_iter().collect()
    }

    #[test]
    fn test_engine_reports_removal_date() {
        let engine = TimelineEngine::default();
        let report = engine.analyze_line(
            &line(&[
                (CONSUMER_ACCOUNT_NUMBER, "ACCT-1001"),
                (ACCOUNT_STATUS, "97"),
                (DATE_OPENED, "01102016"),
                (DATE_OF_FIRST_DELINQUENCY, "03152018"),
                (DATE_OF_ACCOUNT_INFORMATION, "05312024"),
            ]),
            ymd(2024, 6, 1),
        );

        assert_eq!(report.account_number, "ACCT-1001");
        assert_eq!(report.layout_version, "metro2-base-426");
        assert_eq!(report.delinquency_date, Some(ymd(2018, 3, 15)));
        assert_eq!(report.estimated_removal, Some(ymd(2025, 9, 11)));
        assert!(report.violations.is_empty());
        assert!(report.citations.is_empty());
    }

    #[test]
    fn test_engine_attaches_citations() {
        let engine = TimelineEngine::default();
        let report = engine.analyze_line(
            &line(&[(ACCOUNT_STATUS, "97"), (DATE_OF_ACCOUNT_INFORMATION, "05312024")]),
            ymd(2024, 6, 1),
        );

        assert_eq!(report.highest_severity(), Some(Severity::Critical));
        assert!(report.has_violation(rules::MISSING_DOFD));
        assert!(report.citations.contains_key(rules::MISSING_DOFD));
        assert_eq!(report.estimated_removal, None);
    }

    #[test]
    fn test_engine_uses_configured_status_codes() {
        let config = EngineConfig::parse(
            r#"
            [status_codes.XA]
            meaning = "Regional charge-off"
            category = "charge_off"
            "#,
        )
        .unwrap();
        let engine = TimelineEngine::new(config);
        let report = engine.analyze_line(&line(&[(ACCOUNT_STATUS, "XA")]), ymd(2024, 6, 1));
        assert!(report.has_violation(rules::MISSING_DOFD));

        let default_report =
            TimelineEngine::default().analyze_line(&line(&[(ACCOUNT_STATUS, "XA")]), ymd(2024, 6, 1));
        assert!(!default_report.has_violation(rules::MISSING_DOFD));
    }

    #[test]
    fn test_engine_validates_fields() {
        let engine = TimelineEngine::default();
        let mut fields = BTreeMap::new();
        fields.insert("bureau".to_string(), FieldInput::from("Equifax"));
        fields.insert("date_opened".to_string(), FieldInput::from("2030-01-01"));

        let verdicts = engine.validate_fields(&fields, ymd(2024, 6, 1));
        assert!(verdicts
            .iter()
            .any(|v| v.field == "date_opened" && v.severity == VerdictSeverity::Error));
        assert!(verdicts
            .iter()
            .all(|v| v.field != "bureau" || v.is_valid));
    }
}
