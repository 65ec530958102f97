//! Per-field validation
//!
//! Every validator is total and returns verdicts rather than errors.
//! Structural and logical checks on the same field produce separate
//! verdicts, so one field can carry several.

use crate::calendar::estimate_removal;
use crate::normalizer::normalize;
use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::{ConfidenceTier, FieldInput, FieldVerdict};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

pub const DATE_OPENED: &str = "date_opened";
pub const DELINQUENCY_DATE: &str = "delinquency_date";
pub const DATE_REPORTED: &str = "date_reported";
pub const REMOVAL_DATE: &str = "removal_date";
pub const ACCOUNT_TYPE: &str = "account_type";
pub const BUREAU: &str = "bureau";
pub const CREDITOR_NAME: &str = "creditor_name";
pub const FURNISHER_NAME: &str = "furnisher_name";
pub const ORIGINAL_CREDITOR: &str = "original_creditor";

lazy_static! {
    static ref CANONICAL_DATE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// Whether a date field records something that already happened or a
/// projection into the future
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFieldKind {
    PastEvent,
    Projected,
}

/// Validation policy, loaded once and handed to [`FieldValidator::new`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub min_year: i32,
    pub max_year: i32,
    pub name_min_len: usize,
    pub name_max_len: usize,
    pub known_account_types: BTreeSet<String>,
    pub known_bureaus: BTreeSet<String>,
    /// Which fields are dates, and whether a future value is expected.
    /// New date fields must be listed here explicitly.
    pub date_fields: BTreeMap<String, DateFieldKind>,
    pub category_fields: BTreeSet<String>,
    pub bureau_fields: BTreeSet<String>,
    pub name_fields: BTreeSet<String>,
}

fn string_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_year: 1970,
            max_year: 2100,
            name_min_len: 2,
            name_max_len: 200,
            known_account_types: string_set(&[
                "Auto Loan",
                "Charge Account",
                "Collection",
                "Credit Card",
                "Installment",
                "Line of Credit",
                "Medical",
                "Mortgage",
                "Personal Loan",
                "Revolving",
                "Student Loan",
                "Utility",
                "Unknown",
            ]),
            known_bureaus: string_set(&["Equifax", "Experian", "TransUnion", "Unknown"]),
            date_fields: [
                (DATE_OPENED, DateFieldKind::PastEvent),
                (DELINQUENCY_DATE, DateFieldKind::PastEvent),
                (DATE_REPORTED, DateFieldKind::PastEvent),
                (REMOVAL_DATE, DateFieldKind::Projected),
            ]
            .into_iter()
            .map(|(name, kind)| (name.to_string(), kind))
            .collect(),
            category_fields: string_set(&[ACCOUNT_TYPE]),
            bureau_fields: string_set(&[BUREAU]),
            name_fields: string_set(&[CREDITOR_NAME, FURNISHER_NAME, ORIGINAL_CREDITOR]),
        }
    }
}

pub struct FieldValidator {
    policy: ValidationPolicy,
}

impl FieldValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Strict `YYYY-MM-DD` within the policy's year range
    pub fn parse_strict(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if !CANONICAL_DATE.is_match(value) {
            return None;
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .filter(|date| (self.policy.min_year..=self.policy.max_year).contains(&date.year()))
    }

    /// Validate one date field. `now` decides whether the value is in the
    /// future; past-event fields may not be, projected fields are expected
    /// to be.
    pub fn validate_date(&self, field: &str, value: &str, now: NaiveDate) -> Vec<FieldVerdict> {
        let value = value.trim();
        if value.is_empty() {
            return vec![FieldVerdict::info(field, "empty")];
        }

        if !CANONICAL_DATE.is_match(value) {
            let reading = normalize(value);
            let message = match reading.iso() {
                Some(iso) => format!(
                    "Invalid date format '{}': expected YYYY-MM-DD (closest reading {}, {} confidence)",
                    value,
                    iso,
                    reading.confidence().as_str()
                ),
                None => format!("Invalid date format '{}': expected YYYY-MM-DD", value),
            };
            return vec![FieldVerdict::error(field, message)];
        }

        let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
            return vec![FieldVerdict::error(
                field,
                format!("'{}' is not a calendar date", value),
            )];
        };

        if !(self.policy.min_year..=self.policy.max_year).contains(&date.year()) {
            return vec![FieldVerdict::error(
                field,
                format!(
                    "Year {} outside accepted range {}-{}",
                    date.year(),
                    self.policy.min_year,
                    self.policy.max_year
                ),
            )];
        }

        let mut verdicts = vec![FieldVerdict::info(field, format!("Valid date {}", value))];

        if date > now {
            let kind = self
                .policy
                .date_fields
                .get(field)
                .copied()
                .unwrap_or(DateFieldKind::PastEvent);
            verdicts.push(match kind {
                DateFieldKind::PastEvent => FieldVerdict::error(
                    field,
                    format!("Date {} is in the future for an event that already happened", value),
                ),
                DateFieldKind::Projected => {
                    FieldVerdict::info(field, format!("Projected date {} is in the future (expected)", value))
                }
            });
        }

        verdicts
    }

    /// Account-type style fields: unknown values are common in real data and
    /// only earn a warning
    pub fn validate_category(&self, field: &str, value: &str) -> FieldVerdict {
        let value = value.trim();
        if value.is_empty() {
            return FieldVerdict::info(field, "empty");
        }

        if contains_ignore_case(&self.policy.known_account_types, value) {
            FieldVerdict::info(field, format!("Known value: {}", value))
        } else {
            FieldVerdict::warning(field, format!("Unrecognized value: {}", value))
        }
    }

    pub fn validate_bureau(&self, field: &str, value: &str) -> FieldVerdict {
        let value = value.trim();
        if contains_ignore_case(&self.policy.known_bureaus, value) {
            return FieldVerdict::info(field, format!("Known bureau: {}", value));
        }

        let known: Vec<&str> = self.policy.known_bureaus.iter().map(String::as_str).collect();
        if value.is_empty() {
            FieldVerdict::error(field, format!("Bureau is empty; expected one of {}", known.join(", ")))
        } else {
            FieldVerdict::error(
                field,
                format!("Unknown bureau '{}'; expected one of {}", value, known.join(", ")),
            )
        }
    }

    /// Creditor/furnisher names
    pub fn validate_name(&self, field: &str, value: &str) -> FieldVerdict {
        let value = value.trim();
        if value.is_empty() {
            return FieldVerdict::warning(field, "Name is empty");
        }

        let len = value.chars().count();
        if len < self.policy.name_min_len || len > self.policy.name_max_len {
            return FieldVerdict::error(
                field,
                format!(
                    "Name length {} outside {}-{} characters",
                    len, self.policy.name_min_len, self.policy.name_max_len
                ),
            );
        }

        if value
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
        {
            return FieldVerdict::warning(
                field,
                format!("'{}' looks like an account number, not a name", value),
            );
        }

        FieldVerdict::info(field, format!("Name present: {}", value))
    }

    /// Cross-field date relationships
    pub fn validate_date_logic(&self, fields: &BTreeMap<String, FieldInput>) -> Vec<FieldVerdict> {
        let date = |name: &str| fields.get(name).and_then(|input| self.parse_strict(input.value()));
        let opened = date(DATE_OPENED);
        let delinquency = date(DELINQUENCY_DATE);
        let removal = date(REMOVAL_DATE);

        let mut verdicts = Vec::new();

        if let (Some(opened), Some(delinquency)) = (opened, delinquency) {
            if delinquency < opened {
                verdicts.push(FieldVerdict::info(
                    DELINQUENCY_DATE,
                    format!(
                        "Delinquency date {} precedes account opened {} (expected for collection accounts)",
                        delinquency, opened
                    ),
                ));
            }
        }

        if let (Some(delinquency), Some(removal)) = (delinquency, removal) {
            if removal <= delinquency {
                verdicts.push(FieldVerdict::error(
                    REMOVAL_DATE,
                    format!(
                        "Removal date {} is not after delinquency date {}",
                        removal, delinquency
                    ),
                ));
            } else {
                let mandated = estimate_removal(delinquency);
                if removal > mandated {
                    verdicts.push(FieldVerdict::warning(
                        REMOVAL_DATE,
                        format!(
                            "Removal date {} is later than the mandated {} (possible re-aging)",
                            removal, mandated
                        ),
                    ));
                }
            }
        }

        verdicts
    }

    /// Validate every field the policy knows how to check, then the
    /// cross-field date logic
    pub fn validate_all(
        &self,
        fields: &BTreeMap<String, FieldInput>,
        now: NaiveDate,
    ) -> Vec<FieldVerdict> {
        let mut verdicts = Vec::new();

        for (name, input) in fields {
            let name = name.as_str();
            let value = input.value();

            if input.confidence() == Some(ConfidenceTier::Low) {
                verdicts.push(FieldVerdict::warning(
                    name,
                    format!("Low extraction confidence for '{}'", value.trim()),
                ));
            }

            if self.policy.date_fields.contains_key(name) {
                verdicts.extend(self.validate_date(name, value, now));
            } else if self.policy.category_fields.contains(name) {
                verdicts.push(self.validate_category(name, value));
            } else if self.policy.bureau_fields.contains(name) {
                verdicts.push(self.validate_bureau(name, value));
            } else if self.policy.name_fields.contains(name) {
                verdicts.push(self.validate_name(name, value));
            } else {
                trace!(field = name, "no validator for field");
            }
        }

        verdicts.extend(self.validate_date_logic(fields));
        verdicts
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

fn contains_ignore_case(set: &BTreeSet<String>, value: &str) -> bool {
    set.iter().any(|known| known.eq_ignore_ascii_case(value))
}
