//! Fixed-width record decoding
//!
//! Slices a fixed-length line into named field strings using a static
//! offset table. Decoding is purely structural and never fails: short lines
//! are right-padded with spaces to the layout length before slicing.
//!
//! The offset table is an external contract. Any change to offsets ships as
//! a new layout version, since misalignment silently produces wrong values.

use crate::error::EngineError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Version tag of the Metro 2 base segment layout
pub const METRO2_BASE_VERSION: &str = "metro2-base-426";

/// Length of a Metro 2 base segment
pub const METRO2_BASE_LENGTH: usize = 426;

pub const RECORD_DESCRIPTOR_WORD: &str = "record_descriptor_word";
pub const PROCESSING_INDICATOR: &str = "processing_indicator";
pub const TIME_STAMP: &str = "time_stamp";
pub const IDENTIFICATION_NUMBER: &str = "identification_number";
pub const CYCLE_IDENTIFIER: &str = "cycle_identifier";
pub const CONSUMER_ACCOUNT_NUMBER: &str = "consumer_account_number";
pub const PORTFOLIO_TYPE: &str = "portfolio_type";
pub const ACCOUNT_TYPE: &str = "account_type";
pub const DATE_OPENED: &str = "date_opened";
pub const CREDIT_LIMIT: &str = "credit_limit";
pub const HIGHEST_CREDIT: &str = "highest_credit";
pub const TERMS_DURATION: &str = "terms_duration";
pub const TERMS_FREQUENCY: &str = "terms_frequency";
pub const SCHEDULED_MONTHLY_PAYMENT: &str = "scheduled_monthly_payment";
pub const ACTUAL_PAYMENT_AMOUNT: &str = "actual_payment_amount";
pub const ACCOUNT_STATUS: &str = "account_status";
pub const PAYMENT_RATING: &str = "payment_rating";
pub const PAYMENT_HISTORY_PROFILE: &str = "payment_history_profile";
pub const SPECIAL_COMMENT: &str = "special_comment";
pub const COMPLIANCE_CONDITION_CODE: &str = "compliance_condition_code";
pub const CURRENT_BALANCE: &str = "current_balance";
pub const AMOUNT_PAST_DUE: &str = "amount_past_due";
pub const ORIGINAL_CHARGE_OFF_AMOUNT: &str = "original_charge_off_amount";
pub const DATE_OF_ACCOUNT_INFORMATION: &str = "date_of_account_information";
pub const DATE_OF_FIRST_DELINQUENCY: &str = "date_of_first_delinquency";
pub const DATE_CLOSED: &str = "date_closed";
pub const DATE_OF_LAST_PAYMENT: &str = "date_of_last_payment";
pub const INTEREST_TYPE_INDICATOR: &str = "interest_type_indicator";

/// A named `[start, end)` character range, zero-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

const fn field(name: &'static str, start: usize, end: usize) -> FieldSpec {
    FieldSpec { name, start, end }
}

/// Metro 2 base segment, positions 1-214 of the 426-character record.
/// Position 20 is reserved and not decoded.
const METRO2_BASE_FIELDS: &[FieldSpec] = &[
    field(RECORD_DESCRIPTOR_WORD, 0, 4),
    field(PROCESSING_INDICATOR, 4, 5),
    field(TIME_STAMP, 5, 19),
    field(IDENTIFICATION_NUMBER, 20, 40),
    field(CYCLE_IDENTIFIER, 40, 42),
    field(CONSUMER_ACCOUNT_NUMBER, 42, 72),
    field(PORTFOLIO_TYPE, 72, 73),
    field(ACCOUNT_TYPE, 73, 75),
    field(DATE_OPENED, 75, 83),
    field(CREDIT_LIMIT, 83, 92),
    field(HIGHEST_CREDIT, 92, 101),
    field(TERMS_DURATION, 101, 104),
    field(TERMS_FREQUENCY, 104, 105),
    field(SCHEDULED_MONTHLY_PAYMENT, 105, 114),
    field(ACTUAL_PAYMENT_AMOUNT, 114, 123),
    field(ACCOUNT_STATUS, 123, 125),
    field(PAYMENT_RATING, 125, 126),
    field(PAYMENT_HISTORY_PROFILE, 126, 150),
    field(SPECIAL_COMMENT, 150, 152),
    field(COMPLIANCE_CONDITION_CODE, 152, 154),
    field(CURRENT_BALANCE, 154, 163),
    field(AMOUNT_PAST_DUE, 163, 172),
    field(ORIGINAL_CHARGE_OFF_AMOUNT, 172, 181),
    field(DATE_OF_ACCOUNT_INFORMATION, 181, 189),
    field(DATE_OF_FIRST_DELINQUENCY, 189, 197),
    field(DATE_CLOSED, 197, 205),
    field(DATE_OF_LAST_PAYMENT, 205, 213),
    field(INTEREST_TYPE_INDICATOR, 213, 214),
];

/// A versioned offset table.
///
/// Every field range lies within `record_length`, checked when the layout
/// is built, so slicing a padded line can never go out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLayout {
    version: String,
    record_length: usize,
    fields: Vec<FieldSpec>,
}

impl RecordLayout {
    /// Build a custom layout, rejecting empty or out-of-range fields
    pub fn new(
        version: &str,
        record_length: usize,
        fields: Vec<FieldSpec>,
    ) -> Result<Self, EngineError> {
        for spec in &fields {
            if spec.start >= spec.end || spec.end > record_length {
                return Err(EngineError::InvalidLayout(format!(
                    "{} field {} spans {}..{} outside record length {}",
                    version, spec.name, spec.start, spec.end, record_length
                )));
            }
        }

        Ok(Self {
            version: version.to_string(),
            record_length,
            fields,
        })
    }

    /// The canonical Metro 2 base segment layout
    pub fn metro2_base() -> Self {
        let widest = METRO2_BASE_FIELDS.iter().map(|f| f.end).max().unwrap_or(0);
        Self {
            version: METRO2_BASE_VERSION.to_string(),
            record_length: METRO2_BASE_LENGTH.max(widest),
            fields: METRO2_BASE_FIELDS.to_vec(),
        }
    }

    /// Resolve a layout by its version tag
    pub fn by_version(version: &str) -> Result<Self, EngineError> {
        match version {
            METRO2_BASE_VERSION => Ok(Self::metro2_base()),
            other => Err(EngineError::UnknownLayout(other.to_string())),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn record_length(&self) -> usize {
        self.record_length
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Field name to trimmed value, as sliced from one line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixedWidthRecord {
    fields: BTreeMap<String, String>,
}

impl FixedWidthRecord {
    /// Value of `name`, or `""` when the layout has no such field
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FixedWidthRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Slice `line` according to `layout`.
///
/// Line terminators are dropped, then the line is right-padded with spaces
/// to the layout length. Slicing is by character so multi-byte noise cannot
/// split a code point. Values are trimmed of padding on both sides.
pub fn decode(line: &str, layout: &RecordLayout) -> FixedWidthRecord {
    let mut chars: Vec<char> = line.trim_end_matches(['\r', '\n']).chars().collect();
    if chars.len() < layout.record_length {
        chars.resize(layout.record_length, ' ');
    }

    layout
        .fields
        .iter()
        .map(|spec| {
            let value: String = chars[spec.start..spec.end].iter().collect();
            (spec.name, value.trim().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Place `value` at `start` in a blank line of `len` characters
    fn place(line: &mut Vec<char>, start: usize, value: &str) {
        for (i, c) in value.chars().enumerate() {
            line[start + i] = c;
        }
    }

    #[test]
    fn test_metro2_layout_is_well_formed() {
        let layout = RecordLayout::metro2_base();
        assert_eq!(layout.record_length(), 426);
        assert_eq!(layout.version(), METRO2_BASE_VERSION);

        let rebuilt = RecordLayout::new(
            layout.version(),
            layout.record_length(),
            layout.fields().to_vec(),
        );
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_metro2_fields_do_not_overlap() {
        let layout = RecordLayout::metro2_base();
        for pair in layout.fields().windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "{} overlaps {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn test_date_offsets() {
        let layout = RecordLayout::metro2_base();
        let dofd = layout.field(DATE_OF_FIRST_DELINQUENCY).unwrap();
        assert_eq!((dofd.start, dofd.end), (189, 197));
        let status = layout.field(ACCOUNT_STATUS).unwrap();
        assert_eq!((status.start, status.end), (123, 125));
    }

    #[test]
    fn test_decode_full_line() {
        let layout = RecordLayout::metro2_base();
        let mut line = vec![' '; 426];
        place(&mut line, 0, "0426");
        place(&mut line, 42, "ACCT-000123");
        place(&mut line, 73, "18");
        place(&mut line, 75, "06152015");
        place(&mut line, 123, "97");
        place(&mut line, 189, "03152018");
        let line: String = line.into_iter().collect();

        let record = decode(&line, &layout);
        assert_eq!(record.get(RECORD_DESCRIPTOR_WORD), "0426");
        assert_eq!(record.get(CONSUMER_ACCOUNT_NUMBER), "ACCT-000123");
        assert_eq!(record.get(ACCOUNT_TYPE), "18");
        assert_eq!(record.get(DATE_OPENED), "06152015");
        assert_eq!(record.get(ACCOUNT_STATUS), "97");
        assert_eq!(record.get(DATE_OF_FIRST_DELINQUENCY), "03152018");
        assert_eq!(record.get(DATE_CLOSED), "");
        assert_eq!(record.len(), layout.fields().len());
    }

    #[test]
    fn test_short_line_is_padded() {
        let layout = RecordLayout::metro2_base();
        let record = decode("0426", &layout);
        assert_eq!(record.get(RECORD_DESCRIPTOR_WORD), "0426");
        assert_eq!(record.get(DATE_OF_LAST_PAYMENT), "");
        assert_eq!(record.get(INTEREST_TYPE_INDICATOR), "");
    }

    #[test]
    fn test_empty_line() {
        let record = decode("", &RecordLayout::metro2_base());
        assert!(record.iter().all(|(_, value)| value.is_empty()));
    }

    #[test]
    fn test_line_terminator_is_ignored() {
        let layout = RecordLayout::new("tiny", 4, vec![field("code", 2, 4)]).unwrap();
        assert_eq!(decode("AB7\r\n", &layout).get("code"), "7");
    }

    #[test]
    fn test_non_ascii_does_not_split() {
        let layout = RecordLayout::new("tiny", 4, vec![field("a", 0, 2), field("b", 2, 4)]).unwrap();
        let record = decode("é€xy", &layout);
        assert_eq!(record.get("a"), "é€");
        assert_eq!(record.get("b"), "xy");
    }

    #[test]
    fn test_unknown_field_reads_empty() {
        let record = decode("", &RecordLayout::metro2_base());
        assert!(!record.contains("surname"));
        assert_eq!(record.get("surname"), "");
    }

    #[test]
    fn test_rejects_out_of_range_layout() {
        let err = RecordLayout::new("bad", 10, vec![field("x", 8, 12)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidLayout(_)));

        let err = RecordLayout::new("bad", 10, vec![field("x", 4, 4)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidLayout(_)));
    }

    #[test]
    fn test_by_version() {
        assert!(RecordLayout::by_version(METRO2_BASE_VERSION).is_ok());
        assert!(matches!(
            RecordLayout::by_version("metro2-j1"),
            Err(EngineError::UnknownLayout(_))
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: decoding never panics and yields every layout field
        #[test]
        fn decode_no_panic(line in "\\PC{0,500}") {
            let layout = RecordLayout::metro2_base();
            let record = decode(&line, &layout);
            prop_assert_eq!(record.len(), layout.fields().len());
        }

        /// Property: a prefix shorter than a field's start leaves that field empty
        #[test]
        fn short_prefix_leaves_trailing_fields_empty(line in "[A-Z0-9]{0,181}") {
            let record = decode(&line, &RecordLayout::metro2_base());
            prop_assert_eq!(record.get(DATE_OF_ACCOUNT_INFORMATION), "");
            prop_assert_eq!(record.get(DATE_OF_FIRST_DELINQUENCY), "");
            prop_assert_eq!(record.get(DATE_CLOSED), "");
            prop_assert_eq!(record.get(DATE_OF_LAST_PAYMENT), "");
        }
    }
}
