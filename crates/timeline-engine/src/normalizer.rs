//! Fuzzy date normalization
//!
//! Turns free-form or OCR-corrupted date text into a canonical
//! [`NaiveDate`] plus a [`ConfidenceTier`]. Stages run in order and the
//! first success wins:
//!
//! 1. Ordered format patterns on the text as given
//! 2. The same patterns on an OCR-corrected copy (tier capped at Medium)
//! 3. Brute-force digit extraction (`MMDDYYYY` / `MMDDYY`, Low)
//! 4. Bare `19xx`/`20xx` year (January 1, Low)
//!
//! [`normalize`] is total: anything unrecognizable comes back as
//! [`DateValue::unrecognized`].

use crate::patterns::{contains_month_name, month_from_token};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use shared_types::{ConfidenceTier, DateValue};
use tracing::trace;

/// Two-digit years below this map to 20YY, the rest to 19YY
pub const TWO_DIGIT_YEAR_PIVOT: u32 = 50;

/// Years accepted by brute-force digit extraction
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

/// How a pattern's capture groups map onto year, month and day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateShape {
    /// year, month, day
    YearMonthDay,
    /// month, day, 4-digit year
    MonthDayYear,
    /// month, day, 2-digit year
    MonthDayShortYear,
    /// month name, day, year
    MonthNameDayYear,
    /// day, month name, year
    DayMonthNameYear,
    /// year, month (day defaults to 1)
    YearMonth,
    /// month, year (day defaults to 1)
    MonthYear,
    /// month name, year (day defaults to 1)
    MonthNameYear,
}

/// One entry of the ordered pattern table
pub struct DatePattern {
    pub name: &'static str,
    pub tier: ConfidenceTier,
    regex: Regex,
    shape: DateShape,
}

impl DatePattern {
    fn new(name: &'static str, pattern: &str, shape: DateShape, tier: ConfidenceTier) -> Self {
        Self {
            name,
            tier,
            regex: Regex::new(pattern).unwrap(),
            shape,
        }
    }

    /// Parse `text` if this pattern matches it and the result is a real
    /// calendar date
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.regex.captures(text)?;
        let (year, month, day) = match self.shape {
            DateShape::YearMonthDay => (number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?),
            DateShape::MonthDayYear => (number(&caps, 3)?, number(&caps, 1)?, number(&caps, 2)?),
            DateShape::MonthDayShortYear => (
                expand_two_digit_year(number(&caps, 3)?),
                number(&caps, 1)?,
                number(&caps, 2)?,
            ),
            DateShape::MonthNameDayYear => {
                (number(&caps, 3)?, month_name(&caps, 1)?, number(&caps, 2)?)
            }
            DateShape::DayMonthNameYear => {
                (number(&caps, 3)?, month_name(&caps, 2)?, number(&caps, 1)?)
            }
            DateShape::YearMonth => (number(&caps, 1)?, number(&caps, 2)?, 1),
            DateShape::MonthYear => (number(&caps, 2)?, number(&caps, 1)?, 1),
            DateShape::MonthNameYear => (number(&caps, 2)?, month_name(&caps, 1)?, 1),
        };
        NaiveDate::from_ymd_opt(year as i32, month, day)
    }
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn month_name(caps: &Captures<'_>, group: usize) -> Option<u32> {
    month_from_token(caps.get(group)?.as_str())
}

lazy_static! {
    /// Most specific first. Adding a format is one entry here.
    static ref DATE_PATTERNS: Vec<DatePattern> = vec![
        DatePattern::new(
            "iso",
            r"^(\d{4})-(\d{1,2})-(\d{1,2})$",
            DateShape::YearMonthDay,
            ConfidenceTier::High,
        ),
        DatePattern::new(
            "year_first_slash",
            r"^(\d{4})/(\d{1,2})/(\d{1,2})$",
            DateShape::YearMonthDay,
            ConfidenceTier::High,
        ),
        DatePattern::new(
            "month_day_year",
            r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$",
            DateShape::MonthDayYear,
            ConfidenceTier::High,
        ),
        DatePattern::new(
            "month_name_day_year",
            r"^([A-Za-z]+\.?)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$",
            DateShape::MonthNameDayYear,
            ConfidenceTier::High,
        ),
        DatePattern::new(
            "day_month_name_year",
            r"^(\d{1,2})[\s-]+([A-Za-z]+\.?),?[\s-]+(\d{4})$",
            DateShape::DayMonthNameYear,
            ConfidenceTier::High,
        ),
        DatePattern::new(
            "month_day_short_year",
            r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2})$",
            DateShape::MonthDayShortYear,
            ConfidenceTier::Medium,
        ),
        DatePattern::new(
            "year_month",
            r"^(\d{4})[/-](\d{1,2})$",
            DateShape::YearMonth,
            ConfidenceTier::Medium,
        ),
        DatePattern::new(
            "month_year",
            r"^(\d{1,2})[/-](\d{4})$",
            DateShape::MonthYear,
            ConfidenceTier::Medium,
        ),
        DatePattern::new(
            "month_name_year",
            r"^([A-Za-z]+\.?),?[\s-]+(\d{4})$",
            DateShape::MonthNameYear,
            ConfidenceTier::Medium,
        ),
    ];

    static ref BARE_YEAR: Regex =
        Regex::new(r"(?:^|[^0-9])((?:19|20)[0-9]{2})(?:[^0-9]|$)").unwrap();
}

/// The ordered pattern table, exposed for inspection and tests
pub fn date_patterns() -> &'static [DatePattern] {
    &DATE_PATTERNS
}

/// Normalize arbitrary date text. Never fails.
pub fn normalize(raw: &str) -> DateValue {
    let text = raw.trim();
    if text.is_empty() {
        return DateValue::unrecognized(raw);
    }

    if let Some((date, tier)) = match_patterns(text) {
        return DateValue::recovered(raw, date, tier);
    }

    let corrected = if looks_like_date(text) {
        correct_ocr_glyphs(text)
    } else {
        text.to_string()
    };

    if corrected != text {
        if let Some((date, tier)) = match_patterns(&corrected) {
            trace!(raw, corrected = %corrected, "date recovered after OCR correction");
            return DateValue::recovered(raw, date, tier.capped_at(ConfidenceTier::Medium));
        }
    }

    if let Some(date) = extract_digit_run(&corrected) {
        trace!(raw, "date recovered by digit extraction");
        return DateValue::recovered(raw, date, ConfidenceTier::Low);
    }

    if let Some(date) = extract_bare_year(&corrected) {
        trace!(raw, "date recovered from bare year");
        return DateValue::recovered(raw, date, ConfidenceTier::Low);
    }

    trace!(raw, "no date recovered");
    DateValue::unrecognized(raw)
}

fn match_patterns(text: &str) -> Option<(NaiveDate, ConfidenceTier)> {
    DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.parse(text).map(|date| (date, pattern.tier)))
}

/// OCR correction only applies to text that plausibly is a date: it has a
/// slash or dash, or more than two digits.
fn looks_like_date(text: &str) -> bool {
    text.contains('/')
        || text.contains('-')
        || text.chars().filter(|c| c.is_ascii_digit()).count() > 2
}

/// Replace glyphs OCR commonly confuses with digits.
///
/// `O/o -> 0` and `I/l/| -> 1` everywhere except inside a run of letters that
/// spells a month name. `S/s -> 5` is skipped entirely when the text contains
/// a month name, so "Sep" survives.
pub fn correct_ocr_glyphs(text: &str) -> String {
    let keep_s = contains_month_name(text);
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();

    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            run.push(c);
            continue;
        }
        flush_run(&mut out, &mut run, keep_s);
        out.push(if c == '|' { '1' } else { c });
    }
    flush_run(&mut out, &mut run, keep_s);

    out
}

fn flush_run(out: &mut String, run: &mut String, keep_s: bool) {
    if month_from_token(run).is_some() {
        out.push_str(run);
    } else {
        out.extend(run.chars().map(|c| match c {
            'O' | 'o' => '0',
            'I' | 'l' => '1',
            'S' | 's' if !keep_s => '5',
            other => other,
        }));
    }
    run.clear();
}

/// Map a two-digit year onto a century using the fixed pivot
pub fn expand_two_digit_year(yy: u32) -> u32 {
    if yy < TWO_DIGIT_YEAR_PIVOT {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Strip everything but digits and read 8 digits as `MMDDYYYY` or 6 digits
/// as `MMDDYY`.
fn extract_digit_run(text: &str) -> Option<NaiveDate> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    let field = |range: std::ops::Range<usize>| digits.get(range)?.parse::<u32>().ok();

    let (month, day, year) = match digits.len() {
        8 => (field(0..2)?, field(2..4)?, field(4..8)?),
        6 => (field(0..2)?, field(2..4)?, expand_two_digit_year(field(4..6)?)),
        _ => return None,
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    if !PLAUSIBLE_YEARS.contains(&(year as i32)) {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn extract_bare_year(text: &str) -> Option<NaiveDate> {
    let year: i32 = BARE_YEAR.captures(text)?.get(1)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}
