use chrono::{Days, Months, NaiveDate};

/// Years a negative item may be reported after the delinquency date
pub const RETENTION_YEARS: u32 = 7;

/// Days added on top of the retention years
pub const RETENTION_GRACE_DAYS: u64 = 180;

/// Mandated purge date for an item with the given date of first
/// delinquency: 7 calendar years plus 180 days.
///
/// Years are added as calendar months, so Feb 29 lands on Feb 28 in a
/// non-leap target year; the 180 days are then counted day by day.
pub fn estimate_removal(delinquency: NaiveDate) -> NaiveDate {
    delinquency
        .checked_add_months(Months::new(RETENTION_YEARS * 12))
        .and_then(|date| date.checked_add_days(Days::new(RETENTION_GRACE_DAYS)))
        .unwrap_or(NaiveDate::MAX)
}

/// Whether an item delinquent since `delinquency` should already be gone
/// as of `as_of`
pub fn is_past_removal(delinquency: NaiveDate, as_of: NaiveDate) -> bool {
    estimate_removal(delinquency) <= as_of
}
