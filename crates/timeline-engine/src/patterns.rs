//! Static lookup tables and token helpers shared by the normalizer and rules

/// English month names, January first. Matched case-insensitively.
pub const MONTH_NAMES: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Shortest prefix accepted as a month abbreviation ("jan", "sep", ...)
const MIN_ABBREVIATION_LEN: usize = 3;

/// Resolve a month token such as "Sep", "Sept.", "SEPTEMBER" to 1..=12.
///
/// A token is a month when it is at least three letters long and is a prefix
/// of a full month name.
pub fn month_from_token(token: &str) -> Option<u32> {
    let token = token.trim_end_matches('.').to_lowercase();
    if token.len() < MIN_ABBREVIATION_LEN || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&token))
        .map(|index| index as u32 + 1)
}

/// Iterate the maximal ASCII-alphabetic runs of `text`
pub fn alphabetic_runs(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
}

/// True if any alphabetic run in `text` spells a month name or abbreviation
pub fn contains_month_name(text: &str) -> bool {
    alphabetic_runs(text).any(|run| month_from_token(run).is_some())
}

/// Fill values furnishers write into unused date columns: blank, all zeros
/// or all nines.
pub fn is_sentinel_fill(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.chars().all(|c| c == '0') || value.chars().all(|c| c == '9')
}
