use super::{RecordTimeline, TimelineRule, MISSING_DOFD};
use crate::fixed_width::DATE_OF_FIRST_DELINQUENCY;
use shared_types::{Severity, Violation};

/// A negative status (delinquent, collection, charge-off, paid derogatory)
/// reported without a usable date of first delinquency.
///
/// Absence is the trigger here, so sentinel fills and unreadable values
/// count as missing.
pub struct MissingDelinquencyDate;

impl TimelineRule for MissingDelinquencyDate {
    fn id(&self) -> &'static str {
        MISSING_DOFD
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, timeline: &RecordTimeline<'_>) -> Option<Violation> {
        if !timeline.status_codes.requires_delinquency_date(timeline.status) {
            return None;
        }
        if timeline.date_of_first_delinquency.is_some() {
            return None;
        }

        let status = timeline.status.trim();
        let meaning = timeline
            .status_codes
            .meaning(status)
            .unwrap_or("negative status");

        Some(Violation {
            rule_id: MISSING_DOFD.to_string(),
            severity: Severity::Critical,
            field: DATE_OF_FIRST_DELINQUENCY.to_string(),
            message: format!(
                "Account status {} ({}) requires a date of first delinquency, but none is reported",
                status, meaning
            ),
            impact: "Without a delinquency date the mandated removal date cannot be computed, \
                     so the item may be reported indefinitely"
                .to_string(),
        })
    }
}
