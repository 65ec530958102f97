use super::{RecordTimeline, TimelineRule, OBSOLETE_ITEM};
use crate::calendar::{estimate_removal, is_past_removal};
use crate::fixed_width::DATE_OF_FIRST_DELINQUENCY;
use shared_types::{Severity, Violation};

/// Item still reported on or after its mandated removal date.
///
/// The reference date is the record's date of account information when it
/// has one, otherwise `now`.
pub struct ObsoleteItem;

impl TimelineRule for ObsoleteItem {
    fn id(&self) -> &'static str {
        OBSOLETE_ITEM
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, timeline: &RecordTimeline<'_>) -> Option<Violation> {
        let dofd = timeline.date_of_first_delinquency?;
        let reference = timeline.date_of_account_information.unwrap_or(timeline.now);
        if !is_past_removal(dofd, reference) {
            return None;
        }
        let removal = estimate_removal(dofd);

        Some(Violation {
            rule_id: OBSOLETE_ITEM.to_string(),
            severity: Severity::Critical,
            field: DATE_OF_FIRST_DELINQUENCY.to_string(),
            message: format!(
                "Item delinquent since {} had to be removed by {} but is reported as of {}",
                dofd, removal, reference
            ),
            impact: "Obsolete negative information is still on file past the reporting period"
                .to_string(),
        })
    }
}
