//! Dates that claim to be in the future relative to the caller's `now`

use super::{RecordTimeline, TimelineRule, FUTURE_DOFD, FUTURE_REPORT_DATE};
use crate::fixed_width::{DATE_OF_ACCOUNT_INFORMATION, DATE_OF_FIRST_DELINQUENCY};
use shared_types::{Severity, Violation};

pub struct FutureReportDate;

impl TimelineRule for FutureReportDate {
    fn id(&self) -> &'static str {
        FUTURE_REPORT_DATE
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, timeline: &RecordTimeline<'_>) -> Option<Violation> {
        let reported = timeline.date_of_account_information?;
        if reported <= timeline.now {
            return None;
        }

        Some(Violation {
            rule_id: FUTURE_REPORT_DATE.to_string(),
            severity: Severity::High,
            field: DATE_OF_ACCOUNT_INFORMATION.to_string(),
            message: format!(
                "Date of account information {} is after the evaluation date {}",
                reported, timeline.now
            ),
            impact: "A future-dated report cannot reflect the account's actual state".to_string(),
        })
    }
}

pub struct FutureDelinquencyDate;

impl TimelineRule for FutureDelinquencyDate {
    fn id(&self) -> &'static str {
        FUTURE_DOFD
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, timeline: &RecordTimeline<'_>) -> Option<Violation> {
        let dofd = timeline.date_of_first_delinquency?;
        if dofd <= timeline.now {
            return None;
        }

        Some(Violation {
            rule_id: FUTURE_DOFD.to_string(),
            severity: Severity::High,
            field: DATE_OF_FIRST_DELINQUENCY.to_string(),
            message: format!(
                "Date of first delinquency {} is after the evaluation date {}",
                dofd, timeline.now
            ),
            impact: "A future delinquency date pushes the removal date out and keeps the item \
                     on file longer than allowed"
                .to_string(),
        })
    }
}
