//! Date-ordering checks between two columns of the same record

use super::{
    RecordTimeline, TimelineRule, CLOSED_BEFORE_OPEN, DOFD_AFTER_REPORT, DOFD_BEFORE_OPEN,
    PAYMENT_BEFORE_OPEN,
};
use crate::fixed_width::{
    DATE_CLOSED, DATE_OF_ACCOUNT_INFORMATION, DATE_OF_FIRST_DELINQUENCY, DATE_OF_LAST_PAYMENT,
    DATE_OPENED,
};
use shared_types::{Severity, Violation};

/// Fires when `later_field` holds a date strictly before `earlier_field`.
/// Silent when either date is absent.
#[derive(Debug, Clone, Copy)]
pub struct DateOrderRule {
    pub id: &'static str,
    pub severity: Severity,
    pub earlier_field: &'static str,
    pub later_field: &'static str,
    pub problem: &'static str,
    pub impact: &'static str,
}

pub const DATE_ORDER_RULES: &[DateOrderRule] = &[
    DateOrderRule {
        id: DOFD_BEFORE_OPEN,
        severity: Severity::High,
        earlier_field: DATE_OPENED,
        later_field: DATE_OF_FIRST_DELINQUENCY,
        problem: "Logical impossibility: the account became delinquent before it was opened, \
                  indicating data corruption",
        impact: "The delinquency date anchors the reporting period; a corrupted value can \
                 extend how long the item stays on file",
    },
    DateOrderRule {
        id: CLOSED_BEFORE_OPEN,
        severity: Severity::Medium,
        earlier_field: DATE_OPENED,
        later_field: DATE_CLOSED,
        problem: "The account is reported closed before it was opened",
        impact: "Account age and history length are misstated",
    },
    DateOrderRule {
        id: PAYMENT_BEFORE_OPEN,
        severity: Severity::Low,
        earlier_field: DATE_OPENED,
        later_field: DATE_OF_LAST_PAYMENT,
        problem: "The last payment is dated before the account was opened",
        impact: "Payment activity dates are unreliable for this record",
    },
    DateOrderRule {
        id: DOFD_AFTER_REPORT,
        severity: Severity::Medium,
        earlier_field: DATE_OF_FIRST_DELINQUENCY,
        later_field: DATE_OF_ACCOUNT_INFORMATION,
        problem: "The record was reported before the delinquency it describes occurred",
        impact: "The delinquency date may have been moved forward (re-aged)",
    },
];

impl TimelineRule for DateOrderRule {
    fn id(&self) -> &'static str {
        self.id
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, timeline: &RecordTimeline<'_>) -> Option<Violation> {
        let earlier = timeline.date(self.earlier_field)?;
        let later = timeline.date(self.later_field)?;
        if later >= earlier {
            return None;
        }

        Some(Violation {
            rule_id: self.id.to_string(),
            severity: self.severity,
            field: self.later_field.to_string(),
            message: format!(
                "{} ({} {} is before {} {})",
                self.problem, self.later_field, later, self.earlier_field, earlier
            ),
            impact: self.impact.to_string(),
        })
    }
}
