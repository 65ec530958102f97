pub mod dates;
pub mod fields;
pub mod types;

pub use dates::{ConfidenceTier, DateValue};
pub use fields::{FieldInput, FieldVerdict, VerdictSeverity};
pub use types::{Severity, TimelineReport, Violation};
