//! Field inputs from upstream extraction and the verdicts produced for them

use crate::dates::ConfidenceTier;
use serde::{Deserialize, Serialize};

/// A raw field value as supplied by the extraction step.
///
/// Upstream sometimes sends a bare string and sometimes a
/// `{ "value": ..., "confidence": ... }` object; both shapes are folded into
/// this type when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireFieldInput", into = "WireFieldInput")]
pub enum FieldInput {
    Bare(String),
    WithConfidence(String, ConfidenceTier),
}

impl FieldInput {
    pub fn value(&self) -> &str {
        match self {
            FieldInput::Bare(value) | FieldInput::WithConfidence(value, _) => value,
        }
    }

    /// Extraction confidence, when upstream reported one
    pub fn confidence(&self) -> Option<ConfidenceTier> {
        match self {
            FieldInput::Bare(_) => None,
            FieldInput::WithConfidence(_, tier) => Some(*tier),
        }
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        FieldInput::Bare(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        FieldInput::Bare(value)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireFieldInput {
    Bare(String),
    WithConfidence {
        value: String,
        confidence: ConfidenceTier,
    },
}

impl From<WireFieldInput> for FieldInput {
    fn from(wire: WireFieldInput) -> Self {
        match wire {
            WireFieldInput::Bare(value) => FieldInput::Bare(value),
            WireFieldInput::WithConfidence { value, confidence } => {
                FieldInput::WithConfidence(value, confidence)
            }
        }
    }
}

impl From<FieldInput> for WireFieldInput {
    fn from(input: FieldInput) -> Self {
        match input {
            FieldInput::Bare(value) => WireFieldInput::Bare(value),
            FieldInput::WithConfidence(value, confidence) => {
                WireFieldInput::WithConfidence { value, confidence }
            }
        }
    }
}

/// Severity of a per-field verdict. `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVerdict {
    pub field: String,
    pub is_valid: bool,
    pub severity: VerdictSeverity,
    pub message: String,
}

impl FieldVerdict {
    pub fn info(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            is_valid: true,
            severity: VerdictSeverity::Info,
            message: message.into(),
        }
    }

    /// Valid but questionable
    pub fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            is_valid: true,
            severity: VerdictSeverity::Warning,
            message: message.into(),
        }
    }

    pub fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            is_valid: false,
            severity: VerdictSeverity::Error,
            message: message.into(),
        }
    }
}
