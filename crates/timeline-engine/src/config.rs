//! TOML configuration for the engine
//!
//! Every section is optional. An empty document yields the built-in
//! validation policy, status-code table and citations.
//!
//! ```toml
//! [validation]
//! min_year = 1980
//! known_bureaus = ["Equifax", "Experian", "TransUnion"]
//!
//! [status_codes.XA]
//! meaning = "Regional charge-off code"
//! category = "charge_off"
//!
//! [citations]
//! MISSING_DOFD = "15 U.S.C. § 1681s-2(a)(5)"
//! ```

use crate::citations::CitationTable;
use crate::error::EngineError;
use crate::status_codes::StatusCodeTable;
use crate::validator::ValidationPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationPolicy,
    pub status_codes: StatusCodeTable,
    pub citations: CitationTable,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(s)?)
    }
}
