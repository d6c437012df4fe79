//! Protection state shared by all three hierarchy collections.
//!
//! Per-item password protection is advisory: it gates navigation in
//! the console, not access at the store. The protecting secret is
//! stored obfuscated (reversibly), never hashed.

use serde::{Deserialize, Serialize};

/// Names one of the three protected collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Regions,
    Poles,
    Wells,
}

impl Collection {
    /// The backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Regions => "region",
            Collection::Poles => "pole",
            Collection::Wells => "well",
        }
    }
}

/// The access gate's read view of any protected row.
#[derive(Debug, Clone)]
pub struct ProtectionRecord {
    pub created_by: String,
    pub is_protected: bool,
    /// Obfuscated secret at rest, if one is set.
    pub secret: Option<String>,
}

/// The access gate's write view: enabling stores an obfuscated secret
/// and stamps who changed it; disabling clears all three.
#[derive(Debug, Clone)]
pub struct ProtectionUpdate {
    pub is_protected: bool,
    pub secret: Option<String>,
    pub changed_by: Option<String>,
}
