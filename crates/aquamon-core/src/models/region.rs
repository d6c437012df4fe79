//! Region domain model.
//!
//! Regions are the top level of the site hierarchy. Deleting a region
//! does not cascade to its poles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A monitored geographic area grouping several poles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Display name of the creating user. Also the basis of the
    /// creator-bypass rule in the access gate.
    pub created_by: String,
    pub updated_by: String,
    pub is_password_protected: bool,
    /// Obfuscated protecting secret, present only while protected.
    pub protecting_secret: Option<String>,
    pub protected_at: Option<DateTime<Utc>>,
    pub protected_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegion {
    pub name: String,
    pub description: String,
    pub created_by: String,
}

/// Fields that can be updated on an existing region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRegion {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_by: String,
}
