//! Pole domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sub-site within a region, grouping several wells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pole {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// The region this pole belongs to.
    pub region_id: Uuid,
    /// Free-text location (an address, a description, or printed
    /// coordinates).
    pub location: String,
    pub created_by: String,
    pub updated_by: String,
    pub is_password_protected: bool,
    pub protecting_secret: Option<String>,
    pub protected_at: Option<DateTime<Utc>>,
    pub protected_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new pole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePole {
    pub name: String,
    pub description: String,
    pub region_id: Uuid,
    pub location: String,
    pub created_by: String,
}

/// Fields that can be updated on an existing pole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePole {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub updated_by: String,
}
