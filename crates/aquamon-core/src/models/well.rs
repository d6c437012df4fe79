//! Well domain model.
//!
//! A well carries a denormalized copy of its latest reading so list
//! views never need to touch the measurement history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational status of a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellStatus {
    Active,
    Inactive,
    Maintenance,
}

/// The latest reading, denormalized onto the well record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentReading {
    pub water_level: f64,
    pub pressure: f64,
    pub flow_rate: f64,
    pub observations: String,
    pub last_measurement_at: DateTime<Utc>,
}

/// A monitored unit belonging to one pole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Well {
    pub id: Uuid,
    pub name: String,
    pub pole_id: Uuid,
    pub status: WellStatus,
    pub reading: CurrentReading,
    pub created_by: String,
    pub updated_by: String,
    pub is_password_protected: bool,
    pub protecting_secret: Option<String>,
    pub protected_at: Option<DateTime<Utc>>,
    pub protected_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new well. The initial reading is
/// zero-valued and stamped with the creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWell {
    pub name: String,
    pub pole_id: Uuid,
    pub status: WellStatus,
    pub created_by: String,
}

/// Identity fields that can be updated on a well without recording a
/// measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWellInfo {
    pub name: Option<String>,
    pub status: Option<WellStatus>,
    pub updated_by: String,
}
