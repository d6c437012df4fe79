//! Measurement domain model.
//!
//! Measurements are append-only: they are created by recording a new
//! reading on a well and are never updated or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An operator-defined extra field on a measurement.
///
/// `value` may be a string or a number; the distinction is preserved
/// until export, where everything is rendered as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    pub value: serde_json::Value,
    pub unit: String,
}

/// One timestamped sensor reading recorded against a well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub id: Uuid,
    pub well_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub water_level: f64,
    pub pressure: f64,
    pub flow_rate: f64,
    pub observations: String,
    pub measured_by: String,
    /// Ordered list; order is preserved as entered.
    pub custom_fields: Vec<CustomField>,
}

/// Input for recording a new reading on a well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReading {
    pub water_level: f64,
    pub pressure: f64,
    pub flow_rate: f64,
    pub observations: String,
    pub measured_by: String,
    pub custom_fields: Vec<CustomField>,
}
