//! User profile domain model.
//!
//! A profile is the denormalized record kept alongside an
//! authenticated identity: role, display name and contact fields.
//! The `uid` is immutable once the profile is created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone: String,
    /// National taxpayer id supplied at registration.
    pub tax_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to provision a profile for a fresh identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub uid: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone: String,
    pub tax_id: String,
    pub role: Role,
}

/// Fields that can be updated on an existing profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
}
