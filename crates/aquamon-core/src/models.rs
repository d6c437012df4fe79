//! Domain models for AQUAMON.
//!
//! The site taxonomy is a fixed three-level hierarchy: regions contain
//! poles, poles contain wells, and wells accumulate measurements.

pub mod measurement;
pub mod pole;
pub mod profile;
pub mod protection;
pub mod region;
pub mod well;

pub use measurement::{CustomField, Measurement, NewReading};
pub use pole::{CreatePole, Pole, UpdatePole};
pub use profile::{CreateProfile, Role, UpdateProfile, UserProfile};
pub use protection::{Collection, ProtectionRecord, ProtectionUpdate};
pub use region::{CreateRegion, Region, UpdateRegion};
pub use well::{CreateWell, CurrentReading, UpdateWellInfo, Well, WellStatus};
