//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Listings are ordered by
//! creation time descending; the parent-scoped listings additionally
//! carry a required fallback: if the ordered query fails (for example
//! because a composite index is missing), the implementation must
//! retry the identical filter without the ordering clause and return
//! the unordered rows rather than surfacing the error.
//!
//! Writes are never retried; deletes are hard deletes with no
//! cascade.

use uuid::Uuid;

use crate::error::AquamonResult;
use crate::models::{
    measurement::{Measurement, NewReading},
    pole::{CreatePole, Pole, UpdatePole},
    profile::{CreateProfile, UpdateProfile, UserProfile},
    protection::{Collection, ProtectionRecord, ProtectionUpdate},
    region::{CreateRegion, Region, UpdateRegion},
    well::{CreateWell, UpdateWellInfo, Well, WellStatus},
};

pub trait RegionRepository: Send + Sync {
    fn create(&self, input: CreateRegion) -> impl Future<Output = AquamonResult<Region>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateRegion,
    ) -> impl Future<Output = AquamonResult<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AquamonResult<()>> + Send;
    /// All regions, newest first.
    fn list(&self) -> impl Future<Output = AquamonResult<Vec<Region>>> + Send;
    /// Regions created by the given user, newest first.
    fn list_by_creator(
        &self,
        created_by: &str,
    ) -> impl Future<Output = AquamonResult<Vec<Region>>> + Send;
}

pub trait PoleRepository: Send + Sync {
    fn create(&self, input: CreatePole) -> impl Future<Output = AquamonResult<Pole>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdatePole,
    ) -> impl Future<Output = AquamonResult<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AquamonResult<()>> + Send;
    /// Poles in a region, newest first when the ordered query
    /// succeeds, unordered otherwise (see module docs).
    fn list_by_region(
        &self,
        region_id: Uuid,
    ) -> impl Future<Output = AquamonResult<Vec<Pole>>> + Send;
    fn list_by_creator(
        &self,
        created_by: &str,
    ) -> impl Future<Output = AquamonResult<Vec<Pole>>> + Send;
}

pub trait WellRepository: Send + Sync {
    fn create(&self, input: CreateWell) -> impl Future<Output = AquamonResult<Well>> + Send;
    /// Update name and/or status, returning the updated well.
    fn update_info(
        &self,
        id: Uuid,
        input: UpdateWellInfo,
    ) -> impl Future<Output = AquamonResult<Well>> + Send;
    fn update_status(
        &self,
        id: Uuid,
        status: WellStatus,
    ) -> impl Future<Output = AquamonResult<Well>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AquamonResult<()>> + Send;
    /// Wells under a pole, newest first when the ordered query
    /// succeeds, unordered otherwise (see module docs).
    fn list_by_pole(&self, pole_id: Uuid)
    -> impl Future<Output = AquamonResult<Vec<Well>>> + Send;
    fn list_by_creator(
        &self,
        created_by: &str,
    ) -> impl Future<Output = AquamonResult<Vec<Well>>> + Send;

    /// Append a measurement to the well's history and denormalize it
    /// as the well's current reading. Both records carry the same
    /// timestamp.
    fn record_measurement(
        &self,
        well_id: Uuid,
        reading: NewReading,
    ) -> impl Future<Output = AquamonResult<Measurement>> + Send;

    /// Full measurement history, newest first.
    fn list_measurements(
        &self,
        well_id: Uuid,
    ) -> impl Future<Output = AquamonResult<Vec<Measurement>>> + Send;
}

pub trait ProfileRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProfile,
    ) -> impl Future<Output = AquamonResult<UserProfile>> + Send;
    fn get_by_uid(&self, uid: Uuid) -> impl Future<Output = AquamonResult<UserProfile>> + Send;
    fn update(
        &self,
        uid: Uuid,
        input: UpdateProfile,
    ) -> impl Future<Output = AquamonResult<UserProfile>> + Send;
    fn delete(&self, uid: Uuid) -> impl Future<Output = AquamonResult<()>> + Send;
}

/// Persistence seam for the access gate: a uniform view of the
/// protection fields on any row of the three hierarchy collections.
pub trait ProtectionStore: Send + Sync {
    fn load(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> impl Future<Output = AquamonResult<ProtectionRecord>> + Send;
    fn store(
        &self,
        collection: Collection,
        id: Uuid,
        update: ProtectionUpdate,
    ) -> impl Future<Output = AquamonResult<()>> + Send;
}

/// Binary asset storage keyed by well id and file name.
pub trait ImageStore: Send + Sync {
    /// Store the bytes and return a retrieval URL.
    fn store(
        &self,
        well_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = AquamonResult<String>> + Send;
}
