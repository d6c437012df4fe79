//! SurrealDB repository implementations.

use std::future::Future;

use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;

mod pole;
mod profile;
mod protection;
mod region;
mod well;

pub use pole::SurrealPoleRepository;
pub use profile::SurrealProfileRepository;
pub use protection::SurrealProtectionStore;
pub use region::SurrealRegionRepository;
pub use well::SurrealWellRepository;

/// Run the ordered parent-scoped listing; if it fails, log a warning
/// and retry the identical filter without the ordering clause. The
/// unordered rows are returned as-is.
pub(crate) async fn list_with_order_fallback<T, O, U, FO, FU>(
    entity: &'static str,
    parent_id: Uuid,
    ordered: O,
    unordered: U,
) -> Result<Vec<T>, DbError>
where
    O: FnOnce() -> FO,
    U: FnOnce() -> FU,
    FO: Future<Output = Result<Vec<T>, DbError>>,
    FU: Future<Output = Result<Vec<T>, DbError>>,
{
    match ordered().await {
        Ok(rows) => Ok(rows),
        Err(e) => {
            warn!(
                entity,
                parent_id = %parent_id,
                error = %e,
                "Ordered listing failed; retrying without ordering"
            );
            unordered().await
        }
    }
}
