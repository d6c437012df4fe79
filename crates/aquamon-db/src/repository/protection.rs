//! SurrealDB implementation of [`ProtectionStore`].
//!
//! One implementation serves all three hierarchy tables: the
//! protection columns are identical on region, pole and well, and the
//! table name comes from the fixed [`Collection`] enum (never from
//! user input).

use aquamon_core::error::AquamonResult;
use aquamon_core::models::protection::{Collection, ProtectionRecord, ProtectionUpdate};
use aquamon_core::repository::ProtectionStore;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProtectionRow {
    created_by: String,
    is_password_protected: bool,
    protecting_secret: Option<String>,
}

/// SurrealDB implementation of the protection store.
#[derive(Clone)]
pub struct SurrealProtectionStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProtectionStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProtectionStore for SurrealProtectionStore<C> {
    async fn load(&self, collection: Collection, id: Uuid) -> AquamonResult<ProtectionRecord> {
        let id_str = id.to_string();
        let query = format!(
            "SELECT created_by, is_password_protected, protecting_secret \
             FROM type::record('{}', $id)",
            collection.table()
        );

        let mut result = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProtectionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: collection.table().into(),
            id: id_str,
        })?;

        Ok(ProtectionRecord {
            created_by: row.created_by,
            is_protected: row.is_password_protected,
            secret: row.protecting_secret,
        })
    }

    async fn store(
        &self,
        collection: Collection,
        id: Uuid,
        update: ProtectionUpdate,
    ) -> AquamonResult<()> {
        let id_str = id.to_string();

        let query = if update.is_protected {
            format!(
                "UPDATE type::record('{}', $id) SET \
                 is_password_protected = true, \
                 protecting_secret = $secret, \
                 protected_at = time::now(), \
                 protected_by = $changed_by, \
                 updated_at = time::now()",
                collection.table()
            )
        } else {
            format!(
                "UPDATE type::record('{}', $id) SET \
                 is_password_protected = false, \
                 protecting_secret = NONE, \
                 protected_at = NONE, \
                 protected_by = NONE, \
                 updated_at = time::now()",
                collection.table()
            )
        };

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if update.is_protected {
            builder = builder
                .bind(("secret", update.secret))
                .bind(("changed_by", update.changed_by));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProtectionRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: collection.table().into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }
}
