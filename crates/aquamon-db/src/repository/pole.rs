//! SurrealDB implementation of [`PoleRepository`].
//!
//! Parent-scoped listing tries the ordered query first and falls back
//! to the identical unordered filter if it fails, mirroring the
//! behavior callers depend on when the composite index is absent.

use aquamon_core::error::{AquamonError, AquamonResult};
use aquamon_core::models::pole::{CreatePole, Pole, UpdatePole};
use aquamon_core::repository::PoleRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct PoleRow {
    name: String,
    description: String,
    region_id: String,
    location: String,
    created_by: String,
    updated_by: String,
    is_password_protected: bool,
    protecting_secret: Option<String>,
    protected_at: Option<DateTime<Utc>>,
    protected_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct PoleRowWithId {
    record_id: String,
    name: String,
    description: String,
    region_id: String,
    location: String,
    created_by: String,
    updated_by: String,
    is_password_protected: bool,
    protecting_secret: Option<String>,
    protected_at: Option<DateTime<Utc>>,
    protected_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PoleRow {
    fn try_into_pole(self, id: Uuid) -> Result<Pole, DbError> {
        let region_id = Uuid::parse_str(&self.region_id)
            .map_err(|e| DbError::Decode(format!("invalid region UUID: {e}")))?;
        Ok(Pole {
            id,
            name: self.name,
            description: self.description,
            region_id,
            location: self.location,
            created_by: self.created_by,
            updated_by: self.updated_by,
            is_password_protected: self.is_password_protected,
            protecting_secret: self.protecting_secret,
            protected_at: self.protected_at,
            protected_by: self.protected_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PoleRowWithId {
    fn try_into_pole(self) -> Result<Pole, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid pole UUID: {e}")))?;
        let region_id = Uuid::parse_str(&self.region_id)
            .map_err(|e| DbError::Decode(format!("invalid region UUID: {e}")))?;
        Ok(Pole {
            id,
            name: self.name,
            description: self.description,
            region_id,
            location: self.location,
            created_by: self.created_by,
            updated_by: self.updated_by,
            is_password_protected: self.is_password_protected,
            protecting_secret: self.protecting_secret,
            protected_at: self.protected_at,
            protected_by: self.protected_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Pole repository.
#[derive(Clone)]
pub struct SurrealPoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(
        &self,
        query: &str,
        bind: (&'static str, String),
    ) -> Result<Vec<Pole>, DbError> {
        let mut result = self.db.query(query).bind((bind.0, bind.1)).await?;
        let rows: Vec<PoleRowWithId> = result.take(0)?;
        rows.into_iter().map(|row| row.try_into_pole()).collect()
    }
}

impl<C: Connection> PoleRepository for SurrealPoleRepository<C> {
    async fn create(&self, input: CreatePole) -> AquamonResult<Pole> {
        if input.name.trim().is_empty() {
            return Err(AquamonError::Validation {
                message: "pole name must not be empty".into(),
            });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('pole', $id) SET \
                 name = $name, description = $description, \
                 region_id = $region_id, location = $location, \
                 created_by = $created_by, updated_by = $created_by, \
                 is_password_protected = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("region_id", input.region_id.to_string()))
            .bind(("location", input.location))
            .bind(("created_by", input.created_by))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<PoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "pole".into(),
            id: id_str,
        })?;

        Ok(row.try_into_pole(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdatePole) -> AquamonResult<()> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        sets.push("updated_by = $updated_by");
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('pole', $id) SET {}", sets.join(", "));

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("updated_by", input.updated_by));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<PoleRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "pole".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AquamonResult<()> {
        self.db
            .query("DELETE type::record('pole', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_region(&self, region_id: Uuid) -> AquamonResult<Vec<Pole>> {
        let region_id_str = region_id.to_string();

        Ok(super::list_with_order_fallback(
            "pole",
            region_id,
            || {
                self.fetch(
                    "SELECT meta::id(id) AS record_id, * FROM pole \
                     WHERE region_id = $region_id \
                     ORDER BY created_at DESC",
                    ("region_id", region_id_str.clone()),
                )
            },
            || {
                self.fetch(
                    "SELECT meta::id(id) AS record_id, * FROM pole \
                     WHERE region_id = $region_id",
                    ("region_id", region_id_str.clone()),
                )
            },
        )
        .await?)
    }

    async fn list_by_creator(&self, created_by: &str) -> AquamonResult<Vec<Pole>> {
        Ok(self
            .fetch(
                "SELECT meta::id(id) AS record_id, * FROM pole \
                 WHERE created_by = $created_by \
                 ORDER BY created_at DESC",
                ("created_by", created_by.to_string()),
            )
            .await?)
    }
}
