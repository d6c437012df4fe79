//! SurrealDB implementation of [`RegionRepository`].

use aquamon_core::error::{AquamonError, AquamonResult};
use aquamon_core::models::region::{CreateRegion, Region, UpdateRegion};
use aquamon_core::repository::RegionRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct RegionRow {
    name: String,
    description: String,
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
struct RegionRowWithId {
    record_id: String,
    name: String,
    description: String,
    created_by: String,
    updated_by: String,
    is_password_protected: bool,
    protecting_secret: Option<String>,
    protected_at: Option<DateTime<Utc>>,
    protected_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegionRow {
    fn into_region(self, id: Uuid) -> Region {
        Region {
            id,
            name: self.name,
            description: self.description,
            created_by: self.created_by,
            updated_by: self.updated_by,
            is_password_protected: self.is_password_protected,
            protecting_secret: self.protecting_secret,
            protected_at: self.protected_at,
            protected_by: self.protected_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl RegionRowWithId {
    fn try_into_region(self) -> Result<Region, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid region UUID: {e}")))?;
        Ok(Region {
            id,
            name: self.name,
            description: self.description,
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

/// SurrealDB implementation of the Region repository.
#[derive(Clone)]
pub struct SurrealRegionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRegionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, query: &str, bind: (&'static str, String)) -> AquamonResult<Vec<Region>> {
        let mut result = self
            .db
            .query(query)
            .bind((bind.0, bind.1))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<RegionRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_region())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}

impl<C: Connection> RegionRepository for SurrealRegionRepository<C> {
    async fn create(&self, input: CreateRegion) -> AquamonResult<Region> {
        if input.name.trim().is_empty() {
            return Err(AquamonError::Validation {
                message: "region name must not be empty".into(),
            });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('region', $id) SET \
                 name = $name, description = $description, \
                 created_by = $created_by, updated_by = $created_by, \
                 is_password_protected = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("created_by", input.created_by))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<RegionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "region".into(),
            id: id_str,
        })?;

        Ok(row.into_region(id))
    }

    async fn update(&self, id: Uuid, input: UpdateRegion) -> AquamonResult<()> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        sets.push("updated_by = $updated_by");
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('region', $id) SET {}",
            sets.join(", ")
        );

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

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<RegionRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "region".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AquamonResult<()> {
        // Hard delete, no cascade: poles keep their region_id.
        self.db
            .query("DELETE type::record('region', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> AquamonResult<Vec<Region>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM region \
                 ORDER BY created_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RegionRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_region())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_by_creator(&self, created_by: &str) -> AquamonResult<Vec<Region>> {
        self.fetch(
            "SELECT meta::id(id) AS record_id, * FROM region \
             WHERE created_by = $created_by \
             ORDER BY created_at DESC",
            ("created_by", created_by.to_string()),
        )
        .await
    }
}
