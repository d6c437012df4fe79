//! SurrealDB implementation of [`WellRepository`].
//!
//! Wells carry a denormalized `reading` object holding the latest
//! measurement; recording a reading updates the well and appends to
//! the `measurement` table with the same timestamp. Parent-scoped
//! listing uses the same ordered-then-unordered fallback as poles.

use aquamon_core::error::{AquamonError, AquamonResult};
use aquamon_core::models::measurement::{Measurement, NewReading};
use aquamon_core::models::well::{CreateWell, CurrentReading, UpdateWellInfo, Well, WellStatus};
use aquamon_core::repository::WellRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn parse_status(s: &str) -> Result<WellStatus, DbError> {
    match s {
        "active" => Ok(WellStatus::Active),
        "inactive" => Ok(WellStatus::Inactive),
        "maintenance" => Ok(WellStatus::Maintenance),
        other => Err(DbError::Decode(format!("unknown well status: {other}"))),
    }
}

fn status_to_string(s: WellStatus) -> &'static str {
    match s {
        WellStatus::Active => "active",
        WellStatus::Inactive => "inactive",
        WellStatus::Maintenance => "maintenance",
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct WellRow {
    name: String,
    pole_id: String,
    status: String,
    reading: serde_json::Value,
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
struct WellRowWithId {
    record_id: String,
    name: String,
    pole_id: String,
    status: String,
    reading: serde_json::Value,
    created_by: String,
    updated_by: String,
    is_password_protected: bool,
    protecting_secret: Option<String>,
    protected_at: Option<DateTime<Utc>>,
    protected_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WellRow {
    fn try_into_well(self, id: Uuid) -> Result<Well, DbError> {
        let pole_id = Uuid::parse_str(&self.pole_id)
            .map_err(|e| DbError::Decode(format!("invalid pole UUID: {e}")))?;
        let reading: CurrentReading = serde_json::from_value(self.reading)
            .map_err(|e| DbError::Decode(format!("invalid well reading: {e}")))?;
        Ok(Well {
            id,
            name: self.name,
            pole_id,
            status: parse_status(&self.status)?,
            reading,
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

impl WellRowWithId {
    fn try_into_well(self) -> Result<Well, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid well UUID: {e}")))?;
        let row = WellRow {
            name: self.name,
            pole_id: self.pole_id,
            status: self.status,
            reading: self.reading,
            created_by: self.created_by,
            updated_by: self.updated_by,
            is_password_protected: self.is_password_protected,
            protecting_secret: self.protecting_secret,
            protected_at: self.protected_at,
            protected_by: self.protected_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.try_into_well(id)
    }
}

/// DB-side measurement row including the record ID.
#[derive(Debug, SurrealValue)]
struct MeasurementRowWithId {
    record_id: String,
    well_id: String,
    timestamp: DateTime<Utc>,
    water_level: f64,
    pressure: f64,
    flow_rate: f64,
    observations: String,
    measured_by: String,
    custom_fields: serde_json::Value,
}

impl MeasurementRowWithId {
    fn try_into_measurement(self) -> Result<Measurement, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid measurement UUID: {e}")))?;
        let well_id = Uuid::parse_str(&self.well_id)
            .map_err(|e| DbError::Decode(format!("invalid well UUID: {e}")))?;
        let custom_fields = serde_json::from_value(self.custom_fields)
            .map_err(|e| DbError::Decode(format!("invalid custom fields: {e}")))?;
        Ok(Measurement {
            id,
            well_id,
            timestamp: self.timestamp,
            water_level: self.water_level,
            pressure: self.pressure,
            flow_rate: self.flow_rate,
            observations: self.observations,
            measured_by: self.measured_by,
            custom_fields,
        })
    }
}

/// SurrealDB implementation of the Well repository.
#[derive(Clone)]
pub struct SurrealWellRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWellRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(
        &self,
        query: &str,
        bind: (&'static str, String),
    ) -> Result<Vec<Well>, DbError> {
        let mut result = self.db.query(query).bind((bind.0, bind.1)).await?;
        let rows: Vec<WellRowWithId> = result.take(0)?;
        rows.into_iter().map(|row| row.try_into_well()).collect()
    }

    async fn take_updated(
        &self,
        query: String,
        binds: Vec<(&'static str, String)>,
        id: Uuid,
    ) -> AquamonResult<Well> {
        let id_str = id.to_string();
        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        for (key, value) in binds {
            builder = builder.bind((key, value));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<WellRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "well".into(),
            id: id_str,
        })?;

        Ok(row.try_into_well(id)?)
    }
}

impl<C: Connection> WellRepository for SurrealWellRepository<C> {
    async fn create(&self, input: CreateWell) -> AquamonResult<Well> {
        if input.name.trim().is_empty() {
            return Err(AquamonError::Validation {
                message: "well name must not be empty".into(),
            });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // A fresh well starts with a zero-valued reading stamped at
        // creation time.
        let reading = CurrentReading {
            water_level: 0.0,
            pressure: 0.0,
            flow_rate: 0.0,
            observations: String::new(),
            last_measurement_at: Utc::now(),
        };
        let reading_value = serde_json::to_value(&reading)
            .map_err(|e| DbError::Decode(format!("reading encode failed: {e}")))?;

        let result = self
            .db
            .query(
                "CREATE type::record('well', $id) SET \
                 name = $name, pole_id = $pole_id, status = $status, \
                 reading = $reading, \
                 created_by = $created_by, updated_by = $created_by, \
                 is_password_protected = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("pole_id", input.pole_id.to_string()))
            .bind(("status", status_to_string(input.status).to_string()))
            .bind(("reading", reading_value))
            .bind(("created_by", input.created_by))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<WellRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "well".into(),
            id: id_str,
        })?;

        Ok(row.try_into_well(id)?)
    }

    async fn update_info(&self, id: Uuid, input: UpdateWellInfo) -> AquamonResult<Well> {
        let mut sets = Vec::new();
        let mut binds = vec![("updated_by", input.updated_by.clone())];
        if let Some(name) = input.name {
            sets.push("name = $name");
            binds.push(("name", name));
        }
        if let Some(status) = input.status {
            sets.push("status = $status");
            binds.push(("status", status_to_string(status).to_string()));
        }
        sets.push("updated_by = $updated_by");
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('well', $id) SET {}", sets.join(", "));
        self.take_updated(query, binds, id).await
    }

    async fn update_status(&self, id: Uuid, status: WellStatus) -> AquamonResult<Well> {
        let query = "UPDATE type::record('well', $id) SET \
                     status = $status, updated_at = time::now()"
            .to_string();
        self.take_updated(
            query,
            vec![("status", status_to_string(status).to_string())],
            id,
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> AquamonResult<()> {
        self.db
            .query("DELETE type::record('well', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_pole(&self, pole_id: Uuid) -> AquamonResult<Vec<Well>> {
        let pole_id_str = pole_id.to_string();

        Ok(super::list_with_order_fallback(
            "well",
            pole_id,
            || {
                self.fetch(
                    "SELECT meta::id(id) AS record_id, * FROM well \
                     WHERE pole_id = $pole_id \
                     ORDER BY created_at DESC",
                    ("pole_id", pole_id_str.clone()),
                )
            },
            || {
                self.fetch(
                    "SELECT meta::id(id) AS record_id, * FROM well \
                     WHERE pole_id = $pole_id",
                    ("pole_id", pole_id_str.clone()),
                )
            },
        )
        .await?)
    }

    async fn list_by_creator(&self, created_by: &str) -> AquamonResult<Vec<Well>> {
        Ok(self
            .fetch(
                "SELECT meta::id(id) AS record_id, * FROM well \
                 WHERE created_by = $created_by \
                 ORDER BY created_at DESC",
                ("created_by", created_by.to_string()),
            )
            .await?)
    }

    async fn record_measurement(
        &self,
        well_id: Uuid,
        reading: NewReading,
    ) -> AquamonResult<Measurement> {
        let now = Utc::now();
        let well_id_str = well_id.to_string();

        // 1. Denormalize the latest reading onto the well. This also
        //    confirms the well exists before anything is appended.
        let current = CurrentReading {
            water_level: reading.water_level,
            pressure: reading.pressure,
            flow_rate: reading.flow_rate,
            observations: reading.observations.clone(),
            last_measurement_at: now,
        };
        let reading_value = serde_json::to_value(&current)
            .map_err(|e| DbError::Decode(format!("reading encode failed: {e}")))?;

        let result = self
            .db
            .query(
                "UPDATE type::record('well', $id) SET \
                 reading = $reading, \
                 updated_at = $now, updated_by = $measured_by",
            )
            .bind(("id", well_id_str.clone()))
            .bind(("reading", reading_value))
            .bind(("now", now))
            .bind(("measured_by", reading.measured_by.clone()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<WellRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "well".into(),
                id: well_id_str,
            }
            .into());
        }

        // 2. Append to the measurement history with the same instant.
        let measurement_id = Uuid::new_v4();
        let custom_fields_value = serde_json::to_value(&reading.custom_fields)
            .map_err(|e| DbError::Decode(format!("custom fields encode failed: {e}")))?;

        self.db
            .query(
                "CREATE type::record('measurement', $id) SET \
                 well_id = $well_id, timestamp = $timestamp, \
                 water_level = $water_level, pressure = $pressure, \
                 flow_rate = $flow_rate, observations = $observations, \
                 measured_by = $measured_by, \
                 custom_fields = $custom_fields",
            )
            .bind(("id", measurement_id.to_string()))
            .bind(("well_id", well_id_str))
            .bind(("timestamp", now))
            .bind(("water_level", reading.water_level))
            .bind(("pressure", reading.pressure))
            .bind(("flow_rate", reading.flow_rate))
            .bind(("observations", reading.observations.clone()))
            .bind(("measured_by", reading.measured_by.clone()))
            .bind(("custom_fields", custom_fields_value))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(Measurement {
            id: measurement_id,
            well_id,
            timestamp: now,
            water_level: reading.water_level,
            pressure: reading.pressure,
            flow_rate: reading.flow_rate,
            observations: reading.observations,
            measured_by: reading.measured_by,
            custom_fields: reading.custom_fields,
        })
    }

    async fn list_measurements(&self, well_id: Uuid) -> AquamonResult<Vec<Measurement>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM measurement \
                 WHERE well_id = $well_id \
                 ORDER BY timestamp DESC",
            )
            .bind(("well_id", well_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MeasurementRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_measurement())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
