//! SurrealDB implementation of [`ProfileRepository`].
//!
//! The record id IS the identity uid, which is what makes the uid
//! immutable: there is no uid column to update.

use aquamon_core::error::AquamonResult;
use aquamon_core::models::profile::{CreateProfile, Role, UpdateProfile, UserProfile};
use aquamon_core::repository::ProfileRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "user" => Ok(Role::User),
        "admin" => Ok(Role::Admin),
        other => Err(DbError::Decode(format!("unknown role: {other}"))),
    }
}

fn role_to_string(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Admin => "admin",
    }
}

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    email: String,
    display_name: String,
    phone: String,
    tax_id: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn try_into_profile(self, uid: Uuid) -> Result<UserProfile, DbError> {
        Ok(UserProfile {
            uid,
            email: self.email,
            display_name: self.display_name,
            phone: self.phone,
            tax_id: self.tax_id,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the user profile repository.
#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn create(&self, input: CreateProfile) -> AquamonResult<UserProfile> {
        let uid = input.uid;
        let uid_str = uid.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user_profile', $uid) SET \
                 email = $email, display_name = $display_name, \
                 phone = $phone, tax_id = $tax_id, role = $role",
            )
            .bind(("uid", uid_str.clone()))
            .bind(("email", input.email))
            .bind(("display_name", input.display_name))
            .bind(("phone", input.phone))
            .bind(("tax_id", input.tax_id))
            .bind(("role", role_to_string(input.role).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_profile".into(),
            id: uid_str,
        })?;

        Ok(row.try_into_profile(uid)?)
    }

    async fn get_by_uid(&self, uid: Uuid) -> AquamonResult<UserProfile> {
        let uid_str = uid.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user_profile', $uid)")
            .bind(("uid", uid_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_profile".into(),
            id: uid_str,
        })?;

        Ok(row.try_into_profile(uid)?)
    }

    async fn update(&self, uid: Uuid, input: UpdateProfile) -> AquamonResult<UserProfile> {
        let uid_str = uid.to_string();

        let mut sets = Vec::new();
        if input.display_name.is_some() {
            sets.push("display_name = $display_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.tax_id.is_some() {
            sets.push("tax_id = $tax_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user_profile', $uid) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("uid", uid_str.clone()));

        if let Some(display_name) = input.display_name {
            builder = builder.bind(("display_name", display_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(tax_id) = input.tax_id {
            builder = builder.bind(("tax_id", tax_id));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_profile".into(),
            id: uid_str,
        })?;

        Ok(row.try_into_profile(uid)?)
    }

    async fn delete(&self, uid: Uuid) -> AquamonResult<()> {
        self.db
            .query("DELETE type::record('user_profile', $uid)")
            .bind(("uid", uid.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
