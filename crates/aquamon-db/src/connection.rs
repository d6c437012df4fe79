//! SurrealDB connection management.
//!
//! [`DbManager::connect`] establishes the WebSocket session,
//! authenticates, selects the namespace/database pair, and brings the
//! schema up to date before handing the client out, so every consumer
//! sees a migrated database.

use std::env;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema;

/// Connection settings for the monitoring database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, host:port.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "aquamon".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build a config from `AQUAMON_DB_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, fallback: String| env::var(name).unwrap_or(fallback);
        Self {
            url: var("AQUAMON_DB_URL", defaults.url),
            namespace: var("AQUAMON_DB_NAMESPACE", defaults.namespace),
            database: var("AQUAMON_DB_DATABASE", defaults.database),
            username: var("AQUAMON_DB_USERNAME", defaults.username),
            password: var("AQUAMON_DB_PASSWORD", defaults.password),
        }
    }
}

/// A connected, migrated SurrealDB handle.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, authenticate as root, select the configured
    /// namespace/database, and run pending migrations.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        schema::run_migrations(&db).await?;

        info!("Connected to SurrealDB");

        Ok(Self { db })
    }

    /// The underlying client, for constructing repositories.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
