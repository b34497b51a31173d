//! PostgreSQL implementation of GroupStore and GroupReader.
//!
//! Groups and rides are stored as JSON documents next to the columns the
//! read side filters on. The domain version lives on `ride_groups`; every
//! write is an `UPDATE ... WHERE version = $expected` inside a transaction.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{GroupId, RideId, UserId, Version, Versioned};
use crate::domain::group::Group;
use crate::domain::lifecycle::GroupStatus;
use crate::domain::ride::Ride;
use crate::ports::{GroupReader, GroupStore, StoreError};

/// PostgreSQL-backed group store.
#[derive(Clone)]
pub struct PostgresGroupStore {
    pool: PgPool,
}

impl PostgresGroupStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool sized from configuration, running migrations if asked.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .max_lifetime(config.max_lifetime())
            .connect(&config.url)
            .await
            .map_err(StoreError::backend)?;

        let store = Self::new(pool);
        if config.run_migrations {
            store.migrate().await?;
        }
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    /// Bumps the domain version if it still equals `expected`.
    async fn bump_version(
        tx: &mut Transaction<'_, Postgres>,
        group_id: &GroupId,
        expected: Version,
    ) -> Result<Version, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE ride_groups SET version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(group_id.as_uuid())
        .bind(to_db_version(expected))
        .execute(&mut **tx)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() == 1 {
            return Ok(expected.next());
        }

        let current: Option<i64> = sqlx::query_scalar("SELECT version FROM ride_groups WHERE id = $1")
            .bind(group_id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(StoreError::backend)?;

        match current {
            None => Err(StoreError::GroupNotFound(*group_id)),
            Some(actual) => Err(StoreError::ConcurrentModification {
                group_id: *group_id,
                expected,
                actual: from_db_version(actual),
            }),
        }
    }

    async fn write_group(
        tx: &mut Transaction<'_, Postgres>,
        group: &Group,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE ride_groups SET
                status = $2,
                members = $3,
                document = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(group.id().as_uuid())
        .bind(group.status().as_str())
        .bind(member_names(group))
        .bind(to_document(group)?)
        .bind(group.updated_at().as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn fetch_groups(&self, sql: &str, param: &str) -> Result<Vec<Group>, StoreError> {
        let rows = sqlx::query(sql)
            .bind(param)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        rows.iter()
            .map(|row| {
                let document: String = row.try_get("document").map_err(StoreError::backend)?;
                from_document(&document)
            })
            .collect()
    }
}

#[async_trait]
impl GroupStore for PostgresGroupStore {
    async fn insert_group(&self, group: &Group) -> Result<Version, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO ride_groups (
                id, status, members, document, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(group.id().as_uuid())
        .bind(group.status().as_str())
        .bind(member_names(group))
        .bind(to_document(group)?)
        .bind(to_db_version(Version::INITIAL))
        .bind(group.created_at().as_datetime())
        .bind(group.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(*group.id()));
        }
        Ok(Version::INITIAL)
    }

    async fn load_group(&self, id: &GroupId) -> Result<Option<Versioned<Group>>, StoreError> {
        let row = sqlx::query("SELECT document, version FROM ride_groups WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.map(|row| versioned_from_row(&row)).transpose()
    }

    async fn save_group(&self, group: &Group, expected: Version) -> Result<Version, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;
        let version = Self::bump_version(&mut tx, group.id(), expected).await?;
        Self::write_group(&mut tx, group).await?;
        tx.commit().await.map_err(StoreError::backend)?;

        debug!(group_id = %group.id(), %version, "group saved");
        Ok(version)
    }

    async fn load_ride(&self, id: &RideId) -> Result<Option<Versioned<Ride>>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT r.document, g.version
            FROM rides r
            JOIN ride_groups g ON g.id = r.group_id
            WHERE r.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.map(|row| versioned_from_row(&row)).transpose()
    }

    async fn save_ride(&self, ride: &Ride, expected: Version) -> Result<Version, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;
        let version = Self::bump_version(&mut tx, ride.group_id(), expected).await?;

        let result = sqlx::query(
            r#"
            UPDATE rides SET status = $2, document = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(ride.id().as_uuid())
        .bind(ride.status().to_string())
        .bind(to_document(ride)?)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the version bump.
            return Err(StoreError::RideNotFound(*ride.id()));
        }
        tx.commit().await.map_err(StoreError::backend)?;

        debug!(ride_id = %ride.id(), %version, "ride saved");
        Ok(version)
    }

    async fn save_group_and_ride(
        &self,
        group: &Group,
        ride: &Ride,
        expected: Version,
    ) -> Result<Version, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;
        let version = Self::bump_version(&mut tx, group.id(), expected).await?;
        Self::write_group(&mut tx, group).await?;

        sqlx::query(
            r#"
            INSERT INTO rides (id, group_id, status, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(ride.id().as_uuid())
        .bind(ride.group_id().as_uuid())
        .bind(ride.status().to_string())
        .bind(to_document(ride)?)
        .bind(ride.created_at().as_datetime())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::backend)?;

        tx.commit().await.map_err(StoreError::backend)?;

        debug!(group_id = %group.id(), ride_id = %ride.id(), %version, "group and ride saved");
        Ok(version)
    }
}

#[async_trait]
impl GroupReader for PostgresGroupStore {
    async fn list_open_groups(&self) -> Result<Vec<Group>, StoreError> {
        self.fetch_groups(
            "SELECT document FROM ride_groups WHERE status = $1 ORDER BY created_at",
            GroupStatus::Open.as_str(),
        )
        .await
    }

    async fn list_groups_for_user(&self, user_id: &UserId) -> Result<Vec<Group>, StoreError> {
        self.fetch_groups(
            "SELECT document FROM ride_groups WHERE $1 = ANY(members) ORDER BY created_at",
            user_id.as_str(),
        )
        .await
    }

    async fn get_group(&self, id: &GroupId) -> Result<Option<Versioned<Group>>, StoreError> {
        self.load_group(id).await
    }

    async fn get_ride(&self, id: &RideId) -> Result<Option<Versioned<Ride>>, StoreError> {
        self.load_ride(id).await
    }
}

// === Row mapping ===

fn member_names(group: &Group) -> Vec<String> {
    group.members().iter().map(|m| m.as_str().to_string()).collect()
}

fn to_document<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(StoreError::backend)
}

fn from_document<T: DeserializeOwned>(document: &str) -> Result<T, StoreError> {
    serde_json::from_str(document).map_err(StoreError::backend)
}

fn versioned_from_row<T: DeserializeOwned>(row: &PgRow) -> Result<Versioned<T>, StoreError> {
    let document: String = row.try_get("document").map_err(StoreError::backend)?;
    let version: i64 = row.try_get("version").map_err(StoreError::backend)?;
    Ok(Versioned::new(from_document(&document)?, from_db_version(version)))
}

fn to_db_version(version: Version) -> i64 {
    version.value() as i64
}

fn from_db_version(value: i64) -> Version {
    Version::new(value.max(0) as u64)
}
