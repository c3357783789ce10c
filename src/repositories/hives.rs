use async_trait::async_trait;
use sqlx::PgPool;

use super::{FlatHiveRepository, HiveLookupError, HiveRepository};
use crate::models::hives::{FlatHive, FlatHiveFilter, Hive};

#[derive(Clone)]
pub struct PgHiveRepository {
    conn: PgPool,
}

impl PgHiveRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl HiveRepository for PgHiveRepository {
    async fn get_hive(&self, id: i64, is_testing: bool) -> Result<Option<Hive>, HiveLookupError> {
        // Two rows are enough to tell a unique hive from a duplicated one.
        let mut hives = sqlx::query_as::<_, Hive>(
            r#"SELECT id, account_id, referrer_account_id, beacon_points, active_status,
                trial_ended_at, is_testing
            FROM hives WHERE id = $1 AND is_testing = $2
            LIMIT 2"#,
        )
        .bind(id)
        .bind(is_testing)
        .fetch_all(&self.conn)
        .await
        .map_err(anyhow::Error::from)?;

        match hives.len() {
            0 => Ok(None),
            1 => Ok(hives.pop()),
            count => Err(HiveLookupError::Ambiguous { id, count }),
        }
    }
}

#[derive(Clone)]
pub struct PgFlatHiveRepository {
    conn: PgPool,
}

impl PgFlatHiveRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl FlatHiveRepository for PgFlatHiveRepository {
    async fn get_flat_hives(&self, filter: &FlatHiveFilter) -> Result<Vec<FlatHive>, anyhow::Error> {
        let flat_hives = sqlx::query_as::<_, FlatHive>(
            r#"SELECT account_id, ancestor_account_id, is_testing
            FROM flat_hives
            WHERE account_id = $1 AND ancestor_account_id = $2 AND is_testing = $3"#,
        )
        .bind(filter.account_id)
        .bind(filter.ancestor_account_id)
        .bind(filter.is_testing)
        .fetch_all(&self.conn)
        .await?;

        Ok(flat_hives)
    }
}
