use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    accounts::Account,
    hives::{FlatHive, FlatHiveFilter, Hive},
    product_tokens::{ProductToken, ProductTokenFilter},
    transactions::{Transaction, TransactionFilter},
};

pub mod accounts;
pub mod beacon;
pub mod hives;
pub mod product_tokens;
pub mod transactions;

#[derive(Debug, thiserror::Error)]
pub enum HiveLookupError {
    #[error("Hive {id} matched {count} records")]
    Ambiguous { id: i64, count: usize },
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait HiveRepository: Send + Sync {
    /// At most one hive per (id, testing flag); more is reported as ambiguous.
    async fn get_hive(&self, id: i64, is_testing: bool) -> Result<Option<Hive>, HiveLookupError>;
}

#[async_trait]
pub trait FlatHiveRepository: Send + Sync {
    async fn get_flat_hives(&self, filter: &FlatHiveFilter) -> Result<Vec<FlatHive>, anyhow::Error>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_multiple_accounts(&self, ids: &[i64]) -> Result<Vec<Account>, anyhow::Error>;
}

#[async_trait]
pub trait ProductTokenRepository: Send + Sync {
    async fn get_product_tokens(
        &self,
        filter: &ProductTokenFilter,
    ) -> Result<Vec<ProductToken>, anyhow::Error>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, anyhow::Error>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
