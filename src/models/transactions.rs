use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub address: String,
    pub trx_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransactionFilter {
    pub account_id: Option<i64>,
    pub address: Option<String>,
    pub sort_by: String,
    pub descending: bool,
    pub limit: i64,
}

impl TransactionFilter {
    /// Most recent transaction of an account made from the given wallet.
    pub fn latest_for(account_id: i64, address: &str) -> Self {
        Self {
            account_id: Some(account_id),
            address: Some(address.to_string()),
            sort_by: "trx_at".to_string(),
            descending: true,
            limit: 1,
        }
    }
}
