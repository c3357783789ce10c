use anyhow::bail;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::TransactionRepository;
use crate::models::transactions::{Transaction, TransactionFilter};

const SORTABLE_COLUMNS: [&str; 2] = ["trx_at", "id"];

#[derive(Clone)]
pub struct PgTransactionRepository {
    conn: PgPool,
}

impl PgTransactionRepository {
    pub fn new(conn: PgPool) -> Self {
        PgTransactionRepository { conn }
    }
}

fn build_list_query(filter: &TransactionFilter) -> Result<QueryBuilder<'_, Postgres>, anyhow::Error> {
    if !SORTABLE_COLUMNS.contains(&filter.sort_by.as_str()) {
        bail!("Unsupported sort column: {}", filter.sort_by)
    }

    let mut query =
        QueryBuilder::new("SELECT id, account_id, address, trx_at FROM transactions WHERE TRUE");

    if let Some(account_id) = filter.account_id {
        query.push(" AND account_id = ").push_bind(account_id);
    }
    if let Some(address) = &filter.address {
        query.push(" AND address = ").push_bind(address);
    }

    query
        .push(format!(
            " ORDER BY {} {}",
            filter.sort_by,
            if filter.descending { "DESC" } else { "ASC" }
        ))
        .push(" LIMIT ")
        .push_bind(filter.limit);

    Ok(query)
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, anyhow::Error> {
        let mut query = build_list_query(filter)?;
        let transactions = query
            .build_query_as::<Transaction>()
            .fetch_all(&self.conn)
            .await?;

        Ok(transactions)
    }
}
