use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Account {
    pub id: i64,
    pub wallet_public_key: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountsResponse {
    pub data: Vec<Account>,
}
