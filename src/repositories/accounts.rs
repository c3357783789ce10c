use async_trait::async_trait;

use super::AccountRepository;
use crate::models::accounts::{Account, AccountsResponse};

/// Client for the accounts endpoint of the auth service.
pub struct AccountsApi {
    auth_token: String,
    url: String,
    client: reqwest::Client,
}

impl AccountsApi {
    pub fn new(auth_token: String, url: String) -> Self {
        Self {
            auth_token,
            url,
            client: reqwest::Client::new(),
        }
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl AccountRepository for AccountsApi {
    async fn get_multiple_accounts(&self, ids: &[i64]) -> Result<Vec<Account>, anyhow::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let response: AccountsResponse = self
            .client
            .get(format!("{}/v1/accounts", self.url))
            .bearer_auth(&self.auth_token)
            .query(&[("ids", join_ids(ids))])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        log::debug!("Fetched {} of {} accounts.", response.data.len(), ids.len());

        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[3, 4]), "3,4");
        assert_eq!(join_ids(&[3]), "3");
    }

    #[test]
    fn test_accounts_payload() {
        let payload = r#"{"data":[{"id":3,"wallet_public_key":"0x742d35Cc6634C0532925a3b844Bc454e4438f44e","username":"user3"}]}"#;
        let response: AccountsResponse = serde_json::from_str(payload).unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].id, 3);
        assert_eq!(response.data[0].username, "user3");
    }
}
