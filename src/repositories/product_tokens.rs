use async_trait::async_trait;

use super::ProductTokenRepository;
use crate::models::product_tokens::{ProductToken, ProductTokenFilter, ProductTokensResponse};

/// Client for the product token ownership endpoint of the web3 service.
pub struct ProductTokensApi {
    api_key: String,
    url: String,
    client: reqwest::Client,
}

impl ProductTokensApi {
    pub fn new(api_key: String, url: String) -> Self {
        Self {
            api_key,
            url,
            client: reqwest::Client::new(),
        }
    }
}

fn query_params(filter: &ProductTokenFilter) -> Vec<(&'static str, String)> {
    vec![
        ("owner_address", filter.owner_address.clone()),
        ("products", filter.products.join(",")),
        ("is_testing", filter.is_testing.to_string()),
    ]
}

#[async_trait]
impl ProductTokenRepository for ProductTokensApi {
    async fn get_product_tokens(
        &self,
        filter: &ProductTokenFilter,
    ) -> Result<Vec<ProductToken>, anyhow::Error> {
        let response: ProductTokensResponse = self
            .client
            .get(format!("{}/v1/product-tokens", self.url))
            .header("X-Api-Key", &self.api_key)
            .query(&query_params(filter))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.data)
    }
}
