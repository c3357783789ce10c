use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ProductTokenProduct {
    pub id: i64,
    pub slug: String,
}

/// One owned unit of a product. Two tokens of the same slug are two entries.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ProductToken {
    pub token_id: i64,
    pub product: ProductTokenProduct,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductTokenFilter {
    pub owner_address: String,
    pub products: Vec<String>,
    pub is_testing: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProductTokensResponse {
    pub data: Vec<ProductToken>,
}
