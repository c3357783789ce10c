pub mod accounts;
pub mod hives;
pub mod product_tokens;
pub mod tiers;
pub mod transactions;
