use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::tiers::{TierBreakpoint, TierTable, TierTableError};

#[derive(Debug, Deserialize)]
pub struct Postgres {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthSvc {
    pub url: String,
    pub auth_token: String,
}

#[derive(Debug, Deserialize)]
pub struct Web3Svc {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Beacon {
    /// Products whose tokens earn beacon points.
    #[serde(default = "default_beacon_products")]
    pub products: Vec<String>,
    #[serde(default)]
    pub rules: HashMap<String, String>,
}

impl Default for Beacon {
    fn default() -> Self {
        Self {
            products: default_beacon_products(),
            rules: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub postgres: Postgres,
    pub authsvc: AuthSvc,
    pub web3svc: Web3Svc,
    #[serde(default)]
    pub beacon: Beacon,
    #[serde(default)]
    pub tiers: Vec<TierBreakpoint>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_beacon_products() -> Vec<String> {
    ["bythen-chip", "bythen-pod", "bythen-card", "bythen-type01"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("HIVE").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Configured tier breakpoints, or the built-in table when none are set.
    pub fn tier_table(&self) -> Result<TierTable, TierTableError> {
        if self.tiers.is_empty() {
            return Ok(TierTable::default());
        }

        TierTable::new(self.tiers.clone())
    }
}
