use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::try_join;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{beacon, RequestHandler, Service, ServiceError};
use crate::models::{
    hives::{FlatHiveFilter, Hive, HiveMemberDetail, HiveMemberDetailRequest},
    product_tokens::ProductTokenFilter,
    tiers::{Tier, TierTable},
    transactions::TransactionFilter,
};
use crate::repositories::{
    accounts::AccountsApi,
    beacon::BeaconRuleProvider,
    hives::{PgFlatHiveRepository, PgHiveRepository},
    product_tokens::ProductTokensApi,
    transactions::PgTransactionRepository,
    AccountRepository, Clock, FlatHiveRepository, HiveLookupError, HiveRepository,
    ProductTokenRepository, TransactionRepository,
};
use crate::settings::Settings;
use crate::utils::mask_wallet_address;

pub enum HiveRequest {
    GetHiveMemberDetail {
        request: HiveMemberDetailRequest,
        response: oneshot::Sender<Result<HiveMemberDetail, ServiceError>>,
    },
}

/// The data sources a member detail is assembled from.
#[derive(Clone)]
pub struct HiveRepositories {
    pub hives: Arc<dyn HiveRepository>,
    pub flat_hives: Arc<dyn FlatHiveRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub product_tokens: Arc<dyn ProductTokenRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
}

impl HiveRepositories {
    pub fn new(pool: PgPool, settings: &Settings) -> Self {
        Self {
            hives: Arc::new(PgHiveRepository::new(pool.clone())),
            flat_hives: Arc::new(PgFlatHiveRepository::new(pool.clone())),
            accounts: Arc::new(AccountsApi::new(
                settings.authsvc.auth_token.clone(),
                settings.authsvc.url.clone(),
            )),
            product_tokens: Arc::new(ProductTokensApi::new(
                settings.web3svc.api_key.clone(),
                settings.web3svc.url.clone(),
            )),
            transactions: Arc::new(PgTransactionRepository::new(pool)),
        }
    }
}

struct BeaconStatus {
    beacon_points: i64,
    is_trial: bool,
    tier: Tier,
}

#[derive(Clone)]
pub struct HiveRequestHandler {
    repositories: HiveRepositories,
    clock: Arc<dyn Clock>,
    beacon_rules: Arc<dyn BeaconRuleProvider>,
    tier_table: Arc<TierTable>,
    beacon_products: Arc<Vec<String>>,
    request_timeout: Duration,
}

impl HiveRequestHandler {
    pub fn new(
        repositories: HiveRepositories,
        clock: Arc<dyn Clock>,
        beacon_rules: Arc<dyn BeaconRuleProvider>,
        tier_table: TierTable,
        beacon_products: Vec<String>,
        request_timeout: Duration,
    ) -> Self {
        HiveRequestHandler {
            repositories,
            clock,
            beacon_rules,
            tier_table: Arc::new(tier_table),
            beacon_products: Arc::new(beacon_products),
            request_timeout,
        }
    }

    /// Resolves a member detail, giving up with `Cancelled` once the request
    /// timeout elapses.
    pub async fn resolve(
        &self,
        request: &HiveMemberDetailRequest,
    ) -> Result<HiveMemberDetail, ServiceError> {
        tokio::time::timeout(self.request_timeout, self.get_hive_member_detail(request))
            .await
            .unwrap_or_else(|_| {
                Err(ServiceError::Cancelled(format!(
                    "Hive {} detail not resolved within {:?}.",
                    request.hive_id, self.request_timeout
                )))
            })
    }

    pub async fn get_hive_member_detail(
        &self,
        request: &HiveMemberDetailRequest,
    ) -> Result<HiveMemberDetail, ServiceError> {
        let hive = self.get_hive(request.hive_id, request.is_testing).await?;
        self.authorize(&hive, request.current_user_id).await?;

        let mut account_ids = vec![hive.account_id];
        if hive.has_referrer() {
            account_ids.push(hive.referrer_account_id);
        }

        let accounts = self
            .repositories
            .accounts
            .get_multiple_accounts(&account_ids)
            .await
            .map_err(|e| ServiceError::Repository("Accounts".to_string(), e.to_string()))?;

        let account = accounts
            .iter()
            .find(|account| account.id == hive.account_id)
            .ok_or_else(|| {
                ServiceError::Repository(
                    "Accounts".to_string(),
                    format!("Account {} of hive {} is missing.", hive.account_id, hive.id),
                )
            })?;

        let (beacon_status, last_purchase_at) = try_join(
            self.get_beacon_status(&hive, &account.wallet_public_key, request.is_testing),
            self.get_last_purchase_at(hive.account_id, &account.wallet_public_key),
        )
        .await?;

        let referrer_username = if hive.has_referrer() {
            match accounts.iter().find(|a| a.id == hive.referrer_account_id) {
                Some(referrer) => referrer.username.clone(),
                None => {
                    log::warn!(
                        "Referrer {} of hive {} not found in accounts.",
                        hive.referrer_account_id,
                        hive.id
                    );
                    String::new()
                }
            }
        } else {
            String::new()
        };

        Ok(HiveMemberDetail {
            hive_id: hive.id,
            account_id: hive.account_id,
            account_wallet_public_key: mask_wallet_address(&account.wallet_public_key),
            username: account.username.clone(),
            referrer_account_id: hive.referrer_account_id,
            referrer_username,
            beacon_points: beacon_status.beacon_points,
            tier: beacon_status.tier.tier,
            tier_name: beacon_status.tier.name,
            active_status: hive.active_status,
            last_purchase_at,
            is_trial: beacon_status.is_trial,
        })
    }

    async fn get_hive(&self, id: i64, is_testing: bool) -> Result<Hive, ServiceError> {
        match self.repositories.hives.get_hive(id, is_testing).await {
            Ok(Some(hive)) => Ok(hive),
            Ok(None) => Err(ServiceError::NotFound(format!("Hive {id} not found."))),
            Err(HiveLookupError::Ambiguous { id, count }) => {
                log::error!("Hive {id} is stored {count} times, refusing to pick one.");
                Err(ServiceError::NotFound(format!("Hive {id} not found.")))
            }
            Err(HiveLookupError::Backend(e)) => {
                Err(ServiceError::Repository("Hives".to_string(), e.to_string()))
            }
        }
    }

    /// A member is visible to itself and to every account above it in the
    /// referral tree.
    async fn authorize(&self, hive: &Hive, current_user_id: i64) -> Result<(), ServiceError> {
        if hive.account_id == current_user_id {
            return Ok(());
        }

        let filter = FlatHiveFilter {
            account_id: hive.account_id,
            ancestor_account_id: current_user_id,
            is_testing: hive.is_testing,
        };
        let ancestors = self
            .repositories
            .flat_hives
            .get_flat_hives(&filter)
            .await
            .map_err(|e| ServiceError::Repository("FlatHives".to_string(), e.to_string()))?;

        if ancestors.is_empty() {
            log::debug!(
                "Account {} is not an ancestor of hive {} owner {}.",
                current_user_id,
                hive.id,
                hive.account_id
            );
            return Err(ServiceError::NotAuthorized(format!(
                "Hive {} is not in the hive of account {}.",
                hive.id, current_user_id
            )));
        }

        Ok(())
    }

    async fn get_beacon_status(
        &self,
        hive: &Hive,
        wallet_public_key: &str,
        is_testing: bool,
    ) -> Result<BeaconStatus, ServiceError> {
        let filter = ProductTokenFilter {
            owner_address: wallet_public_key.to_string(),
            products: self.beacon_products.to_vec(),
            is_testing,
        };
        let tokens = self
            .repositories
            .product_tokens
            .get_product_tokens(&filter)
            .await
            .map_err(|e| ServiceError::Repository("ProductTokens".to_string(), e.to_string()))?;

        let beacon_points = beacon::beacon_points(&tokens, &self.beacon_rules.beacon_rules())?;
        let is_trial = hive.is_trial_at(self.clock.now());
        let tier = self.tier_table.resolve(beacon_points, is_trial);

        log::debug!(
            "Hive {}: {} tokens, {} beacon points, tier {}, trial {}.",
            hive.id,
            tokens.len(),
            beacon_points,
            tier.tier,
            is_trial
        );

        Ok(BeaconStatus {
            beacon_points,
            is_trial,
            tier,
        })
    }

    async fn get_last_purchase_at(
        &self,
        account_id: i64,
        wallet_public_key: &str,
    ) -> Result<Option<DateTime<Utc>>, ServiceError> {
        let transactions = self
            .repositories
            .transactions
            .list(&TransactionFilter::latest_for(account_id, wallet_public_key))
            .await
            .map_err(|e| ServiceError::Repository("Transactions".to_string(), e.to_string()))?;

        Ok(transactions.first().map(|transaction| transaction.trx_at))
    }
}

#[async_trait]
impl RequestHandler<HiveRequest> for HiveRequestHandler {
    async fn handle_request(&self, request: HiveRequest) {
        match request {
            HiveRequest::GetHiveMemberDetail {
                request,
                mut response,
            } => {
                let result = tokio::select! {
                    result = self.resolve(&request) => Some(result),
                    _ = response.closed() => None,
                };

                match result {
                    Some(result) => {
                        if let Err(e) = &result {
                            log::info!("Hive {} detail failed: {}", request.hive_id, e);
                        }
                        let _ = response.send(result);
                    }
                    None => log::warn!(
                        "Requester dropped hive {} detail request, aborting.",
                        request.hive_id
                    ),
                }
            }
        }
    }
}

pub struct HiveService;

impl HiveService {
    pub fn new() -> Self {
        HiveService {}
    }
}

#[async_trait]
impl Service<HiveRequest, HiveRequestHandler> for HiveService {}
