use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, sqlx::FromRow)]
pub struct Hive {
    pub id: i64,
    pub account_id: i64,
    pub referrer_account_id: i64,
    // Persisted snapshot, recomputed from token ownership on every read.
    pub beacon_points: i64,
    pub active_status: bool,
    pub trial_ended_at: Option<DateTime<Utc>>,
    pub is_testing: bool,
}

impl Hive {
    pub fn has_referrer(&self) -> bool {
        self.referrer_account_id != 0
    }

    /// A trial is running only while its end lies strictly in the future.
    pub fn is_trial_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.trial_ended_at, Some(ended_at) if ended_at > now)
    }
}

/// Row of the ancestor closure table: `ancestor_account_id` is somewhere
/// above `account_id` in the referral chain.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, sqlx::FromRow)]
pub struct FlatHive {
    pub account_id: i64,
    pub ancestor_account_id: i64,
    pub is_testing: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlatHiveFilter {
    pub account_id: i64,
    pub ancestor_account_id: i64,
    pub is_testing: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HiveMemberDetailRequest {
    pub hive_id: i64,
    pub current_user_id: i64,
    pub is_testing: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct HiveMemberDetail {
    pub hive_id: i64,
    pub account_id: i64,
    pub account_wallet_public_key: String,
    pub username: String,
    pub referrer_account_id: i64,
    pub referrer_username: String,
    pub beacon_points: i64,
    pub tier: i32,
    pub tier_name: String,
    pub active_status: bool,
    pub last_purchase_at: Option<DateTime<Utc>>,
    pub is_trial: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn hive(trial_ended_at: Option<DateTime<Utc>>) -> Hive {
        Hive {
            id: 1,
            account_id: 3,
            referrer_account_id: 0,
            beacon_points: 0,
            active_status: true,
            trial_ended_at,
            is_testing: true,
        }
    }

    #[test]
    fn test_trial_requires_future_end() {
        let now = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();

        assert!(hive(Some(now + Duration::days(14))).is_trial_at(now));
        assert!(!hive(Some(now)).is_trial_at(now));
        assert!(!hive(Some(now - Duration::seconds(1))).is_trial_at(now));
        assert!(!hive(None).is_trial_at(now));
    }

    #[test]
    fn test_zero_referrer_means_none() {
        let mut h = hive(None);
        assert!(!h.has_referrer());

        h.referrer_account_id = 4;
        assert!(h.has_referrer());
    }
}
