use std::collections::BTreeMap;

use common::misc::{de_flag, de_int, de_map, de_opt_string, de_record};
use serde::{Deserialize, Serialize};

use crate::models::plan::Plan;

/// Quota state of one feature in the current billing period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureQuota {
    #[serde(default, deserialize_with = "de_int")]
    pub limit: i64,
    #[serde(default, deserialize_with = "de_flag")]
    pub unlimited: bool,
    /// Units still available before overage pricing applies.
    #[serde(default, deserialize_with = "de_int")]
    pub left: i64,
    #[serde(default, deserialize_with = "de_flag")]
    pub can_use: bool,
}

/// Subscription snapshot as returned by the billing service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionData {
    #[serde(default, deserialize_with = "de_int")]
    pub plan_id: i64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_trial: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_grace: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_expired: bool,
    /// Human readable end date.
    #[serde(default, deserialize_with = "de_opt_string")]
    pub ends_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub ends_at_raw: Option<String>,
    #[serde(default, deserialize_with = "de_record")]
    pub plan: Plan,
    #[serde(default, deserialize_with = "de_map")]
    pub features: BTreeMap<String, FeatureQuota>,
}

/// Entitlement view over a subscription snapshot.
///
/// Keeps a copy of the owning profile's balance so overage can be checked
/// without going back to the profile; `BillingProfile` keeps both in sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subscription {
    data: SubscriptionData,
    balance: i64,
}

impl Subscription {
    pub fn new(data: SubscriptionData, balance: i64) -> Self {
        Subscription { data, balance }
    }

    pub fn data(&self) -> &SubscriptionData {
        &self.data
    }

    pub fn set_data(&mut self, data: SubscriptionData) -> &mut Self {
        self.data = data;
        self
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn set_balance(&mut self, balance: i64) -> &mut Self {
        self.balance = balance;
        self
    }

    pub fn plan(&self) -> &Plan {
        &self.data.plan
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.data.features.contains_key(feature)
    }

    pub fn is_unlimited_feature(&self, feature: &str) -> bool {
        self.data
            .features
            .get(feature)
            .is_some_and(|quota| quota.unlimited)
    }

    /// Remaining units of `feature`, 0 when unknown.
    pub fn feature_value(&self, feature: &str) -> i64 {
        self.data
            .features
            .get(feature)
            .map(|quota| quota.left)
            .unwrap_or(0)
    }

    pub fn feature_limit(&self, feature: &str) -> i64 {
        self.data
            .features
            .get(feature)
            .map(|quota| quota.limit)
            .unwrap_or(0)
    }

    /// Decides whether `value` units of `feature` may be consumed.
    ///
    /// Unlimited features are always usable. Otherwise the remaining quota
    /// is checked first; past the quota, `with_balance` allows overage, which
    /// is free when the plan sets no excess price and covered by the balance
    /// otherwise.
    pub fn can_use_feature(&self, feature: &str, with_balance: bool, value: i64) -> bool {
        if self.is_unlimited_feature(feature) {
            return true;
        }

        if self.feature_value(feature) >= value {
            return true;
        }

        if !with_balance {
            return false;
        }

        let price = self.plan().feature_excess_price(feature);
        if price == 0 {
            return true;
        }

        // A cost that does not fit in i64 is never covered.
        price
            .checked_mul(value)
            .is_some_and(|cost| self.balance >= cost)
    }

    pub fn ends_at(&self) -> Option<&str> {
        self.data.ends_at.as_deref()
    }

    pub fn ends_at_raw(&self) -> Option<&str> {
        self.data.ends_at_raw.as_deref()
    }
}
