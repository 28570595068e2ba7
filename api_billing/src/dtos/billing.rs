use common::misc::{de_object, de_record};
use serde::{Deserialize, Serialize};

use crate::models::{profile::ProfileData, subscription::FeatureQuota};

/// Attributes of a new billing profile. `user_id` and `region` are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub user_id: Option<i64>,
    pub region: Option<String>,
    pub balance: Option<i64>,
    pub plan: Option<String>,
    pub period: Option<String>,
    pub trial: Option<bool>,
    pub ends_at: Option<String>,
    pub discount: Option<i64>,
}

impl NewProfile {
    pub fn new(user_id: i64, region: impl Into<String>) -> Self {
        NewProfile {
            user_id: Some(user_id),
            region: Some(region.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileCreateRequest<'a> {
    pub user_id: i64,
    pub region: &'a str,
    pub balance: i64,
    pub plan: &'a str,
    pub period: &'a str,
    pub trial: u8,
    pub ends_at: Option<&'a str>,
    pub discount: Option<i64>,
}

/// Form of a plan change. It is also replayed by the payments service once
/// a required top-up is funded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SubscriptionForm<'a> {
    pub plan: &'a str,
    pub period: &'a str,
    pub trial: u8,
    pub ends_at: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpendFeatureRequest<'a> {
    pub feature: &'a str,
    pub value: i64,
    pub charge_trials: u8,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SpendFeatureResponse {
    #[serde(default, deserialize_with = "de_object")]
    pub feature: Option<FeatureQuota>,
    #[serde(default, deserialize_with = "de_record")]
    pub profile: ProfileData,
}

#[derive(Debug, Serialize)]
pub(crate) struct BalanceHistoryQuery<'a> {
    pub timezone: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileIdsQuery {
    pub ids: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserIdsQuery {
    pub user_ids: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentAcceptedMeta {
    pub recurrent: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentAcceptedRequest<'a> {
    pub amount: i64,
    pub transaction: Option<&'a str>,
    pub system: Option<&'a str>,
    pub meta: PaymentAcceptedMeta,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentReversalMeta<'a> {
    pub transaction: Option<&'a str>,
}

/// Cancellation or refund of a previously accepted payment.
#[derive(Debug, Serialize)]
pub(crate) struct PaymentReversalRequest<'a> {
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub meta: PaymentReversalMeta<'a>,
}

/// Attributes of a new discount.
///
/// `kind`, `discount_type`, `entity_type`, `entity_id` and `value` are
/// required; `max_value` defaults to `value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDiscount {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub discount_type: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub value: Option<i64>,
    pub max_value: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DiscountCreateRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub discount_type: &'a str,
    pub entity_type: &'a str,
    pub entity_id: i64,
    pub value: i64,
    pub max_value: i64,
    pub apply_to: &'a [i64],
    pub active_till: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DiscountAttachRequest<'a> {
    pub discount_id: i64,
    pub apply_till: Option<&'a str>,
}
