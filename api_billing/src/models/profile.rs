use common::misc::{de_int, de_opt_string, de_record};
use serde::{Deserialize, Serialize};

use crate::models::{money::Money, subscription::SubscriptionData};

/// Billing profile snapshot as returned by the billing service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default, deserialize_with = "de_int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de_int")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_record")]
    pub balance: Money,
    #[serde(default, deserialize_with = "de_record")]
    pub subscription: SubscriptionData,
}
