use common::misc::{de_int, de_object, de_opt_string};
use serde::{Deserialize, Serialize};

/// What a discount targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountEntity {
    #[serde(default, deserialize_with = "de_int")]
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "de_opt_string")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountData {
    #[serde(default, deserialize_with = "de_int")]
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "de_opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub discount_type: Option<String>,
    #[serde(default, deserialize_with = "de_object")]
    pub entity: Option<DiscountEntity>,
    #[serde(default, deserialize_with = "de_int")]
    pub value: i64,
    #[serde(default, deserialize_with = "de_int")]
    pub max_value: i64,
}
