use std::collections::BTreeMap;

use common::misc::{de_flag, de_int, de_map, de_opt_string, de_record};
use serde::{Deserialize, Serialize};

use crate::models::money::Money;

/// Limits and overage pricing of one feature within a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFeature {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_int")]
    pub limit: i64,
    #[serde(default, deserialize_with = "de_flag")]
    pub unlimited: bool,
    /// Charged against the balance per unit once the limit is exhausted.
    #[serde(default, deserialize_with = "de_record")]
    pub excess_price: Money,
}

/// Plan attached to a subscription snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "de_int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_map")]
    pub features: BTreeMap<String, PlanFeature>,
}

impl Plan {
    /// Per-unit excess price of `feature`; 0 for features the plan does not list.
    pub fn feature_excess_price(&self, feature: &str) -> i64 {
        self.features
            .get(feature)
            .map(|f| f.excess_price.raw)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PeriodPrice {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "de_record")]
    pub price: Money,
}

/// Plan as listed by the catalogue, priced for every region.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CatalogPlan {
    #[serde(default, deserialize_with = "de_int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_map")]
    pub periods: BTreeMap<String, Vec<PeriodPrice>>,
    #[serde(default, deserialize_with = "de_map")]
    pub features: BTreeMap<String, PlanFeature>,
}

/// Catalogue plan narrowed down to a single region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalPlan {
    pub id: i64,
    pub name: Option<String>,
    /// Price per billing period; `None` when the period is not sold in the region.
    pub prices: BTreeMap<String, Option<Money>>,
    pub features: BTreeMap<String, PlanFeature>,
}

impl CatalogPlan {
    pub(crate) fn for_region(self, region: &str) -> RegionalPlan {
        let prices = self
            .periods
            .into_iter()
            .map(|(period, prices)| {
                let price = prices
                    .into_iter()
                    .find(|p| p.region.as_deref() == Some(region))
                    .map(|p| p.price);
                (period, price)
            })
            .collect();

        RegionalPlan {
            id: self.id,
            name: self.name,
            prices,
            features: self.features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn excess_price_of_unknown_feature_is_zero() {
        let plan: Plan = serde_json::from_value(json!({
            "id": 1,
            "name": "free",
            "features": {
                "first": { "limit": 0, "unlimited": 0, "excess_price": { "raw": 2000, "formatted": "20 руб." } },
                "second": { "limit": -1, "unlimited": 1, "excess_price": [] },
            },
        }))
        .unwrap();

        assert_eq!(plan.feature_excess_price("first"), 2000);
        assert_eq!(plan.feature_excess_price("second"), 0);
        assert_eq!(plan.feature_excess_price("missing"), 0);
        assert!(plan.features["second"].unlimited);
    }

    #[test]
    fn catalog_plan_keeps_prices_of_requested_region() {
        let plan: CatalogPlan = serde_json::from_value(json!({
            "id": 2,
            "name": "other",
            "periods": {
                "monthly": [
                    { "region": "ua", "period": "monthly", "price": { "raw": 5000, "formatted": "50 грн." } },
                    { "region": "ru", "period": "monthly", "price": { "raw": 150000, "formatted": "1500 руб." } },
                ],
                "yearly": [
                    { "region": "ua", "period": "yearly", "price": { "raw": 50000, "formatted": "500 грн." } },
                ],
            },
            "features": [],
        }))
        .unwrap();

        let regional = plan.for_region("ru");

        assert_eq!(regional.id, 2);
        assert_eq!(regional.name.as_deref(), Some("other"));
        assert_eq!(regional.prices["monthly"].as_ref().map(|p| p.raw), Some(150000));
        assert_eq!(regional.prices["yearly"], None);
        assert!(regional.features.is_empty());
    }
}
