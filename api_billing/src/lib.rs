pub mod services {
    pub mod billing;
    pub mod discounts;
    pub mod profile;
}

pub mod dtos {
    pub mod billing;
}

pub mod models {
    pub mod discount;
    pub mod money;
    pub mod plan;
    pub mod profile;
    pub mod result;
    pub mod subscription;
}

pub use dtos::billing::{NewDiscount, NewProfile};
pub use models::{
    discount::DiscountData,
    money::Money,
    plan::{Plan, PlanFeature, RegionalPlan},
    profile::ProfileData,
    result::{SubscriptionOutcome, SubscriptionResult},
    subscription::{FeatureQuota, Subscription, SubscriptionData},
};
pub use services::{
    billing::BillingService,
    discounts::{Discount, DiscountsManager},
    profile::BillingProfile,
};
