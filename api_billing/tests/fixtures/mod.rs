//! Shared fixtures for the billing integration tests.

#![allow(dead_code)]

use common::api::{Api, HttpApiProvider};
use serde_json::{Value, json};
use wiremock::{MockServer, Request};

pub const BILLING_TOKEN: &str = "api-token";

pub fn api(server: &MockServer) -> Api {
    HttpApiProvider::new(Some(server.uri()), Some(BILLING_TOKEN.to_string())).into_api()
}

/// Decoded form body of a recorded request, sorted by key.
pub fn form_of(request: &Request) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect();
    form.sort();
    form
}

pub fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

pub fn success(data: Value) -> Value {
    json!({ "success": 1, "data": data })
}

#[derive(Debug, Clone)]
pub struct SubscriptionParams {
    pub plan_id: i64,
    pub plan_name: &'static str,
    pub plan_price: i64,
    pub trial: i64,
    pub grace: i64,
    pub ends_at_raw: Option<&'static str>,
}

impl Default for SubscriptionParams {
    fn default() -> Self {
        SubscriptionParams {
            plan_id: 1,
            plan_name: "free",
            plan_price: 0,
            trial: 0,
            grace: 0,
            ends_at_raw: Some("2030-01-01 00:00:00"),
        }
    }
}

pub fn subscription_data(params: &SubscriptionParams) -> Value {
    json!({
        "id": 1,
        "profile_id": 1,
        "plan_id": params.plan_id,
        "period": "monthly",
        "is_trial": params.trial,
        "is_grace": params.grace,
        "is_expired": 0,
        "ends_at": "1 янв. 2030 г.",
        "ends_at_raw": params.ends_at_raw,
        "grace": { "till": null, "plan_id": 0 },
        "renewed_at": null,
        "plan": {
            "id": params.plan_id,
            "name": params.plan_name,
            "periods": {
                "monthly": [
                    {
                        "region": "ru",
                        "period": "monthly",
                        "price": {
                            "raw": params.plan_price,
                            "formatted": format!("{} руб.", params.plan_price / 100),
                        },
                    },
                ],
            },
            "features": {
                "first": {
                    "id": 1, "name": "first", "limit": 0, "unlimited": 0,
                    "excess_price": { "raw": 2000, "formatted": "20 руб." },
                },
                "second": {
                    "id": 1, "name": "second", "limit": -1, "unlimited": 1,
                    "excess_price": { "raw": 0, "formatted": "0 руб." },
                },
                "third": {
                    "id": 1, "name": "third", "limit": 5, "unlimited": 0,
                    "excess_price": { "raw": 1200, "formatted": "12 руб." },
                },
            },
        },
        "features": {
            "first": { "id": 1, "name": "first", "limit": 0, "unlimited": 0, "left": 0, "can_use": 0 },
            "second": { "id": 1, "name": "second", "limit": -1, "unlimited": 1, "left": -1, "can_use": 1 },
            "third": { "id": 1, "name": "third", "limit": 5, "unlimited": 0, "left": 5, "can_use": 1 },
        },
    })
}

pub fn profile_data(balance: i64, subscription: &SubscriptionParams) -> Value {
    json!({
        "id": 1,
        "user_id": 1,
        "region": "ru",
        "currency": "rub",
        "balance": {
            "raw": balance,
            "formatted": format!("{} руб.", balance / 100),
        },
        "subscription": subscription_data(subscription),
        "created_at": {
            "date": "2030-01-01 00:00:00.000000",
            "timezone_type": 3,
            "timezone": "UTC",
        },
    })
}

pub fn default_profile() -> Value {
    success(profile_data(0, &SubscriptionParams::default()))
}

pub fn other_plan_subscription(ends_at_raw: Option<&'static str>) -> Value {
    subscription_data(&SubscriptionParams {
        plan_id: 2,
        plan_name: "other",
        plan_price: 150000,
        ends_at_raw,
        ..Default::default()
    })
}

pub fn insufficient_funds() -> Value {
    json!({
        "error": "Insufficient balance.",
        "data": {
            "currency": "rub",
            "current": 0,
            "required": 150000,
            "required_formatted": "1500 руб.",
        },
    })
}

pub fn payment_session_created() -> Value {
    success(json!({
        "response": { "payment_url": "https://example.org/payment-form" },
    }))
}

pub fn plans() -> Value {
    success(json!([
        {
            "id": 1,
            "name": "free",
            "periods": {
                "monthly": [
                    { "region": "ru", "period": "monthly", "price": { "raw": 0, "formatted": "0 руб." } },
                ],
            },
            "features": {
                "first": {
                    "id": 1, "name": "first", "limit": 0, "unlimited": 0,
                    "excess_price": { "raw": 2000, "formatted": "20 руб." },
                },
            },
        },
        {
            "id": 2,
            "name": "other",
            "periods": {
                "monthly": [
                    { "region": "ua", "period": "monthly", "price": { "raw": 40000, "formatted": "400 грн." } },
                    { "region": "ru", "period": "monthly", "price": { "raw": 150000, "formatted": "1500 руб." } },
                ],
                "yearly": [
                    { "region": "ua", "period": "yearly", "price": { "raw": 400000, "formatted": "4000 грн." } },
                ],
            },
            "features": {
                "first": {
                    "id": 1, "name": "first", "limit": 10, "unlimited": 0,
                    "excess_price": { "raw": 1500, "formatted": "15 руб." },
                },
            },
        },
    ]))
}

pub fn discount_created(value: i64, max_value: i64) -> Value {
    success(json!({
        "id": 1,
        "type": "fixed",
        "discount_type": "percentage",
        "entity": { "id": 1, "type": "feature" },
        "value": value,
        "max_value": max_value,
        "applied_to": [],
        "created_at": "2017-01-17 20:40:00",
        "updated_at": "2017-01-17 20:40:00",
    }))
}
