use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payer of a new payment session.
///
/// Fields are optional so partially known users can be passed in;
/// `id`, `email` and `currency` are all checked before a session is opened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentUser {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub currency: Option<String>,
}

impl PaymentUser {
    pub fn new(id: i64, email: impl Into<String>, currency: impl Into<String>) -> Self {
        PaymentUser {
            id: Some(id),
            email: Some(email.into()),
            currency: Some(currency.into()),
        }
    }
}

/// Callback the payments service replays once the session is funded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    pub service: String,
    pub service_token: Option<String>,
    pub url: String,
    pub method: String,
    pub form: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionInitRequest<'a> {
    pub provider: &'a str,
    pub amount: i64,
    pub currency: &'a str,
    pub user_id: i64,
    pub email: &'a str,
    pub recurrent: u8,
    pub notifications: &'a [Notification],
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionInitResponse {
    #[serde(default, deserialize_with = "common::misc::de_object")]
    pub response: Option<SessionInitPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionInitPayload {
    #[serde(default, deserialize_with = "common::misc::de_opt_string")]
    pub payment_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RebillRequest {
    pub user_id: i64,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecurrentQuery {
    pub user_id: i64,
}
