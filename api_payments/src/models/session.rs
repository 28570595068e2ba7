use common::misc::{de_int, de_opt_string};
use serde::{Deserialize, Serialize};

use crate::dtos::pay::Notification;

/// An initiated external payment. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSession {
    pub(crate) uuid: Option<String>,
    pub(crate) user_id: i64,
    pub(crate) user_email: Option<String>,
    pub(crate) provider: Option<String>,
    pub(crate) amount: i64,
    pub(crate) currency: Option<String>,
    pub(crate) is_recurrent: bool,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) payment_url: Option<String>,
}

impl PaymentSession {
    /// Session known only by its transaction, as reported back by the
    /// payments service once money moved.
    pub fn from_transaction(
        uuid: impl Into<String>,
        amount: i64,
        provider: impl Into<String>,
        is_recurrent: bool,
    ) -> Self {
        PaymentSession {
            uuid: Some(uuid.into()),
            amount,
            provider: Some(provider.into()),
            is_recurrent,
            ..Default::default()
        }
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Amount in minor currency units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn is_recurrent(&self) -> bool {
        self.is_recurrent
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Where the user has to be redirected to pay.
    pub fn payment_url(&self) -> Option<&str> {
        self.payment_url.as_deref()
    }
}

/// Saved card binding used for rebilling a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrentSession {
    #[serde(default, deserialize_with = "de_int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de_int")]
    pub session_id: i64,
    #[serde(default, deserialize_with = "de_int")]
    pub amount: i64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub rebilled_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub updated_at: Option<String>,
}
