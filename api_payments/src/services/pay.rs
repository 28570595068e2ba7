use async_trait::async_trait;
use common::{
    api::{Api, RequestParams},
    error::{AppError, Res},
    misc::require,
    webhooks::{self, Webhook},
};
use log::{debug, info};
use reqwest::Method;
use serde_json::Value;

use crate::{
    dtos::pay::{
        Notification, PaymentUser, RebillRequest, RecurrentQuery, SessionInitRequest,
        SessionInitResponse,
    },
    models::session::{PaymentSession, RecurrentSession},
};

/// What the billing side needs from a payments service: opening a
/// one-off session that carries callback notifications.
#[async_trait]
pub trait PaymentInitiator: Send + Sync {
    async fn init_payment(
        &self,
        user: &PaymentUser,
        amount: i64,
        notifications: Vec<Notification>,
        provider: Option<&str>,
    ) -> Res<PaymentSession>;
}

/// Client of the remote payments service.
pub struct PaymentsService {
    api: Api,
    default_provider: Option<String>,
}

impl PaymentsService {
    pub fn new(api: Api) -> Self {
        PaymentsService {
            api,
            default_provider: None,
        }
    }

    pub fn with_default_provider(mut self, provider: impl Into<String>) -> Self {
        self.default_provider = Some(provider.into());
        self
    }

    pub fn set_default_provider(&mut self, provider: impl Into<String>) -> &mut Self {
        self.default_provider = Some(provider.into());
        self
    }

    pub fn default_provider(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Opens a payment session and returns the URL the user has to visit.
    ///
    /// # Arguments
    ///
    /// * `user` - The payer; `id`, `email` and `currency` are required.
    /// * `amount` - Amount in minor currency units.
    /// * `provider` - Payment system; the default provider when `None`.
    /// * `is_recurrent` - Whether the card should be kept for rebilling.
    /// * `notifications` - Callbacks replayed once the session is funded.
    ///
    /// # Returns
    ///
    /// The session built from the locally supplied values plus the payment
    /// URL issued by the service.
    pub async fn init_session(
        &self,
        user: &PaymentUser,
        amount: i64,
        provider: Option<&str>,
        is_recurrent: bool,
        notifications: Vec<Notification>,
    ) -> Res<PaymentSession> {
        let provider = provider
            .or(self.default_provider.as_deref())
            .ok_or(AppError::DefaultPaymentsProviderNotConfigured)?;

        let currency = require(&user.currency, "currency")?;
        let user_id = *require(&user.id, "id")?;
        let email = require(&user.email, "email")?;

        let params = RequestParams::form_of(&SessionInitRequest {
            provider,
            amount,
            currency,
            user_id,
            email,
            recurrent: u8::from(is_recurrent),
            notifications: &notifications,
        })?;

        let response = self.api.request(Method::POST, "/payments/init", params).await?;

        if response.failed() {
            return Err(AppError::UnableToInitializePaymentSession {
                status: response.status_code(),
                message: format!(
                    "Remote service answered with status {}.",
                    response.status_code()
                ),
            });
        }

        let payment_url = response
            .data_as::<Option<SessionInitResponse>>()
            .ok()
            .flatten()
            .and_then(|data| data.response)
            .and_then(|payload| payload.payment_url)
            .ok_or_else(|| AppError::UnableToInitializePaymentSession {
                status: response.status_code(),
                message: "Remote service was unable to provide payment url.".to_string(),
            })?;

        info!(
            "Payment session of {} via \"{}\" opened for user #{}",
            amount, provider, user_id
        );

        Ok(PaymentSession {
            uuid: None,
            user_id,
            user_email: Some(email.clone()),
            provider: Some(provider.to_string()),
            amount,
            currency: Some(currency.clone()),
            is_recurrent,
            notifications,
            payment_url: Some(payment_url),
        })
    }

    /// Tries to charge the saved card of a user, returning the raw answer data.
    pub async fn process_recurrent_payment(&self, user_id: i64, amount: i64) -> Res<Option<Value>> {
        let params = RequestParams::form_of(&RebillRequest { user_id, amount })?;
        let response = self.api.request(Method::POST, "/payments/rebill", params).await?;

        Ok(response.data().cloned())
    }

    pub async fn has_recurrent_session(&self, user_id: i64) -> Res<bool> {
        Ok(self.recurrent_session_for(user_id).await?.is_some())
    }

    /// Active recurrent session of a user. Any non-200 answer means none;
    /// `data` that is present but not a record gives an empty session.
    pub async fn recurrent_session_for(&self, user_id: i64) -> Res<Option<RecurrentSession>> {
        let params = RequestParams::query(serde_json::to_value(RecurrentQuery { user_id })?);
        let response = self.api.request(Method::GET, "/payments/recurrent", params).await?;

        if response.request_failed() {
            debug!("No recurrent session for user #{}", user_id);
            return Ok(None);
        }

        if response.data().is_none() {
            return Ok(None);
        }

        Ok(Some(response.data_record()?))
    }

    pub async fn delete_recurrent_session(&self, user_id: i64) -> Res<bool> {
        let params = RequestParams::query(serde_json::to_value(RecurrentQuery { user_id })?);
        let response = self.api.request(Method::DELETE, "/payments/recurrent", params).await?;

        Ok(!response.request_failed())
    }

    pub async fn create_webhook(
        &self,
        actor_type: &str,
        actor_id: i64,
        event: &str,
        url: &str,
    ) -> Res<Webhook> {
        webhooks::create_webhook(self.api.as_ref(), actor_type, actor_id, event, url).await
    }
}

#[async_trait]
impl PaymentInitiator for PaymentsService {
    async fn init_payment(
        &self,
        user: &PaymentUser,
        amount: i64,
        notifications: Vec<Notification>,
        provider: Option<&str>,
    ) -> Res<PaymentSession> {
        self.init_session(user, amount, provider, false, notifications)
            .await
    }
}
