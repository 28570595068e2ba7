use api_payments::{Notification, PaymentInitiator, PaymentUser};
use common::{
    api::{ApiResponse, response::HTTP_PAYMENT_REQUIRED},
    error::Res,
    misc::{loose_flag, loose_int},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Terminal state of a subscription change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionOutcome {
    /// The plan was changed and the profile holds the new subscription.
    Updated,
    /// The balance is short; the user has to pay at `payment_url()` first.
    PaymentRequired,
    /// Neither updated nor payable.
    Rejected,
}

/// Outcome of one subscribe attempt.
///
/// Serializes as `{data, status_code, payment_url}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionResult {
    #[serde(rename = "data")]
    body: Map<String, Value>,
    status_code: u16,
    payment_url: Option<String>,
}

impl SubscriptionResult {
    pub fn new(body: Map<String, Value>, status_code: u16) -> Self {
        SubscriptionResult {
            body,
            status_code,
            payment_url: None,
        }
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn subscription_updated(&self) -> bool {
        self.body.get("success").is_some_and(loose_flag)
    }

    pub fn payment_required(&self) -> bool {
        self.status_code == HTTP_PAYMENT_REQUIRED
    }

    pub fn outcome(&self) -> SubscriptionOutcome {
        if self.subscription_updated() {
            SubscriptionOutcome::Updated
        } else if self.payment_required() {
            SubscriptionOutcome::PaymentRequired
        } else {
            SubscriptionOutcome::Rejected
        }
    }

    fn required(&self, key: &str) -> Option<&Value> {
        self.body.get("data").and_then(|data| data.get(key))
    }

    /// Amount missing on the balance, in minor units.
    pub fn required_amount(&self) -> i64 {
        self.required("required").map(loose_int).unwrap_or(0)
    }

    pub fn required_amount_formatted(&self) -> Option<&str> {
        self.required("required_formatted").and_then(Value::as_str)
    }

    pub fn set_payment_url(&mut self, payment_url: impl Into<String>) -> &mut Self {
        self.payment_url = Some(payment_url.into());
        self
    }

    pub fn payment_url(&self) -> Option<&str> {
        self.payment_url.as_deref()
    }

    /// Opens a payment session for the required amount and keeps its URL.
    pub async fn init_payment(
        &mut self,
        payments: &dyn PaymentInitiator,
        user: &PaymentUser,
        notifications: Vec<Notification>,
        provider: Option<&str>,
    ) -> Res<&mut Self> {
        let session = payments
            .init_payment(user, self.required_amount(), notifications, provider)
            .await?;

        if let Some(url) = session.payment_url() {
            self.set_payment_url(url);
        }

        Ok(self)
    }
}

impl From<ApiResponse> for SubscriptionResult {
    fn from(response: ApiResponse) -> Self {
        let status_code = response.status_code();
        SubscriptionResult::new(response.into_body(), status_code)
    }
}
