use api_payments::{Notification, PaymentInitiator, PaymentSession, PaymentUser};
use common::{
    api::{
        Api, RequestParams,
        response::{HTTP_FORBIDDEN, HTTP_PAYMENT_REQUIRED, HTTP_UNPROCESSABLE_ENTITY},
    },
    error::{AppError, Res},
};
use log::{debug, info, warn};
use reqwest::Method;
use serde_json::Value;

use crate::{
    dtos::billing::{
        BalanceHistoryQuery, PaymentAcceptedMeta, PaymentAcceptedRequest, PaymentReversalMeta,
        PaymentReversalRequest, SpendFeatureRequest, SpendFeatureResponse, SubscriptionForm,
    },
    models::{
        profile::ProfileData,
        result::SubscriptionResult,
        subscription::{Subscription, SubscriptionData},
    },
};

const PAYMENT_CANCEL: &str = "payments.cancel";
const PAYMENT_REFUND: &str = "payments.refund";

/// A billing profile snapshot together with the operations that mutate it
/// on the billing service.
///
/// Every successful mutation replaces the local snapshot with what the
/// service returned; failed ones leave it untouched.
pub struct BillingProfile {
    api: Api,
    data: ProfileData,
    subscription: Subscription,
}

impl BillingProfile {
    pub fn new(api: Api, data: ProfileData) -> Self {
        let subscription = Subscription::new(data.subscription.clone(), data.balance.raw);

        BillingProfile {
            api,
            data,
            subscription,
        }
    }

    pub fn profile_data(&self) -> &ProfileData {
        &self.data
    }

    /// Replaces the whole snapshot and re-syncs the subscription view.
    pub fn set_profile_data(&mut self, data: ProfileData) -> &mut Self {
        self.data = data;
        self.subscription
            .set_data(self.data.subscription.clone())
            .set_balance(self.data.balance.raw);
        self
    }

    pub fn set_subscription_data(&mut self, data: SubscriptionData) -> &mut Self {
        self.data.subscription = data.clone();
        self.subscription.set_data(data);
        self
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn profile_id(&self) -> i64 {
        self.data.id
    }

    pub fn user_id(&self) -> i64 {
        self.data.user_id
    }

    pub fn profile_region(&self) -> Option<&str> {
        self.data.region.as_deref()
    }

    pub fn currency(&self) -> Option<&str> {
        self.data.currency.as_deref()
    }

    /// Name of the current plan.
    pub fn billing_plan(&self) -> Option<&str> {
        self.data.subscription.plan.name.as_deref()
    }

    pub fn billing_plan_id(&self) -> i64 {
        self.data.subscription.plan_id
    }

    pub fn billing_period(&self) -> Option<&str> {
        self.data.subscription.period.as_deref()
    }

    pub fn raw_balance(&self) -> i64 {
        self.data.balance.raw
    }

    pub fn set_raw_balance(&mut self, balance: i64) -> &mut Self {
        self.data.balance.raw = balance;
        self.subscription.set_balance(balance);
        self
    }

    /// Balance formatted for display.
    pub fn balance(&self) -> Option<&str> {
        self.data.balance.formatted.as_deref()
    }

    pub fn has_subscription(&self) -> bool {
        self.billing_plan_id() != 0
    }

    pub fn is_on_trial(&self) -> bool {
        self.data.subscription.is_trial
    }

    pub fn is_on_grace(&self) -> bool {
        self.data.subscription.is_grace
    }

    fn subscription_path(&self) -> String {
        format!("/profiles/{}/subscription", self.profile_id())
    }

    /// Moves the profile to `plan` for `period`.
    ///
    /// The existing subscription is updated in place; a 422 answer means the
    /// profile has none, and the same form is posted as a new subscription.
    /// When the balance does not cover the change (402), a payment session is
    /// opened for the missing amount. It carries a notification that makes
    /// the payments service replay the change once the money arrives.
    ///
    /// # Arguments
    ///
    /// * `payments` - Opens the payment session when one is needed.
    /// * `email` - Payer email passed to the payments service.
    /// * `plan` - Name of the plan to switch to.
    /// * `period` - Billing period of the plan.
    /// * `is_trial` - Whether the new subscription starts as a trial.
    /// * `ends_at` - Explicit end date of the new subscription.
    ///
    /// # Returns
    ///
    /// The outcome of the change. A rejected change is not an error: check
    /// `SubscriptionResult::outcome()`.
    pub async fn subscribe(
        &mut self,
        payments: &dyn PaymentInitiator,
        email: &str,
        plan: &str,
        period: &str,
        is_trial: bool,
        ends_at: Option<&str>,
    ) -> Res<SubscriptionResult> {
        let form = SubscriptionForm {
            plan,
            period,
            trial: u8::from(is_trial),
            ends_at,
        };
        let path = self.subscription_path();

        let mut response = self
            .api
            .request(Method::PUT, &path, RequestParams::form_of(&form)?)
            .await?;
        let mut profile_has_subscription = true;

        if response.status_code() == HTTP_UNPROCESSABLE_ENTITY {
            debug!("Profile #{} has no subscription yet, creating one", self.profile_id());
            profile_has_subscription = false;
            response = self
                .api
                .request(Method::POST, &path, RequestParams::form_of(&form)?)
                .await?;
        }

        let updated = response.success();
        if updated {
            // The change is already applied remotely; a snapshot we cannot
            // read leaves the local one as it was.
            match response.data_record::<SubscriptionData>() {
                Ok(data) => {
                    self.set_subscription_data(data);
                }
                Err(e) => warn!(
                    "Profile #{} subscribed to \"{}\" but the new subscription could not be read: {}",
                    self.profile_id(),
                    plan,
                    e
                ),
            }
        }
        let mut result = SubscriptionResult::from(response);

        if updated {
            info!("Profile #{} subscribed to \"{}\" ({})", self.profile_id(), plan, period);
        } else if result.payment_required() {
            let notification = Notification {
                kind: "confirmed".to_string(),
                service: "billing".to_string(),
                service_token: self.api.token().map(str::to_string),
                url: self.api.resolve_url(&path),
                method: if profile_has_subscription { "PUT" } else { "POST" }.to_string(),
                form: serde_json::to_value(&form)?,
            };
            let user = PaymentUser {
                id: Some(self.user_id()),
                email: Some(email.to_string()),
                currency: self.currency().map(str::to_string),
            };

            result
                .init_payment(payments, &user, vec![notification], None)
                .await?;
            info!(
                "Profile #{} needs {} more to subscribe to \"{}\"",
                self.profile_id(),
                result.required_amount(),
                plan
            );
        } else {
            warn!(
                "Subscription of profile #{} to \"{}\" was rejected with status {}",
                self.profile_id(),
                plan,
                result.status_code()
            );
        }

        Ok(result)
    }

    /// Cancels the current subscription. Only an HTTP 200 answer counts as
    /// cancelled; the `success` flag of the body is not consulted.
    pub async fn cancel_subscription(&mut self) -> Res<bool> {
        let response = self
            .api
            .request(Method::DELETE, &self.subscription_path(), RequestParams::none())
            .await?;

        if response.request_failed() {
            return Ok(false);
        }

        self.set_subscription_data(SubscriptionData::default());
        info!("Subscription of profile #{} cancelled", self.profile_id());
        Ok(true)
    }

    /// Balance changes of the profile, as sent by the service.
    pub async fn balance_history(&self, timezone: Option<&str>) -> Res<Value> {
        let params = match timezone {
            Some(timezone) => {
                RequestParams::query(serde_json::to_value(BalanceHistoryQuery { timezone })?)
            }
            None => RequestParams::none(),
        };

        let response = self
            .api
            .request(
                Method::GET,
                &format!("/profiles/{}/balance/history", self.profile_id()),
                params,
            )
            .await?;

        if response.failed() {
            return Err(AppError::BalanceHistoryRequestFailed {
                status: response.status_code(),
            });
        }

        Ok(response.data().cloned().unwrap_or(Value::Null))
    }

    /// Consumes `value` units of `feature`.
    ///
    /// On success the profile snapshot is replaced with the one returned by
    /// the service, which carries the new balance and quotas.
    pub async fn spend_feature(
        &mut self,
        feature: &str,
        value: i64,
        charge_trials: bool,
    ) -> Res<()> {
        let params = RequestParams::form_of(&SpendFeatureRequest {
            feature,
            value,
            charge_trials: u8::from(charge_trials),
        })?;

        let response = self
            .api
            .request(
                Method::DELETE,
                &format!("/profiles/{}/subscription/features", self.profile_id()),
                params,
            )
            .await?;

        if response.failed() {
            return Err(match response.status_code() {
                HTTP_PAYMENT_REQUIRED => AppError::NegativeBalanceLimitReached {
                    feature: feature.to_string(),
                },
                HTTP_FORBIDDEN => AppError::FeatureIsNotAvailable {
                    feature: feature.to_string(),
                },
                status => AppError::Runtime {
                    status,
                    message: format!("Unable to spend feature \"{}\": unknown error", feature),
                },
            });
        }

        let spent: SpendFeatureResponse = response.data_record()?;
        debug!(
            "Profile #{} spent {} of \"{}\", {} left",
            self.profile_id(),
            value,
            feature,
            spent.feature.map(|quota| quota.left).unwrap_or_default()
        );
        self.set_profile_data(spent.profile);

        Ok(())
    }

    /// Reports a funded payment session to the billing service.
    ///
    /// Best effort: a failed report is logged and otherwise ignored.
    pub async fn payment_accepted(&self, session: &PaymentSession) {
        let form = PaymentAcceptedRequest {
            amount: session.amount(),
            transaction: session.uuid(),
            system: session.provider(),
            meta: PaymentAcceptedMeta {
                recurrent: u8::from(session.is_recurrent()),
            },
        };

        self.report_payment(Method::POST, &form, "accepted").await;
    }

    pub async fn payment_cancelled(&self, session: &PaymentSession) {
        self.report_reversal(session, PAYMENT_CANCEL).await;
    }

    pub async fn payment_refunded(&self, session: &PaymentSession) {
        self.report_reversal(session, PAYMENT_REFUND).await;
    }

    async fn report_reversal(&self, session: &PaymentSession, kind: &str) {
        let form = PaymentReversalRequest {
            amount: session.amount(),
            kind,
            meta: PaymentReversalMeta {
                transaction: session.uuid(),
            },
        };

        self.report_payment(Method::DELETE, &form, kind).await;
    }

    async fn report_payment<T: serde::Serialize>(&self, method: Method, form: &T, event: &str) {
        let path = format!("/users/{}/payments", self.user_id());
        let outcome = match RequestParams::form_of(form) {
            Ok(params) => self.api.request(method, &path, params).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) if response.success() => {
                debug!("Payment {} reported for user #{}", event, self.user_id());
            }
            Ok(response) => warn!(
                "Billing service did not accept payment {} for user #{} (status {})",
                event,
                self.user_id(),
                response.status_code()
            ),
            Err(e) => warn!(
                "Unable to report payment {} for user #{}: {}",
                event,
                self.user_id(),
                e
            ),
        }
    }
}

