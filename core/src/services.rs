use api_billing::BillingService;
use api_payments::PaymentsService;
use common::{api::HttpApiProvider, env_config::Config};
use log::warn;

/// Both remote services, built once from the configuration.
pub struct Services {
    pub billing: BillingService,
    pub payments: PaymentsService,
}

impl Services {
    pub fn from_config(config: &Config) -> Self {
        if !config.billing.is_configured() {
            warn!("Billing service is not configured, every lookup will come back empty");
        }
        if !config.payments.is_configured() {
            warn!("Payments service is not configured, every lookup will come back empty");
        }

        let billing = BillingService::new(HttpApiProvider::from_config(&config.billing).into_api());

        let mut payments =
            PaymentsService::new(HttpApiProvider::from_config(&config.payments).into_api());
        if let Some(provider) = &config.default_payments_provider {
            payments.set_default_provider(provider.as_str());
        }

        Services { billing, payments }
    }
}
