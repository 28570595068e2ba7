use log::info;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    api::{params::RequestParams, provider::ApiProvider},
    error::{AppError, Res},
    misc::{de_int, de_opt_string},
};

/// Webhook subscription registered on a remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    /// Type of the entity whose actions are watched.
    #[serde(default, deserialize_with = "de_opt_string")]
    pub actor_type: Option<String>,
    #[serde(default, deserialize_with = "de_int")]
    pub actor_id: i64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub event: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookCreateRequest<'a> {
    actor_type: &'a str,
    actor_id: i64,
    event: &'a str,
    url: &'a str,
}

/// Registers a webhook on whichever service `api` points to.
pub async fn create_webhook(
    api: &dyn ApiProvider,
    actor_type: &str,
    actor_id: i64,
    event: &str,
    url: &str,
) -> Res<Webhook> {
    let params = RequestParams::form_of(&WebhookCreateRequest {
        actor_type,
        actor_id,
        event,
        url,
    })?;

    let response = api.request(Method::POST, "/webhooks", params).await?;

    if response.failed() {
        return Err(AppError::UnableToCreateWebhook {
            status: response.status_code(),
        });
    }

    info!("Webhook for {} #{} on \"{}\" created", actor_type, actor_id, event);
    response.data_as()
}
