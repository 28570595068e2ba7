use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method};

use crate::{
    api::{params::RequestParams, response::ApiResponse},
    env_config::ServiceConfig,
    error::Res,
};

/// Shared handle to a transport, held by every orchestrator.
pub type Api = Arc<dyn ApiProvider>;

/// Transport facade in front of one remote service.
///
/// `request` never fails because of the HTTP status: 4xx and 5xx answers
/// are returned as regular responses. It only fails when the body cannot
/// be decoded.
#[async_trait]
pub trait ApiProvider: Send + Sync {
    /// Service token, if configured.
    fn token(&self) -> Option<&str>;

    /// Absolute URL of `path` relative to the base URL.
    fn resolve_url(&self, path: &str) -> String;

    async fn request(&self, method: Method, path: &str, params: RequestParams)
    -> Res<ApiResponse>;
}

/// `ApiProvider` backed by a `reqwest` client.
pub struct HttpApiProvider {
    client: Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl HttpApiProvider {
    pub fn new(base_url: Option<String>, token: Option<String>) -> Self {
        HttpApiProvider {
            client: Client::new(),
            base_url,
            token,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.url.clone(), config.token.clone())
    }

    /// Replaces the underlying HTTP client (timeouts, proxies, TLS settings).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn into_api(self) -> Api {
        Arc::new(self)
    }
}

#[async_trait]
impl ApiProvider for HttpApiProvider {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn resolve_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_deref().unwrap_or_default().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: RequestParams,
    ) -> Res<ApiResponse> {
        let (Some(_), Some(token)) = (&self.base_url, &self.token) else {
            debug!("Service is not configured, answering {} {} with dummy response", method, path);
            return Ok(ApiResponse::dummy());
        };

        let url = self.resolve_url(path);
        debug!("Sending {} request to {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Accept", "application/json")
            .header("X-Service-Auth", token);

        let query = params.query_pairs();
        if !query.is_empty() {
            request = request.query(&query);
        }

        let form = params.form_pairs();
        if !form.is_empty() {
            request = request.form(&form);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed before any response: {}", method, url, e);
                return Ok(ApiResponse::unreachable(&e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!("{} {} answered with status {}", method, url, status);

        ApiResponse::from_body(status, &body)
    }
}
