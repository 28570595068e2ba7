use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::{
    error::{AppError, Res},
    misc::loose_flag,
};

pub const HTTP_OK: u16 = 200;
pub const HTTP_PAYMENT_REQUIRED: u16 = 402;
pub const HTTP_FORBIDDEN: u16 = 403;
pub const HTTP_NOT_FOUND: u16 = 404;
pub const HTTP_UNPROCESSABLE_ENTITY: u16 = 422;
pub const HTTP_SERVICE_UNAVAILABLE: u16 = 503;

/// Status code and decoded JSON body of a remote call.
///
/// The HTTP status and the application level `success` flag are separate
/// signals: a 200 answer may still report `success: 0`. `failed()` is the
/// business outcome, `status_code()` is for flows that branch on specific
/// codes.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status_code: u16,
    body: Map<String, Value>,
}

impl ApiResponse {
    pub fn new(status_code: u16, body: Map<String, Value>) -> Self {
        ApiResponse { status_code, body }
    }

    /// Decodes a raw response body.
    ///
    /// # Errors
    ///
    /// * `EmptyApiResponse` if the body has no content.
    /// * `InvalidJsonResponse` if the body is not a non-empty JSON object.
    pub fn from_body(status_code: u16, body: &[u8]) -> Res<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::EmptyApiResponse);
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) if !map.is_empty() => Ok(ApiResponse::new(status_code, map)),
            _ => Err(AppError::InvalidJsonResponse),
        }
    }

    /// Response handed out by an unconfigured provider.
    pub fn dummy() -> Self {
        Self::from_json(HTTP_NOT_FOUND, json!({ "error": HTTP_NOT_FOUND }))
    }

    /// Response synthesized when the remote side could not be reached.
    pub fn unreachable(reason: &str) -> Self {
        Self::from_json(
            HTTP_SERVICE_UNAVAILABLE,
            json!({ "error": HTTP_SERVICE_UNAVAILABLE, "message": reason }),
        )
    }

    /// Builds a response from a JSON value; non-object values give an empty body.
    pub fn from_json(status_code: u16, body: Value) -> Self {
        match body {
            Value::Object(map) => ApiResponse::new(status_code, map),
            _ => ApiResponse::new(status_code, Map::new()),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// True when the HTTP status is anything but 200.
    pub fn request_failed(&self) -> bool {
        self.status_code != HTTP_OK
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }

    /// The `data` member, absent when missing or `null`.
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data").filter(|data| !data.is_null())
    }

    /// Decodes the `data` member into a record.
    pub fn data_as<T: DeserializeOwned>(&self) -> Res<T> {
        let data = self.data().cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }

    /// Decodes the `data` member into a record, or its default when `data`
    /// is not a JSON object.
    pub fn data_record<T: DeserializeOwned + Default>(&self) -> Res<T> {
        match self.data() {
            Some(data @ Value::Object(_)) => Ok(serde_json::from_value(data.clone())?),
            _ => Ok(T::default()),
        }
    }

    /// Decodes the `data` member into a list. A keyed object gives its
    /// values in key order; anything else gives an empty list.
    pub fn data_list<T: DeserializeOwned>(&self) -> Res<Vec<T>> {
        let items = match self.data() {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Object(map)) => map.values().cloned().collect(),
            _ => return Ok(Vec::new()),
        };

        Ok(items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?)
    }

    pub fn success(&self) -> bool {
        self.body.get("success").map(loose_flag).unwrap_or(false)
    }

    pub fn failed(&self) -> bool {
        !self.success()
    }
}
