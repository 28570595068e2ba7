use serde::Serialize;
use serde_json::Value;

use crate::error::Res;

/// Form body and query string of a single request.
///
/// Both are kept as JSON trees so nested values (payment notifications,
/// discount targets) can be sent; they are flattened with bracket
/// notation right before the request leaves the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    pub form: Option<Value>,
    pub query: Option<Value>,
}

impl RequestParams {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn form(form: Value) -> Self {
        RequestParams {
            form: Some(form),
            query: None,
        }
    }

    pub fn query(query: Value) -> Self {
        RequestParams {
            form: None,
            query: Some(query),
        }
    }

    /// Builds a form from any serializable request record.
    pub fn form_of<T: Serialize>(form: &T) -> Res<Self> {
        Ok(Self::form(serde_json::to_value(form)?))
    }

    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.form.as_ref().map(encode_pairs).unwrap_or_default()
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.as_ref().map(encode_pairs).unwrap_or_default()
    }
}

/// Flattens a JSON tree into `key[nested][0]=value` pairs.
///
/// `null` values and empty containers produce no pair, booleans are sent
/// as `1`/`0`. A scalar at the top level has no key and is dropped.
pub fn encode_pairs(value: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    if let Value::Object(map) = value {
        for (key, item) in map {
            push_pairs(key.clone(), item, &mut pairs);
        }
    }

    pairs
}

fn push_pairs(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                push_pairs(format!("{}[{}]", key, i), item, pairs);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                push_pairs(format!("{}[{}]", key, name), item, pairs);
            }
        }
    }
}
