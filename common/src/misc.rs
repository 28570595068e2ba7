use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::Value;

use crate::error::{AppError, Res};

/// Returns the value of a required input field or `InvalidArgument`.
pub fn require<'a, T>(value: &'a Option<T>, field: &str) -> Res<&'a T> {
    value.as_ref().ok_or_else(|| AppError::required_field(field))
}

/// Integer value of a loosely typed JSON scalar.
///
/// The remote services are not strict about scalar types: counters and
/// flags arrive as numbers, numeric strings or booleans depending on the
/// endpoint. Anything that does not look like a number reads as 0.
pub fn loose_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// A flag is set only when its integer value is exactly 1.
pub fn loose_flag(value: &Value) -> bool {
    loose_int(value) == 1
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    s[..end].parse().unwrap_or(0)
}

pub fn de_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(loose_int(&Value::deserialize(deserializer)?))
}

pub fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(loose_flag(&Value::deserialize(deserializer)?))
}

pub fn de_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Keyed collection that may arrive as an object, as a list (an empty
/// collection is serialized as `[]` by the remote side) or not at all.
pub fn de_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries: Vec<(String, Value)> = match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .map(|(key, value)| serde_json::from_value(value).map(|item| (key, item)))
        .collect::<Result<_, _>>()
        .map_err(D::Error::custom)
}

/// Nested record that is absent whenever the remote side sent anything
/// but a JSON object (`null`, `[]`, a scalar).
pub fn de_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => serde_json::from_value(Value::Object(map))
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Like `de_object`, but falls back to the record's default.
pub fn de_record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(de_object(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_int_reads_numeric_scalars() {
        assert_eq!(loose_int(&json!(5)), 5);
        assert_eq!(loose_int(&json!(-2000)), -2000);
        assert_eq!(loose_int(&json!(12.9)), 12);
        assert_eq!(loose_int(&json!("150000")), 150000);
        assert_eq!(loose_int(&json!(" 42 apples")), 42);
        assert_eq!(loose_int(&json!("-7")), -7);
        assert_eq!(loose_int(&json!(true)), 1);
        assert_eq!(loose_int(&json!("abc")), 0);
        assert_eq!(loose_int(&Value::Null), 0);
        assert_eq!(loose_int(&json!({"raw": 1})), 0);
    }

    #[test]
    fn flags_require_exactly_one() {
        assert!(loose_flag(&json!(1)));
        assert!(loose_flag(&json!("1")));
        assert!(loose_flag(&json!(true)));
        assert!(!loose_flag(&json!(2)));
        assert!(!loose_flag(&json!(0)));
        assert!(!loose_flag(&Value::Null));
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "de_map")]
        items: BTreeMap<String, i64>,
        #[serde(default, deserialize_with = "de_object")]
        nested: Option<BTreeMap<String, i64>>,
        #[serde(default, deserialize_with = "de_record")]
        record: BTreeMap<String, i64>,
    }

    #[test]
    fn empty_list_reads_as_empty_collection() {
        let holder: Holder = serde_json::from_value(json!({"items": [], "nested": []})).unwrap();
        assert!(holder.items.is_empty());
        assert!(holder.nested.is_none());

        let holder: Holder =
            serde_json::from_value(json!({"items": {"a": 1}, "nested": {"b": 2}})).unwrap();
        assert_eq!(holder.items.get("a"), Some(&1));
        assert_eq!(holder.nested.unwrap().get("b"), Some(&2));

        let holder: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(holder.items.is_empty());
        assert!(holder.nested.is_none());

        let holder: Holder =
            serde_json::from_value(json!({"record": null, "nested": "x"})).unwrap();
        assert!(holder.record.is_empty());
        assert!(holder.nested.is_none());
    }

    #[test]
    fn require_reports_missing_field() {
        let region: Option<String> = None;
        let err = require(&region, "region").unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let user_id = Some(1);
        assert_eq!(require(&user_id, "user_id").unwrap(), &1);
    }
}
