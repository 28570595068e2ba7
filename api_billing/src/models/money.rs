use common::misc::{de_int, de_opt_string};
use serde::{Deserialize, Serialize};

/// Amount in minor currency units along with its display form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    #[serde(default, deserialize_with = "de_int")]
    pub raw: i64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub formatted: Option<String>,
}

impl Money {
    pub fn from_raw(raw: i64) -> Self {
        Money {
            raw,
            formatted: None,
        }
    }
}
