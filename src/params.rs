//! Parameter sets
//!
//! The browser posts parameters as a flat JSON object. Each calculation
//! deserialises the object into its own typed parameter struct, falling back
//! to documented defaults for anything not supplied. Form inputs frequently
//! arrive as strings, so numeric fields accept either JSON numbers or numeric
//! strings.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name -> scalar mapping supplied per invocation (read-only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(Map<String, Value>);

impl ParamSet {
    /// Empty parameter set (all defaults)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the text is not a JSON object
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::InvalidParameter {
                name: "params".to_string(),
                reason: format!("expected a JSON object, got {other}"),
            }),
        }
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Raw value lookup
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether no parameters were supplied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialise into a typed parameter struct
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when a value has the wrong shape
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.0.clone())).map_err(|e| Error::InvalidParameter {
            name: "params".to_string(),
            reason: e.to_string(),
        })
    }
}

impl From<Map<String, Value>> for ParamSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Deserialisers accepting numbers or numeric strings
pub(crate) mod lenient {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(v) => Ok(v),
            NumberOrText::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}"))),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn usize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        let value = f64(deserializer)?;
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= 1e15 {
            Ok(value as usize)
        } else {
            Err(D::Error::custom(format!(
                "expected a non-negative integer, got {value}"
            )))
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(v)) => Ok(Some(v)),
            Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrText::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}"))),
        }
    }
}
