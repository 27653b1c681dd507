//! Parameter value representation and type coercion.
//!
//! Every parameter declares a [`ParamKind`]; every raw input is a
//! [`ParamValue`]. Coercion is the first, fixed step of the value pipeline:
//! it maps whatever the host or an interaction handler supplied onto the
//! declared kind before enum resolution and range clamping run.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// A numeric value, optionally range-clamped.
    Number,
    /// A boolean, coerced through a non-zero test.
    Bool,
    /// A string, optionally constrained to an enumeration.
    Text,
    /// A sequence of values; scalars are wrapped into one-element arrays.
    Array,
    /// A dictionary blob (JSON object).
    Dict,
    /// An uninterpreted value; coercion passes it through untouched.
    Opaque,
}

/// A dynamically typed parameter value.
///
/// Dictionary and opaque payloads ride on `serde_json` values, which is
/// also how they cross the echo sink boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<ParamValue>),
    Dict(serde_json::Map<String, JsonValue>),
    Opaque(JsonValue),
}

impl ParamValue {
    /// Numeric reading of this value, if one exists.
    ///
    /// Booleans read as 0/1, numeric strings parse, one-element arrays
    /// defer to their element.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Array(items) if items.len() == 1 => items[0].as_number(),
            _ => None,
        }
    }

    /// Non-negative integral reading, for index-addressed enums.
    pub fn as_index(&self) -> Option<usize> {
        let n = self.as_number()?;
        if n >= 0.0 && n.fract() == 0.0 {
            Some(n as usize)
        } else {
            None
        }
    }

    /// String reading of this value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean reading via the non-zero test.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => s.trim().parse::<f64>().map(|n| n != 0.0).unwrap_or(false),
            Self::Array(items) if items.len() == 1 => items[0].truthy(),
            _ => false,
        }
    }

    /// Coerce this value onto `kind`.
    ///
    /// This is pipeline step 1. It is total: inputs that cannot be read as
    /// the declared kind land on that kind's neutral value (0, false, empty
    /// string/map) rather than failing - validation against enumerations
    /// and ranges happens in the later steps.
    pub fn coerce(self, kind: ParamKind) -> ParamValue {
        match kind {
            ParamKind::Number => ParamValue::Number(self.as_number().unwrap_or(0.0)),
            ParamKind::Bool => ParamValue::Bool(self.truthy()),
            ParamKind::Text => match self {
                Self::Text(s) => ParamValue::Text(s),
                Self::Number(n) => ParamValue::Text(format_number(n)),
                Self::Bool(b) => ParamValue::Text(b.to_string()),
                other => ParamValue::Text(other.to_json().to_string()),
            },
            ParamKind::Array => match self {
                Self::Array(items) => ParamValue::Array(items),
                scalar => ParamValue::Array(vec![scalar]),
            },
            ParamKind::Dict => match self {
                Self::Dict(map) => ParamValue::Dict(map),
                Self::Opaque(JsonValue::Object(map)) => ParamValue::Dict(map),
                Self::Text(s) => match serde_json::from_str::<JsonValue>(&s) {
                    Ok(JsonValue::Object(map)) => ParamValue::Dict(map),
                    _ => ParamValue::Dict(serde_json::Map::new()),
                },
                _ => ParamValue::Dict(serde_json::Map::new()),
            },
            ParamKind::Opaque => self,
        }
    }

    /// Convert into a plain JSON value (echo sink representation).
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Dict(map) => JsonValue::Object(map.clone()),
            Self::Opaque(v) => v.clone(),
        }
    }
}

/// Format a number the way the host prints atoms: integers without a
/// trailing `.0`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(items: Vec<ParamValue>) -> Self {
        Self::Array(items)
    }
}

impl From<JsonValue> for ParamValue {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Object(map) => Self::Dict(map),
            other => Self::Opaque(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(
            ParamValue::from(true).coerce(ParamKind::Number),
            ParamValue::Number(1.0)
        );
        assert_eq!(
            ParamValue::from("2.5").coerce(ParamKind::Number),
            ParamValue::Number(2.5)
        );
        assert_eq!(
            ParamValue::from("not a number").coerce(ParamKind::Number),
            ParamValue::Number(0.0)
        );
    }

    #[test]
    fn test_bool_coercion_is_nonzero_test() {
        assert_eq!(
            ParamValue::from(0.0).coerce(ParamKind::Bool),
            ParamValue::Bool(false)
        );
        assert_eq!(
            ParamValue::from(-3.0).coerce(ParamKind::Bool),
            ParamValue::Bool(true)
        );
        assert_eq!(
            ParamValue::from("0").coerce(ParamKind::Bool),
            ParamValue::Bool(false)
        );
    }

    #[test]
    fn test_scalar_wraps_into_array() {
        assert_eq!(
            ParamValue::from(5.0).coerce(ParamKind::Array),
            ParamValue::Array(vec![ParamValue::Number(5.0)])
        );
        let arr = ParamValue::Array(vec![ParamValue::Number(1.0), ParamValue::Number(2.0)]);
        assert_eq!(arr.clone().coerce(ParamKind::Array), arr);
    }

    #[test]
    fn test_opaque_passes_through() {
        let v = ParamValue::Array(vec![ParamValue::Bool(true)]);
        assert_eq!(v.clone().coerce(ParamKind::Opaque), v);
    }

    #[test]
    fn test_dict_from_json_text() {
        let v = ParamValue::from(r#"{"mode":"fine"}"#).coerce(ParamKind::Dict);
        match v {
            ParamValue::Dict(map) => {
                assert_eq!(map.get("mode"), Some(&JsonValue::String("fine".into())));
            }
            other => panic!("expected dict, got {other:?}"),
        }
    }

    #[test]
    fn test_index_reading_rejects_fractional() {
        assert_eq!(ParamValue::from(2.0).as_index(), Some(2));
        assert_eq!(ParamValue::from(2.5).as_index(), None);
        assert_eq!(ParamValue::from(-1.0).as_index(), None);
    }

    #[test]
    fn test_number_formats_without_trailing_zero() {
        assert_eq!(
            ParamValue::from(3.0).coerce(ParamKind::Text),
            ParamValue::Text("3".into())
        );
        assert_eq!(
            ParamValue::from(3.25).coerce(ParamKind::Text),
            ParamValue::Text("3.25".into())
        );
    }
}
