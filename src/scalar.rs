//! Scalar validation and conversion
//!
//! Int is strict: only a base-10 literal with an optional sign passes its
//! default validator. Bool and Float never reject and coerce on a best-effort
//! basis, so loosely formatted XML does not abort a bind.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Predicate over raw XML text
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Raw XML text to bound value
pub type Converter = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Cached regex for the leading decimal number of a string
static FLOAT_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_float_prefix_regex() -> &'static Regex {
    FLOAT_PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("Failed to compile float prefix regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Int,
    Bool,
    Float,
    String,
}

impl ScalarKind {
    /// Look up a scalar kind by its declaration name (`int`, `bool`, `float`, `string`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ScalarKind::Int),
            "bool" => Some(ScalarKind::Bool),
            "float" => Some(ScalarKind::Float),
            "string" => Some(ScalarKind::String),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Bool => "bool",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
        }
    }

    /// Value held by a freshly allocated field of this kind
    pub fn default_value(self) -> Value {
        match self {
            ScalarKind::Int => Value::Int(0),
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::String => Value::String(String::new()),
        }
    }

    /// Default validation for this kind
    pub fn accepts(self, raw: &str) -> bool {
        match self {
            ScalarKind::Int => is_integer_literal(raw),
            ScalarKind::Bool | ScalarKind::Float | ScalarKind::String => true,
        }
    }

    /// Default (lenient) conversion for this kind
    pub fn coerce(self, raw: &str) -> Value {
        match self {
            ScalarKind::Int => Value::Int(coerce_int(raw)),
            ScalarKind::Bool => Value::Bool(coerce_bool(raw)),
            ScalarKind::Float => Value::Float(coerce_float(raw)),
            ScalarKind::String => Value::String(raw.to_string()),
        }
    }

    pub fn default_validator(self) -> Validator {
        Arc::new(move |raw| self.accepts(raw))
    }

    pub fn default_converter(self) -> Converter {
        Arc::new(move |raw| self.coerce(raw))
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base-10 integer literal with an optional leading sign that fits in `i64`
pub fn is_integer_literal(raw: &str) -> bool {
    raw.parse::<i64>().is_ok()
}

/// Leading signed digit run of `raw`, saturating at the `i64` bounds; 0 if none
pub fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Any non-empty string other than `"0"` is true
pub fn coerce_bool(raw: &str) -> bool {
    !raw.is_empty() && raw != "0"
}

/// Leading decimal number of `raw`; 0.0 for non-numeric text
pub fn coerce_float(raw: &str) -> f64 {
    get_float_prefix_regex()
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}
