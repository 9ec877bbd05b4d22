//! Typed attribute coercion.
//!
//! Raw attribute text becomes a [`Value`] according to a declared
//! [`TypeTag`]. Coercion never fails: malformed function, array, date, and
//! object input degrades to a safe default (no-op function reference,
//! empty array, invalid-date sentinel, JSON null) instead of surfacing an
//! error. Callers must not assume a successful coercion implies a
//! meaningful value for those tags.

use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Function,
    Array,
    Date,
    Url,
    Object,
}

/// A named reference into the engine's function registry.
///
/// Attribute text that is a bare dotted identifier path resolves by name at
/// call time; anything else (the original layer compiled it as source code)
/// degrades to the no-op reference. Resolution failures at call time are
/// also no-ops, never errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncRef {
    name: Option<String>,
}

impl FuncRef {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }

    pub const fn noop() -> Self {
        Self { name: None }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_noop(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Func(FuncRef),
    Array(Vec<String>),
    /// `None` is the invalid-date sentinel.
    Date(Option<DateTime<Utc>>),
    Url(String),
    Object(serde_json::Value),
}

/// Classify a value into its type tag, in priority order: string, number,
/// boolean, function, array, date, url, object.
pub fn infer_type(value: &Value) -> TypeTag {
    match value {
        Value::Str(_) => TypeTag::String,
        Value::Num(_) => TypeTag::Number,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Func(_) => TypeTag::Function,
        Value::Array(_) => TypeTag::Array,
        Value::Date(_) => TypeTag::Date,
        Value::Url(_) => TypeTag::Url,
        Value::Object(_) => TypeTag::Object,
    }
}

fn is_dotted_identifier(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'.')
}

/// Coerce raw attribute text into a typed value.
///
/// `base_url` is the configured prefix for url-tagged attributes.
pub fn coerce(raw: &str, tag: TypeTag, base_url: &str) -> Value {
    match tag {
        TypeTag::String => Value::Str(raw.to_string()),
        TypeTag::Number => {
            if raw.is_empty() {
                Value::Num(f64::NAN)
            } else {
                Value::Num(raw.trim().parse::<f64>().unwrap_or(f64::NAN))
            }
        }
        // Present-but-empty attributes (checked, disabled) mean true; only
        // a literal "false" reads as false.
        TypeTag::Boolean => Value::Bool(!raw.eq_ignore_ascii_case("false")),
        TypeTag::Function => {
            if is_dotted_identifier(raw) {
                Value::Func(FuncRef::named(raw))
            } else {
                log::debug!(
                    target: "binder.coerce",
                    "function attribute is not a dotted identifier path, degrading to no-op: {raw:?}"
                );
                Value::Func(FuncRef::noop())
            }
        }
        TypeTag::Array => {
            if raw.is_empty() {
                Value::Array(Vec::new())
            } else {
                Value::Array(raw.split(',').map(|s| s.trim().to_string()).collect())
            }
        }
        TypeTag::Date => match raw {
            "" => Value::Date(None),
            "now" => Value::Date(Some(Utc::now())),
            _ => Value::Date(
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok(),
            ),
        },
        TypeTag::Url => {
            let joined = format!("{base_url}{raw}");
            match url::Url::parse(&joined) {
                Ok(parsed) => Value::Url(parsed.to_string()),
                Err(_) => Value::Url(joined),
            }
        }
        TypeTag::Object => {
            Value::Object(serde_json::from_str(raw).unwrap_or(serde_json::Value::Null))
        }
    }
}
