//! # Raw Values
//!
//! The loosely-typed input a collaborator hands over for a constraint field:
//! canonical text, an already-native value, or (for `legalValues`) an array-
//! or set-shaped collection of either.

use std::fmt;

use omt_core::OpenValue;
use serde_json::Value;

use crate::descriptor::ConstraintField;
use crate::error::ConstraintError;

/// A loosely-typed constraint value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Text to be parsed with the target type's canonical parser.
    Text(String),
    /// A value already in some native representation.
    Native(OpenValue),
    /// An ordered, array-shaped collection.
    Sequence(Vec<RawValue>),
    /// A set-shaped collection; duplicates collapse during coercion.
    Set(Vec<RawValue>),
}

impl RawValue {
    /// An array-shaped collection.
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// A set-shaped collection.
    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    /// Whether this is an array- or set-shaped collection.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Set(_))
    }

    /// Short label of the raw shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Native(_) => "native value",
            Self::Sequence(_) => "sequence",
            Self::Set(_) => "set",
        }
    }

    /// Convert a JSON value supplied for `field`.
    ///
    /// Strings become text, numbers become the text of their JSON rendering,
    /// booleans become native booleans and arrays become sequences. `null`
    /// means the field is absent.
    ///
    /// # Errors
    ///
    /// Returns `MalformedConstraint` for objects and for `null` inside arrays.
    pub fn from_json(field: ConstraintField, value: Value) -> Result<Option<Self>, ConstraintError> {
        match value {
            Value::Null => Ok(None),
            Value::Array(items) => {
                let mut converted = Vec::with_capacity(items.len());
                for item in items {
                    match Self::from_json(field, item)? {
                        Some(v) => converted.push(v),
                        None => {
                            return Err(ConstraintError::MalformedConstraint {
                                field,
                                reason: "null element in array".into(),
                            })
                        }
                    }
                }
                Ok(Some(Self::Sequence(converted)))
            }
            other => Self::from_json_scalar(other)
                .map(Some)
                .ok_or_else(|| ConstraintError::MalformedConstraint {
                    field,
                    reason: "objects are not constraint values".into(),
                }),
        }
    }

    fn from_json_scalar(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s)),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            Value::Bool(b) => Some(Self::Native(OpenValue::Boolean(b))),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<OpenValue> for RawValue {
    fn from(v: OpenValue) -> Self {
        Self::Native(v)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Native(v) => f.write_str(&v.render()),
            Self::Sequence(items) | Self::Set(items) => {
                let (open, close) = if matches!(self, Self::Set(_)) { ("{", "}") } else { ("[", "]") };
                f.write_str(open)?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(close)
            }
        }
    }
}
