//! # Descriptors
//!
//! A [`Descriptor`] is the free-form field map a collaborator attaches to an
//! attribute or parameter. Four field names are recognized by this crate and
//! their spelling is part of the contract, because registries look them up by
//! name:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `defaultValue` | value used when none is supplied |
//! | `minValue` | inclusive lower bound |
//! | `maxValue` | inclusive upper bound |
//! | `legalValues` | the complete set of permitted values |
//!
//! [`ConstraintDescriptor`] is the projection of a descriptor onto those four
//! fields. Every other field is ignored here.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::ConstraintError;
use crate::raw::RawValue;

/// Descriptor field carrying the default value.
pub const DEFAULT_VALUE_FIELD: &str = "defaultValue";
/// Descriptor field carrying the inclusive minimum.
pub const MIN_VALUE_FIELD: &str = "minValue";
/// Descriptor field carrying the inclusive maximum.
pub const MAX_VALUE_FIELD: &str = "maxValue";
/// Descriptor field carrying the legal values.
pub const LEGAL_VALUES_FIELD: &str = "legalValues";
/// Descriptor field naming the open type (informational, set by infos).
pub const OPEN_TYPE_FIELD: &str = "openType";
/// Descriptor field naming the class of the open type's values.
pub const ORIGINAL_TYPE_FIELD: &str = "originalType";

/// The four recognized constraint fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintField {
    /// `defaultValue`.
    DefaultValue,
    /// `minValue`.
    MinValue,
    /// `maxValue`.
    MaxValue,
    /// `legalValues`.
    LegalValues,
}

impl ConstraintField {
    /// All recognized fields.
    pub fn all() -> &'static [ConstraintField] {
        &[
            Self::DefaultValue,
            Self::MinValue,
            Self::MaxValue,
            Self::LegalValues,
        ]
    }

    /// The exact descriptor field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultValue => DEFAULT_VALUE_FIELD,
            Self::MinValue => MIN_VALUE_FIELD,
            Self::MaxValue => MAX_VALUE_FIELD,
            Self::LegalValues => LEGAL_VALUES_FIELD,
        }
    }

    /// Look up a field by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for ConstraintField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form field map attached to an attribute or parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    fields: BTreeMap<String, RawValue>,
}

impl Descriptor {
    /// An empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs. Later pairs replace earlier ones.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build from a JSON object. `null` fields are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `MalformedConstraint` if a recognized constraint field holds a
    /// JSON shape no constraint can take. Unrecognized fields are kept as text.
    pub fn from_json(object: serde_json::Map<String, Value>) -> Result<Self, ConstraintError> {
        let mut fields = BTreeMap::new();
        for (name, value) in object {
            let raw = match ConstraintField::from_name(&name) {
                Some(field) => RawValue::from_json(field, value)?,
                None => match value {
                    Value::Null => None,
                    Value::String(s) => Some(RawValue::Text(s)),
                    other => Some(RawValue::Text(other.to_string())),
                },
            };
            if let Some(raw) = raw {
                fields.insert(name, raw);
            }
        }
        Ok(Self { fields })
    }

    /// Value of a field.
    pub fn field(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    /// Set a field, returning the previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field, returning its value.
    pub fn remove_field(&mut self, name: &str) -> Option<RawValue> {
        self.fields.remove(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the descriptor has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The recognized constraint fields of a descriptor, still untyped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintDescriptor {
    /// Raw `defaultValue`.
    pub default_value: Option<RawValue>,
    /// Raw `minValue`.
    pub min_value: Option<RawValue>,
    /// Raw `maxValue`.
    pub max_value: Option<RawValue>,
    /// Raw `legalValues`.
    pub legal_values: Option<RawValue>,
}

impl ConstraintDescriptor {
    /// Project a descriptor onto the four recognized fields.
    pub fn from_descriptor(descriptor: &Descriptor) -> Self {
        for name in descriptor.field_names() {
            if ConstraintField::from_name(name).is_none() {
                tracing::trace!(field = name, "ignoring unrecognized descriptor field");
            }
        }
        let get = |f: ConstraintField| descriptor.field(f.as_str()).cloned();
        Self {
            default_value: get(ConstraintField::DefaultValue),
            min_value: get(ConstraintField::MinValue),
            max_value: get(ConstraintField::MaxValue),
            legal_values: get(ConstraintField::LegalValues),
        }
    }

    /// Set `defaultValue`.
    pub fn with_default(mut self, value: impl Into<RawValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set `minValue`.
    pub fn with_min(mut self, value: impl Into<RawValue>) -> Self {
        self.min_value = Some(value.into());
        self
    }

    /// Set `maxValue`.
    pub fn with_max(mut self, value: impl Into<RawValue>) -> Self {
        self.max_value = Some(value.into());
        self
    }

    /// Set `legalValues`.
    pub fn with_legal_values(mut self, value: impl Into<RawValue>) -> Self {
        self.legal_values = Some(value.into());
        self
    }

    /// The raw value of one field.
    pub fn field(&self, field: ConstraintField) -> Option<&RawValue> {
        match field {
            ConstraintField::DefaultValue => self.default_value.as_ref(),
            ConstraintField::MinValue => self.min_value.as_ref(),
            ConstraintField::MaxValue => self.max_value.as_ref(),
            ConstraintField::LegalValues => self.legal_values.as_ref(),
        }
    }
}

impl From<&Descriptor> for ConstraintDescriptor {
    fn from(d: &Descriptor) -> Self {
        Self::from_descriptor(d)
    }
}
