//! # Composite Data — Record Values
//!
//! A `CompositeData` holds exactly one value (possibly null) for every item
//! of its `CompositeType`. The shape is checked once, at construction:
//! undeclared items, missing items, repeated items and wrongly-typed values
//! are all refused. The value is immutable afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::composite::CompositeType;
use crate::error::{ConversionError, OpenDataError};
use crate::open_type::OpenType;
use crate::value::OpenValue;

/// A value of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeData {
    composite_type: Arc<CompositeType>,
    contents: BTreeMap<String, Option<OpenValue>>,
}

impl CompositeData {
    /// Build a composite value from `(item name, value)` pairs. `None` is a
    /// null item value.
    ///
    /// # Errors
    ///
    /// Returns `ValueConversion` if a name is not declared by the type, is
    /// given twice, or is missing, or if a value is not of its item's type.
    pub fn new<I, K>(
        composite_type: impl Into<Arc<CompositeType>>,
        items: I,
    ) -> Result<Self, OpenDataError>
    where
        I: IntoIterator<Item = (K, Option<OpenValue>)>,
        K: Into<String>,
    {
        let composite_type = composite_type.into();
        let mismatch = |input: String, reason: String| -> OpenDataError {
            ConversionError::new(composite_type.type_name(), input, reason).into()
        };

        let mut contents = BTreeMap::new();
        for (name, value) in items {
            let name = name.into();
            let item_type = composite_type.item_type(&name).ok_or_else(|| {
                mismatch(
                    format!("item {name:?}"),
                    format!("not an item of composite type {}", composite_type.type_name()),
                )
            })?;
            if let Some(v) = &value {
                if !item_type.is_value(v) {
                    return Err(mismatch(
                        format!("item {name:?} = {}", v.render()),
                        format!("expected {}, got {}", item_type.type_name(), v.kind_label()),
                    ));
                }
            }
            if contents.insert(name.clone(), value).is_some() {
                return Err(mismatch(format!("item {name:?}"), "item given more than once".into()));
            }
        }

        if let Some(missing) = composite_type.item_names().find(|n| !contents.contains_key(*n)) {
            return Err(mismatch(format!("item {missing:?}"), "missing item".into()));
        }

        Ok(Self {
            composite_type,
            contents,
        })
    }

    /// Build a composite value where every item is non-null.
    pub fn of<I, K, V>(
        composite_type: impl Into<Arc<CompositeType>>,
        items: I,
    ) -> Result<Self, OpenDataError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OpenValue>,
    {
        Self::new(
            composite_type,
            items.into_iter().map(|(k, v)| (k, Some(v.into()))),
        )
    }

    /// The composite type this value was built against.
    pub fn composite_type(&self) -> &Arc<CompositeType> {
        &self.composite_type
    }

    /// The open type of this value.
    pub fn open_type(&self) -> OpenType {
        OpenType::Composite(self.composite_type.clone())
    }

    /// Value of the named item (`None` for a null item).
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the item is not declared.
    pub fn get(&self, key: &str) -> Result<Option<&OpenValue>, OpenDataError> {
        self.contents
            .get(key)
            .map(Option::as_ref)
            .ok_or_else(|| {
                OpenDataError::invalid_key(format!(
                    "{key:?} is not an item of composite type {}",
                    self.composite_type.type_name()
                ))
            })
    }

    /// Values of the named items, in the order requested.
    pub fn get_all(&self, keys: &[&str]) -> Result<Vec<Option<&OpenValue>>, OpenDataError> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Whether the type declares the named item.
    pub fn contains_key(&self, key: &str) -> bool {
        self.contents.contains_key(key)
    }

    /// Whether any item holds a value equal to `value`.
    pub fn contains_value(&self, value: &OpenValue) -> bool {
        self.contents.values().any(|v| v.as_ref() == Some(value))
    }

    /// `(item name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&OpenValue>)> {
        self.composite_type
            .item_names()
            .map(|n| (n, self.contents.get(n).and_then(Option::as_ref)))
    }

    /// Item values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = Option<&OpenValue>> {
        self.iter().map(|(_, v)| v)
    }
}

impl fmt::Display for CompositeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompositeData(compositeType={},contents={{",
            self.composite_type.type_name()
        )?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{name}={}", v.render())?,
                None => write!(f, "{name}=null")?,
            }
        }
        f.write_str("})")
    }
}
