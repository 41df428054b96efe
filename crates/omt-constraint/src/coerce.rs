//! # Value Coercion
//!
//! Turns a [`RawValue`] into an [`OpenValue`] of a given [`OpenType`].
//!
//! Simple types carry their own canonical parser ([`SimpleType::parser`]).
//! Array, composite and tabular types have no canonical text form, so a
//! caller that wants to use them as constraint values registers explicit
//! conversions in a [`TextConversions`] table:
//!
//! - `value_of` parses the type's canonical text and is tried first;
//! - `from_text` constructs a value from a single text argument and is the
//!   fallback.
//!
//! A type with neither registered is non-convertible from text. Whatever a
//! conversion returns is re-checked against the target type, so every value
//! that leaves this module is a value of that type.
//!
//! [`SimpleType::parser`]: omt_core::SimpleType::parser

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use omt_core::{ConversionError, OpenDataError, OpenType, OpenValue};

use crate::descriptor::ConstraintField;
use crate::error::ConstraintError;
use crate::raw::RawValue;

/// A registered text conversion for a non-simple open type.
pub type TextFn = Arc<dyn Fn(&str) -> Result<OpenValue, OpenDataError> + Send + Sync>;

/// The conversions registered for one open type.
#[derive(Clone, Default)]
pub struct TextConversion {
    /// Parse the type's canonical text.
    pub value_of: Option<TextFn>,
    /// Construct a value from a single text argument.
    pub from_text: Option<TextFn>,
}

impl TextConversion {
    fn pick(&self) -> Option<&TextFn> {
        self.value_of.as_ref().or(self.from_text.as_ref())
    }
}

/// Per-type text conversions for array, composite and tabular types.
///
/// Built once by the caller, then shared read-only.
#[derive(Clone, Default)]
pub struct TextConversions {
    by_type: HashMap<OpenType, TextConversion>,
}

impl TextConversions {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the canonical text parser for `open_type`.
    pub fn with_value_of<F>(mut self, open_type: OpenType, f: F) -> Self
    where
        F: Fn(&str) -> Result<OpenValue, OpenDataError> + Send + Sync + 'static,
    {
        self.by_type.entry(open_type).or_default().value_of = Some(Arc::new(f));
        self
    }

    /// Register the single-text-argument constructor for `open_type`.
    pub fn with_from_text<F>(mut self, open_type: OpenType, f: F) -> Self
    where
        F: Fn(&str) -> Result<OpenValue, OpenDataError> + Send + Sync + 'static,
    {
        self.by_type.entry(open_type).or_default().from_text = Some(Arc::new(f));
        self
    }

    /// Conversions registered for `open_type`.
    pub fn get(&self, open_type: &OpenType) -> Option<&TextConversion> {
        self.by_type.get(open_type)
    }

    /// Number of types with at least one registered conversion.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for TextConversions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.by_type.keys().map(OpenType::type_name).collect();
        names.sort();
        f.debug_struct("TextConversions").field("types", &names).finish()
    }
}

/// Coerces raw constraint values to native open values.
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    conversions: TextConversions,
}

impl Coercer {
    /// A coercer for simple types only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A coercer that also uses `conversions` for non-simple types.
    pub fn with_conversions(conversions: TextConversions) -> Self {
        Self { conversions }
    }

    /// The registered conversions.
    pub fn conversions(&self) -> &TextConversions {
        &self.conversions
    }

    /// Coerce a single raw value to `open_type`.
    ///
    /// # Errors
    ///
    /// `ValueConversion` if the value is not of the type, its text does not
    /// parse, the type has no text conversion, or the raw value is a
    /// collection.
    pub fn coerce(&self, open_type: &OpenType, raw: &RawValue) -> Result<OpenValue, ConversionError> {
        let value = match raw {
            RawValue::Native(value) => value.clone(),
            RawValue::Text(text) => self.from_text(open_type, text)?,
            RawValue::Sequence(_) | RawValue::Set(_) => {
                return Err(ConversionError::new(
                    open_type.class_name(),
                    raw.to_string(),
                    format!("a {} is not a single value", raw.shape()),
                ))
            }
        };
        if open_type.is_value(&value) {
            Ok(value)
        } else {
            Err(ConversionError::new(
                open_type.class_name(),
                raw.to_string(),
                format!("{} is not a value of {}", value.kind_label(), open_type.type_name()),
            ))
        }
    }

    fn from_text(&self, open_type: &OpenType, text: &str) -> Result<OpenValue, ConversionError> {
        if let OpenType::Simple(simple) = open_type {
            return simple.parse(text);
        }
        let Some(convert) = self.conversions.get(open_type).and_then(TextConversion::pick) else {
            return Err(ConversionError::new(
                open_type.class_name(),
                format!("{text:?}"),
                "non-convertible type: no text conversion is registered",
            ));
        };
        convert(text).map_err(|err| match err {
            OpenDataError::ValueConversion(inner) => inner,
            other => ConversionError::new(open_type.class_name(), format!("{text:?}"), other.to_string()),
        })
    }

    /// Coerce a raw `legalValues` collection to `open_type`.
    ///
    /// Accepts a sequence, a set, or a native array value. Elements are
    /// coerced independently; duplicates collapse, keeping the first
    /// occurrence's position.
    ///
    /// # Errors
    ///
    /// `MalformedConstraint` if `raw` is not collection-shaped, otherwise the
    /// first element's `ValueConversion` failure. A null array element is a
    /// `ValueConversion` failure too.
    pub fn coerce_legal_values(
        &self,
        open_type: &OpenType,
        raw: &RawValue,
    ) -> Result<Vec<OpenValue>, ConstraintError> {
        let elements: Vec<RawValue> = match raw {
            RawValue::Sequence(items) | RawValue::Set(items) => items.clone(),
            RawValue::Native(OpenValue::Array(array)) => {
                let mut items = Vec::with_capacity(array.len());
                for (i, element) in array.elements().iter().enumerate() {
                    match element {
                        Some(v) => items.push(RawValue::Native(v.clone())),
                        None => {
                            return Err(ConversionError::new(
                                open_type.class_name(),
                                format!("legalValues[{i}]"),
                                "null is not a legal value",
                            )
                            .into())
                        }
                    }
                }
                items
            }
            other => {
                return Err(ConstraintError::MalformedConstraint {
                    field: ConstraintField::LegalValues,
                    reason: format!("expected an array or a set, got {}", other.shape()),
                })
            }
        };

        let mut seen = HashSet::with_capacity(elements.len());
        let mut legal = Vec::with_capacity(elements.len());
        for element in &elements {
            let value = self.coerce(open_type, element)?;
            if seen.insert(value.clone()) {
                legal.push(value);
            }
        }
        Ok(legal)
    }
}

/// Coerce with a simple-types-only [`Coercer`].
pub fn coerce(open_type: &OpenType, raw: &RawValue) -> Result<OpenValue, ConversionError> {
    Coercer::new().coerce(open_type, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omt_core::{ArrayType, CompositeData, CompositeType, ItemDef, SimpleType};

    fn int() -> OpenType {
        OpenType::Simple(SimpleType::Integer)
    }

    fn point_type() -> Arc<CompositeType> {
        Arc::new(
            CompositeType::new(
                "Point",
                "a point",
                vec![
                    ItemDef::new("x", "x", SimpleType::Integer),
                    ItemDef::new("y", "y", SimpleType::Integer),
                ],
            )
            .unwrap(),
        )
    }

    fn parse_point(point: Arc<CompositeType>) -> impl Fn(&str) -> Result<OpenValue, OpenDataError> {
        move |text| {
            let (x, y) = text
                .split_once(',')
                .ok_or_else(|| ConversionError::new("Point", text, "expected x,y"))?;
            let x = SimpleType::Integer.parse(x.trim())?;
            let y = SimpleType::Integer.parse(y.trim())?;
            Ok(OpenValue::Composite(CompositeData::of(point.clone(), [("x", x), ("y", y)])?))
        }
    }

    #[test]
    fn test_text_uses_canonical_parser() {
        assert_eq!(coerce(&int(), &"42".into()).unwrap(), OpenValue::Integer(42));
        assert!(coerce(&int(), &"4.2".into()).is_err());
    }

    #[test]
    fn test_native_accepted_only_when_type_matches() {
        let raw = RawValue::Native(OpenValue::Integer(7));
        assert_eq!(coerce(&int(), &raw).unwrap(), OpenValue::Integer(7));
        let raw = RawValue::Native(OpenValue::Long(7));
        let err = coerce(&int(), &raw).unwrap_err();
        assert_eq!(err.target, "java.lang.Integer");
    }

    #[test]
    fn test_collection_is_not_a_single_value() {
        assert!(coerce(&int(), &RawValue::sequence(["1"])).is_err());
    }

    #[test]
    fn test_composite_without_conversion_is_non_convertible() {
        let ty = OpenType::from(point_type());
        let err = coerce(&ty, &"1,2".into()).unwrap_err();
        assert!(err.reason.contains("non-convertible"), "{err}");
    }

    #[test]
    fn test_value_of_preferred_over_from_text() {
        let point = point_type();
        let ty = OpenType::from(point.clone());
        let coercer = Coercer::with_conversions(
            TextConversions::new()
                .with_from_text(ty.clone(), |t| {
                    Err(ConversionError::new("Point", t, "constructor must not be used").into())
                })
                .with_value_of(ty.clone(), parse_point(point)),
        );
        let value = coercer.coerce(&ty, &"1, 2".into()).unwrap();
        assert!(ty.is_value(&value));
    }

    #[test]
    fn test_from_text_fallback() {
        let point = point_type();
        let ty = OpenType::from(point.clone());
        let coercer =
            Coercer::with_conversions(TextConversions::new().with_from_text(ty.clone(), parse_point(point)));
        assert!(coercer.coerce(&ty, &"3,4".into()).is_ok());
        assert!(coercer.coerce(&ty, &"3".into()).is_err());
    }

    #[test]
    fn test_misbehaving_conversion_is_rechecked() {
        let ty = OpenType::from(point_type());
        let coercer = Coercer::with_conversions(
            TextConversions::new().with_value_of(ty.clone(), |_| Ok(OpenValue::Integer(1))),
        );
        assert!(coercer.coerce(&ty, &"anything".into()).is_err());
    }

    #[test]
    fn test_legal_values_collapse_duplicates() {
        let legal = Coercer::new()
            .coerce_legal_values(&int(), &RawValue::set(["3", "1", "3", "2"]))
            .unwrap();
        assert_eq!(
            legal,
            vec![OpenValue::Integer(3), OpenValue::Integer(1), OpenValue::Integer(2)]
        );
    }

    #[test]
    fn test_legal_values_from_native_array() {
        let array = omt_core::ArrayValue::of(
            ArrayType::new(1, SimpleType::Integer).unwrap(),
            [OpenValue::Integer(1), OpenValue::Integer(2)],
        )
        .unwrap();
        let legal = Coercer::new()
            .coerce_legal_values(&int(), &RawValue::Native(OpenValue::Array(array)))
            .unwrap();
        assert_eq!(legal.len(), 2);
    }

    #[test]
    fn test_legal_values_must_be_collection_shaped() {
        let err = Coercer::new()
            .coerce_legal_values(&int(), &"1".into())
            .unwrap_err();
        assert!(matches!(
            err,
            ConstraintError::MalformedConstraint { field: ConstraintField::LegalValues, .. }
        ));
    }

    #[test]
    fn test_legal_values_element_failure_is_conversion_error() {
        let err = Coercer::new()
            .coerce_legal_values(&int(), &RawValue::sequence(["1", "x"]))
            .unwrap_err();
        assert!(matches!(err, ConstraintError::ValueConversion(_)));
    }

    #[test]
    fn test_legal_values_null_array_element_is_conversion_error() {
        let array = omt_core::ArrayValue::new(
            ArrayType::new(1, SimpleType::Integer).unwrap(),
            vec![Some(OpenValue::Integer(1)), None],
        )
        .unwrap();
        let err = Coercer::new()
            .coerce_legal_values(&int(), &RawValue::Native(OpenValue::Array(array)))
            .unwrap_err();
        match err {
            ConstraintError::ValueConversion(inner) => {
                assert!(inner.to_string().contains("legalValues[1]"), "{inner}");
            }
            other => panic!("expected a conversion error, got {other:?}"),
        }
    }
}
