//! # Constraint Validation
//!
//! Resolves the four constraint fields of an attribute or parameter against
//! its open type and enforces their cross-field consistency.
//!
//! ## Algorithm
//!
//! 1. Coerce every present field to the open type. The first failure is
//!    returned as-is; there is no partial result.
//! 2. An empty `legalValues` collection counts as absent.
//! 3. `legalValues` together with `minValue` or `maxValue` is a conflict.
//! 4. `minValue`/`maxValue` on a type without a natural order is unsupported.
//! 5. `minValue > maxValue` is a range error. Equal bounds are allowed.
//! 6. `defaultValue` must equal one of the `legalValues`.
//! 7. `defaultValue` must lie in the inclusive range.
//!
//! The validator holds no state beyond its [`Coercer`], so the same inputs
//! always produce the same verdict.

use std::cmp::Ordering;
use std::fmt;

use omt_core::{OpenType, OpenValue};

use crate::coerce::Coercer;
use crate::descriptor::{ConstraintDescriptor, ConstraintField};
use crate::error::ConstraintError;
use crate::raw::RawValue;

/// Constraint values that are already native, for callers that build
/// constraints programmatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintValues {
    /// Default value.
    pub default_value: Option<OpenValue>,
    /// Inclusive minimum.
    pub min_value: Option<OpenValue>,
    /// Inclusive maximum.
    pub max_value: Option<OpenValue>,
    /// Permitted values.
    pub legal_values: Option<Vec<OpenValue>>,
}

impl ConstraintValues {
    /// No constraints.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only a default value.
    pub fn with_default(default_value: impl Into<OpenValue>) -> Self {
        Self {
            default_value: Some(default_value.into()),
            ..Self::default()
        }
    }

    /// An inclusive range with an optional default.
    pub fn range(
        default_value: Option<OpenValue>,
        min_value: Option<OpenValue>,
        max_value: Option<OpenValue>,
    ) -> Self {
        Self {
            default_value,
            min_value,
            max_value,
            legal_values: None,
        }
    }

    /// A legal value set with an optional default.
    pub fn legal<I, V>(default_value: Option<OpenValue>, legal_values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OpenValue>,
    {
        Self {
            default_value,
            min_value: None,
            max_value: None,
            legal_values: Some(legal_values.into_iter().map(Into::into).collect()),
        }
    }

    fn into_descriptor(self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            default_value: self.default_value.map(RawValue::Native),
            min_value: self.min_value.map(RawValue::Native),
            max_value: self.max_value.map(RawValue::Native),
            legal_values: self
                .legal_values
                .map(|values| RawValue::Set(values.into_iter().map(RawValue::Native).collect())),
        }
    }
}

/// The validated, typed constraints of one attribute or parameter.
///
/// Only [`ConstraintValidator`] builds non-empty instances, so every instance
/// satisfies the consistency rules for its open type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedConstraints {
    open_type: OpenType,
    default_value: Option<OpenValue>,
    min_value: Option<OpenValue>,
    max_value: Option<OpenValue>,
    legal_values: Option<Vec<OpenValue>>,
}

impl ResolvedConstraints {
    /// No constraints on `open_type`.
    pub fn none(open_type: OpenType) -> Self {
        Self {
            open_type,
            default_value: None,
            min_value: None,
            max_value: None,
            legal_values: None,
        }
    }

    /// The open type the constraints were resolved against.
    pub fn open_type(&self) -> &OpenType {
        &self.open_type
    }

    /// Default value.
    pub fn default_value(&self) -> Option<&OpenValue> {
        self.default_value.as_ref()
    }

    /// Inclusive minimum.
    pub fn min_value(&self) -> Option<&OpenValue> {
        self.min_value.as_ref()
    }

    /// Inclusive maximum.
    pub fn max_value(&self) -> Option<&OpenValue> {
        self.max_value.as_ref()
    }

    /// Permitted values, duplicates removed, in first-occurrence order.
    pub fn legal_values(&self) -> Option<&[OpenValue]> {
        self.legal_values.as_deref()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.default_value.is_none()
            && self.min_value.is_none()
            && self.max_value.is_none()
            && self.legal_values.is_none()
    }

    /// Whether `value` is of the open type and satisfies the legal values and
    /// range.
    pub fn permits(&self, value: &OpenValue) -> bool {
        if !self.open_type.is_value(value) {
            return false;
        }
        if let Some(legal) = &self.legal_values {
            if !legal.contains(value) {
                return false;
            }
        }
        in_range(value, self.min_value.as_ref(), self.max_value.as_ref())
    }
}

impl fmt::Display for ResolvedConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = &self.default_value {
            parts.push(format!("{}={}", ConstraintField::DefaultValue, v.render()));
        }
        if let Some(v) = &self.min_value {
            parts.push(format!("{}={}", ConstraintField::MinValue, v.render()));
        }
        if let Some(v) = &self.max_value {
            parts.push(format!("{}={}", ConstraintField::MaxValue, v.render()));
        }
        if let Some(values) = &self.legal_values {
            let rendered: Vec<String> = values.iter().map(OpenValue::render).collect();
            parts.push(format!("{}={{{}}}", ConstraintField::LegalValues, rendered.join(", ")));
        }
        if parts.is_empty() {
            f.write_str("unconstrained")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

fn in_range(value: &OpenValue, min: Option<&OpenValue>, max: Option<&OpenValue>) -> bool {
    let above_min = min.map_or(true, |m| {
        matches!(value.natural_cmp(m), Some(Ordering::Greater | Ordering::Equal))
    });
    let below_max = max.map_or(true, |m| {
        matches!(value.natural_cmp(m), Some(Ordering::Less | Ordering::Equal))
    });
    above_min && below_max
}

/// Validates constraint descriptors against open types.
#[derive(Debug, Clone, Default)]
pub struct ConstraintValidator {
    coercer: Coercer,
}

impl ConstraintValidator {
    /// A validator for simple-typed constraint values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator that coerces with `coercer`.
    pub fn with_coercer(coercer: Coercer) -> Self {
        Self { coercer }
    }

    /// The coercer used for raw values.
    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    /// Coerce and validate raw constraint fields.
    ///
    /// # Errors
    ///
    /// The first coercion failure, or the first consistency rule broken, in
    /// the order given in the module documentation.
    pub fn validate(
        &self,
        open_type: &OpenType,
        descriptor: &ConstraintDescriptor,
    ) -> Result<ResolvedConstraints, ConstraintError> {
        let result = self.resolve(open_type, descriptor);
        match &result {
            Ok(resolved) => tracing::debug!(
                open_type = %open_type.type_name(),
                constraints = %resolved,
                "resolved constraints"
            ),
            Err(err) => tracing::debug!(
                open_type = %open_type.type_name(),
                kind = err.kind(),
                error = %err,
                "rejected constraints"
            ),
        }
        result
    }

    /// Validate already-native constraint values.
    ///
    /// # Errors
    ///
    /// As [`ConstraintValidator::validate`]; a value that is not of
    /// `open_type` is a `ValueConversion` error.
    pub fn validate_values(
        &self,
        open_type: &OpenType,
        values: ConstraintValues,
    ) -> Result<ResolvedConstraints, ConstraintError> {
        self.validate(open_type, &values.into_descriptor())
    }

    fn resolve(
        &self,
        open_type: &OpenType,
        descriptor: &ConstraintDescriptor,
    ) -> Result<ResolvedConstraints, ConstraintError> {
        let coerce_one = |raw: &Option<RawValue>| -> Result<Option<OpenValue>, ConstraintError> {
            raw.as_ref()
                .map(|r| self.coercer.coerce(open_type, r))
                .transpose()
                .map_err(ConstraintError::from)
        };

        let default_value = coerce_one(&descriptor.default_value)?;
        let min_value = coerce_one(&descriptor.min_value)?;
        let max_value = coerce_one(&descriptor.max_value)?;
        let legal_values = descriptor
            .legal_values
            .as_ref()
            .map(|raw| self.coercer.coerce_legal_values(open_type, raw))
            .transpose()?
            .filter(|values| !values.is_empty());

        if legal_values.is_some() {
            let range_fields = match (&min_value, &max_value) {
                (Some(_), Some(_)) => Some("minValue and maxValue"),
                (Some(_), None) => Some("minValue"),
                (None, Some(_)) => Some("maxValue"),
                (None, None) => None,
            };
            if let Some(range_fields) = range_fields {
                return Err(ConstraintError::ConstraintConflict {
                    range_fields: range_fields.to_string(),
                });
            }
        }

        if !open_type.has_natural_order() {
            let present = if min_value.is_some() {
                Some(ConstraintField::MinValue)
            } else if max_value.is_some() {
                Some(ConstraintField::MaxValue)
            } else {
                None
            };
            if let Some(field) = present {
                return Err(ConstraintError::UnsupportedConstraint {
                    field,
                    type_name: open_type.type_name(),
                });
            }
        }

        if let (Some(min), Some(max)) = (&min_value, &max_value) {
            if min.natural_cmp(max) == Some(Ordering::Greater) {
                return Err(ConstraintError::ConstraintRange {
                    min: min.render(),
                    max: max.render(),
                });
            }
        }

        if let Some(default) = &default_value {
            if let Some(legal) = &legal_values {
                if !legal.contains(default) {
                    return Err(ConstraintError::DefaultValueNotLegal {
                        default: default.render(),
                    });
                }
            }
            if !in_range(default, min_value.as_ref(), max_value.as_ref()) {
                return Err(ConstraintError::DefaultValueOutOfRange {
                    default: default.render(),
                    min: min_value.as_ref().map(OpenValue::render),
                    max: max_value.as_ref().map(OpenValue::render),
                });
            }
        }

        Ok(ResolvedConstraints {
            open_type: open_type.clone(),
            default_value,
            min_value,
            max_value,
            legal_values,
        })
    }
}

/// Validate with a simple-types-only [`ConstraintValidator`].
pub fn validate(
    open_type: &OpenType,
    descriptor: &ConstraintDescriptor,
) -> Result<ResolvedConstraints, ConstraintError> {
    ConstraintValidator::new().validate(open_type, descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omt_core::{CompositeType, Decimal, ItemDef, SimpleType};

    fn int() -> OpenType {
        OpenType::Simple(SimpleType::Integer)
    }

    #[test]
    fn test_empty_descriptor_resolves_to_nothing() {
        let resolved = validate(&int(), &ConstraintDescriptor::default()).unwrap();
        assert!(resolved.is_empty());
        assert_eq!(resolved, ResolvedConstraints::none(int()));
        assert_eq!(resolved.to_string(), "unconstrained");
    }

    #[test]
    fn test_coercion_failure_comes_first() {
        let d = ConstraintDescriptor::default()
            .with_default("five")
            .with_min("10")
            .with_max("0");
        let err = validate(&int(), &d).unwrap_err();
        assert!(matches!(err, ConstraintError::ValueConversion(_)));
    }

    #[test]
    fn test_empty_legal_values_is_absent() {
        let d = ConstraintDescriptor::default()
            .with_legal_values(RawValue::sequence(Vec::<&str>::new()))
            .with_min("0");
        let resolved = validate(&int(), &d).unwrap();
        assert_eq!(resolved.legal_values(), None);
        assert_eq!(resolved.min_value(), Some(&OpenValue::Integer(0)));
    }

    #[test]
    fn test_conflict_names_present_range_fields() {
        let d = ConstraintDescriptor::default()
            .with_legal_values(RawValue::sequence(["1"]))
            .with_max("3");
        assert_eq!(
            validate(&int(), &d).unwrap_err(),
            ConstraintError::ConstraintConflict {
                range_fields: "maxValue".into()
            }
        );
    }

    #[test]
    fn test_range_on_unordered_type_is_unsupported() {
        let point = CompositeType::new(
            "Point",
            "a point",
            vec![ItemDef::new("x", "x", SimpleType::Integer)],
        )
        .unwrap();
        let ty = OpenType::from(point.clone());
        let value = omt_core::CompositeData::of(point, [("x", 1)]).unwrap();
        let values = ConstraintValues::range(None, None, Some(OpenValue::Composite(value)));
        let err = ConstraintValidator::new().validate_values(&ty, values).unwrap_err();
        assert_eq!(
            err,
            ConstraintError::UnsupportedConstraint {
                field: ConstraintField::MaxValue,
                type_name: "Point".into()
            }
        );
    }

    #[test]
    fn test_void_has_no_order() {
        let ty = OpenType::Simple(SimpleType::Void);
        assert!(validate(&ty, &ConstraintDescriptor::default()).is_ok());
    }

    #[test]
    fn test_default_out_of_half_open_range() {
        let d = ConstraintDescriptor::default().with_default("11").with_max("10");
        let err = validate(&int(), &d).unwrap_err();
        assert_eq!(err.to_string(), "defaultValue 11 is outside the range [unbounded, 10]");
    }

    #[test]
    fn test_decimal_range_ignores_scale() {
        let ty = OpenType::Simple(SimpleType::BigDecimal);
        let d = ConstraintDescriptor::default()
            .with_min("1.0")
            .with_max("1.00")
            .with_default("1");
        let resolved = validate(&ty, &d).unwrap();
        assert_eq!(
            resolved.min_value(),
            Some(&OpenValue::BigDecimal(Decimal::new(10, 1)))
        );
    }

    #[test]
    fn test_legal_membership_is_exact() {
        let ty = OpenType::Simple(SimpleType::BigDecimal);
        let d = ConstraintDescriptor::default()
            .with_default("1.0")
            .with_legal_values(RawValue::sequence(["1.00", "2"]));
        assert!(matches!(
            validate(&ty, &d),
            Err(ConstraintError::DefaultValueNotLegal { .. })
        ));
    }

    #[test]
    fn test_typed_values_must_match_type() {
        let values = ConstraintValues::with_default(OpenValue::Long(5));
        let err = ConstraintValidator::new().validate_values(&int(), values).unwrap_err();
        assert_eq!(err.kind(), "value_conversion");
    }

    #[test]
    fn test_permits() {
        let d = ConstraintDescriptor::default().with_min("0").with_max("10");
        let resolved = validate(&int(), &d).unwrap();
        assert!(resolved.permits(&OpenValue::Integer(0)));
        assert!(resolved.permits(&OpenValue::Integer(10)));
        assert!(!resolved.permits(&OpenValue::Integer(11)));
        assert!(!resolved.permits(&OpenValue::Long(5)));

        let legal = ConstraintValidator::new()
            .validate_values(&int(), ConstraintValues::legal(None, [1, 3]))
            .unwrap();
        assert!(legal.permits(&OpenValue::Integer(3)));
        assert!(!legal.permits(&OpenValue::Integer(2)));
    }

    #[test]
    fn test_display_lists_present_fields() {
        let d = ConstraintDescriptor::default()
            .with_default("b")
            .with_legal_values(RawValue::set(["a", "b"]));
        let resolved = validate(&OpenType::Simple(SimpleType::String), &d).unwrap();
        assert_eq!(
            resolved.to_string(),
            "defaultValue=\"b\", legalValues={\"a\", \"b\"}"
        );
    }
}
