//! # Constraint Errors
//!
//! One variant per way a constraint descriptor can be refused. Every error is
//! terminal for the validation call that raised it: nothing is retried, and no
//! constraint is silently dropped or downgraded.

use omt_core::ConversionError;
use thiserror::Error;

use crate::descriptor::ConstraintField;

/// Error raised while coercing or validating constraints, or while building
/// an attribute/parameter info.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    /// A raw value cannot be coerced to the open type's native representation.
    #[error(transparent)]
    ValueConversion(#[from] ConversionError),

    /// The raw `legalValues` input is neither array- nor set-shaped, or a
    /// descriptor field has a shape no constraint can take.
    #[error("malformed {field}: {reason}")]
    MalformedConstraint {
        /// Field whose raw value was refused.
        field: ConstraintField,
        /// What was wrong with its shape.
        reason: String,
    },

    /// `legalValues` was combined with `minValue` and/or `maxValue`.
    #[error("legalValues cannot be combined with {range_fields}")]
    ConstraintConflict {
        /// The range fields that were present, e.g. `minValue and maxValue`.
        range_fields: String,
    },

    /// `minValue` is greater than `maxValue`.
    #[error("minValue {min} is greater than maxValue {max}")]
    ConstraintRange {
        /// Rendered minimum.
        min: String,
        /// Rendered maximum.
        max: String,
    },

    /// A range constraint was requested on a type without a natural order.
    #[error("{field} is not supported for {type_name}: values have no natural order")]
    UnsupportedConstraint {
        /// The range field that was present.
        field: ConstraintField,
        /// Name of the open type.
        type_name: String,
    },

    /// `defaultValue` is not one of the `legalValues`.
    #[error("defaultValue {default} is not one of the legalValues")]
    DefaultValueNotLegal {
        /// Rendered default.
        default: String,
    },

    /// `defaultValue` lies outside `[minValue, maxValue]`.
    #[error("defaultValue {default} is outside the range [{}, {}]", bound(.min), bound(.max))]
    DefaultValueOutOfRange {
        /// Rendered default.
        default: String,
        /// Rendered minimum, if present.
        min: Option<String>,
        /// Rendered maximum, if present.
        max: Option<String>,
    },

    /// The attribute or parameter definition itself is invalid (blank name or
    /// description, getter flag on a non-boolean attribute).
    #[error("invalid info: {reason}")]
    InvalidInfo {
        /// What was wrong.
        reason: String,
    },
}

fn bound(b: &Option<String>) -> &str {
    b.as_deref().unwrap_or("unbounded")
}

impl ConstraintError {
    /// Short, stable name of the error kind, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValueConversion(_) => "value_conversion",
            Self::MalformedConstraint { .. } => "malformed_constraint",
            Self::ConstraintConflict { .. } => "constraint_conflict",
            Self::ConstraintRange { .. } => "constraint_range",
            Self::UnsupportedConstraint { .. } => "unsupported_constraint",
            Self::DefaultValueNotLegal { .. } => "default_value_not_legal",
            Self::DefaultValueOutOfRange { .. } => "default_value_out_of_range",
            Self::InvalidInfo { .. } => "invalid_info",
        }
    }
}
