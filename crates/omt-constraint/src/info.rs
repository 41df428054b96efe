//! # Attribute and Parameter Infos
//!
//! Immutable metadata for one open-typed attribute or operation parameter:
//! its name, description, open type and validated constraints.
//!
//! Construction is the only point where anything is checked. An info that
//! exists has a non-blank name and description and constraints that satisfy
//! every consistency rule for its type. There are no setters; different
//! constraints mean a new info.

use std::fmt;
use std::hash::{Hash, Hasher};

use omt_core::{OpenType, OpenValue, SimpleType};

use crate::descriptor::{
    ConstraintDescriptor, Descriptor, DEFAULT_VALUE_FIELD, LEGAL_VALUES_FIELD, MAX_VALUE_FIELD,
    MIN_VALUE_FIELD, OPEN_TYPE_FIELD, ORIGINAL_TYPE_FIELD,
};
use crate::error::ConstraintError;
use crate::raw::RawValue;
use crate::validate::{ConstraintValidator, ConstraintValues, ResolvedConstraints};

fn require_text(what: &str, value: &str) -> Result<(), ConstraintError> {
    if value.trim().is_empty() {
        return Err(ConstraintError::InvalidInfo {
            reason: format!("{what} must not be blank"),
        });
    }
    Ok(())
}

fn constraints_descriptor(constraints: &ResolvedConstraints) -> Descriptor {
    let mut d = Descriptor::new();
    let open_type = constraints.open_type();
    d.set_field(OPEN_TYPE_FIELD, open_type.type_name());
    d.set_field(ORIGINAL_TYPE_FIELD, open_type.class_name());
    if let Some(v) = constraints.default_value() {
        d.set_field(DEFAULT_VALUE_FIELD, v.clone());
    }
    if let Some(v) = constraints.min_value() {
        d.set_field(MIN_VALUE_FIELD, v.clone());
    }
    if let Some(v) = constraints.max_value() {
        d.set_field(MAX_VALUE_FIELD, v.clone());
    }
    if let Some(values) = constraints.legal_values() {
        d.set_field(
            LEGAL_VALUES_FIELD,
            RawValue::Set(values.iter().cloned().map(RawValue::Native).collect()),
        );
    }
    d
}

/// Read accessors shared by [`OpenParameterInfo`] and [`OpenAttributeInfo`].
macro_rules! constraint_accessors {
    () => {
        /// Name.
        pub fn name(&self) -> &str {
            &self.name
        }

        /// Human-readable description.
        pub fn description(&self) -> &str {
            &self.description
        }

        /// Open type of the values.
        pub fn open_type(&self) -> &OpenType {
            self.constraints.open_type()
        }

        /// The validated constraints.
        pub fn constraints(&self) -> &ResolvedConstraints {
            &self.constraints
        }

        /// Default value, if any.
        pub fn default_value(&self) -> Option<&OpenValue> {
            self.constraints.default_value()
        }

        /// Inclusive minimum, if any.
        pub fn min_value(&self) -> Option<&OpenValue> {
            self.constraints.min_value()
        }

        /// Inclusive maximum, if any.
        pub fn max_value(&self) -> Option<&OpenValue> {
            self.constraints.max_value()
        }

        /// Legal values, if any.
        pub fn legal_values(&self) -> Option<&[OpenValue]> {
            self.constraints.legal_values()
        }

        /// Whether a default value is set.
        pub fn has_default_value(&self) -> bool {
            self.constraints.default_value().is_some()
        }

        /// Whether a minimum is set.
        pub fn has_min_value(&self) -> bool {
            self.constraints.min_value().is_some()
        }

        /// Whether a maximum is set.
        pub fn has_max_value(&self) -> bool {
            self.constraints.max_value().is_some()
        }

        /// Whether legal values are set.
        pub fn has_legal_values(&self) -> bool {
            self.constraints.legal_values().is_some()
        }

        /// Whether `value` is of the open type and satisfies the constraints.
        pub fn is_value(&self, value: &OpenValue) -> bool {
            self.constraints.permits(value)
        }

        /// The resolved constraints under their descriptor field names, plus
        /// `openType` and `originalType`.
        pub fn descriptor(&self) -> Descriptor {
            constraints_descriptor(&self.constraints)
        }
    };
}

/// An open-typed operation parameter.
///
/// Equality compares name and constraints; the description is not part of
/// a parameter's identity.
#[derive(Debug, Clone)]
pub struct OpenParameterInfo {
    name: String,
    description: String,
    constraints: ResolvedConstraints,
}

impl OpenParameterInfo {
    /// A parameter with already-validated constraints.
    ///
    /// # Errors
    ///
    /// `InvalidInfo` if `name` or `description` is blank.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        constraints: ResolvedConstraints,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        let description = description.into();
        require_text("parameter name", &name)?;
        require_text("parameter description", &description)?;
        Ok(Self {
            name,
            description,
            constraints,
        })
    }

    /// A parameter without constraints.
    pub fn unconstrained(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: OpenType,
    ) -> Result<Self, ConstraintError> {
        Self::new(name, description, ResolvedConstraints::none(open_type))
    }

    /// A parameter whose constraints come from a raw descriptor.
    pub fn from_descriptor(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: &OpenType,
        descriptor: &Descriptor,
        validator: &ConstraintValidator,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        let description = description.into();
        require_text("parameter name", &name)?;
        require_text("parameter description", &description)?;
        let constraints =
            validator.validate(open_type, &ConstraintDescriptor::from_descriptor(descriptor))?;
        Self::new(name, description, constraints)
    }

    /// A parameter whose constraints are given as native values.
    pub fn from_values(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: &OpenType,
        values: ConstraintValues,
        validator: &ConstraintValidator,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        let description = description.into();
        require_text("parameter name", &name)?;
        require_text("parameter description", &description)?;
        let constraints = validator.validate_values(open_type, values)?;
        Self::new(name, description, constraints)
    }

    constraint_accessors!();
}

impl PartialEq for OpenParameterInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.constraints == other.constraints
    }
}

impl Eq for OpenParameterInfo {}

impl Hash for OpenParameterInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.constraints.hash(state);
    }
}

impl fmt::Display for OpenParameterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter {}: {} ({})",
            self.name,
            self.open_type().type_name(),
            self.constraints
        )
    }
}

/// How an attribute may be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeAccess {
    /// The attribute can be read.
    pub readable: bool,
    /// The attribute can be written.
    pub writable: bool,
    /// The attribute is read through an `is` getter. Boolean attributes only.
    pub is_getter: bool,
}

impl AttributeAccess {
    /// Readable only.
    pub fn read_only() -> Self {
        Self {
            readable: true,
            ..Self::default()
        }
    }

    /// Readable and writable.
    pub fn read_write() -> Self {
        Self {
            readable: true,
            writable: true,
            is_getter: false,
        }
    }

    /// Writable only.
    pub fn write_only() -> Self {
        Self {
            writable: true,
            ..Self::default()
        }
    }

    /// Readable through an `is` getter.
    pub fn getter() -> Self {
        Self {
            readable: true,
            writable: false,
            is_getter: true,
        }
    }

    fn check(&self, open_type: &OpenType) -> Result<(), ConstraintError> {
        if !self.is_getter {
            return Ok(());
        }
        if !self.readable {
            return Err(ConstraintError::InvalidInfo {
                reason: "an is-getter attribute must be readable".into(),
            });
        }
        if open_type.as_simple() != Some(SimpleType::Boolean) {
            return Err(ConstraintError::InvalidInfo {
                reason: format!(
                    "an is-getter attribute must be java.lang.Boolean, not {}",
                    open_type.type_name()
                ),
            });
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        match (self.readable, self.writable) {
            (true, true) => "read-write",
            (true, false) => "read-only",
            (false, true) => "write-only",
            (false, false) => "no access",
        }
    }
}

/// An open-typed attribute.
///
/// Equality compares name, access flags and constraints, not the
/// description.
#[derive(Debug, Clone)]
pub struct OpenAttributeInfo {
    name: String,
    description: String,
    access: AttributeAccess,
    constraints: ResolvedConstraints,
}

impl OpenAttributeInfo {
    /// An attribute with already-validated constraints.
    ///
    /// # Errors
    ///
    /// `InvalidInfo` if `name` or `description` is blank, or the access is
    /// an `is` getter on a non-boolean or unreadable attribute.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        access: AttributeAccess,
        constraints: ResolvedConstraints,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        let description = description.into();
        require_text("attribute name", &name)?;
        require_text("attribute description", &description)?;
        access.check(constraints.open_type())?;
        Ok(Self {
            name,
            description,
            access,
            constraints,
        })
    }

    /// An attribute without constraints.
    pub fn unconstrained(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: OpenType,
        access: AttributeAccess,
    ) -> Result<Self, ConstraintError> {
        Self::new(name, description, access, ResolvedConstraints::none(open_type))
    }

    /// An attribute whose constraints come from a raw descriptor.
    pub fn from_descriptor(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: &OpenType,
        access: AttributeAccess,
        descriptor: &Descriptor,
        validator: &ConstraintValidator,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        let description = description.into();
        require_text("attribute name", &name)?;
        require_text("attribute description", &description)?;
        access.check(open_type)?;
        let constraints =
            validator.validate(open_type, &ConstraintDescriptor::from_descriptor(descriptor))?;
        Self::new(name, description, access, constraints)
    }

    /// An attribute whose constraints are given as native values.
    pub fn from_values(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: &OpenType,
        access: AttributeAccess,
        values: ConstraintValues,
        validator: &ConstraintValidator,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        let description = description.into();
        require_text("attribute name", &name)?;
        require_text("attribute description", &description)?;
        access.check(open_type)?;
        let constraints = validator.validate_values(open_type, values)?;
        Self::new(name, description, access, constraints)
    }

    constraint_accessors!();

    /// Access flags.
    pub fn access(&self) -> AttributeAccess {
        self.access
    }

    /// Whether the attribute can be read.
    pub fn is_readable(&self) -> bool {
        self.access.readable
    }

    /// Whether the attribute can be written.
    pub fn is_writable(&self) -> bool {
        self.access.writable
    }

    /// Whether the attribute is read through an `is` getter.
    pub fn is_getter(&self) -> bool {
        self.access.is_getter
    }
}

impl PartialEq for OpenAttributeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.access == other.access
            && self.constraints == other.constraints
    }
}

impl Eq for OpenAttributeInfo {}

impl Hash for OpenAttributeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.access.hash(state);
        self.constraints.hash(state);
    }
}

impl fmt::Display for OpenAttributeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attribute {}: {} [{}] ({})",
            self.name,
            self.open_type().type_name(),
            self.access.label(),
            self.constraints
        )
    }
}
