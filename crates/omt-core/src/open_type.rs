//! # Open Types — The Closed Type Vocabulary
//!
//! `OpenType` is the tagged union of the four structural type descriptors:
//! simple, array, composite and tabular. Every consumer matches on it
//! exhaustively; there is no runtime type discovery.
//!
//! ## Equality and Compatibility
//!
//! Two open types are equal iff they are structurally identical:
//!
//! - simple types by kind;
//! - array types by dimension, element type and primitive flag;
//! - composite types by type name and the *set* of (item name, item type)
//!   pairs, independent of declaration order and of descriptions;
//! - tabular types by type name, row type and the *ordered* index names.
//!
//! [`OpenType::is_assignable_from`] is the looser compatibility relation used
//! to accept values whose composite types carry extra items.
//!
//! Payloads sit behind `Arc`, so clones are cheap and instances are shared
//! across threads without locking. Nothing here is mutable after construction.

use std::fmt;
use std::sync::Arc;

use crate::composite::CompositeType;
use crate::error::OpenDataError;
use crate::simple::SimpleType;
use crate::tabular::TabularType;
use crate::value::OpenValue;

/// Class name shared by all composite types.
pub const COMPOSITE_DATA_CLASS: &str = "javax.management.openmbean.CompositeData";

/// Class name shared by all tabular types.
pub const TABULAR_DATA_CLASS: &str = "javax.management.openmbean.TabularData";

/// A structural, self-describing type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpenType {
    /// A scalar type.
    Simple(SimpleType),
    /// An n-dimensional array of a non-array open type.
    Array(Arc<ArrayType>),
    /// A fixed-shape record.
    Composite(Arc<CompositeType>),
    /// A keyed collection of composite rows.
    Tabular(Arc<TabularType>),
}

impl OpenType {
    /// The type name. Composite and tabular types carry a user-chosen name;
    /// simple and array types are named by their class name.
    pub fn type_name(&self) -> String {
        match self {
            Self::Simple(s) => s.class_name().to_string(),
            Self::Array(a) => a.class_name(),
            Self::Composite(c) => c.type_name().to_string(),
            Self::Tabular(t) => t.type_name().to_string(),
        }
    }

    /// The class name of values of this type.
    pub fn class_name(&self) -> String {
        match self {
            Self::Simple(s) => s.class_name().to_string(),
            Self::Array(a) => a.class_name(),
            Self::Composite(_) => COMPOSITE_DATA_CLASS.to_string(),
            Self::Tabular(_) => TABULAR_DATA_CLASS.to_string(),
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> String {
        match self {
            Self::Simple(s) => s.class_name().to_string(),
            Self::Array(a) => a.description(),
            Self::Composite(c) => c.description().to_string(),
            Self::Tabular(t) => t.description().to_string(),
        }
    }

    /// Whether this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// The simple kind, if this is a simple type.
    pub fn as_simple(&self) -> Option<SimpleType> {
        match self {
            Self::Simple(s) => Some(*s),
            _ => None,
        }
    }

    /// Whether values of this type have a natural total order, which is what
    /// range constraints require.
    pub fn has_natural_order(&self) -> bool {
        match self {
            Self::Simple(s) => s.is_ordered(),
            Self::Array(_) | Self::Composite(_) | Self::Tabular(_) => false,
        }
    }

    /// Whether `value` is a value of this type.
    pub fn is_value(&self, value: &OpenValue) -> bool {
        match (self, value) {
            (Self::Simple(s), v) => s.is_value(v),
            (Self::Array(a), OpenValue::Array(v)) => a.is_assignable_from(v.array_type()),
            (Self::Composite(c), OpenValue::Composite(v)) => {
                c.is_assignable_from(v.composite_type())
            }
            (Self::Tabular(t), OpenValue::Tabular(v)) => t.is_assignable_from(v.tabular_type()),
            (Self::Array(_) | Self::Composite(_) | Self::Tabular(_), _) => false,
        }
    }

    /// Whether values of `other` may be used where this type is expected.
    /// Equal types are always assignable.
    pub fn is_assignable_from(&self, other: &OpenType) -> bool {
        match (self, other) {
            (Self::Simple(a), Self::Simple(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a.is_assignable_from(b),
            (Self::Composite(a), Self::Composite(b)) => a.is_assignable_from(b),
            (Self::Tabular(a), Self::Tabular(b)) => a.is_assignable_from(b),
            _ => false,
        }
    }
}

impl From<SimpleType> for OpenType {
    fn from(s: SimpleType) -> Self {
        Self::Simple(s)
    }
}

impl From<ArrayType> for OpenType {
    fn from(a: ArrayType) -> Self {
        Self::Array(Arc::new(a))
    }
}

impl From<CompositeType> for OpenType {
    fn from(c: CompositeType) -> Self {
        Self::Composite(Arc::new(c))
    }
}

impl From<Arc<CompositeType>> for OpenType {
    fn from(c: Arc<CompositeType>) -> Self {
        Self::Composite(c)
    }
}

impl From<TabularType> for OpenType {
    fn from(t: TabularType) -> Self {
        Self::Tabular(Arc::new(t))
    }
}

impl fmt::Display for OpenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(s) => write!(f, "SimpleType(name={})", s.class_name()),
            Self::Array(a) => write!(f, "{a}"),
            Self::Composite(c) => write!(f, "{c}"),
            Self::Tabular(t) => write!(f, "{t}"),
        }
    }
}

// ─── Array Type ──────────────────────────────────────────────────────

/// An n-dimensional array of a non-array open type.
///
/// An array of arrays is normalized at construction: the dimensions add and
/// the element type is the innermost non-array type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    dimension: usize,
    element_type: OpenType,
    primitive: bool,
}

impl ArrayType {
    /// Build a `dimension`-dimensional array of `element_type`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedType` if `dimension` is zero.
    pub fn new(dimension: usize, element_type: impl Into<OpenType>) -> Result<Self, OpenDataError> {
        let element_type = element_type.into();
        if dimension == 0 {
            return Err(OpenDataError::malformed(
                element_type.type_name(),
                "array dimension must be at least 1",
            ));
        }
        Ok(match element_type {
            OpenType::Array(inner) => Self {
                dimension: dimension + inner.dimension,
                element_type: inner.element_type.clone(),
                primitive: inner.primitive,
            },
            other => Self {
                dimension,
                element_type: other,
                primitive: false,
            },
        })
    }

    /// A one-dimensional array of the primitive form of `element`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedType` if the simple type has no primitive form.
    pub fn primitive(element: SimpleType) -> Result<Self, OpenDataError> {
        if element.primitive_name().is_none() {
            return Err(OpenDataError::malformed(
                element.class_name(),
                "simple type has no primitive array form",
            ));
        }
        Ok(Self {
            dimension: 1,
            element_type: OpenType::Simple(element),
            primitive: true,
        })
    }

    /// Number of dimensions (at least 1).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The innermost, non-array element type.
    pub fn element_type(&self) -> &OpenType {
        &self.element_type
    }

    /// Whether this is an array of a primitive type (elements cannot be null).
    pub fn is_primitive_array(&self) -> bool {
        self.primitive
    }

    /// The type of the array's direct elements: the element type for a
    /// one-dimensional array, otherwise an array type with one less dimension.
    pub fn component_type(&self) -> OpenType {
        if self.dimension == 1 {
            self.element_type.clone()
        } else {
            OpenType::Array(Arc::new(Self {
                dimension: self.dimension - 1,
                element_type: self.element_type.clone(),
                primitive: self.primitive,
            }))
        }
    }

    /// Array descriptor class name, e.g. `[[Ljava.lang.String;` or `[I`.
    pub fn class_name(&self) -> String {
        let prefix = "[".repeat(self.dimension);
        let primitive_code = self
            .element_type
            .as_simple()
            .and_then(|s| s.primitive_code())
            .filter(|_| self.primitive);
        match primitive_code {
            Some(code) => format!("{prefix}{code}"),
            None => format!("{prefix}L{};", self.element_type.class_name()),
        }
    }

    /// Description, e.g. `2-dimension array of java.lang.String`.
    pub fn description(&self) -> String {
        let element = match (self.primitive, self.element_type.as_simple()) {
            (true, Some(s)) => s.primitive_name().unwrap_or(s.class_name()).to_string(),
            _ => self.element_type.class_name(),
        };
        format!("{}-dimension array of {element}", self.dimension)
    }

    /// Same dimension and primitive flag, and an assignable element type.
    pub fn is_assignable_from(&self, other: &ArrayType) -> bool {
        self.dimension == other.dimension
            && self.primitive == other.primitive
            && self.element_type.is_assignable_from(&other.element_type)
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArrayType(name={},dimension={},elementType={},primitiveArray={})",
            self.class_name(),
            self.dimension,
            self.element_type,
            self.primitive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_class_names() {
        let strings = ArrayType::new(2, SimpleType::String).unwrap();
        assert_eq!(strings.class_name(), "[[Ljava.lang.String;");
        assert_eq!(strings.description(), "2-dimension array of java.lang.String");

        let ints = ArrayType::primitive(SimpleType::Integer).unwrap();
        assert_eq!(ints.class_name(), "[I");
        assert_eq!(ints.description(), "1-dimension array of int");
    }

    #[test]
    fn test_array_of_array_flattens() {
        let inner = ArrayType::new(1, SimpleType::Long).unwrap();
        let outer = ArrayType::new(2, inner).unwrap();
        assert_eq!(outer.dimension(), 3);
        assert_eq!(outer.element_type(), &OpenType::Simple(SimpleType::Long));
        assert_eq!(outer, ArrayType::new(3, SimpleType::Long).unwrap());
    }

    #[test]
    fn test_primitive_nested_keeps_flag() {
        let ints = ArrayType::primitive(SimpleType::Integer).unwrap();
        let grid = ArrayType::new(1, ints).unwrap();
        assert_eq!(grid.class_name(), "[[I");
        assert!(grid.is_primitive_array());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = ArrayType::new(0, SimpleType::String).unwrap_err();
        assert!(matches!(err, OpenDataError::MalformedType { .. }));
    }

    #[test]
    fn test_primitive_requires_wrapper_kind() {
        assert!(ArrayType::primitive(SimpleType::String).is_err());
        assert!(ArrayType::primitive(SimpleType::Void).is_err());
    }

    #[test]
    fn test_primitive_flag_participates_in_equality() {
        let boxed = ArrayType::new(1, SimpleType::Integer).unwrap();
        let prim = ArrayType::primitive(SimpleType::Integer).unwrap();
        assert_ne!(boxed, prim);
        assert!(!boxed.is_assignable_from(&prim));
    }

    #[test]
    fn test_component_type() {
        let cube = ArrayType::new(3, SimpleType::Double).unwrap();
        let plane = cube.component_type();
        assert_eq!(plane, OpenType::from(ArrayType::new(2, SimpleType::Double).unwrap()));
        let line = ArrayType::new(1, SimpleType::Double).unwrap();
        assert_eq!(line.component_type(), OpenType::Simple(SimpleType::Double));
    }

    #[test]
    fn test_natural_order_only_for_simple() {
        assert!(OpenType::from(SimpleType::Integer).has_natural_order());
        assert!(!OpenType::from(SimpleType::Void).has_natural_order());
        let arr = OpenType::from(ArrayType::new(1, SimpleType::Integer).unwrap());
        assert!(!arr.has_natural_order());
    }
}
