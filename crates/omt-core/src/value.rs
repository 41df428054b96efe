//! # Open Values — Native Representations
//!
//! `OpenValue` is the native representation of a value of some open type:
//! one variant per simple kind (except `Void`, which has no values) plus
//! arrays, composite data and tabular data.
//!
//! ## Equality
//!
//! Equality is exact and reflexive so it can back `Eq` and `Hash`: floats
//! compare by bit pattern (`NaN == NaN`, `0.0 != -0.0`), decimals include their
//! scale. This is the member-equality used for legal-value checks.
//!
//! ## Ordering
//!
//! [`OpenValue::natural_cmp`] is the natural total order used by range
//! constraints. It is defined within a simple kind only; arrays, composite and
//! tabular values have no natural order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;

use crate::composite_data::CompositeData;
use crate::decimal::Decimal;
use crate::error::{ConversionError, OpenDataError};
use crate::object_name::ObjectName;
use crate::open_type::{ArrayType, OpenType};
use crate::simple::SimpleType;
use crate::tabular_data::TabularData;
use crate::temporal::{render_date, truncate_to_millis};

/// A value of some open type.
#[derive(Debug, Clone)]
pub enum OpenValue {
    /// `java.lang.Boolean`.
    Boolean(bool),
    /// `java.lang.Character`.
    Character(char),
    /// `java.lang.Byte`.
    Byte(i8),
    /// `java.lang.Short`.
    Short(i16),
    /// `java.lang.Integer`.
    Integer(i32),
    /// `java.lang.Long`.
    Long(i64),
    /// `java.lang.Float`.
    Float(f32),
    /// `java.lang.Double`.
    Double(f64),
    /// `java.lang.String`.
    String(String),
    /// `java.math.BigDecimal`.
    BigDecimal(Decimal),
    /// `java.math.BigInteger`.
    BigInteger(BigInt),
    /// `java.util.Date`, millisecond precision. Build with [`OpenValue::date`].
    Date(DateTime<Utc>),
    /// `javax.management.ObjectName`.
    ObjectName(ObjectName),
    /// A value of an array type.
    Array(ArrayValue),
    /// A value of a composite type.
    Composite(CompositeData),
    /// A value of a tabular type.
    Tabular(TabularData),
}

impl OpenValue {
    /// Build a `Date` value, truncating to millisecond precision.
    pub fn date(dt: DateTime<Utc>) -> Self {
        Self::Date(truncate_to_millis(dt))
    }

    /// The simple kind of this value, if it is a scalar.
    pub fn simple_type(&self) -> Option<SimpleType> {
        Some(match self {
            Self::Boolean(_) => SimpleType::Boolean,
            Self::Character(_) => SimpleType::Character,
            Self::Byte(_) => SimpleType::Byte,
            Self::Short(_) => SimpleType::Short,
            Self::Integer(_) => SimpleType::Integer,
            Self::Long(_) => SimpleType::Long,
            Self::Float(_) => SimpleType::Float,
            Self::Double(_) => SimpleType::Double,
            Self::String(_) => SimpleType::String,
            Self::BigDecimal(_) => SimpleType::BigDecimal,
            Self::BigInteger(_) => SimpleType::BigInteger,
            Self::Date(_) => SimpleType::Date,
            Self::ObjectName(_) => SimpleType::ObjectName,
            Self::Array(_) | Self::Composite(_) | Self::Tabular(_) => return None,
        })
    }

    /// Short label of the value's kind, for error messages.
    pub fn kind_label(&self) -> String {
        match self {
            Self::Array(a) => a.array_type().class_name(),
            Self::Composite(c) => format!("CompositeData<{}>", c.composite_type().type_name()),
            Self::Tabular(t) => format!("TabularData<{}>", t.tabular_type().type_name()),
            scalar => scalar
                .simple_type()
                .map(|s| s.class_name().to_string())
                .unwrap_or_default(),
        }
    }

    /// Natural order between two values of the same simple kind. Returns
    /// `None` across kinds and for values without a natural order.
    pub fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Character(a), Self::Character(b)) => Some(a.cmp(b)),
            (Self::Byte(a), Self::Byte(b)) => Some(a.cmp(b)),
            (Self::Short(a), Self::Short(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Long(a), Self::Long(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(a.total_cmp(b)),
            (Self::Double(a), Self::Double(b)) => Some(a.total_cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::BigDecimal(a), Self::BigDecimal(b)) => Some(a.cmp_numeric(b)),
            (Self::BigInteger(a), Self::BigInteger(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::ObjectName(a), Self::ObjectName(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Render `self` for error messages: canonical text, quoted for strings.
    pub fn render(&self) -> String {
        match self {
            Self::String(s) => format!("{s:?}"),
            Self::Character(c) => format!("{c:?}"),
            other => other.to_string(),
        }
    }
}

impl PartialEq for OpenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Character(a), Self::Character(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::BigDecimal(a), Self::BigDecimal(b)) => a == b,
            (Self::BigInteger(a), Self::BigInteger(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::ObjectName(a), Self::ObjectName(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Composite(a), Self::Composite(b)) => a == b,
            (Self::Tabular(a), Self::Tabular(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for OpenValue {}

impl Hash for OpenValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Boolean(v) => v.hash(state),
            Self::Character(v) => v.hash(state),
            Self::Byte(v) => v.hash(state),
            Self::Short(v) => v.hash(state),
            Self::Integer(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
            Self::BigDecimal(v) => v.hash(state),
            Self::BigInteger(v) => v.hash(state),
            Self::Date(v) => v.hash(state),
            Self::ObjectName(v) => v.hash(state),
            Self::Array(v) => v.hash(state),
            Self::Composite(v) => v.hash(state),
            Self::Tabular(v) => v.hash(state),
        }
    }
}

impl fmt::Display for OpenValue {
    /// Canonical text. For every ordered simple kind the registered parser
    /// maps this rendering back to an equal value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Character(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::BigDecimal(v) => write!(f, "{v}"),
            Self::BigInteger(v) => write!(f, "{v}"),
            Self::Date(v) => f.write_str(&render_date(v)),
            Self::ObjectName(v) => write!(f, "{v}"),
            Self::Array(v) => write!(f, "{v}"),
            Self::Composite(v) => write!(f, "{v}"),
            Self::Tabular(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_native {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for OpenValue {
                fn from(v: $native) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_native! {
    bool => Boolean,
    char => Character,
    i8 => Byte,
    i16 => Short,
    i32 => Integer,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Decimal => BigDecimal,
    BigInt => BigInteger,
    ObjectName => ObjectName,
    ArrayValue => Array,
    CompositeData => Composite,
    TabularData => Tabular,
}

impl From<&str> for OpenValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<DateTime<Utc>> for OpenValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::date(v)
    }
}

// ─── Array Values ────────────────────────────────────────────────────

/// A value of an [`ArrayType`]: the direct elements of the outermost
/// dimension. Inner dimensions are nested `OpenValue::Array` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayValue {
    array_type: Arc<ArrayType>,
    elements: Vec<Option<OpenValue>>,
}

impl ArrayValue {
    /// Build an array value, checking every element against the component
    /// type. Null elements are allowed except in the innermost dimension of a
    /// primitive array.
    ///
    /// # Errors
    ///
    /// Returns `ValueConversion` naming the first offending element.
    pub fn new(
        array_type: impl Into<Arc<ArrayType>>,
        elements: Vec<Option<OpenValue>>,
    ) -> Result<Self, OpenDataError> {
        let array_type = array_type.into();
        let component = array_type.component_type();
        let innermost_primitive = array_type.is_primitive_array() && array_type.dimension() == 1;

        for (i, element) in elements.iter().enumerate() {
            let reason = match element {
                None if innermost_primitive => Some("null element in a primitive array".to_string()),
                None => None,
                Some(v) if !component.is_value(v) => Some(format!(
                    "element is {}, expected {}",
                    v.kind_label(),
                    component.type_name()
                )),
                Some(_) => None,
            };
            if let Some(reason) = reason {
                return Err(ConversionError::new(
                    array_type.class_name(),
                    format!("element [{i}]"),
                    reason,
                )
                .into());
            }
        }

        Ok(Self {
            array_type,
            elements,
        })
    }

    /// Build a one-dimensional array of non-null values.
    pub fn of<I, V>(array_type: impl Into<Arc<ArrayType>>, values: I) -> Result<Self, OpenDataError>
    where
        I: IntoIterator<Item = V>,
        V: Into<OpenValue>,
    {
        Self::new(array_type, values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// The array's type.
    pub fn array_type(&self) -> &ArrayType {
        &self.array_type
    }

    /// The open type of this array.
    pub fn open_type(&self) -> OpenType {
        OpenType::Array(self.array_type.clone())
    }

    /// Direct elements.
    pub fn elements(&self) -> &[Option<OpenValue>] {
        &self.elements
    }

    /// Number of direct elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match e {
                Some(v) => f.write_str(&v.render())?,
                None => f.write_str("null")?,
            }
        }
        f.write_str("]")
    }
}
