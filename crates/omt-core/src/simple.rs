//! # Simple Types — The Scalar Vocabulary
//!
//! Defines the `SimpleType` enum: the fourteen scalar open types every client
//! is guaranteed to understand. Every `match` on `SimpleType` is exhaustive, so
//! adding a kind forces every consumer (parsers, ordering, value checks) to
//! handle it at compile time.
//!
//! ## Text Parsers
//!
//! Each kind registers exactly one canonical text parser through
//! [`SimpleType::parser`]. The parser table is a plain `match` returning a
//! function pointer, so there is no runtime lookup and no registration state.
//! For every kind with values, `parse(value.to_string()) == value`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use num_bigint::BigInt;

use crate::decimal::Decimal;
use crate::error::{ConversionError, OpenDataError};
use crate::object_name::ObjectName;
use crate::temporal::parse_date;
use crate::value::OpenValue;

/// Canonical text parser for one simple type.
pub type TextParser = fn(&str) -> Result<OpenValue, ConversionError>;

/// The scalar open types.
///
/// | Kind | Class name | Native representation |
/// |------|------------|-----------------------|
/// | Void | `java.lang.Void` | no values |
/// | Boolean | `java.lang.Boolean` | `bool` |
/// | Character | `java.lang.Character` | `char` |
/// | Byte | `java.lang.Byte` | `i8` |
/// | Short | `java.lang.Short` | `i16` |
/// | Integer | `java.lang.Integer` | `i32` |
/// | Long | `java.lang.Long` | `i64` |
/// | Float | `java.lang.Float` | `f32` |
/// | Double | `java.lang.Double` | `f64` |
/// | String | `java.lang.String` | `String` |
/// | BigDecimal | `java.math.BigDecimal` | [`Decimal`] |
/// | BigInteger | `java.math.BigInteger` | `BigInt` |
/// | Date | `java.util.Date` | `DateTime<Utc>` (millisecond precision) |
/// | ObjectName | `javax.management.ObjectName` | [`ObjectName`] |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleType {
    /// The type with no values; used for operations returning nothing.
    Void,
    /// `true` or `false`.
    Boolean,
    /// A single Unicode scalar value.
    Character,
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 32-bit IEEE 754 float.
    Float,
    /// 64-bit IEEE 754 float.
    Double,
    /// UTF-8 text.
    String,
    /// Fixed-point decimal with explicit scale.
    BigDecimal,
    /// Arbitrary-precision signed integer.
    BigInteger,
    /// UTC instant with millisecond precision.
    Date,
    /// Management object name (`domain:key=value,...`).
    ObjectName,
}

/// Total number of simple type kinds.
pub const SIMPLE_TYPE_COUNT: usize = 14;

impl SimpleType {
    /// Returns all simple types in canonical order.
    pub fn all() -> &'static [SimpleType] {
        &[
            Self::Void,
            Self::Boolean,
            Self::Character,
            Self::Byte,
            Self::Short,
            Self::Integer,
            Self::Long,
            Self::Float,
            Self::Double,
            Self::String,
            Self::BigDecimal,
            Self::BigInteger,
            Self::Date,
            Self::ObjectName,
        ]
    }

    /// Returns the snake_case identifier. Matches the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Boolean => "boolean",
            Self::Character => "character",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::BigDecimal => "big_decimal",
            Self::BigInteger => "big_integer",
            Self::Date => "date",
            Self::ObjectName => "object_name",
        }
    }

    /// The class name clients use to identify this type. For simple types
    /// the type name and description are the class name as well.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Void => "java.lang.Void",
            Self::Boolean => "java.lang.Boolean",
            Self::Character => "java.lang.Character",
            Self::Byte => "java.lang.Byte",
            Self::Short => "java.lang.Short",
            Self::Integer => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Float => "java.lang.Float",
            Self::Double => "java.lang.Double",
            Self::String => "java.lang.String",
            Self::BigDecimal => "java.math.BigDecimal",
            Self::BigInteger => "java.math.BigInteger",
            Self::Date => "java.util.Date",
            Self::ObjectName => "javax.management.ObjectName",
        }
    }

    /// Whether values of this type have a natural total order.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Self::Void)
    }

    /// Primitive type name for kinds that have a primitive array form.
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("boolean"),
            Self::Character => Some("char"),
            Self::Byte => Some("byte"),
            Self::Short => Some("short"),
            Self::Integer => Some("int"),
            Self::Long => Some("long"),
            Self::Float => Some("float"),
            Self::Double => Some("double"),
            Self::Void
            | Self::String
            | Self::BigDecimal
            | Self::BigInteger
            | Self::Date
            | Self::ObjectName => None,
        }
    }

    /// Array descriptor code for the primitive form (`I` for `int`, ...).
    pub fn primitive_code(&self) -> Option<char> {
        match self {
            Self::Boolean => Some('Z'),
            Self::Character => Some('C'),
            Self::Byte => Some('B'),
            Self::Short => Some('S'),
            Self::Integer => Some('I'),
            Self::Long => Some('J'),
            Self::Float => Some('F'),
            Self::Double => Some('D'),
            Self::Void
            | Self::String
            | Self::BigDecimal
            | Self::BigInteger
            | Self::Date
            | Self::ObjectName => None,
        }
    }

    /// The canonical text parser registered for this kind.
    pub fn parser(&self) -> TextParser {
        match self {
            Self::Void => parse_void,
            Self::Boolean => parse_boolean,
            Self::Character => parse_character,
            Self::Byte => parse_byte,
            Self::Short => parse_short,
            Self::Integer => parse_integer,
            Self::Long => parse_long,
            Self::Float => parse_float,
            Self::Double => parse_double,
            Self::String => parse_string,
            Self::BigDecimal => parse_big_decimal,
            Self::BigInteger => parse_big_integer,
            Self::Date => parse_date_value,
            Self::ObjectName => parse_object_name,
        }
    }

    /// Parse canonical text into a value of this type.
    pub fn parse(&self, text: &str) -> Result<OpenValue, ConversionError> {
        (self.parser())(text)
    }

    /// Whether `value` is of this type's native representation.
    pub fn is_value(&self, value: &OpenValue) -> bool {
        matches!(
            (self, value),
            (Self::Boolean, OpenValue::Boolean(_))
                | (Self::Character, OpenValue::Character(_))
                | (Self::Byte, OpenValue::Byte(_))
                | (Self::Short, OpenValue::Short(_))
                | (Self::Integer, OpenValue::Integer(_))
                | (Self::Long, OpenValue::Long(_))
                | (Self::Float, OpenValue::Float(_))
                | (Self::Double, OpenValue::Double(_))
                | (Self::String, OpenValue::String(_))
                | (Self::BigDecimal, OpenValue::BigDecimal(_))
                | (Self::BigInteger, OpenValue::BigInteger(_))
                | (Self::Date, OpenValue::Date(_))
                | (Self::ObjectName, OpenValue::ObjectName(_))
        )
    }
}

impl std::fmt::Display for SimpleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for SimpleType {
    type Err = OpenDataError;

    /// Parse from either the snake_case identifier or the class name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s || t.class_name() == s)
            .ok_or_else(|| OpenDataError::malformed(s, "unknown simple type"))
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────

fn conversion(kind: SimpleType, text: &str, reason: impl std::fmt::Display) -> ConversionError {
    ConversionError::new(kind.class_name(), format!("{text:?}"), reason.to_string())
}

fn parse_void(text: &str) -> Result<OpenValue, ConversionError> {
    Err(conversion(SimpleType::Void, text, "java.lang.Void has no values"))
}

fn parse_boolean(text: &str) -> Result<OpenValue, ConversionError> {
    if text.eq_ignore_ascii_case("true") {
        Ok(OpenValue::Boolean(true))
    } else if text.eq_ignore_ascii_case("false") {
        Ok(OpenValue::Boolean(false))
    } else {
        Err(conversion(SimpleType::Boolean, text, "expected \"true\" or \"false\""))
    }
}

fn parse_character(text: &str) -> Result<OpenValue, ConversionError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(OpenValue::Character(c)),
        _ => Err(conversion(SimpleType::Character, text, "expected exactly one character")),
    }
}

fn parse_byte(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse()
        .map(OpenValue::Byte)
        .map_err(|e| conversion(SimpleType::Byte, text, e))
}

fn parse_short(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse()
        .map(OpenValue::Short)
        .map_err(|e| conversion(SimpleType::Short, text, e))
}

fn parse_integer(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse()
        .map(OpenValue::Integer)
        .map_err(|e| conversion(SimpleType::Integer, text, e))
}

fn parse_long(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse()
        .map(OpenValue::Long)
        .map_err(|e| conversion(SimpleType::Long, text, e))
}

fn parse_float(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse()
        .map(OpenValue::Float)
        .map_err(|e| conversion(SimpleType::Float, text, e))
}

fn parse_double(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse()
        .map(OpenValue::Double)
        .map_err(|e| conversion(SimpleType::Double, text, e))
}

fn parse_string(text: &str) -> Result<OpenValue, ConversionError> {
    Ok(OpenValue::String(text.to_owned()))
}

fn parse_big_decimal(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse::<Decimal>().map(OpenValue::BigDecimal)
}

fn parse_big_integer(text: &str) -> Result<OpenValue, ConversionError> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(conversion(SimpleType::BigInteger, text, "invalid digit found in string"));
    }
    text.parse::<BigInt>()
        .map(OpenValue::BigInteger)
        .map_err(|e| conversion(SimpleType::BigInteger, text, e))
}

fn parse_date_value(text: &str) -> Result<OpenValue, ConversionError> {
    parse_date(text).map(OpenValue::Date)
}

fn parse_object_name(text: &str) -> Result<OpenValue, ConversionError> {
    text.parse::<ObjectName>().map(OpenValue::ObjectName)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_count() {
        assert_eq!(SimpleType::all().len(), SIMPLE_TYPE_COUNT);
    }

    #[test]
    fn test_all_unique() {
        let mut seen = std::collections::HashSet::new();
        for t in SimpleType::all() {
            assert!(seen.insert(t), "duplicate simple type: {t}");
        }
    }

    #[test]
    fn test_from_str_accepts_both_spellings() {
        for t in SimpleType::all() {
            assert_eq!(t.as_str().parse::<SimpleType>().unwrap(), *t);
            assert_eq!(t.class_name().parse::<SimpleType>().unwrap(), *t);
        }
        assert!("Integer".parse::<SimpleType>().is_err());
        assert!("".parse::<SimpleType>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for t in SimpleType::all() {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            let back: SimpleType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *t);
        }
    }

    #[test]
    fn test_primitive_forms() {
        let with_primitive: Vec<_> = SimpleType::all()
            .iter()
            .filter(|t| t.primitive_name().is_some())
            .collect();
        assert_eq!(with_primitive.len(), 8);
        for t in with_primitive {
            assert!(t.primitive_code().is_some());
        }
        assert_eq!(SimpleType::Long.primitive_code(), Some('J'));
    }

    #[test]
    fn test_parse_integer_kinds() {
        assert_eq!(SimpleType::Integer.parse("42").unwrap(), OpenValue::Integer(42));
        assert_eq!(SimpleType::Byte.parse("-128").unwrap(), OpenValue::Byte(-128));
        assert!(SimpleType::Byte.parse("128").is_err());
        assert!(SimpleType::Integer.parse("4.2").is_err());
        assert!(SimpleType::Long.parse(" 1").is_err());
    }

    #[test]
    fn test_parse_boolean_is_strict() {
        assert_eq!(SimpleType::Boolean.parse("TRUE").unwrap(), OpenValue::Boolean(true));
        assert_eq!(SimpleType::Boolean.parse("false").unwrap(), OpenValue::Boolean(false));
        assert!(SimpleType::Boolean.parse("yes").is_err());
        assert!(SimpleType::Boolean.parse("").is_err());
    }

    #[test]
    fn test_parse_character() {
        assert_eq!(SimpleType::Character.parse("é").unwrap(), OpenValue::Character('é'));
        assert!(SimpleType::Character.parse("ab").is_err());
        assert!(SimpleType::Character.parse("").is_err());
    }

    #[test]
    fn test_void_has_no_values() {
        let err = SimpleType::Void.parse("anything").unwrap_err();
        assert_eq!(err.target, "java.lang.Void");
        assert!(!SimpleType::Void.is_ordered());
    }

    #[test]
    fn test_is_value_matches_parser_output() {
        let samples = [
            (SimpleType::Boolean, "true"),
            (SimpleType::Character, "x"),
            (SimpleType::Byte, "1"),
            (SimpleType::Short, "1"),
            (SimpleType::Integer, "1"),
            (SimpleType::Long, "1"),
            (SimpleType::Float, "1.5"),
            (SimpleType::Double, "1.5"),
            (SimpleType::String, "s"),
            (SimpleType::BigDecimal, "1.50"),
            (SimpleType::BigInteger, "170141183460469231731687303715884105728"),
            (SimpleType::Date, "2026-01-15T12:00:00.000Z"),
            (SimpleType::ObjectName, "d:k=v"),
        ];
        for (t, text) in samples {
            let v = t.parse(text).unwrap();
            assert!(t.is_value(&v), "{t} should accept its own parse of {text:?}");
            assert_eq!(v.to_string(), text, "{t} canonical rendering");
        }
    }

    #[test]
    fn test_exhaustive_match_compiles() {
        // Adding a kind must break this match.
        fn family(t: &SimpleType) -> &'static str {
            match t {
                SimpleType::Void => "none",
                SimpleType::Boolean | SimpleType::Character | SimpleType::String => "text-like",
                SimpleType::Byte
                | SimpleType::Short
                | SimpleType::Integer
                | SimpleType::Long
                | SimpleType::BigInteger => "integral",
                SimpleType::Float | SimpleType::Double | SimpleType::BigDecimal => "fractional",
                SimpleType::Date => "temporal",
                SimpleType::ObjectName => "name",
            }
        }
        for t in SimpleType::all() {
            assert!(!family(t).is_empty());
        }
    }
}
