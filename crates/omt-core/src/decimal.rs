//! # Decimal — Arbitrary-Precision Fixed-Point Numbers
//!
//! Native representation of the `BigDecimal` simple type: an unbounded
//! unscaled integer and a signed decimal scale, so the numeric value is
//! `unscaled × 10^(-scale)`.
//!
//! Equality is structural and therefore scale-sensitive (`2.0 != 2.00`),
//! matching the member-equality used for legal-value checks. Ordering is
//! numeric and ignores scale; it is exposed as [`Decimal::cmp_numeric`]
//! rather than through `Ord` so the two notions cannot be confused.
//!
//! ## Canonical Text
//!
//! Plain notation while the scale is non-negative and the adjusted exponent
//! (`digits - 1 - scale`) is at least -6, scientific notation otherwise:
//! `12.340`, `0.001`, `1E-7`, `1.23E+5`. Both forms parse back to the same
//! unscaled value and scale.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::Signed;

use crate::error::ConversionError;

const TARGET: &str = "java.math.BigDecimal";

/// Smallest adjusted exponent still rendered in plain notation.
const PLAIN_MIN_EXPONENT: i64 = -6;

/// A fixed-point decimal number with an explicit scale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: i32,
}

impl Decimal {
    /// Construct from an unscaled value and scale.
    pub fn new(unscaled: impl Into<BigInt>, scale: i32) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// The unscaled integer value.
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of digits to the right of the decimal point. Negative scales
    /// multiply by a power of ten.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Compare numerically, ignoring scale.
    pub fn cmp_numeric(&self, other: &Self) -> Ordering {
        let sign = self.unscaled.sign();
        match sign.cmp(&other.unscaled.sign()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        if sign == Sign::NoSign {
            return Ordering::Equal;
        }
        let magnitude = self.cmp_magnitude(other);
        if sign == Sign::Minus {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// Compare absolute values of two non-zero decimals. The adjusted
    /// exponents decide unless they are equal, in which case the scale gap
    /// is bounded by the digit counts and rescaling stays small.
    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        let (a, b) = (self.unscaled.abs(), other.unscaled.abs());
        let a_adjusted = self.adjusted_exponent(digit_count(&a));
        let b_adjusted = other.adjusted_exponent(digit_count(&b));
        match a_adjusted.cmp(&b_adjusted) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        let shift = i64::from(self.scale) - i64::from(other.scale);
        match shift.cmp(&0) {
            Ordering::Equal => a.cmp(&b),
            Ordering::Greater => a.cmp(&(b * pow10(shift))),
            Ordering::Less => (a * pow10(-shift)).cmp(&b),
        }
    }

    /// `digits - 1 - scale`: the exponent of the leading digit.
    fn adjusted_exponent(&self, digits: usize) -> i64 {
        digits as i64 - 1 - i64::from(self.scale)
    }
}

fn digit_count(magnitude: &BigInt) -> usize {
    magnitude.to_string().len()
}

fn pow10(exponent: i64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exponent.unsigned_abs() as usize)
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Self::new(v, 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(v: BigInt) -> Self {
        Self::new(v, 0)
    }
}

impl FromStr for Decimal {
    type Err = ConversionError;

    /// Parse `[+-]digits[.digits][(e|E)[+-]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| ConversionError::new(TARGET, format!("{s:?}"), reason);

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };

        let (negative, unsigned) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(fail("no digits"));
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(fail("invalid digit"));
        }

        let digits = format!("{int_part}{frac_part}");
        let magnitude = BigInt::from_str(&digits).map_err(|_| fail("invalid digit"))?;
        let unscaled = if negative { -magnitude } else { magnitude };

        let exp: i64 = match exponent {
            Some(e) => {
                let body = e.strip_prefix('+').unwrap_or(e);
                if body.is_empty() || body.starts_with('+') {
                    return Err(fail("malformed exponent"));
                }
                body.parse().map_err(|_| fail("malformed exponent"))?
            }
            None => 0,
        };

        let scale = (frac_part.len() as i64)
            .checked_sub(exp)
            .and_then(|scale| i32::try_from(scale).ok())
            .ok_or_else(|| fail("scale out of range"))?;
        Ok(Self::new(unscaled, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coefficient = self.unscaled.magnitude().to_string();
        let sign = if self.unscaled.is_negative() { "-" } else { "" };
        let adjusted = self.adjusted_exponent(coefficient.len());

        if self.scale == 0 {
            return write!(f, "{sign}{coefficient}");
        }

        if self.scale > 0 && adjusted >= PLAIN_MIN_EXPONENT {
            let scale = self.scale as usize;
            return if coefficient.len() > scale {
                let (int_part, frac_part) = coefficient.split_at(coefficient.len() - scale);
                write!(f, "{sign}{int_part}.{frac_part}")
            } else {
                let zeros = "0".repeat(scale - coefficient.len());
                write!(f, "{sign}0.{zeros}{coefficient}")
            };
        }

        let (lead, rest) = coefficient.split_at(1);
        f.write_str(sign)?;
        f.write_str(lead)?;
        if !rest.is_empty() {
            write!(f, ".{rest}")?;
        }
        if adjusted != 0 {
            write!(f, "E{}{adjusted}", if adjusted > 0 { "+" } else { "" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(dec("12.340"), Decimal::new(12340, 3));
        assert_eq!(dec("-0.5"), Decimal::new(-5, 1));
        assert_eq!(dec("+7"), Decimal::new(7, 0));
        assert_eq!(dec(".25"), Decimal::new(25, 2));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(dec("1E+3"), Decimal::new(1, -3));
        assert_eq!(dec("1.5e-2"), Decimal::new(15, 3));
        assert_eq!(dec("1e-70000"), Decimal::new(1, 70000));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", ".", "abc", "1.2.3", "1e", "1e++2", " 1", "--1", "1_000"] {
            assert!(bad.parse::<Decimal>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_parse_rejects_scale_overflow() {
        assert!("1e-2147483648".parse::<Decimal>().is_err());
        assert!("1e9223372036854775807".parse::<Decimal>().is_err());
        assert!("1e-9223372036854775808".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for text in [
            "0", "0.00", "-0.5", "12.340", "1E+3", "-42", "0.001", "0.000001", "1E-7",
            "1.23E+5", "-4.5E-10", "0E+3",
        ] {
            assert_eq!(dec(text).to_string(), text);
        }
    }

    #[test]
    fn test_display_switches_to_scientific_below_micro() {
        assert_eq!(Decimal::new(1, 6).to_string(), "0.000001");
        assert_eq!(Decimal::new(1, 7).to_string(), "1E-7");
        assert_eq!(Decimal::new(12, 8).to_string(), "1.2E-7");
    }

    #[test]
    fn test_display_extreme_scales() {
        let tiny = Decimal::new(1, 70000);
        assert_eq!(tiny.to_string(), "1E-70000");
        assert_eq!(dec(&tiny.to_string()), tiny);

        for scale in [i32::MAX, i32::MIN, 300_000_000, -300_000_000] {
            let d = Decimal::new(-12345, scale);
            assert_eq!(dec(&d.to_string()), d, "scale {scale}");
        }
    }

    #[test]
    fn test_beyond_128_bits() {
        let min = Decimal::new(i128::MIN, 0);
        assert_eq!(dec(&min.to_string()), min);

        let text = "123456789012345678901234567890123456789012345.6789";
        assert_eq!(dec(text).to_string(), text);
    }

    #[test]
    fn test_equality_is_scale_sensitive() {
        assert_ne!(dec("2.0"), dec("2.00"));
        assert_eq!(dec("2.0").cmp_numeric(&dec("2.00")), Ordering::Equal);
    }

    #[test]
    fn test_numeric_ordering() {
        assert_eq!(dec("1.5").cmp_numeric(&dec("1.49")), Ordering::Greater);
        assert_eq!(dec("-3").cmp_numeric(&dec("-2.999")), Ordering::Less);
        assert_eq!(dec("1E+3").cmp_numeric(&dec("999.9")), Ordering::Greater);
        assert_eq!(dec("0").cmp_numeric(&dec("0E-9")), Ordering::Equal);
        assert_eq!(dec("-0.1").cmp_numeric(&dec("0")), Ordering::Less);
    }

    #[test]
    fn test_ordering_across_extreme_scales() {
        let tiny = dec("1e-300000000");
        let huge = dec("1e+300000000");
        assert_eq!(tiny.cmp_numeric(&dec("-1")), Ordering::Greater);
        assert_eq!(tiny.cmp_numeric(&dec("0.000001")), Ordering::Less);
        assert_eq!(huge.cmp_numeric(&Decimal::new(i128::MAX, 0)), Ordering::Greater);
        assert_eq!(dec("-1e+300000000").cmp_numeric(&dec("-1")), Ordering::Less);
        assert_eq!(dec("10E+299999999").cmp_numeric(&huge), Ordering::Equal);
    }
}
