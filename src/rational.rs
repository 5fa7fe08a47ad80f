//! Exact rational parsing for the factory solver's preprocessing stage
//!
//! JSON numbers are deserialized with `serde_json`'s `arbitrary_precision`
//! feature, which keeps the literal text the caller sent instead of
//! rounding it through a binary `f64` on the way in. This module turns
//! that text into an exact [`BigRational`] so that constants like
//! `0.1`, cycle times, and productivity modifiers never pick up
//! binary-float rounding before the single lossy conversion to floating
//! point at LP-model-build time (SPEC_FULL §4.4).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Parse a decimal literal (optionally signed, with an optional fractional
/// part and an optional exponent) into an exact rational number.
///
/// This mirrors Python's `Fraction(str(x))`: the text is taken at face
/// value, so `"0.1"` becomes exactly `1/10`, not the nearest `f64`.
pub fn parse_decimal(text: &str) -> Result<BigRational> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::invalid_input("empty numeric literal"));
    }

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => {
            let exp_str = &text[idx + 1..];
            let exp: i32 = exp_str
                .parse()
                .map_err(|_| Error::invalid_input(format!("invalid exponent in '{text}'")))?;
            (&text[..idx], exp)
        }
        None => (text, 0),
    };

    let (sign, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::invalid_input(format!("invalid numeric literal '{text}'")));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(Error::invalid_input(format!("invalid numeric literal '{text}'")));
    }

    let digits = format!("{int_part}{frac_part}");
    let numerator: BigInt = if digits.is_empty() {
        BigInt::zero()
    } else {
        digits
            .parse()
            .map_err(|_| Error::invalid_input(format!("invalid numeric literal '{text}'")))?
    };

    let mut value = BigRational::new(numerator * sign, BigInt::one());
    let scale = frac_part.len() as i32 - exponent;
    if scale > 0 {
        value /= BigRational::from(ten_pow(scale));
    } else if scale < 0 {
        value *= BigRational::from(ten_pow(-scale));
    }

    Ok(value)
}

fn ten_pow(n: i32) -> BigInt {
    let ten = BigInt::from(10);
    let mut result = BigInt::one();
    for _ in 0..n {
        result *= &ten;
    }
    result
}

/// Parse a `serde_json::Number` (arbitrary-precision) into an exact rational.
pub fn number_to_rational(n: &serde_json::Number) -> Result<BigRational> {
    parse_decimal(&n.to_string())
}

/// The single lossy float conversion a rational constant goes through,
/// performed once at LP-model-build time rather than during preprocessing.
pub fn to_f64(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers() {
        assert_eq!(parse_decimal("120").unwrap(), BigRational::from_integer(120.into()));
    }

    #[test]
    fn parses_simple_decimal_exactly() {
        let r = parse_decimal("0.1").unwrap();
        assert_eq!(r, BigRational::new(1.into(), 10.into()));
    }

    #[test]
    fn parses_negative_decimal() {
        let r = parse_decimal("-3.25").unwrap();
        assert_eq!(r, BigRational::new((-13).into(), 4.into()));
    }

    #[test]
    fn parses_exponent_notation() {
        let r = parse_decimal("1.5e2").unwrap();
        assert_eq!(r, BigRational::from_integer(150.into()));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_decimal("not-a-number").is_err());
        assert!(parse_decimal("").is_err());
    }

    proptest::proptest! {
        #[test]
        fn decimal_literal_round_trips_to_the_float_it_names(
            int_part in -1_000_000i64..1_000_000i64,
            frac_digits in "[0-9]{0,6}",
        ) {
            let text = if frac_digits.is_empty() {
                int_part.to_string()
            } else {
                format!("{int_part}.{frac_digits}")
            };
            let parsed = parse_decimal(&text).unwrap();
            let expected: f64 = text.parse().unwrap();
            approx::assert_abs_diff_eq!(to_f64(&parsed), expected, epsilon = 1e-6);
        }
    }
}
