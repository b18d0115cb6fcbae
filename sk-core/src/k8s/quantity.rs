//! Conversion of Kubernetes resource quantities (`"500m"`, `"1.5Gi"`, `"2e3"`) into integers.
//!
//! Kubernetes stores quantities as arbitrary-precision decimals; the scheduler only ever looks at
//! them as whole units (bytes) or thousandths (milli-cores), rounded up.  We do the same, using
//! 128-bit intermediate arithmetic and refusing anything that does not fit in an `i64`.
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::*;

const MAX_DECIMAL_EXPONENT: i64 = 38;

lazy_static! {
    static ref QUANTITY_REGEX: Regex =
        Regex::new(r"^([+-]?)([0-9]*)(?:\.([0-9]*))?([eE][+-]?[0-9]+|Ki|Mi|Gi|Ti|Pi|Ei|[numkMGTPE])?$").unwrap();
}

err_impl! {
    /// Why a quantity could not be converted.
    QuantityError,

    /// The text doesn't follow the quantity grammar.
    #[error("malformed quantity: {0}")]
    Malformed(String),

    /// The value doesn't fit in an `i64`.
    #[error("quantity out of range: {0}")]
    Overflow(String),
}

/// Value of the quantity in whole units, rounded up (`"1.5Gi"` -> 1610612736, `"100m"` -> 1).
pub fn parse_quantity_value(q: &Quantity) -> anyhow::Result<i64> {
    scaled_value(&q.0, 0)
}

/// Value of the quantity in thousandths, rounded up (`"100m"` -> 100, `"2"` -> 2000).
pub fn parse_quantity_milli_value(q: &Quantity) -> anyhow::Result<i64> {
    scaled_value(&q.0, 3)
}

fn scaled_value(raw: &str, scale: i32) -> anyhow::Result<i64> {
    let text = raw.trim();
    let Some(caps) = QUANTITY_REGEX.captures(text) else {
        return Err(QuantityError::malformed(raw));
    };

    let negative = &caps[1] == "-";
    let int_part = caps.get(2).map_or("", |m| m.as_str());
    let frac_part = caps.get(3).map_or("", |m| m.as_str());
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(QuantityError::malformed(raw));
    }

    let (binary_shift, suffix_exponent) = match caps.get(4).map_or("", |m| m.as_str()) {
        "" => (0, 0),
        "Ki" => (10, 0),
        "Mi" => (20, 0),
        "Gi" => (30, 0),
        "Ti" => (40, 0),
        "Pi" => (50, 0),
        "Ei" => (60, 0),
        "n" => (0, -9),
        "u" => (0, -6),
        "m" => (0, -3),
        "k" => (0, 3),
        "M" => (0, 6),
        "G" => (0, 9),
        "T" => (0, 12),
        "P" => (0, 15),
        "E" => (0, 18),
        exp => (0, exp[1..].parse::<i32>().map_err(|_| QuantityError::malformed(raw))?),
    };

    let digits = format!("{int_part}{frac_part}");
    let digits = digits.trim_start_matches('0');
    let mantissa: u128 = if digits.is_empty() {
        0
    } else {
        digits.parse().map_err(|_| QuantityError::overflow(raw))?
    };

    // Suffix exponents span the whole i32 range.
    let frac_len = i64::try_from(frac_part.len()).map_err(|_| QuantityError::overflow(raw))?;
    let exponent = i64::from(suffix_exponent) + i64::from(scale) - frac_len;

    let mut magnitude = mantissa
        .checked_mul(1u128 << binary_shift)
        .ok_or_else(|| QuantityError::overflow(raw))?;

    if magnitude != 0 {
        if exponent > MAX_DECIMAL_EXPONENT {
            return Err(QuantityError::overflow(raw));
        } else if exponent < -MAX_DECIMAL_EXPONENT {
            // Anything non-zero this small still rounds up to one.
            magnitude = 1;
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let power = 10u128.pow(exponent.unsigned_abs() as u32);
            if exponent >= 0 {
                magnitude = magnitude.checked_mul(power).ok_or_else(|| QuantityError::overflow(raw))?;
            } else {
                magnitude = magnitude.div_ceil(power);
            }
        }
    }

    let value = i64::try_from(magnitude).map_err(|_| QuantityError::overflow(raw))?;
    Ok(if negative { -value } else { value })
}
