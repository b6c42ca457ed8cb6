//! Decoding of the `<fraction>-<totalReads>` name field carried by every
//! record of a per-chromosome methylation file.

use roimeth_core::models::Region;

use crate::errors::{Result, RoiError};

/// Methylated and total read counts for one (region, sample) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethCounts {
    pub meth: u64,
    pub total: u64,
}

impl MethCounts {
    pub fn new(meth: u64, total: u64) -> Self {
        MethCounts { meth, total }
    }

    /// `meth / total`, or `None` when no reads were seen.
    pub fn ratio(&self) -> Option<f64> {
        match self.total {
            0 => None,
            total => Some(self.meth as f64 / total as f64),
        }
    }

    /// Sum of two cells, or `None` if either count overflows.
    pub fn checked_add(self, other: MethCounts) -> Option<MethCounts> {
        Some(MethCounts {
            meth: self.meth.checked_add(other.meth)?,
            total: self.total.checked_add(other.total)?,
        })
    }
}

/// An exact non-negative decimal: `mantissa / 10^scale`.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    mantissa: u128,
    scale: u32,
}

/// Parse a plain (`0.75`, `.5`, `1`) or positive-exponent (`7.5E+1`)
/// decimal without going through a float.
fn parse_decimal(token: &str) -> Option<Decimal> {
    let token = token.trim();
    let token = token.strip_prefix('+').unwrap_or(token);

    let (digits, exponent) = match token.find(['e', 'E']) {
        Some(pos) => {
            let exp = &token[pos + 1..];
            let exp = exp.strip_prefix('+').unwrap_or(exp);
            (&token[..pos], exp.parse::<u32>().ok()?)
        }
        None => (token, 0),
    };

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut mantissa: u128 = 0;
    for b in int_part.bytes().chain(frac_part.bytes()) {
        mantissa = mantissa.checked_mul(10)?.checked_add(u128::from(b - b'0'))?;
    }

    let frac_len = u32::try_from(frac_part.len()).ok()?;
    if exponent >= frac_len {
        let shift = 10u128.checked_pow(exponent - frac_len)?;
        Some(Decimal {
            mantissa: mantissa.checked_mul(shift)?,
            scale: 0,
        })
    } else {
        Some(Decimal {
            mantissa,
            scale: frac_len - exponent,
        })
    }
}

/// `round(value × total)` with halves rounded up, computed exactly.
fn scaled_round_half_up(value: &Decimal, total: u64) -> Option<u64> {
    let numerator = value.mantissa.checked_mul(u128::from(total))?;
    let denominator = 10u128.checked_pow(value.scale)?;

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let rounded = if remainder >= denominator - remainder {
        quotient + 1
    } else {
        quotient
    };

    u64::try_from(rounded).ok()
}

fn decode_error(record: &str, reason: impl Into<String>) -> RoiError {
    RoiError::Decode {
        record: record.to_string(),
        reason: reason.into(),
    }
}

///
/// Decode an encoded coverage field such as `"0.75-40"` into counts.
///
/// `total` is the integer after the dash; `meth` is the fraction times the
/// total, rounded half-up on the exact product. Fractions above one are not
/// rejected.
///
/// # Errors
/// [`RoiError::Decode`] if the field does not split into exactly two
/// dash-delimited tokens or either token is not a number.
///
pub fn decode_coverage(field: &str) -> Result<MethCounts> {
    let tokens: Vec<&str> = field.split('-').collect();
    let [fraction, total] = tokens.as_slice() else {
        return Err(decode_error(
            field,
            format!("expected <fraction>-<totalReads>, found {} tokens", tokens.len()),
        ));
    };

    let fraction =
        parse_decimal(fraction).ok_or_else(|| decode_error(field, "fraction is not numeric"))?;
    let total = total
        .trim()
        .parse::<u64>()
        .map_err(|_| decode_error(field, "total reads is not an integer"))?;
    let meth = scaled_round_half_up(&fraction, total)
        .ok_or_else(|| decode_error(field, "methylated read count overflows"))?;

    Ok(MethCounts { meth, total })
}

/// Decode the name column of a methylation record.
pub fn decode_record(record: &Region) -> Result<MethCounts> {
    match record.rest.as_deref().and_then(|rest| rest.split('\t').next()) {
        Some(field) if !field.is_empty() => decode_coverage(field),
        _ => Err(decode_error(
            &record.as_string(),
            "record has no coverage name field",
        )),
    }
}
