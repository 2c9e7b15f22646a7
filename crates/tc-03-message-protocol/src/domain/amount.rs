//! Decimal amounts ↔ nanounits (9 decimal places).

use super::errors::ProtocolError;

/// Nanounits per whole unit.
pub const NANO_PER_UNIT: u64 = 1_000_000_000;

const DECIMALS: usize = 9;

/// Parse a decimal amount such as `"0.05"` or `"5"` into nanounits.
pub fn to_nano(text: &str) -> Result<u64, ProtocolError> {
    let text = text.trim();
    let invalid = |reason: &str| ProtocolError::InvalidAmount(format!("{text:?}: {reason}"));

    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("only digits and one '.' are allowed"));
    }
    if fraction.len() > DECIMALS {
        return Err(invalid("more than 9 fractional digits"));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("too large"))?
    };
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<width$}", width = DECIMALS);
        padded.parse().map_err(|_| invalid("bad fraction"))?
    };

    whole
        .checked_mul(NANO_PER_UNIT)
        .and_then(|nano| nano.checked_add(fraction))
        .ok_or_else(|| invalid("too large"))
}

/// Format nanounits as a decimal amount without trailing zeros.
pub fn from_nano(nano: u64) -> String {
    let whole = nano / NANO_PER_UNIT;
    let fraction = nano % NANO_PER_UNIT;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = DECIMALS);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
