//! Scalar text interpretation helpers for the serde bridge.
//!
//! The document tree itself never resolves scalar types; these helpers run
//! only when a typed target (bool, integer, float) asks for a parse.

/// True for the plain null spellings.
pub(crate) fn is_null_literal(s: &str) -> bool {
    matches!(s, "" | "~" | "null" | "Null" | "NULL")
}

/// Parse a YAML 1.1 boolean from a &str (handles the "Norway problem").
///
/// Accepted TRUE literals (case-insensitive): "y", "yes", "true", "on"
/// Accepted FALSE literals (case-insensitive): "n", "no", "false", "off"
pub(crate) fn parse_yaml11_bool(s: &str) -> Result<bool, String> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("true")
        || t.eq_ignore_ascii_case("yes")
        || t.eq_ignore_ascii_case("y")
        || t.eq_ignore_ascii_case("on")
    {
        Ok(true)
    } else if t.eq_ignore_ascii_case("false")
        || t.eq_ignore_ascii_case("no")
        || t.eq_ignore_ascii_case("n")
        || t.eq_ignore_ascii_case("off")
    {
        Ok(false)
    } else {
        Err(format!("invalid YAML bool: `{s}`"))
    }
}

fn parse_digits_u128(digits: &str, radix: u32) -> Option<u128> {
    let mut val: u128 = 0;
    let mut saw = false;
    for b in digits.as_bytes() {
        let d = match *b {
            b'_' => continue,
            b'0'..=b'9' => (b - b'0') as u32,
            b'a'..=b'f' if radix > 10 => 10 + (b - b'a') as u32,
            b'A'..=b'F' if radix > 10 => 10 + (b - b'A') as u32,
            _ => return None,
        };
        if d >= radix {
            return None;
        }
        val = val.checked_mul(radix as u128)?;
        val = val.checked_add(d as u128)?;
        saw = true;
    }
    if saw { Some(val) } else { None }
}

/// Parse an unsigned integer with YAML radix prefixes (`0x`, `0o`) and `_`
/// separators, with overflow checking.
pub(crate) fn parse_unsigned(s: &str) -> Option<u128> {
    let t = s.trim();
    let t = t.strip_prefix('+').unwrap_or(t);
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        parse_digits_u128(hex, 16)
    } else if let Some(oct) = t.strip_prefix("0o").or_else(|| t.strip_prefix("0O")) {
        parse_digits_u128(oct, 8)
    } else {
        parse_digits_u128(t, 10)
    }
}

/// Parse a signed integer, reusing the unsigned machinery for the magnitude.
pub(crate) fn parse_signed(s: &str) -> Option<i128> {
    let t = s.trim();
    if let Some(rest) = t.strip_prefix('-') {
        let magnitude = parse_unsigned(rest)?;
        // i128::MIN magnitude fits; anything beyond overflows.
        if magnitude > (i128::MAX as u128) + 1 {
            return None;
        }
        0i128.checked_sub_unsigned(magnitude)
    } else {
        let magnitude = parse_unsigned(t)?;
        i128::try_from(magnitude).ok()
    }
}

/// Parse a float, accepting the YAML 1.2 `.nan` / `.inf` / `-.inf` spellings.
pub(crate) fn parse_float(s: &str) -> Option<f64> {
    let t = s.trim();
    let lower = t.to_ascii_lowercase();
    match lower.as_str() {
        ".nan" | "nan" => return Some(f64::NAN),
        ".inf" | "+.inf" | "inf" => return Some(f64::INFINITY),
        "-.inf" | "-inf" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    let cleaned: String = t.chars().filter(|c| *c != '_').collect();
    cleaned.parse::<f64>().ok()
}
