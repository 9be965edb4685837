//! Scalar quoting heuristics for the emitter.
//!
//! Plain scalars are emitted plain unless the text would be structurally
//! misparsed (leading indicators, control characters, comment or key
//! markers). Type lookalikes like `null` or `123` stay plain, because
//! plain scalars are never type-resolved on load. Quoted scalars keep
//! their quotes exactly when dropping them would change behavior, which
//! is when the text is a null/boolean/number lookalike.

/// True if `s` can be emitted as a plain scalar in KEY position.
#[inline]
pub(crate) fn is_plain_key_safe(s: &str) -> bool {
    if !is_plain_value_safe(s) {
        return false;
    }
    !s.contains(':')
}

/// True if `s` can be emitted as a plain scalar in VALUE position.
/// More permissive than keys about ':', but "colon space" still breaks.
#[inline]
pub(crate) fn is_plain_value_safe(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if starts_with_indicator(s) {
        return false;
    }
    if s.chars().any(char::is_control) {
        return false;
    }
    if s.contains(": ") || s.contains('#') {
        return false;
    }
    if s.ends_with(|c: char| c.is_ascii_whitespace()) || s.ends_with(':') {
        return false;
    }
    true
}

/// True if `s`, emitted plain, could read back as a null, boolean or
/// number instead of a string.
#[inline]
pub(crate) fn is_type_lookalike(s: &str) -> bool {
    if crate::scalars::is_null_literal(s) {
        return true;
    }
    if crate::scalars::parse_yaml11_bool(s).is_ok() {
        return true;
    }
    if crate::scalars::parse_signed(s).is_some() || crate::scalars::parse_unsigned(s).is_some() {
        return true;
    }
    crate::scalars::parse_float(s).is_some()
}

#[inline]
fn starts_with_indicator(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes[0] {
        // Only an indicator when followed by whitespace (or alone), as in
        // a block entry "- " or an explicit key "? ". "-5" or "-.inf"
        // are ordinary plain scalars.
        b'-' | b'?' | b':' => bytes.len() == 1 || bytes[1].is_ascii_whitespace(),
        b'[' | b']' | b'{' | b'}' | b'#' | b'&' | b'*' | b'!' | b'|' | b'>' | b'\'' | b'"'
        | b'%' | b'@' | b'`' => true,
        first => first.is_ascii_whitespace(),
    }
}

/// Append `s` as a double-quoted scalar with the necessary escapes.
pub(crate) fn push_double_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\u{FEFF}' => out.push_str("\\uFEFF"),
            '\u{0085}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if (c as u32) <= 0xFF && c.is_control() => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
