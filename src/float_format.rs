//! Float rendering for scalar values.
//!
//! `zmij` produces the shortest round-trippable text, which is not always
//! a valid YAML float: `4e-6` lacks the mandatory decimal point. The
//! helper patches such output and uses the YAML spellings for the
//! non-finite values.

use num_traits::float::FloatCore;
use zmij::Float;

use crate::error::Error;

/// Append `f` to `target` as a YAML float scalar.
pub(crate) fn push_float_string<F: Float + FloatCore>(
    target: &mut String,
    f: F,
) -> Result<(), Error> {
    if FloatCore::is_nan(f) {
        target.push_str(".nan");
    } else if FloatCore::is_infinite(f) {
        if FloatCore::is_sign_positive(f) {
            target.push_str(".inf");
        } else {
            target.push_str("-.inf");
        }
    } else {
        let mut buf = zmij::Buffer::new();
        let s = buf.format_finite(f);
        if !s.as_bytes().contains(&b'.') {
            if let Some(exp_pos) = s.find('e').or_else(|| s.find('E')) {
                // "4e-6" -> "4.0e-6"
                target.push_str(&s[..exp_pos]);
                target.push_str(".0");
                target.push_str(&s[exp_pos..]);
            } else {
                // "1" -> "1.0"
                target.push_str(s);
                target.push_str(".0");
            }
        } else {
            target.push_str(s);
        }
    }
    Ok(())
}
