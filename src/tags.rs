//! Tag string layout: prefixes, suffixes and tag classification.
//!
//! A full tag is `<prefix><suffix>`. Self-describing types live under the
//! fixed [`TAGGED_PREFIX`] namespace; codecs bring their own prefix, which
//! is normalized to start with `!` and end with `/` before use.

use crate::error::Error;

/// Global tag prefix of self-describing types registered via
/// [`TagRegistry::register`](crate::TagRegistry::register).
pub const TAGGED_PREFIX: &str = "!tagged/";

/// Canonical prefix of YAML core-schema tags (`!!str`, `!!int`, ...), as the
/// parser reports them.
pub(crate) const CORE_SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

/// True for tags of the YAML core schema. Those are never dispatched to a
/// handler; the node passes through untyped even in safe mode.
pub(crate) fn is_core_schema_tag(tag: &str) -> bool {
    tag.starts_with(CORE_SCHEMA_PREFIX) || tag.starts_with("!!")
}

/// Normalize a caller-supplied codec prefix.
///
/// Ensures a leading `!` and a trailing `/`. Rejects empty prefixes and the
/// reserved [`TAGGED_PREFIX`] namespace.
pub(crate) fn normalize_codec_prefix(prefix: &str) -> Result<String, Error> {
    if prefix.is_empty() || prefix == "!" {
        return Err(Error::declaration("codec prefix must not be empty"));
    }
    let mut normalized = if prefix.starts_with('!') {
        prefix.to_owned()
    } else {
        format!("!{prefix}")
    };
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    // Anything under the object namespace would be stripped by object
    // dispatch on load and never reach the codec again.
    if normalized.starts_with(TAGGED_PREFIX) {
        return Err(Error::declaration(format!(
            "codec prefix `{normalized}` collides with the reserved `{TAGGED_PREFIX}` namespace"
        )));
    }
    Ok(normalized)
}

/// Validate a tag suffix declared by a self-describing type.
///
/// The suffix must not be empty and must not start with the `!` delimiter:
/// the global prefix already carries it.
pub(crate) fn validate_suffix(suffix: &str, type_name: &str) -> Result<(), Error> {
    if suffix.is_empty() {
        return Err(Error::declaration(format!(
            "tag suffix declared by `{type_name}` is empty"
        )));
    }
    if suffix.starts_with('!') {
        return Err(Error::declaration(format!(
            "tag suffix `{suffix}` declared by `{type_name}` must not start with `!`; \
             only the suffix goes here, the `{TAGGED_PREFIX}` prefix is implied"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_schema_tags_recognized() {
        assert!(is_core_schema_tag("tag:yaml.org,2002:str"));
        assert!(is_core_schema_tag("!!int"));
        assert!(!is_core_schema_tag("!tagged/com.example.Foo"));
        assert!(!is_core_schema_tag("!geom/pt"));
    }

    #[test]
    fn codec_prefix_normalization() {
        assert_eq!(normalize_codec_prefix("geom").unwrap(), "!geom/");
        assert_eq!(normalize_codec_prefix("!geom").unwrap(), "!geom/");
        assert_eq!(normalize_codec_prefix("!geom/").unwrap(), "!geom/");
        assert!(normalize_codec_prefix("").is_err());
        assert!(normalize_codec_prefix("tagged").is_err());
        assert!(normalize_codec_prefix("tagged/geo").is_err());
        assert!(normalize_codec_prefix("!tagged/geo/").is_err());
    }

    #[test]
    fn suffix_validation() {
        assert!(validate_suffix("com.example.Foo", "Foo").is_ok());
        assert!(validate_suffix("", "Foo").is_err());
        assert!(validate_suffix("!com.example.Foo", "Foo").is_err());
    }
}
