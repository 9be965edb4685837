//! Option structs for the load and dump entry points.
//!
//! Construct them through [`load_options!`](crate::load_options) and
//! [`dump_options!`](crate::dump_options) rather than struct literals, so
//! new fields can be added without breaking call sites.

#[cfg(feature = "deserialize")]
use crate::budget::Budget;

/// Configuration for the `load_*` entry points.
#[cfg(feature = "deserialize")]
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Safe mode: unknown custom tags are an error. Disable to let nodes
    /// with foreign tags pass through as plain untyped values.
    ///
    /// Default: true.
    pub safe: bool,
    /// Optional budget enforced over the raw event stream before any tag
    /// handler runs. `None` disables all limits.
    ///
    /// Default: `Some(Budget::default())`.
    pub budget: Option<Budget>,
}

#[cfg(feature = "deserialize")]
impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            safe: true,
            budget: Some(Budget::default()),
        }
    }
}

/// Configuration for the `dump_*` entry points.
#[cfg(feature = "serialize")]
#[derive(Clone, Debug)]
pub struct DumpOptions {
    /// Number of spaces per nesting level. Must be at least 1; the dump
    /// entry points reject 0 with [`Error::InvalidOptions`](crate::Error).
    ///
    /// Default: 2.
    pub indent_step: usize,
    /// Emit empty mappings as `{}` and empty sequences as `[]`. When false,
    /// an empty container is emitted as an empty node.
    ///
    /// Default: true.
    pub empty_as_braces: bool,
    /// Quote every scalar, not only those that need it.
    ///
    /// Default: false.
    pub quote_all: bool,
    /// Emit registered objects as plain mappings without their tag. The
    /// output loses its type information and loads back as untyped data.
    ///
    /// Default: false.
    pub omit_tags: bool,
}

#[cfg(feature = "serialize")]
impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent_step: 2,
            empty_as_braces: true,
            quote_all: false,
            omit_tags: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "deserialize")]
    fn test_load_options_default() {
        let opts = LoadOptions::default();
        assert!(opts.safe);
        assert!(opts.budget.is_some());
    }

    #[test]
    #[cfg(feature = "serialize")]
    fn test_dump_options_default() {
        let opts = DumpOptions::default();
        assert_eq!(opts.indent_step, 2);
        assert!(opts.empty_as_braces);
        assert!(!opts.quote_all);
        assert!(!opts.omit_tags);
    }
}
