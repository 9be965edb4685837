//! Public macros: option-struct construction and tag declaration.
//!
//! The option macros exist to keep call sites ergonomic while allowing the
//! crate to add option fields over time without breaking changes.

/// Construct [`crate::LoadOptions`] from `Default` and a list of field
/// assignments.
///
/// ```rust
/// let options = yaml_tagged::load_options! {
///     safe: false,
/// };
/// assert!(!options.safe);
/// ```
#[cfg(feature = "deserialize")]
#[macro_export]
macro_rules! load_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::LoadOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::DumpOptions`] from `Default` and a list of field
/// assignments.
///
/// ```rust
/// let options = yaml_tagged::dump_options! {
///     indent_step: 4,
///     quote_all: true,
/// };
/// assert_eq!(options.indent_step, 4);
/// ```
#[cfg(feature = "serialize")]
#[macro_export]
macro_rules! dump_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::DumpOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Declare the tag of a serde-backed type, implementing
/// [`TaggedObject`](crate::TaggedObject) for it.
///
/// Two forms, mutually exclusive:
///
/// - `tag_info!(Foo, suffix = "com.example.Foo")` claims the given suffix
///   verbatim.
/// - `tag_info!(Foo, namespace = "com.example")` derives the suffix from
///   the type name: `com.example.Foo`.
///
/// The generated construction hooks go through the type's
/// `Serialize`/`Deserialize` impls, so `#[derive(Serialize, Deserialize)]`
/// (or hand-written impls) must be present. Mapping nodes bind fields by
/// name, sequence nodes positionally, and a scalar node feeds the raw text
/// to the deserializer (the natural fit for newtype wrappers). Override by
/// implementing [`TaggedObject`](crate::TaggedObject) manually instead of
/// using the macro.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// struct Robot {
///     name: String,
/// }
/// yaml_tagged::tag_info!(Robot, namespace = "com.example");
///
/// use yaml_tagged::TaggedObject;
/// assert_eq!(Robot::tag_suffix().unwrap(), "com.example.Robot");
/// ```
#[macro_export]
macro_rules! tag_info {
    ( $ty:ident, suffix = $suffix:expr ) => {
        impl $crate::TaggedObject for $ty {
            fn tag_suffix() -> ::core::option::Option<::std::borrow::Cow<'static, str>> {
                ::core::option::Option::Some(::std::borrow::Cow::Borrowed($suffix))
            }

            fn to_yaml(&self) -> ::core::result::Result<$crate::Mapping, $crate::Error> {
                $crate::to_mapping(self)
            }

            fn from_yaml_mapping(
                mapping: $crate::Mapping,
                _suffix: &str,
            ) -> ::core::result::Result<Self, $crate::Error> {
                $crate::from_value($crate::Value::Mapping(mapping))
            }

            fn from_yaml_sequence(
                seq: $crate::Sequence,
                _suffix: &str,
            ) -> ::core::result::Result<Self, $crate::Error> {
                $crate::from_value($crate::Value::Sequence(seq))
            }

            fn from_yaml_scalar(
                scalar: ::std::string::String,
                _suffix: &str,
            ) -> ::core::result::Result<Self, $crate::Error> {
                $crate::from_value($crate::Value::Scalar($crate::Scalar::plain(scalar)))
            }
        }
    };
    ( $ty:ident, namespace = $ns:expr ) => {
        $crate::tag_info!($ty, suffix = ::core::concat!($ns, ".", ::core::stringify!($ty)));
    };
}
