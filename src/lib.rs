//! Tag-registry based YAML object (de)serialization on top of
//! `saphyr-parser`.
//!
//! YAML documents carry type information in tags: a node tagged
//! `!tagged/com.example.Robot` loads as a `Robot`, and a `Robot` dumps back
//! under the same tag. This crate keeps that resolution explicit: types
//! declare the tag suffix they answer to (the [`TaggedObject`] trait,
//! usually through the [`tag_info!`] macro), a [`TagRegistry`] is populated
//! at startup, and every load/dump entry point takes the registry as an
//! argument. Nothing is global and nothing is discovered implicitly.
//!
//! Untagged YAML loads as plain [`Value`] trees whose scalars are never
//! type-resolved: `0` is the string `"0"` until something typed asks for an
//! integer. Tagged nodes become [`Value::Object`] holding the reconstructed
//! Rust value.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use yaml_tagged::{TagRegistry, load_as, dump_str};
//!
//! #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
//! struct Robot {
//!     name: String,
//!     battery: u32,
//! }
//! yaml_tagged::tag_info!(Robot, namespace = "com.example");
//!
//! let mut registry = TagRegistry::new();
//! registry.register::<Robot>().unwrap();
//!
//! let yaml = "!tagged/com.example.Robot\nname: rusty\nbattery: 95\n";
//! let robot: Robot = load_as(&registry, yaml).unwrap();
//! assert_eq!(robot.name, "rusty");
//!
//! let dumped = dump_str(&registry, &robot).unwrap();
//! assert_eq!(dumped, yaml);
//! ```
//!
//! For foreign types that cannot implement [`TaggedObject`] themselves,
//! implement [`TagCodec`]: one handler owning a whole tag prefix and a
//! closed set of types under it.

#[cfg(feature = "deserialize")]
pub mod budget;
mod codec;
#[cfg(feature = "serialize")]
mod emit;
pub mod error;
mod float_format;
mod macros;
#[cfg(feature = "deserialize")]
mod node;
mod object;
pub mod options;
#[cfg(feature = "serialize")]
mod quoting;
#[cfg(feature = "deserialize")]
mod reader;
mod registry;
mod scalars;
mod tags;
pub mod value;
mod value_de;
mod value_ser;

#[cfg(feature = "deserialize")]
pub use budget::{Budget, BudgetBreach};
pub use codec::{KnownType, TagCodec};
pub use error::{Error, Location, NodeShape};
pub use object::TaggedObject;
#[cfg(feature = "serialize")]
pub use options::DumpOptions;
#[cfg(feature = "deserialize")]
pub use options::LoadOptions;
pub use registry::TagRegistry;
pub use tags::TAGGED_PREFIX;
pub use value::{AnyObject, Mapping, Object, PlainNode, Scalar, Sequence, Value};
pub use value_de::from_value;
pub use value_ser::{to_mapping, to_value};

#[cfg(feature = "deserialize")]
use std::any::Any;
#[cfg(feature = "deserialize")]
use std::io::Read;
#[cfg(feature = "serialize")]
use std::io::Write;
#[cfg(any(feature = "serialize", feature = "deserialize"))]
use std::path::Path;

/// Load exactly one YAML document with default [`LoadOptions`].
#[cfg(feature = "deserialize")]
pub fn load_str(registry: &TagRegistry, input: &str) -> Result<Value, Error> {
    load_str_with_options(registry, input, &LoadOptions::default())
}

/// Load exactly one YAML document.
///
/// Inputs with zero or several documents are an error; use
/// [`load_multi_str`] for streams. In safe mode (the default) a custom tag
/// with no registered handler namespace fails with [`Error::UnknownTag`].
#[cfg(feature = "deserialize")]
pub fn load_str_with_options(
    registry: &TagRegistry,
    input: &str,
    options: &LoadOptions,
) -> Result<Value, Error> {
    reader::load_document(registry, input, options)
}

/// Load every non-empty document of a YAML stream with default options.
#[cfg(feature = "deserialize")]
pub fn load_multi_str(registry: &TagRegistry, input: &str) -> Result<Vec<Value>, Error> {
    load_multi_str_with_options(registry, input, &LoadOptions::default())
}

/// Load every non-empty document of a YAML stream.
#[cfg(feature = "deserialize")]
pub fn load_multi_str_with_options(
    registry: &TagRegistry,
    input: &str,
    options: &LoadOptions,
) -> Result<Vec<Value>, Error> {
    reader::load_stream(registry, input, options)
}

/// Read a whole reader and load it as one document.
#[cfg(feature = "deserialize")]
pub fn load_from_reader<R: Read>(registry: &TagRegistry, reader: R) -> Result<Value, Error> {
    load_from_reader_with_options(registry, reader, &LoadOptions::default())
}

#[cfg(feature = "deserialize")]
pub fn load_from_reader_with_options<R: Read>(
    registry: &TagRegistry,
    mut reader: R,
    options: &LoadOptions,
) -> Result<Value, Error> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    load_str_with_options(registry, &input, options)
}

/// Load one document from a file.
#[cfg(feature = "deserialize")]
pub fn load_from_path<P: AsRef<Path>>(registry: &TagRegistry, path: P) -> Result<Value, Error> {
    load_from_path_with_options(registry, path, &LoadOptions::default())
}

#[cfg(feature = "deserialize")]
pub fn load_from_path_with_options<P: AsRef<Path>>(
    registry: &TagRegistry,
    path: P,
    options: &LoadOptions,
) -> Result<Value, Error> {
    let input = std::fs::read_to_string(path)?;
    load_str_with_options(registry, &input, options)
}

/// Load one document and take its root out as a `T`.
///
/// The document must decode to a tagged object of exactly this type;
/// anything else fails with [`Error::ResultTypeMismatch`] naming both
/// the expected and the actual type.
#[cfg(feature = "deserialize")]
pub fn load_as<T: Any>(registry: &TagRegistry, input: &str) -> Result<T, Error> {
    load_as_with_options(registry, input, &LoadOptions::default())
}

#[cfg(feature = "deserialize")]
pub fn load_as_with_options<T: Any>(
    registry: &TagRegistry,
    input: &str,
    options: &LoadOptions,
) -> Result<T, Error> {
    load_str_with_options(registry, input, options)?.into_object::<T>()
}

/// Dump a registered object as a tagged YAML document, default options.
#[cfg(feature = "serialize")]
pub fn dump_str<T: AnyObject>(registry: &TagRegistry, object: &T) -> Result<String, Error> {
    dump_str_with_options(registry, object, &DumpOptions::default())
}

/// Dump a registered object as a tagged YAML document.
///
/// The object's exact runtime type must have an encode hook in the
/// registry, or the dump fails with [`Error::NoRepresenter`].
#[cfg(feature = "serialize")]
pub fn dump_str_with_options<T: AnyObject>(
    registry: &TagRegistry,
    object: &T,
    options: &DumpOptions,
) -> Result<String, Error> {
    let value = Value::Object(Object::from_boxed(object.dyn_clone()));
    dump_value_str_with_options(registry, &value, options)
}

/// Dump a [`Value`] tree as a YAML document, default options.
#[cfg(feature = "serialize")]
pub fn dump_value_str(registry: &TagRegistry, value: &Value) -> Result<String, Error> {
    dump_value_str_with_options(registry, value, &DumpOptions::default())
}

/// Dump a [`Value`] tree as a YAML document.
#[cfg(feature = "serialize")]
pub fn dump_value_str_with_options(
    registry: &TagRegistry,
    value: &Value,
    options: &DumpOptions,
) -> Result<String, Error> {
    emit::emit_document(registry, value, options)
}

/// Dump a [`Value`] tree into a writer.
#[cfg(feature = "serialize")]
pub fn dump_to_writer<W: Write>(
    registry: &TagRegistry,
    writer: W,
    value: &Value,
) -> Result<(), Error> {
    dump_to_writer_with_options(registry, writer, value, &DumpOptions::default())
}

#[cfg(feature = "serialize")]
pub fn dump_to_writer_with_options<W: Write>(
    registry: &TagRegistry,
    mut writer: W,
    value: &Value,
    options: &DumpOptions,
) -> Result<(), Error> {
    let out = dump_value_str_with_options(registry, value, options)?;
    writer.write_all(out.as_bytes())?;
    Ok(())
}

/// Dump a [`Value`] tree into a file.
#[cfg(feature = "serialize")]
pub fn dump_to_path<P: AsRef<Path>>(
    registry: &TagRegistry,
    path: P,
    value: &Value,
) -> Result<(), Error> {
    dump_to_path_with_options(registry, path, value, &DumpOptions::default())
}

#[cfg(feature = "serialize")]
pub fn dump_to_path_with_options<P: AsRef<Path>>(
    registry: &TagRegistry,
    path: P,
    value: &Value,
    options: &DumpOptions,
) -> Result<(), Error> {
    let out = dump_value_str_with_options(registry, value, options)?;
    std::fs::write(path, out)?;
    Ok(())
}
