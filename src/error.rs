//! Error type and source locations shared by the whole crate.

use std::fmt;

/// Row/column location within the source YAML document (1-indexed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// 1-indexed row number in the input stream.
    pub(crate) row: u32,
    /// 1-indexed column number in the input stream.
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    ///
    /// Used when a precise position is not yet available at error creation time.
    pub const UNKNOWN: Self = Self { row: 0, column: 0 };

    /// Create a new location record from 1-indexed coordinates.
    #[cfg(feature = "deserialize")]
    pub(crate) const fn new(row: usize, column: usize) -> Self {
        // 4 Gb is larger than any YAML document we expect, and this is
        // error reporting only.
        Self {
            row: row as u32,
            column: column as u32,
        }
    }

    /// 1-indexed line.
    pub fn line(&self) -> u64 {
        self.row as u64
    }

    /// 1-indexed column.
    pub fn column(&self) -> u64 {
        self.column as u64
    }
}

#[cfg(feature = "deserialize")]
/// Convert a `saphyr_parser::Span` to a 1-indexed `Location`.
pub(crate) fn location_from_span(span: &saphyr_parser::Span) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1)
}

/// Shape of a decoded YAML node, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
    Mapping,
    Sequence,
    Scalar,
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeShape::Mapping => write!(f, "mapping"),
            NodeShape::Sequence => write!(f, "sequence"),
            NodeShape::Scalar => write!(f, "scalar"),
        }
    }
}

/// One attempted decode candidate, recorded for the no-handler diagnostic.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Rust type name (self-describing type) or codec name.
    pub name: String,
    /// Error raised by the candidate's tag check, if any.
    pub error: Option<String>,
}

/// Error type for every fallible operation of this crate.
#[derive(Debug)]
pub enum Error {
    /// Free-form error with optional source location.
    Message { msg: String, location: Location },
    /// Unexpected end of input.
    Eof { location: Location },
    /// Alias references a non-existent anchor id.
    UnknownAnchor { id: usize, location: Location },
    /// A pre-decode budget limit was exceeded.
    #[cfg(feature = "deserialize")]
    Budget {
        breach: crate::budget::BudgetBreach,
        location: Location,
    },
    /// Unexpected I/O error while reading or writing a stream or file.
    Io { cause: std::io::Error },

    /// A tag suffix or codec prefix is malformed at registration time.
    Declaration { msg: String },
    /// A type requires a tag suffix but never declared one.
    UnclaimedTag { type_name: String },
    /// Two types claim the same tag suffix.
    DuplicateTag {
        suffix: String,
        existing: String,
        offered: String,
    },
    /// Decode met a tag under a registered prefix, but no handler matched.
    NoHandler {
        tag: String,
        candidates: Vec<Candidate>,
    },
    /// Encode met an instance whose type has no registered handler.
    NoRepresenter { type_name: String },
    /// A codec's representation function returned an unsupported suffix.
    MalformedCodecOutput { codec: String, detail: String },
    /// A handler received a node shape it never implemented.
    UnsupportedShape { shape: NodeShape, handler: String },
    /// `load_as` decoded a value of an unexpected type.
    ResultTypeMismatch {
        expected: &'static str,
        actual: String,
    },
    /// A tag outside every registered namespace, rejected in safe mode.
    UnknownTag { tag: String, location: Location },
    /// Inconsistent formatting options (e.g. zero indent step).
    InvalidOptions { msg: String },
}

impl Error {
    /// Construct a `Message` error with no known location.
    pub(crate) fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message {
            msg: s.into(),
            location: Location::UNKNOWN,
        }
    }

    /// Construct an unexpected end-of-input error with unknown location.
    #[cfg(feature = "deserialize")]
    pub(crate) fn eof() -> Self {
        Error::Eof {
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn declaration<S: Into<String>>(msg: S) -> Self {
        Error::Declaration { msg: msg.into() }
    }

    pub(crate) fn unclaimed_tag(type_name: &str) -> Self {
        Error::UnclaimedTag {
            type_name: type_name.to_owned(),
        }
    }

    pub(crate) fn unsupported_shape(shape: NodeShape, handler: &str) -> Self {
        Error::UnsupportedShape {
            shape,
            handler: handler.to_owned(),
        }
    }

    /// Attach/override a concrete location to this error and return it.
    #[cfg(feature = "deserialize")]
    pub(crate) fn with_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::Message { location, .. }
            | Error::Eof { location }
            | Error::UnknownAnchor { location, .. }
            | Error::Budget { location, .. }
            | Error::UnknownTag { location, .. } => {
                *location = set_location;
            }
            _ => {}
        }
        self
    }

    /// If the error has a known location, return it.
    pub fn location(&self) -> Option<Location> {
        let location = match self {
            Error::Message { location, .. }
            | Error::Eof { location }
            | Error::UnknownAnchor { location, .. }
            | Error::UnknownTag { location, .. } => location,
            #[cfg(feature = "deserialize")]
            Error::Budget { location, .. } => location,
            _ => return None,
        };
        if location != &Location::UNKNOWN {
            Some(*location)
        } else {
            None
        }
    }

    /// Map a `saphyr_parser::ScanError` into our error type with location.
    #[cfg(feature = "deserialize")]
    pub(crate) fn from_scan_error(err: saphyr_parser::ScanError) -> Self {
        let mark = err.marker();
        let location = Location::new(mark.line(), mark.col() + 1);
        Error::Message {
            msg: err.info().to_owned(),
            location,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Message { msg, location } => fmt_with_location(f, msg, location),
            Error::Eof { location } => fmt_with_location(f, "unexpected end of input", location),
            Error::UnknownAnchor { id, location } => fmt_with_location(
                f,
                &format!("alias references unknown anchor id {id}"),
                location,
            ),
            #[cfg(feature = "deserialize")]
            Error::Budget { breach, location } => {
                fmt_with_location(f, &format!("YAML budget breached: {breach:?}"), location)
            }
            Error::Io { cause } => write!(f, "IO error: {cause}"),
            Error::Declaration { msg } => write!(f, "invalid tag declaration: {msg}"),
            Error::UnclaimedTag { type_name } => write!(
                f,
                "type `{type_name}` has no tag suffix; declare one with tag_info! \
                 or implement tag_suffix()"
            ),
            Error::DuplicateTag {
                suffix,
                existing,
                offered,
            } => write!(
                f,
                "tag suffix `{suffix}` is already registered for `{existing}` \
                 and cannot be claimed by `{offered}`"
            ),
            Error::NoHandler { tag, candidates } => {
                write!(f, "No tag handler found able to decode `{tag}`.")?;
                if candidates.is_empty() {
                    write!(f, " The registry is empty.")?;
                } else {
                    write!(f, " Tried candidates: [")?;
                    for (i, c) in candidates.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", c.name)?;
                    }
                    write!(f, "].")?;
                    let errors: Vec<&Candidate> =
                        candidates.iter().filter(|c| c.error.is_some()).collect();
                    if !errors.is_empty() {
                        write!(f, " Caught errors: [")?;
                        for (i, c) in errors.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}: {}", c.name, c.error.as_deref().unwrap_or(""))?;
                        }
                        write!(f, "].")?;
                    }
                }
                Ok(())
            }
            Error::NoRepresenter { type_name } => write!(
                f,
                "no representer registered for type `{type_name}`; register it \
                 or a codec listing it among known types"
            ),
            Error::MalformedCodecOutput { codec, detail } => {
                write!(
                    f,
                    "codec `{codec}` produced a malformed representation: {detail}"
                )
            }
            Error::UnsupportedShape { shape, handler } => write!(
                f,
                "loading from a {shape} node is not supported by `{handler}`; \
                 override from_yaml_{} to support this feature",
                match shape {
                    NodeShape::Mapping => "mapping",
                    NodeShape::Sequence => "sequence",
                    NodeShape::Scalar => "scalar",
                }
            ),
            Error::ResultTypeMismatch { expected, actual } => write!(
                f,
                "decoded value is not an instance of `{expected}`, but {actual}; \
                 make sure the document starts with the tag declared for the type"
            ),
            Error::UnknownTag { tag, location } => fmt_with_location(
                f,
                &format!("tag `{tag}` matches no registered namespace (safe mode)"),
                location,
            ),
            Error::InvalidOptions { msg } => write!(f, "invalid options: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(cause: std::io::Error) -> Self {
        Error::Io { cause }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::msg(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::msg(msg.to_string())
    }
}

/// Print a message optionally suffixed with "at line X, column Y".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location != &Location::UNKNOWN {
        write!(
            f,
            "{msg} at line {}, column {}",
            location.row, location.column
        )
    } else {
        write!(f, "{msg}")
    }
}
