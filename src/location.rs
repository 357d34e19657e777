//! Breadcrumbs identifying a node (or a failure) within a JSON document.
//!
//! A [Location] displays as a path rooted at `$`, e.g. `$`, `$.name`, `$.items[2].id`, and can
//! also be serialised as an RFC 6901 JSON pointer via [Location::as_pointer].
use std::fmt::{Display, Formatter};

/// As per RFC 6901, each pointer is a series of segments delineated by a separator char
const POINTER_SEPARATOR: char = '/';
/// As per RFC 6901, we need to encode any tilde characters as ~0
const ENCODED_TILDE: &str = "~0";
/// As per RFC 6901, we need to encode any slash characters as ~1
const ENCODED_SLASH: &str = "~1";

/// A single step down into a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationSegment {
    /// A named field within an object
    Field(String),
    /// An indexed element within an array
    Index(usize),
}

impl LocationSegment {
    /// Field names which can be written after a `.` without any quoting
    fn is_plain_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    }
}

impl Display for LocationSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(name) if Self::is_plain_name(name) => write!(f, ".{}", name),
            Self::Field(name) => write!(f, "[{:?}]", name),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// An immutable path from the document root to a node. Deriving a child location never alters
/// the parent, so locations may be freely cloned and shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    segments: Vec<LocationSegment>,
}

impl Location {
    /// The location of the top-level value
    pub fn root() -> Self {
        Location::default()
    }

    /// Checks whether this is the root location
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The number of steps between the root and this location
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The segments making up the path, outermost first
    pub fn segments(&self) -> &[LocationSegment] {
        &self.segments
    }

    /// The location of a named field beneath this one
    pub fn field(&self, name: impl Into<String>) -> Location {
        self.child(LocationSegment::Field(name.into()))
    }

    /// The location of an array element beneath this one
    pub fn index(&self, index: usize) -> Location {
        self.child(LocationSegment::Index(index))
    }

    /// The enclosing location, [None] for the root
    pub fn parent(&self) -> Option<Location> {
        match self.segments.split_last() {
            Some((_, rest)) => Some(Location {
                segments: rest.to_vec(),
            }),
            None => None,
        }
    }

    fn child(&self, segment: LocationSegment) -> Location {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Location { segments }
    }

    /// Serialise the location into a JSON pointer that's compliant with RFC 6901. The root
    /// location is the empty pointer.
    pub fn as_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push(POINTER_SEPARATOR);
            match segment {
                LocationSegment::Field(name) => pointer.push_str(
                    &name
                        .replace('~', ENCODED_TILDE)
                        .replace(POINTER_SEPARATOR, ENCODED_SLASH),
                ),
                LocationSegment::Index(i) => pointer.push_str(&i.to_string()),
            }
        }
        pointer
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
