//! General error and outcome types shared by the lexer, the node parsers and every codec
use std::fmt::Display;

use thiserror::Error;

use crate::location::Location;
use crate::nodes::NodeKind;

/// Global outcome type used throughout every conversion stage. Sequencing is done with `?`,
/// [Result::map] and [Result::and_then]: the first failure wins and later steps never run.
pub type JsonOutcome<T> = Result<T, JsonError>;

/// Text used in error reasons when a token was expected but the input had run out
pub const END_OF_INPUT: &str = "end of input";

/// Enumeration of the different classes of failure a conversion can produce
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input that could not be split into tokens
    Lexical,
    /// A token sequence that doesn't form the expected node
    Parse,
    /// A node of one variant was found where another was expected
    TypeMismatch,
    /// The shape matches, but the content isn't valid for the target type
    Decode,
    /// A complete top-level value followed by unconsumed tokens
    TrailingData,
}

/// The general error structure. Created once at the failure site and never altered afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error on <{location}> {reason}")]
pub struct JsonError {
    location: Location,
    reason: String,
    kind: ErrorKind,
}

impl JsonError {
    /// Create a new error of a given [ErrorKind]
    pub fn new(kind: ErrorKind, location: Location, reason: impl Into<String>) -> Self {
        JsonError {
            location,
            reason: reason.into(),
            kind,
        }
    }

    /// A content failure raised by a codec whilst decoding a node of the right shape
    pub fn decoding(location: Location, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, location, reason)
    }

    /// A failure raised when a node is of a different variant to the one expected
    pub fn type_mismatch(expected: NodeKind, found: NodeKind, location: Location) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            location,
            format!("expected a {} but found a {}", expected, found),
        )
    }

    /// A failure to recognise the expected token at a given position within the input
    pub fn parsing(
        expected: impl Display,
        found: impl Display,
        position: usize,
        location: Location,
    ) -> Self {
        Self::new(
            ErrorKind::Parse,
            location,
            format!(
                "at position {}: expected {} but found '{}'",
                position, expected, found
            ),
        )
    }

    /// A failure to split the raw input into tokens. Always reported against the root.
    pub fn lexing(position: usize, reason: impl Display) -> Self {
        Self::new(
            ErrorKind::Lexical,
            Location::root(),
            format!("at position {}: {}", position, reason),
        )
    }

    /// Input left over after the top-level value. Always reported against the root.
    pub fn trailing(found: impl Display, position: usize) -> Self {
        Self::new(
            ErrorKind::TrailingData,
            Location::root(),
            format!("at position {}: expected EOF but found '{}'", position, found),
        )
    }

    /// Where in the document the failure occurred
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Human readable reason for the failure
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The class of failure
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[macro_export]
macro_rules! lexer_error {
    ($position: expr, $reason: expr) => {
        Err($crate::errors::JsonError::lexing($position, $reason))
    };
}

#[macro_export]
macro_rules! parser_error {
    ($expected: expr, $found: expr, $position: expr, $location: expr) => {
        Err($crate::errors::JsonError::parsing(
            $expected,
            $found,
            $position,
            $location.clone(),
        ))
    };
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, JsonError};
    use crate::location::Location;
    use crate::nodes::NodeKind;

    #[test]
    fn errors_should_display_location_then_reason() {
        let err = JsonError::decoding(Location::root().field("age"), "must be positive");
        assert_eq!(err.to_string(), "error on <$.age> must be positive");
    }

    #[test]
    fn type_mismatches_should_name_both_kinds() {
        let err = JsonError::type_mismatch(NodeKind::Object, NodeKind::Array, Location::root());
        assert_eq!(err.reason(), "expected a object but found a array");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.location().is_root());
    }

    #[test]
    fn trailing_errors_should_reference_the_excess_token() {
        let err = JsonError::trailing("garbage", 4);
        assert_eq!(
            err.to_string(),
            "error on <$> at position 4: expected EOF but found 'garbage'"
        );
        assert_eq!(err.kind(), ErrorKind::TrailingData);
    }
}
