//! The DOM parser
//!
//! Builds [JsonNode] trees from a [TokenStream]. Variant selection uses a single token of
//! lookahead, so a parse never needs to backtrack: `{` starts an object, `[` an array, a quoted
//! string a string, and unquoted values are classified as booleans, nulls or numbers.
//!
//! Containers are parsed recursively, so nesting is capped at [MAX_NESTING_DEPTH]. Anything
//! deeper fails with a located [ErrorKind::Parse] error instead of exhausting the stack.
use crate::errors::{ErrorKind, JsonError, JsonOutcome, END_OF_INPUT};
use crate::lexer::{Token, TokenStream};
use crate::location::Location;
use crate::nodes::{
    JsonArrayNode, JsonBooleanNode, JsonNode, JsonNullNode, JsonNumber, JsonNumberNode,
    JsonObjectNode, JsonStringNode, NodeKind,
};
use crate::parser_error;

/// The maximum number of objects and arrays that may be nested within each other
pub const MAX_NESTING_DEPTH: usize = 128;

/// Work out which variant of node a token introduces, [None] if it can't start a node
fn lookahead_kind(token: &Token) -> Option<NodeKind> {
    match token {
        Token::StartObject => Some(NodeKind::Object),
        Token::StartArray => Some(NodeKind::Array),
        Token::Str(_) => Some(NodeKind::String),
        Token::Value(v) if v == "true" || v == "false" => Some(NodeKind::Boolean),
        Token::Value(v) if v == "null" => Some(NodeKind::Null),
        Token::Value(v) => JsonNumber::parse(v).map(|_| NodeKind::Number),
        _ => None,
    }
}

/// Report the next token (or the end of input) as not being what was expected
fn unexpected<T>(tokens: &TokenStream, expected: &str, location: &Location) -> JsonOutcome<T> {
    match tokens.peek() {
        Some((token, _)) => parser_error!(expected, token, tokens.position(), location),
        None => parser_error!(expected, END_OF_INPUT, tokens.position(), location),
    }
}

/// Consume the next token, which must be equal to `expected`
fn expect(tokens: &mut TokenStream, expected: Token, location: &Location) -> JsonOutcome<()> {
    match tokens.next_if(|t| *t == expected) {
        Some(_) => Ok(()),
        None => unexpected(tokens, &format!("'{}'", expected), location),
    }
}

/// Check that the next token starts a node of the `expected` variant. A token which starts a
/// node of some other variant is reported as a type mismatch.
fn expect_kind(tokens: &TokenStream, expected: NodeKind, location: &Location) -> JsonOutcome<()> {
    match tokens.peek().and_then(|(t, _)| lookahead_kind(t)) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(JsonError::type_mismatch(expected, kind, location.clone())),
        None => unexpected(tokens, &format!("a {}", expected), location),
    }
}

/// Check that a container starting at `location` doesn't nest too deeply
fn check_depth(tokens: &TokenStream, location: &Location) -> JsonOutcome<()> {
    if location.depth() < MAX_NESTING_DEPTH {
        return Ok(());
    }
    Err(JsonError::new(
        ErrorKind::Parse,
        location.clone(),
        format!(
            "at position {}: maximum nesting depth of {} exceeded",
            tokens.position(),
            MAX_NESTING_DEPTH
        ),
    ))
}

/// Parse a node of whichever variant the next token introduces
pub(crate) fn parse_any(tokens: &mut TokenStream, location: Location) -> JsonOutcome<JsonNode> {
    match tokens.peek().and_then(|(t, _)| lookahead_kind(t)) {
        Some(NodeKind::Object) => parse_object(tokens, location).map(JsonNode::Object),
        Some(NodeKind::Array) => parse_array(tokens, location).map(JsonNode::Array),
        Some(NodeKind::String) => parse_string(tokens, location).map(JsonNode::String),
        Some(NodeKind::Number) => parse_number(tokens, location).map(JsonNode::Number),
        Some(NodeKind::Boolean) => parse_boolean(tokens, location).map(JsonNode::Boolean),
        Some(NodeKind::Null) => parse_null(tokens, location).map(JsonNode::Null),
        None => unexpected(tokens, "a json value", &location),
    }
}

/// An object is just a list of comma separated KV pairs
pub(crate) fn parse_object(
    tokens: &mut TokenStream,
    location: Location,
) -> JsonOutcome<JsonObjectNode> {
    expect_kind(tokens, NodeKind::Object, &location)?;
    check_depth(tokens, &location)?;
    expect(tokens, Token::StartObject, &location)?;
    let mut fields = vec![];
    if tokens.next_if(|t| *t == Token::EndObject).is_some() {
        return Ok(JsonObjectNode::new(location, fields));
    }
    loop {
        let key = match tokens.next_if(|t| matches!(t, Token::Str(_))) {
            Some((Token::Str(key), _)) => key,
            _ => return unexpected(tokens, "a field name", &location),
        };
        expect(tokens, Token::Colon, &location)?;
        let value = parse_any(tokens, location.field(key.as_str()))?;
        fields.push((key, value));
        if tokens.next_if(|t| *t == Token::Comma).is_some() {
            continue;
        }
        if tokens.next_if(|t| *t == Token::EndObject).is_some() {
            return Ok(JsonObjectNode::new(location, fields));
        }
        return unexpected(tokens, "',' or '}'", &location);
    }
}

/// An array is just a list of comma separated values
pub(crate) fn parse_array(
    tokens: &mut TokenStream,
    location: Location,
) -> JsonOutcome<JsonArrayNode> {
    expect_kind(tokens, NodeKind::Array, &location)?;
    check_depth(tokens, &location)?;
    expect(tokens, Token::StartArray, &location)?;
    let mut elements = vec![];
    if tokens.next_if(|t| *t == Token::EndArray).is_some() {
        return Ok(JsonArrayNode::new(location, elements));
    }
    loop {
        elements.push(parse_any(tokens, location.index(elements.len()))?);
        if tokens.next_if(|t| *t == Token::Comma).is_some() {
            continue;
        }
        if tokens.next_if(|t| *t == Token::EndArray).is_some() {
            return Ok(JsonArrayNode::new(location, elements));
        }
        return unexpected(tokens, "',' or ']'", &location);
    }
}

pub(crate) fn parse_string(
    tokens: &mut TokenStream,
    location: Location,
) -> JsonOutcome<JsonStringNode> {
    expect_kind(tokens, NodeKind::String, &location)?;
    match tokens.next() {
        Some((Token::Str(value), _)) => Ok(JsonStringNode::new(location, value)),
        _ => unexpected(tokens, "a string", &location),
    }
}

pub(crate) fn parse_number(
    tokens: &mut TokenStream,
    location: Location,
) -> JsonOutcome<JsonNumberNode> {
    expect_kind(tokens, NodeKind::Number, &location)?;
    match tokens.next() {
        Some((Token::Value(literal), _)) => match JsonNumber::parse(&literal) {
            Some(value) => Ok(JsonNumberNode::new(location, value)),
            None => unexpected(tokens, "a number", &location),
        },
        _ => unexpected(tokens, "a number", &location),
    }
}

pub(crate) fn parse_boolean(
    tokens: &mut TokenStream,
    location: Location,
) -> JsonOutcome<JsonBooleanNode> {
    expect_kind(tokens, NodeKind::Boolean, &location)?;
    match tokens.next() {
        Some((Token::Value(literal), _)) => {
            Ok(JsonBooleanNode::new(location, literal == "true"))
        }
        _ => unexpected(tokens, "a boolean", &location),
    }
}

pub(crate) fn parse_null(
    tokens: &mut TokenStream,
    location: Location,
) -> JsonOutcome<JsonNullNode> {
    expect_kind(tokens, NodeKind::Null, &location)?;
    match tokens.next() {
        Some((Token::Value(_), _)) => Ok(JsonNullNode::new(location)),
        _ => unexpected(tokens, "null", &location),
    }
}
