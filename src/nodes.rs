//! The JSON document model. Every node belongs to exactly one of six variants, and knows the
//! [Location] at which it sits within its document.
//!
//! Each variant struct implements [NodeVariant], which is what a codec names as the shape it
//! expects. The closed [JsonNode] enum is what a parse produces when the shape isn't known in
//! advance.
use std::fmt::{Display, Formatter};

use crate::adjunction::JsonConverter;
use crate::dom;
use crate::errors::{JsonError, JsonOutcome};
use crate::lexer::TokenStream;
use crate::location::Location;
use crate::render::{RenderStyle, Renderer};

/// Enumeration of the different JSON node variants
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    /// Human readable description of the shape, used in error reasons
    pub fn description(&self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Numeric values are held either as integers or as floats, depending on the literal they were
/// parsed from
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum JsonNumber {
    /// Integer numeric value
    Integer(i64),
    /// Floating point numeric value
    Float(f64),
}

impl JsonNumber {
    /// Parse a JSON number literal. Anything not matching the RFC 8259 number grammar (leading
    /// zeros, a leading `+`, `NaN`, hex etc...) is rejected before conversion is attempted.
    pub fn parse(literal: &str) -> Option<JsonNumber> {
        if !is_json_number(literal) {
            return None;
        }
        #[cfg(feature = "mixed_numerics")]
        {
            let integral = !literal.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
            if integral {
                if let Ok(value) = lexical::parse::<i64, _>(literal) {
                    return Some(JsonNumber::Integer(value));
                }
            }
        }
        fast_float::parse::<f64, _>(literal)
            .ok()
            .map(JsonNumber::Float)
    }

    /// The value as a float, integers may lose precision
    pub fn as_f64(&self) -> f64 {
        match *self {
            JsonNumber::Integer(i) => i as f64,
            JsonNumber::Float(f) => f,
        }
    }

    /// The value as an integer, [None] for floats with a fractional part or outside the range
    /// of `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            JsonNumber::Integer(i) => Some(i),
            JsonNumber::Float(f)
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                Some(f as i64)
            }
            JsonNumber::Float(_) => None,
        }
    }
}

impl Display for JsonNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonNumber::Integer(i) => write!(f, "{}", i),
            JsonNumber::Float(x) if !x.is_finite() => write!(f, "null"),
            JsonNumber::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Check a literal against the JSON number grammar:
/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
fn is_json_number(literal: &str) -> bool {
    let bytes = literal.as_bytes();
    let mut i = 0;
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = digits_from(i + 1),
        _ => return false,
    }
    if bytes.get(i) == Some(&b'.') {
        let end = digits_from(i + 1);
        if end == i + 1 {
            return false;
        }
        i = end;
    }
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let end = digits_from(i);
        if end == i {
            return false;
        }
        i = end;
    }
    i == bytes.len()
}

/// A node-variant descriptor: identifies one JSON shape, knows how to parse that shape from a
/// [TokenStream], and how to safely pick it out of a [JsonNode]
pub trait NodeVariant: Sized {
    /// The variant this type represents
    const KIND: NodeKind;

    /// Parse a node of this variant starting at the next token. Parsing isn't speculative:
    /// either the complete span of tokens belonging to the node is consumed, or a failure is
    /// returned with the stream left where the failure was detected.
    fn parse(tokens: &mut TokenStream, location: Location) -> JsonOutcome<Self>;

    /// Borrow the node as this variant, [None] if it's a different variant
    fn from_node(node: &JsonNode) -> Option<&Self>;

    /// Wrap this variant back up into a [JsonNode]
    fn into_node(self) -> JsonNode;

    /// Where this node sits within its document
    fn location(&self) -> &Location;

    /// Render the node to text in the given style
    fn render_with(&self, style: RenderStyle) -> String;

    /// Render the node to compact text
    fn render(&self) -> String {
        self.render_with(RenderStyle::Compact)
    }
}

/// A JSON object. Field order is preserved, as are duplicate names.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonObjectNode {
    location: Location,
    fields: Vec<(String, JsonNode)>,
}

impl JsonObjectNode {
    pub fn new(location: Location, fields: Vec<(String, JsonNode)>) -> Self {
        JsonObjectNode { location, fields }
    }

    /// Start building an object at a given location
    pub fn builder(location: Location) -> ObjectNodeBuilder {
        ObjectNodeBuilder {
            location,
            fields: vec![],
        }
    }

    /// All the fields, in document order
    pub fn fields(&self) -> &[(String, JsonNode)] {
        &self.fields
    }

    /// Look up the first field with the given name
    pub fn get(&self, name: &str) -> Option<&JsonNode> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Decode a mandatory field with a given codec. A missing field is reported against the
    /// location the field should have been found at.
    pub fn field<T, C>(&self, name: &str, codec: &C) -> JsonOutcome<T>
    where
        C: JsonConverter<T> + ?Sized,
    {
        match self.get(name) {
            Some(node) => codec.decode_from_any(node),
            None => Err(JsonError::decoding(
                self.location.field(name),
                "missing mandatory field",
            )),
        }
    }

    /// Decode an optional field with a given codec. Both a missing field and an explicit
    /// `null` decode to [None].
    pub fn optional_field<T, C>(&self, name: &str, codec: &C) -> JsonOutcome<Option<T>>
    where
        C: JsonConverter<T> + ?Sized,
    {
        match self.get(name) {
            None | Some(JsonNode::Null(_)) => Ok(None),
            Some(node) => codec.decode_from_any(node).map(Some),
        }
    }
}

/// Builder used by object codecs to encode fields, each beneath the object's own location
#[derive(Debug)]
pub struct ObjectNodeBuilder {
    location: Location,
    fields: Vec<(String, JsonNode)>,
}

impl ObjectNodeBuilder {
    /// Encode a field with a given codec
    pub fn field<T, C>(mut self, name: &str, codec: &C, value: &T) -> Self
    where
        C: JsonConverter<T> + ?Sized,
    {
        let node = codec.encode_to_any(value, self.location.field(name));
        self.fields.push((name.to_string(), node));
        self
    }

    /// Encode an optional field, which is omitted entirely when [None]
    pub fn optional_field<T, C>(self, name: &str, codec: &C, value: &Option<T>) -> Self
    where
        C: JsonConverter<T> + ?Sized,
    {
        match value {
            Some(value) => self.field(name, codec, value),
            None => self,
        }
    }

    pub fn build(self) -> JsonObjectNode {
        JsonObjectNode::new(self.location, self.fields)
    }
}

/// A JSON array
#[derive(Debug, Clone, PartialEq)]
pub struct JsonArrayNode {
    location: Location,
    elements: Vec<JsonNode>,
}

impl JsonArrayNode {
    pub fn new(location: Location, elements: Vec<JsonNode>) -> Self {
        JsonArrayNode { location, elements }
    }

    pub fn elements(&self) -> &[JsonNode] {
        &self.elements
    }
}

/// A JSON string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStringNode {
    location: Location,
    value: String,
}

impl JsonStringNode {
    pub fn new(location: Location, value: impl Into<String>) -> Self {
        JsonStringNode {
            location,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A JSON number
#[derive(Debug, Clone, PartialEq)]
pub struct JsonNumberNode {
    location: Location,
    value: JsonNumber,
}

impl JsonNumberNode {
    pub fn new(location: Location, value: JsonNumber) -> Self {
        JsonNumberNode { location, value }
    }

    pub fn value(&self) -> JsonNumber {
        self.value
    }
}

/// A JSON boolean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBooleanNode {
    location: Location,
    value: bool,
}

impl JsonBooleanNode {
    pub fn new(location: Location, value: bool) -> Self {
        JsonBooleanNode { location, value }
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

/// A JSON null
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonNullNode {
    location: Location,
}

impl JsonNullNode {
    pub fn new(location: Location) -> Self {
        JsonNullNode { location }
    }
}

/// Basic enumeration of the different JSON nodes
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    Object(JsonObjectNode),
    Array(JsonArrayNode),
    String(JsonStringNode),
    Number(JsonNumberNode),
    Boolean(JsonBooleanNode),
    Null(JsonNullNode),
}

impl JsonNode {
    /// Parse a node of whichever variant the next token introduces
    pub fn parse_any(tokens: &mut TokenStream, location: Location) -> JsonOutcome<JsonNode> {
        dom::parse_any(tokens, location)
    }

    /// The runtime variant of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            JsonNode::Object(_) => NodeKind::Object,
            JsonNode::Array(_) => NodeKind::Array,
            JsonNode::String(_) => NodeKind::String,
            JsonNode::Number(_) => NodeKind::Number,
            JsonNode::Boolean(_) => NodeKind::Boolean,
            JsonNode::Null(_) => NodeKind::Null,
        }
    }

    /// Where this node sits within its document
    pub fn location(&self) -> &Location {
        match self {
            JsonNode::Object(n) => &n.location,
            JsonNode::Array(n) => &n.location,
            JsonNode::String(n) => &n.location,
            JsonNode::Number(n) => &n.location,
            JsonNode::Boolean(n) => &n.location,
            JsonNode::Null(n) => &n.location,
        }
    }

    pub fn render_with(&self, style: RenderStyle) -> String {
        let mut renderer = Renderer::new(style);
        renderer.node(self, 0);
        renderer.finish()
    }

    pub fn render(&self) -> String {
        self.render_with(RenderStyle::Compact)
    }
}

impl Display for JsonNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

macro_rules! node_variant {
    ($node: ident, $variant: ident, $parse: path, $render: ident) => {
        impl NodeVariant for $node {
            const KIND: NodeKind = NodeKind::$variant;

            fn parse(tokens: &mut TokenStream, location: Location) -> JsonOutcome<Self> {
                $parse(tokens, location)
            }

            fn from_node(node: &JsonNode) -> Option<&Self> {
                match node {
                    JsonNode::$variant(n) => Some(n),
                    _ => None,
                }
            }

            fn into_node(self) -> JsonNode {
                JsonNode::$variant(self)
            }

            fn location(&self) -> &Location {
                &self.location
            }

            fn render_with(&self, style: RenderStyle) -> String {
                let mut renderer = Renderer::new(style);
                renderer.$render(self, 0);
                renderer.finish()
            }
        }
    };
}

node_variant!(JsonObjectNode, Object, dom::parse_object, object);
node_variant!(JsonArrayNode, Array, dom::parse_array, array);
node_variant!(JsonStringNode, String, dom::parse_string, string_node);
node_variant!(JsonNumberNode, Number, dom::parse_number, number_node);
node_variant!(JsonBooleanNode, Boolean, dom::parse_boolean, boolean_node);
node_variant!(JsonNullNode, Null, dom::parse_null, null_node);
