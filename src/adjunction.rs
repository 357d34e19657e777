//! The conversion contract between Rust values and JSON.
//!
//! A parser/renderer pair forms an adjunction. The laws hold over successful conversions only,
//! since nothing can be rendered back from a failure:
//!
//! ```text
//! render . parse . render = render
//! parse . render . parse  = parse
//! ```
//!
//! where `f . g` means `x -> g(f(x))`, `render: T -> JSON` and `parse: JSON -> JsonOutcome<T>`,
//! JSON being either the text or the [JsonNode].
//!
//! Codec authors implement [JsonAdjunction], naming the node variant they expect. Everything
//! else (variant checking, whole document parsing and rendering, type erasure) comes from the
//! blanket [JsonConverter] implementation.
use std::io::BufRead;

use tracing::debug;

use crate::decoders::Encoding;
use crate::errors::{JsonError, JsonOutcome};
use crate::lexer::{tokenize, tokenize_reader, TokenStream};
use crate::location::Location;
use crate::nodes::{JsonNode, NodeKind, NodeVariant};
use crate::render::RenderStyle;

/// A codec between values of type `T` and a single JSON node variant.
///
/// Implementations are expected to be stateless (or immutable), so that one instance can be
/// shared between any number of conversions, including concurrent ones.
pub trait JsonAdjunction<T> {
    /// The node variant this codec reads and writes
    type Node: NodeVariant;

    /// The descriptor of the expected variant
    fn node_kind(&self) -> NodeKind {
        <Self::Node as NodeVariant>::KIND
    }

    /// Check the runtime variant of `node`, borrowing it as the expected variant on success.
    /// On a mismatch the failure is located at the node itself.
    fn safe_cast<'n>(&self, node: &'n JsonNode) -> JsonOutcome<&'n Self::Node> {
        match Self::Node::from_node(node) {
            Some(n) => Ok(n),
            None => Err(JsonError::type_mismatch(
                self.node_kind(),
                node.kind(),
                node.location().clone(),
            )),
        }
    }

    /// Decode a node of the expected variant. Must return a failure (never panic) for any
    /// content which isn't valid for `T`.
    fn decode(&self, node: &Self::Node) -> JsonOutcome<T>;

    /// Encode a value as a node at the given location. Encoding is total: any value which
    /// can't be represented must be ruled out before it gets here.
    fn encode(&self, value: &T, location: Location) -> Self::Node;
}

/// The variant-erased view of a codec. Implemented for every [JsonAdjunction], and object safe
/// so that converters for the same `T` but different node variants can be stored together as
/// [JConverter]s.
pub trait JsonConverter<T> {
    /// Decode any node, failing with a type mismatch before any decoding takes place if the node
    /// isn't of the expected variant
    fn decode_from_any(&self, node: &JsonNode) -> JsonOutcome<T>;

    /// Encode a value, wrapping the result up as a [JsonNode]
    fn encode_to_any(&self, value: &T, location: Location) -> JsonNode;

    /// Parse the expected node variant from the root of a token stream, and decode it. Tokens
    /// following the node are left in the stream.
    fn parse_from_root(&self, tokens: &mut TokenStream) -> JsonOutcome<T>;

    /// Render a value as compact JSON text
    fn to_json(&self, value: &T) -> String {
        self.to_json_with(value, RenderStyle::Compact)
    }

    /// Render a value as JSON text in a given style
    fn to_json_with(&self, value: &T, style: RenderStyle) -> String {
        self.encode_to_any(value, Location::root())
            .render_with(style)
    }

    /// Decode a complete token stream. Any tokens left over after the top-level value are
    /// reported as a failure.
    fn from_tokens(&self, mut tokens: TokenStream) -> JsonOutcome<T> {
        let value = self.parse_from_root(&mut tokens)?;
        match tokens.peek() {
            Some((token, _)) => Err(JsonError::trailing(token, tokens.position())),
            None => Ok(value),
        }
    }

    /// Decode a complete JSON document
    fn from_json(&self, text: &str) -> JsonOutcome<T> {
        tokenize(text)
            .and_then(|tokens| self.from_tokens(tokens))
            .map_err(|err| {
                debug!(%err, "json conversion failed");
                err
            })
    }

    /// Decode a complete JSON document read from `reader`, using the given [Encoding]
    fn from_json_reader<Buffer: BufRead>(
        &self,
        reader: &mut Buffer,
        encoding: Encoding,
    ) -> JsonOutcome<T>
    where
        Self: Sized,
    {
        tokenize_reader(reader, encoding)
            .and_then(|tokens| self.from_tokens(tokens))
            .map_err(|err| {
                debug!(%err, ?encoding, "json conversion failed");
                err
            })
    }
}

impl<T, A> JsonConverter<T> for A
where
    A: JsonAdjunction<T>,
{
    fn decode_from_any(&self, node: &JsonNode) -> JsonOutcome<T> {
        self.safe_cast(node).and_then(|n| self.decode(n))
    }

    fn encode_to_any(&self, value: &T, location: Location) -> JsonNode {
        self.encode(value, location).into_node()
    }

    fn parse_from_root(&self, tokens: &mut TokenStream) -> JsonOutcome<T> {
        A::Node::parse(tokens, Location::root()).and_then(|node| self.decode(&node))
    }
}

/// A type-erased, shareable converter
pub type JConverter<T> = Box<dyn JsonConverter<T> + Send + Sync>;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{JConverter, JsonAdjunction, JsonConverter};
    use crate::codecs::{JInt, JString};
    use crate::errors::{ErrorKind, JsonError, JsonOutcome};
    use crate::location::Location;
    use crate::nodes::{JsonNode, JsonNumberNode, JsonStringNode, NodeKind, NodeVariant};
    use crate::{assert_json_error, reader_from_bytes};

    /// Decodes integers which are written as strings, counting how often decode is reached
    #[derive(Default)]
    struct QuotedInt {
        decoded: AtomicUsize,
    }

    impl JsonAdjunction<i64> for QuotedInt {
        type Node = JsonStringNode;

        fn decode(&self, node: &JsonStringNode) -> JsonOutcome<i64> {
            self.decoded.fetch_add(1, Ordering::SeqCst);
            node.value().parse().map_err(|_| {
                JsonError::decoding(
                    node.location().clone(),
                    format!("'{}' is not an integer", node.value()),
                )
            })
        }

        fn encode(&self, value: &i64, location: Location) -> JsonStringNode {
            JsonStringNode::new(location, value.to_string())
        }
    }

    #[test]
    fn node_kind_should_name_the_associated_variant() {
        assert_eq!(QuotedInt::default().node_kind(), NodeKind::String);
        assert_eq!(JInt.node_kind(), NodeKind::Number);
    }

    #[test]
    fn safe_cast_should_borrow_without_copying() {
        let node = JsonStringNode::new(Location::root().field("x"), "12").into_node();
        let cast = QuotedInt::default().safe_cast(&node).unwrap();
        assert!(std::ptr::eq(cast, JsonStringNode::from_node(&node).unwrap()));
    }

    #[test]
    fn decode_should_never_be_reached_on_a_type_mismatch() {
        let codec = QuotedInt::default();
        let node = JsonNumberNode::new(
            Location::root().index(3),
            crate::nodes::JsonNumber::Integer(12),
        )
        .into_node();
        let outcome = codec.decode_from_any(&node);
        assert_json_error!(outcome, "$[3]", "expected a string but found a number");
        assert_eq!(codec.decoded.load(Ordering::SeqCst), 0);

        let outcome: JsonOutcome<i64> = codec.from_json("[\"12\"]");
        assert_eq!(outcome.unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(codec.decoded.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn decode_failures_should_come_from_the_codec() {
        let codec = QuotedInt::default();
        let outcome: JsonOutcome<i64> = codec.from_json("\"twelve\"");
        assert_json_error!(outcome, "$", "'twelve' is not an integer");
        assert_eq!(codec.decoded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn trailing_tokens_should_fail_after_decoding() {
        let codec = QuotedInt::default();
        let outcome: JsonOutcome<i64> = codec.from_json("\"12\" \"13\"");
        assert_json_error!(outcome, "$", "at position 6: expected EOF but found '\"13\"'");
        assert_eq!(codec.decoded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lexical_failures_should_short_circuit_everything() {
        let codec = QuotedInt::default();
        let outcome: JsonOutcome<i64> = codec.from_json("\"12");
        assert_eq!(outcome.unwrap_err().kind(), ErrorKind::Lexical);
        assert_eq!(codec.decoded.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn converters_for_different_variants_should_share_a_collection() {
        let converters: Vec<JConverter<i64>> = vec![Box::new(JInt), Box::new(QuotedInt::default())];
        let rendered: Vec<String> = converters.iter().map(|c| c.to_json(&42)).collect();
        assert_eq!(rendered, vec!["42".to_string(), "\"42\"".to_string()]);
        for (converter, text) in converters.iter().zip(rendered.iter()) {
            assert_eq!(converter.from_json(text), Ok(42));
        }
    }

    #[test]
    fn erased_converters_should_decode_any_node() {
        let converter: &dyn JsonConverter<String> = &JString;
        let node: JsonNode = converter.encode_to_any(&"hi".to_string(), Location::root());
        assert_eq!(converter.decode_from_any(&node), Ok("hi".to_string()));
    }

    #[test]
    fn documents_should_be_readable_from_readers() {
        let mut reader = reader_from_bytes!("  \"\u{2603}\"  ");
        let outcome = JString.from_json_reader(&mut reader, Default::default());
        assert_eq!(outcome, Ok("\u{2603}".to_string()));
    }
}
