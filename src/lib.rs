//! Path-aware conversions between Rust values and JSON.
//!
//! A codec implements [JsonAdjunction] for some type `T`, naming the node variant it reads and
//! writes. In return it gets [JsonConverter]: whole-document `to_json`/`from_json`, variant
//! checked decoding of arbitrary nodes, and a type-erased form for use in collections.
//!
//! ```
//! use chisel_adjunction::{JsonAdjunction, JsonConverter, JsonObjectNode, JsonOutcome, Location};
//! use chisel_adjunction::codecs::{JArray, JInt, JString};
//!
//! #[derive(Debug, PartialEq)]
//! struct Order {
//!     id: i64,
//!     items: Vec<String>,
//! }
//!
//! struct JOrder;
//!
//! impl JsonAdjunction<Order> for JOrder {
//!     type Node = JsonObjectNode;
//!
//!     fn decode(&self, node: &JsonObjectNode) -> JsonOutcome<Order> {
//!         Ok(Order {
//!             id: node.field("id", &JInt)?,
//!             items: node.field("items", &JArray::new(JString))?,
//!         })
//!     }
//!
//!     fn encode(&self, value: &Order, location: Location) -> JsonObjectNode {
//!         JsonObjectNode::builder(location)
//!             .field("id", &JInt, &value.id)
//!             .field("items", &JArray::new(JString), &value.items)
//!             .build()
//!     }
//! }
//!
//! let order = Order { id: 7, items: vec!["tea".to_string()] };
//! let json = JOrder.to_json(&order);
//! assert_eq!(json, r#"{"id":7,"items":["tea"]}"#);
//! assert_eq!(JOrder.from_json(&json), Ok(order));
//!
//! let err = JOrder.from_json(r#"{"id":7,"items":[1]}"#).unwrap_err();
//! assert_eq!(err.to_string(), "error on <$.items[0]> expected a string but found a number");
//! ```

pub mod adjunction;
pub mod codecs;
pub mod coords;
pub mod decoders;
mod dom;
pub mod errors;
pub mod lexer;
pub mod location;
pub mod nodes;
pub mod render;
#[cfg(test)]
mod test_macros;

pub use adjunction::{JConverter, JsonAdjunction, JsonConverter};
pub use decoders::Encoding;
pub use dom::MAX_NESTING_DEPTH;
pub use errors::{ErrorKind, JsonError, JsonOutcome};
pub use location::Location;
pub use nodes::{
    JsonArrayNode, JsonBooleanNode, JsonNode, JsonNullNode, JsonNumber, JsonNumberNode,
    JsonObjectNode, JsonStringNode, NodeKind, NodeVariant, ObjectNodeBuilder,
};
pub use render::RenderStyle;
