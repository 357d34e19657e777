//! Codecs for the primitive types and for arrays. Object codecs are written per type, using
//! [JsonObjectNode::field](crate::nodes::JsonObjectNode::field) and
//! [ObjectNodeBuilder](crate::nodes::ObjectNodeBuilder).
use crate::adjunction::{JsonAdjunction, JsonConverter};
use crate::errors::{JsonError, JsonOutcome};
use crate::location::Location;
use crate::nodes::{
    JsonArrayNode, JsonBooleanNode, JsonNumber, JsonNumberNode, JsonStringNode, NodeVariant,
};

/// `String` <-> JSON string
#[derive(Debug, Default, Copy, Clone)]
pub struct JString;

impl JsonAdjunction<String> for JString {
    type Node = JsonStringNode;

    fn decode(&self, node: &JsonStringNode) -> JsonOutcome<String> {
        Ok(node.value().to_string())
    }

    fn encode(&self, value: &String, location: Location) -> JsonStringNode {
        JsonStringNode::new(location, value.as_str())
    }
}

/// `bool` <-> JSON boolean
#[derive(Debug, Default, Copy, Clone)]
pub struct JBoolean;

impl JsonAdjunction<bool> for JBoolean {
    type Node = JsonBooleanNode;

    fn decode(&self, node: &JsonBooleanNode) -> JsonOutcome<bool> {
        Ok(node.value())
    }

    fn encode(&self, value: &bool, location: Location) -> JsonBooleanNode {
        JsonBooleanNode::new(location, *value)
    }
}

/// `i64` <-> JSON number. Numbers with a fractional part, or outside the range of `i64`, are
/// rejected; integral floats such as `3.0` are accepted.
#[derive(Debug, Default, Copy, Clone)]
pub struct JInt;

impl JsonAdjunction<i64> for JInt {
    type Node = JsonNumberNode;

    fn decode(&self, node: &JsonNumberNode) -> JsonOutcome<i64> {
        node.value().as_i64().ok_or_else(|| {
            JsonError::decoding(
                node.location().clone(),
                format!("expected an integer but found {}", node.value()),
            )
        })
    }

    fn encode(&self, value: &i64, location: Location) -> JsonNumberNode {
        JsonNumberNode::new(location, JsonNumber::Integer(*value))
    }
}

/// `f64` <-> JSON number. Non-finite values have no JSON representation and render as `null`,
/// so they don't survive a round trip.
#[derive(Debug, Default, Copy, Clone)]
pub struct JDouble;

impl JsonAdjunction<f64> for JDouble {
    type Node = JsonNumberNode;

    fn decode(&self, node: &JsonNumberNode) -> JsonOutcome<f64> {
        Ok(node.value().as_f64())
    }

    fn encode(&self, value: &f64, location: Location) -> JsonNumberNode {
        JsonNumberNode::new(location, JsonNumber::Float(*value))
    }
}

/// `Vec<T>` <-> JSON array, with every element converted by the item codec
#[derive(Debug, Default, Copy, Clone)]
pub struct JArray<C> {
    item: C,
}

impl<C> JArray<C> {
    pub fn new(item: C) -> Self {
        JArray { item }
    }
}

impl<T, C> JsonAdjunction<Vec<T>> for JArray<C>
where
    C: JsonConverter<T>,
{
    type Node = JsonArrayNode;

    fn decode(&self, node: &JsonArrayNode) -> JsonOutcome<Vec<T>> {
        node.elements()
            .iter()
            .map(|element| self.item.decode_from_any(element))
            .collect()
    }

    fn encode(&self, value: &Vec<T>, location: Location) -> JsonArrayNode {
        let elements = value
            .iter()
            .enumerate()
            .map(|(index, v)| self.item.encode_to_any(v, location.index(index)))
            .collect();
        JsonArrayNode::new(location, elements)
    }
}
