//! Property tests for the round trip laws:
//!
//! render . parse . render = render
//! parse . render . parse  = parse
use chisel_adjunction::codecs::{JArray, JBoolean, JDouble, JInt, JString};
use chisel_adjunction::{
    JsonAdjunction, JsonConverter, JsonObjectNode, JsonOutcome, Location, RenderStyle,
};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    sensor: String,
    value: f64,
    count: i64,
    valid: bool,
    tags: Vec<String>,
    note: Option<String>,
}

struct JReading;

impl JsonAdjunction<Reading> for JReading {
    type Node = JsonObjectNode;

    fn decode(&self, node: &JsonObjectNode) -> JsonOutcome<Reading> {
        Ok(Reading {
            sensor: node.field("sensor", &JString)?,
            value: node.field("value", &JDouble)?,
            count: node.field("count", &JInt)?,
            valid: node.field("valid", &JBoolean)?,
            tags: node.field("tags", &JArray::new(JString))?,
            note: node.optional_field("note", &JString)?,
        })
    }

    fn encode(&self, value: &Reading, location: Location) -> JsonObjectNode {
        JsonObjectNode::builder(location)
            .field("sensor", &JString, &value.sensor)
            .field("value", &JDouble, &value.value)
            .field("count", &JInt, &value.count)
            .field("valid", &JBoolean, &value.valid)
            .field("tags", &JArray::new(JString), &value.tags)
            .optional_field("note", &JString, &value.note)
            .build()
    }
}

fn reading() -> impl Strategy<Value = Reading> {
    (
        any::<String>(),
        -1.0e12f64..1.0e12,
        any::<i64>(),
        any::<bool>(),
        prop::collection::vec(any::<String>(), 0..5),
        prop::option::of(any::<String>()),
    )
        .prop_map(|(sensor, value, count, valid, tags, note)| Reading {
            sensor,
            value,
            count,
            valid,
            tags,
            note,
        })
}

proptest! {
    #[test]
    fn decoding_rendered_values_should_give_them_back(value in reading()) {
        let json = JReading.to_json(&value);
        prop_assert_eq!(JReading.from_json(&json), Ok(value));
    }

    #[test]
    fn render_parse_render_should_equal_render(value in reading()) {
        let first = JReading.to_json(&value);
        let decoded = JReading.from_json(&first).unwrap();
        prop_assert_eq!(JReading.to_json(&decoded), first);
    }

    #[test]
    fn parse_render_parse_should_equal_parse(values in prop::collection::vec(any::<i64>(), 0..20)) {
        let codec = JArray::new(JInt);
        let text = format!(
            "[ {} ]",
            values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ,\n")
        );
        let parsed: JsonOutcome<Vec<i64>> = codec.from_json(&text);
        let reparsed = parsed.clone().map(|v| codec.to_json(&v)).and_then(|t| codec.from_json(&t));
        prop_assert_eq!(reparsed, parsed);
    }

    #[test]
    fn pretty_and_compact_output_should_decode_alike(value in reading(), indent in 0usize..6) {
        let pretty = JReading.to_json_with(&value, RenderStyle::Pretty { indent });
        prop_assert_eq!(JReading.from_json(&pretty), JReading.from_json(&JReading.to_json(&value)));
    }

    #[test]
    fn arbitrary_text_should_never_panic(text in ".{0,40}") {
        let _ = JReading.from_json(&text);
        let _: JsonOutcome<Vec<i64>> = JArray::new(JInt).from_json(&text);
    }
}
