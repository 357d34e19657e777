//! Rendering of nodes back to JSON text
use crate::nodes::{
    JsonArrayNode, JsonBooleanNode, JsonNode, JsonNullNode, JsonNumberNode, JsonObjectNode,
    JsonStringNode,
};

/// Default indentation used by [RenderStyle::pretty]
const DEFAULT_INDENT: usize = 2;

/// Controls the layout of rendered JSON
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderStyle {
    /// No insignificant whitespace at all
    Compact,
    /// One member per line, nested members indented by `indent` spaces per level
    Pretty { indent: usize },
}

impl RenderStyle {
    /// Pretty printing with the default indentation
    pub fn pretty() -> Self {
        RenderStyle::Pretty {
            indent: DEFAULT_INDENT,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        RenderStyle::Compact
    }
}

/// Accumulates rendered output for a single node tree
pub(crate) struct Renderer {
    style: RenderStyle,
    out: String,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Renderer {
            style,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn node(&mut self, node: &JsonNode, depth: usize) {
        match node {
            JsonNode::Object(n) => self.object(n, depth),
            JsonNode::Array(n) => self.array(n, depth),
            JsonNode::String(n) => self.string_node(n, depth),
            JsonNode::Number(n) => self.number_node(n, depth),
            JsonNode::Boolean(n) => self.boolean_node(n, depth),
            JsonNode::Null(n) => self.null_node(n, depth),
        }
    }

    pub fn object(&mut self, node: &JsonObjectNode, depth: usize) {
        self.out.push('{');
        for (index, (name, value)) in node.fields().iter().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            self.newline(depth + 1);
            self.string(name);
            self.out.push(':');
            if let RenderStyle::Pretty { .. } = self.style {
                self.out.push(' ');
            }
            self.node(value, depth + 1);
        }
        if !node.fields().is_empty() {
            self.newline(depth);
        }
        self.out.push('}');
    }

    pub fn array(&mut self, node: &JsonArrayNode, depth: usize) {
        self.out.push('[');
        for (index, value) in node.elements().iter().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            self.newline(depth + 1);
            self.node(value, depth + 1);
        }
        if !node.elements().is_empty() {
            self.newline(depth);
        }
        self.out.push(']');
    }

    pub fn string_node(&mut self, node: &JsonStringNode, _depth: usize) {
        self.string(node.value())
    }

    pub fn number_node(&mut self, node: &JsonNumberNode, _depth: usize) {
        self.out.push_str(&node.value().to_string());
    }

    pub fn boolean_node(&mut self, node: &JsonBooleanNode, _depth: usize) {
        self.out.push_str(if node.value() { "true" } else { "false" })
    }

    pub fn null_node(&mut self, _node: &JsonNullNode, _depth: usize) {
        self.out.push_str("null")
    }

    /// Write a quoted string, escaping as required by RFC 8259
    fn string(&mut self, value: &str) {
        self.out.push('"');
        for c in value.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                c if (c as u32) < 0x20 => self.out.push_str(&format!("\\u{:04x}", c as u32)),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn newline(&mut self, depth: usize) {
        if let RenderStyle::Pretty { indent } = self.style {
            self.out.push('\n');
            self.out.extend(std::iter::repeat(' ').take(indent * depth));
        }
    }
}
