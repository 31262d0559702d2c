// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt::Write;

use enum_dispatch::enum_dispatch;
use serde_json::{Map, json};

use crate::utils::{hex_line, hex_rows};

/// Width of the field-label column before the colon.
pub const LABEL_WIDTH: usize = 25;

/// A reported value. Formatting policy lives in the sinks; the bridge
/// only picks the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uint(u64),
    Int(i64),
    /// Hex-rendered integer, zero-padded to `width` digits.
    Hex { value: u64, width: usize },
    /// Raw value plus its resolved name: `0x02, Runtime Value`.
    Named {
        value: u64,
        width: usize,
        name: String,
    },
    Str(String),
    Bool(bool),
    /// Byte sequence rendered on a single line.
    Bytes(Vec<u8>),
    /// Byte sequence rendered as 16-byte hex rows.
    Dump(Vec<u8>),
    /// Bracketed list, e.g. a decoded ARRAY statistic.
    List(Vec<Value>),
    /// Comma-joined hex values; renders as `None` when empty.
    HexList { values: Vec<u64>, width: usize },
}

impl Value {
    fn render_text(&self) -> String {
        match self {
            Value::Uint(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Hex { value, width } => {
                let width = *width;
                format!("0x{value:0width$x}")
            },
            Value::Named { value, width, name } => {
                let width = *width;
                format!("0x{value:0width$x}, {name}")
            },
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Bytes(data) => hex_line(data),
            Value::Dump(_) => String::new(),
            Value::List(values) => {
                let mut out = String::from("[ ");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&value.render_text());
                }
                out.push_str(" ]");
                out
            },
            Value::HexList { values, width } => {
                if values.is_empty() {
                    return "None".to_string();
                }
                let width = *width;
                let mut out = String::new();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write!(&mut out, "0x{value:0width$x}")
                        .expect("Writing to String cannot fail");
                }
                out
            },
        }
    }

    fn render_json(&self) -> serde_json::Value {
        match self {
            Value::Uint(v) => json!(v),
            Value::Int(v) => json!(v),
            Value::Hex { value, .. } => json!(value),
            Value::Named { name, .. } => json!(name),
            Value::Str(s) => json!(s),
            Value::Bool(b) => json!(b),
            Value::Bytes(data) => json!(hex_line(data)),
            Value::Dump(data) => json!(hex_rows(data)),
            Value::List(values) => {
                serde_json::Value::Array(values.iter().map(Value::render_json).collect())
            },
            Value::HexList { values, .. } => json!(values),
        }
    }
}

/// One output sink driven by the report bridge. Every sink sees the same
/// traversal: nested sections, lists of items, and leaf fields.
#[enum_dispatch]
pub trait ReportSink {
    /// Open a named subsection.
    fn section(&mut self, key: &str, title: &str);
    /// Open a named list.
    fn list(&mut self, key: &str, title: Option<&str>);
    /// Open the next item of the innermost list.
    fn item(&mut self, label: &str);
    /// Emit one field.
    fn field(&mut self, key: &str, label: &str, value: &Value);
    /// Close the innermost section, list, or item.
    fn end(&mut self);
}

#[enum_dispatch(ReportSink)]
pub enum Sink {
    PlainSink,
    JsonSink,
}

/// Human-readable sink: two-space indentation per nesting level, field
/// labels padded to 25 characters before the colon. Grouping levels
/// without a printed title (empty section titles, unlabelled lists) do
/// not indent their content.
#[derive(Default)]
pub struct PlainSink {
    out: String,
    // one entry per open level: whether that level indents its content
    levels: Vec<bool>,
}

impl PlainSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn depth(&self) -> usize {
        self.levels.iter().filter(|&&indents| indents).count()
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl ReportSink for PlainSink {
    fn section(&mut self, _key: &str, title: &str) {
        if title.is_empty() {
            self.levels.push(false);
            return;
        }
        self.line(self.depth(), title);
        self.levels.push(true);
    }

    fn list(&mut self, _key: &str, title: Option<&str>) {
        match title {
            Some(title) => {
                self.line(self.depth(), title);
                self.levels.push(true);
            },
            None => self.levels.push(false),
        }
    }

    fn item(&mut self, label: &str) {
        self.line(self.depth(), label);
        self.levels.push(true);
    }

    fn field(&mut self, _key: &str, label: &str, value: &Value) {
        if let Value::Dump(data) = value {
            self.line(self.depth(), &format!("{label:<LABEL_WIDTH$}:"));
            let rows = hex_rows(data);
            for row in rows {
                self.line(self.depth() + 1, &row);
            }
            return;
        }
        let text = value.render_text();
        self.line(self.depth(), &format!("{label:<LABEL_WIDTH$}: {text}"));
    }

    fn end(&mut self) {
        self.levels.pop();
    }
}

enum JsonFrame {
    Object { key: String, map: Map<String, serde_json::Value> },
    Array { key: String, items: Vec<serde_json::Value> },
    Item { map: Map<String, serde_json::Value> },
}

/// Structured sink: builds one JSON document mirroring the traversal.
pub struct JsonSink {
    root: Map<String, serde_json::Value>,
    stack: Vec<JsonFrame>,
}

impl JsonSink {
    pub fn new() -> Self {
        JsonSink {
            root: Map::new(),
            stack: Vec::new(),
        }
    }

    pub fn finish(mut self) -> serde_json::Value {
        // tolerate an unbalanced traversal instead of losing output
        while !self.stack.is_empty() {
            self.end();
        }
        serde_json::Value::Object(self.root)
    }

    fn insert(&mut self, key: String, value: serde_json::Value) {
        match self.stack.last_mut() {
            Some(JsonFrame::Object { map, .. }) | Some(JsonFrame::Item { map }) => {
                map.insert(key, value);
            },
            Some(JsonFrame::Array { items, .. }) => items.push(value),
            None => {
                self.root.insert(key, value);
            },
        }
    }
}

impl Default for JsonSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for JsonSink {
    fn section(&mut self, key: &str, _title: &str) {
        self.stack.push(JsonFrame::Object {
            key: key.to_string(),
            map: Map::new(),
        });
    }

    fn list(&mut self, key: &str, _title: Option<&str>) {
        self.stack.push(JsonFrame::Array {
            key: key.to_string(),
            items: Vec::new(),
        });
    }

    fn item(&mut self, _label: &str) {
        self.stack.push(JsonFrame::Item { map: Map::new() });
    }

    fn field(&mut self, key: &str, _label: &str, value: &Value) {
        self.insert(key.to_string(), value.render_json());
    }

    fn end(&mut self) {
        match self.stack.pop() {
            Some(JsonFrame::Object { key, map }) => {
                self.insert(key, serde_json::Value::Object(map));
            },
            Some(JsonFrame::Array { key, items }) => {
                self.insert(key, serde_json::Value::Array(items));
            },
            Some(JsonFrame::Item { map }) => {
                self.insert(String::new(), serde_json::Value::Object(map));
            },
            None => {},
        }
    }
}
