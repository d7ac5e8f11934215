//! Output targets.
//!
//! A [`Target`] turns a resolved [`Theme`] into the text of one output file.
//! Application-specific templates plug in here; the built-in targets emit
//! the resolved data itself.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tintc::{Node, NodeShape};

use crate::{GenerateError, Theme};

/// Renders a resolved theme.
pub trait Target {
    /// Short name, as accepted by `--target`.
    fn name(&self) -> &'static str;

    /// File extension of the rendered output, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, theme: &Theme) -> Result<String, GenerateError>;
}

/// The built-in targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Nested JSON document.
    Json,
    /// One `path = #rrggbb` line per color.
    Flat,
}

impl TargetKind {
    pub fn target(self) -> Box<dyn Target> {
        match self {
            TargetKind::Json => Box::new(JsonTarget),
            TargetKind::Flat => Box::new(FlatTarget),
        }
    }
}

/// Nested JSON mirroring the block structure. Leaves become hex strings;
/// groups become objects, with a dual-role node's own color under `color`.
pub struct JsonTarget;

impl JsonTarget {
    fn node(node: &Node) -> Value {
        match node.shape() {
            NodeShape::Leaf => node
                .color
                .map(|c| Value::String(c.hex()))
                .unwrap_or(Value::Null),
            NodeShape::Group | NodeShape::DualRole | NodeShape::Empty => {
                let mut object = Map::new();
                if let Some(color) = node.color {
                    object.insert(tintc::node::COLOR_KEY.to_string(), Value::String(color.hex()));
                }
                for (name, child) in &node.children {
                    object.insert(name.clone(), Self::node(child));
                }
                Value::Object(object)
            }
        }
    }
}

impl Target for JsonTarget {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, theme: &Theme) -> Result<String, GenerateError> {
        let mut root = Map::new();
        root.insert("meta".to_string(), serde_json::to_value(&theme.meta)?);
        for (scope, node) in &theme.scopes {
            root.insert(scope.clone(), Self::node(node));
        }
        if !theme.styles.is_empty() {
            root.insert("styles".to_string(), serde_json::to_value(&theme.styles)?);
        }

        let mut text = serde_json::to_string_pretty(&Value::Object(root))?;
        text.push('\n');
        Ok(text)
    }
}

/// `scope.path = #rrggbb` lines, with style flags appended.
pub struct FlatTarget;

impl Target for FlatTarget {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, theme: &Theme) -> Result<String, GenerateError> {
        let mut out = String::new();

        for (key, value) in &theme.meta {
            out.push_str(&format!("meta.{key} = {value:?}\n"));
        }

        for (scope, node) in &theme.scopes {
            for (path, color) in node.flatten() {
                out.push_str(&format!("{scope}.{path} = {color}"));
                if let Some(style) = theme.style_of(scope, &path) {
                    for (flag, set) in [
                        ("bold", style.bold),
                        ("italic", style.italic),
                        ("underline", style.underline),
                    ] {
                        if set {
                            out.push(' ');
                            out.push_str(flag);
                        }
                    }
                }
                out.push('\n');
            }
        }

        Ok(out)
    }
}
