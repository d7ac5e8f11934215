//! Expression evaluation.
//!
//! An [`EvalContext`] is an immutable snapshot of the scopes visible to an
//! expression (`palette`, `theme`, ...) plus the built-in functions.
//! Contexts are never mutated in place; [`EvalContext::with_scope`] returns a
//! new context, so each evaluation sees exactly the state it was given.

use indexmap::IndexMap;
use thiserror::Error;

use crate::ast::{Expr, ExprKind};
use crate::color::{parse_hex, Color, ColorError};
use crate::diagnostics::codes;
use crate::node::{Node, NodeShape, COLOR_KEY};

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f64),
    Bool(bool),
    /// A group node reached by a reference.
    Object(Node),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Object(_) => "object",
        }
    }
}

/// Expression evaluation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("`{}` is not defined", .path.join("."))]
    UnknownPath { path: Vec<String> },

    #[error("`{parent}` is a color, not a group; it has no attribute `{segment}`")]
    NotAGroup { parent: String, segment: String },

    #[error("object has no color attribute")]
    NoColorAttribute,

    #[error("there is no function named `{0}`")]
    UnknownFunction(String),

    #[error("`{function}` expects {expected} arguments, got {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("`{function}` argument {index}: expected {expected}, found {found}")]
    ArgumentType {
        function: &'static str,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected a color, found {0}")]
    NotAColor(&'static str),

    #[error(transparent)]
    Color(#[from] ColorError),
}

impl EvalError {
    /// Diagnostic code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::UnknownVariable(_)
            | EvalError::UnknownPath { .. }
            | EvalError::NotAGroup { .. } => codes::UNKNOWN_REFERENCE,
            EvalError::NoColorAttribute => codes::NO_COLOR_ATTRIBUTE,
            EvalError::UnknownFunction(_) => codes::UNKNOWN_FUNCTION,
            EvalError::Arity { .. } | EvalError::ArgumentType { .. } => codes::BAD_ARGUMENTS,
            EvalError::NotAColor(_) => codes::TYPE_MISMATCH,
            EvalError::Color(_) => codes::INVALID_HEX,
        }
    }
}

/// Signature of a built-in function.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

fn brighten(args: &[Value]) -> Result<Value, EvalError> {
    let (color, percent) = color_and_percent("brighten", args)?;
    Ok(Value::Str(color.brighten(percent).hex()))
}

fn darken(args: &[Value]) -> Result<Value, EvalError> {
    let (color, percent) = color_and_percent("darken", args)?;
    Ok(Value::Str(color.darken(percent).hex()))
}

fn color_and_percent(function: &'static str, args: &[Value]) -> Result<(Color, f64), EvalError> {
    let [color, percent] = args else {
        return Err(EvalError::Arity {
            function,
            expected: 2,
            found: args.len(),
        });
    };
    let color = to_color(color).map_err(|err| match err {
        EvalError::NotAColor(found) => EvalError::ArgumentType {
            function,
            index: 1,
            expected: "color",
            found,
        },
        other => other,
    })?;
    let Value::Number(percent) = percent else {
        return Err(EvalError::ArgumentType {
            function,
            index: 2,
            expected: "number",
            found: percent.type_name(),
        });
    };
    Ok((color, *percent))
}

/// Converts an evaluated value to a color: strings are parsed as hex, objects
/// must carry their own color.
pub fn to_color(value: &Value) -> Result<Color, EvalError> {
    match value {
        Value::Str(s) => Ok(parse_hex(s)?),
        Value::Object(node) => node.color.ok_or(EvalError::NoColorAttribute),
        other => Err(EvalError::NotAColor(other.type_name())),
    }
}

/// Names of the built-in functions.
pub const BUILTIN_NAMES: [&str; 2] = ["brighten", "darken"];

/// Scopes and functions visible to an expression.
#[derive(Debug, Clone)]
pub struct EvalContext {
    scopes: IndexMap<String, Node>,
    functions: IndexMap<&'static str, BuiltinFn>,
}

impl EvalContext {
    /// An empty context with the built-in functions.
    pub fn new() -> Self {
        let mut functions: IndexMap<&'static str, BuiltinFn> = IndexMap::new();
        functions.insert("brighten", brighten);
        functions.insert("darken", darken);
        Self {
            scopes: IndexMap::new(),
            functions,
        }
    }

    /// Returns a new context where `name` resolves to `node`, replacing any
    /// previous binding.
    pub fn with_scope(&self, name: &str, node: &Node) -> EvalContext {
        let mut next = self.clone();
        next.scopes.insert(name.to_string(), node.clone());
        next
    }

    pub fn scope(&self, name: &str) -> Option<&Node> {
        self.scopes.get(name)
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::Str(s) | ExprKind::Hex(s) => Ok(Value::Str(s.clone())),
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Path(segments) => {
                let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
                self.traverse(&names)
            }
            ExprKind::Call { name, args } => {
                let function = self
                    .functions
                    .get(name.name.as_str())
                    .ok_or_else(|| EvalError::UnknownFunction(name.name.clone()))?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                function(&args)
            }
        }
    }

    fn traverse(&self, path: &[&str]) -> Result<Value, EvalError> {
        let Some((root, rest)) = path.split_first() else {
            return Err(EvalError::UnknownPath { path: Vec::new() });
        };
        let mut node = self
            .scopes
            .get(*root)
            .ok_or_else(|| EvalError::UnknownVariable(root.to_string()))?;

        for (depth, segment) in rest.iter().enumerate() {
            node = match node.children.get(*segment) {
                Some(child) => child,
                // A trailing `color` names the node's own color.
                None => match node.color {
                    Some(color) if *segment == COLOR_KEY && depth + 1 == rest.len() => {
                        return Ok(Value::Str(color.hex()));
                    }
                    _ if node.shape() == NodeShape::Leaf => {
                        return Err(EvalError::NotAGroup {
                            parent: path[..=depth].join("."),
                            segment: segment.to_string(),
                        });
                    }
                    _ => {
                        return Err(EvalError::UnknownPath {
                            path: path.iter().map(|s| s.to_string()).collect(),
                        });
                    }
                },
            };
        }

        match node.shape() {
            NodeShape::Leaf => Ok(Value::Str(node.color.map(|c| c.hex()).unwrap_or_default())),
            NodeShape::Group | NodeShape::DualRole | NodeShape::Empty => Ok(Value::Object(node.clone())),
        }
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
