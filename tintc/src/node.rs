//! The recursive color tree.

use indexmap::IndexMap;
use thiserror::Error;

use crate::color::Color;

/// Reserved child name that addresses a node's own color.
pub const COLOR_KEY: &str = "color";

/// Errors from walking a [`Node`] along a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("`{segment}` does not exist")]
    Missing { segment: String },
    #[error("`{parent}` is a color, not a group; it has no `{segment}`")]
    NotAGroup { parent: String, segment: String },
    #[error("`{path}` is a group without its own color")]
    NoColor { path: String },
}

/// The four combinations a node's two facets can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Own color, no children.
    Leaf,
    /// Children, no own color.
    Group,
    /// Both an own color and children.
    DualRole,
    /// Neither; never produced by the evaluator.
    Empty,
}

/// A color tree element with an optional own color and named children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub color: Option<Color>,
    pub children: IndexMap<String, Node>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(color: Color) -> Self {
        Self {
            color: Some(color),
            children: IndexMap::new(),
        }
    }

    pub fn shape(&self) -> NodeShape {
        match (self.color.is_some(), self.children.is_empty()) {
            (true, true) => NodeShape::Leaf,
            (false, false) => NodeShape::Group,
            (true, false) => NodeShape::DualRole,
            (false, true) => NodeShape::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shape() == NodeShape::Empty
    }

    /// Walks children along `path`, returning the node reached.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, segment| node.children.get(segment.as_ref()))
    }

    /// Walks children along `path`, creating empty groups as needed.
    pub fn get_or_insert<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Node {
        path.iter().fold(self, |node, segment| {
            node.children.entry(segment.as_ref().to_string()).or_default()
        })
    }

    /// Resolves `path` to a color.
    ///
    /// Fails if a segment is absent, if an intermediate node is a leaf, or
    /// if the final node has no own color.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Result<Color, LookupError> {
        let mut node = self;
        let mut walked: Vec<&str> = Vec::with_capacity(path.len());
        for segment in path {
            let segment = segment.as_ref();
            match node.children.get(segment) {
                Some(child) => node = child,
                None if node.shape() == NodeShape::Leaf && !walked.is_empty() => {
                    return Err(LookupError::NotAGroup {
                        parent: walked.join("."),
                        segment: segment.to_string(),
                    });
                }
                None => {
                    return Err(LookupError::Missing {
                        segment: segment.to_string(),
                    });
                }
            }
            walked.push(segment);
        }
        node.color.ok_or_else(|| LookupError::NoColor {
            path: walked.join("."),
        })
    }

    /// Flattens the tree into `(dotted path, color)` pairs in tree order.
    /// A node's own color is listed under its own path, before its children.
    pub fn flatten(&self) -> Vec<(String, Color)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, Color)>) {
        if let Some(color) = self.color {
            if !prefix.is_empty() {
                out.push((prefix.to_string(), color));
            }
        }
        for (name, child) in &self.children {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            child.flatten_into(&path, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Node {
        let mut root = Node::new();
        root.children
            .insert("base".into(), Node::leaf(Color::new(0x19, 0x17, 0x24)));
        let highlight = root.get_or_insert(&["highlight"]);
        highlight.color = Some(Color::new(0x21, 0x20, 0x2e));
        highlight
            .children
            .insert("low".into(), Node::leaf(Color::new(0x40, 0x3d, 0x52)));
        root
    }

    #[test]
    fn test_shapes() {
        let root = sample();
        assert_eq!(root.shape(), NodeShape::Group);
        assert_eq!(root.get(&["base"]).unwrap().shape(), NodeShape::Leaf);
        assert_eq!(root.get(&["highlight"]).unwrap().shape(), NodeShape::DualRole);
        assert_eq!(Node::new().shape(), NodeShape::Empty);
    }

    #[test]
    fn test_lookup_paths() {
        let root = sample();
        assert_eq!(root.lookup(&["base"]), Ok(Color::new(0x19, 0x17, 0x24)));
        assert_eq!(root.lookup(&["highlight"]), Ok(Color::new(0x21, 0x20, 0x2e)));
        assert_eq!(
            root.lookup(&["highlight", "low"]),
            Ok(Color::new(0x40, 0x3d, 0x52))
        );
    }

    #[test]
    fn test_lookup_failures() {
        let root = sample();
        assert_eq!(
            root.lookup(&["nope"]),
            Err(LookupError::Missing {
                segment: "nope".into()
            })
        );
        assert_eq!(
            root.lookup(&["base", "deeper"]),
            Err(LookupError::NotAGroup {
                parent: "base".into(),
                segment: "deeper".into()
            })
        );
        assert_eq!(root.lookup::<&str>(&[]), Err(LookupError::NoColor { path: String::new() }));
    }

    #[test]
    fn test_flatten_lists_own_color_before_children() {
        let flat: Vec<String> = sample().flatten().into_iter().map(|(p, _)| p).collect();
        assert_eq!(flat, vec!["base", "highlight", "highlight.low"]);
    }
}
