//! Block behavior table.
//!
//! How each top-level block is evaluated is data, not code: the evaluator is
//! handed a [`BlockTable`] and consults the [`BlockType`] for every block it
//! walks.

/// The sixteen terminal color names an `ansi` block must define.
pub const ANSI_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright_black",
    "bright_red",
    "bright_green",
    "bright_yellow",
    "bright_blue",
    "bright_magenta",
    "bright_cyan",
    "bright_white",
];

/// Attributes a syntax style block accepts besides nested entries.
pub const STYLE_FLAGS: [&str; 3] = ["bold", "italic", "underline"];

/// Name of the non-color metadata block.
pub const META: &str = "meta";
/// Name of the block every document must contain.
pub const PALETTE: &str = "palette";

/// Evaluation policy for one block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockType {
    pub name: &'static str,
    /// Nested sub-blocks are allowed.
    pub supports_nesting: bool,
    /// Items may reference earlier items of the same block.
    pub self_referencing: bool,
    /// When set, attribute names must come from this list.
    pub strict_names: Option<&'static [&'static str]>,
    /// `bold`/`italic`/`underline` are boolean flags, not colors.
    pub style_flags: bool,
}

/// The ordered set of color blocks the evaluator knows about.
#[derive(Debug, Clone)]
pub struct BlockTable {
    /// Evaluation order. Later blocks may reference earlier ones.
    blocks: Vec<BlockType>,
}

impl BlockTable {
    pub fn new(blocks: Vec<BlockType>) -> Self {
        Self { blocks }
    }

    /// palette, theme, ansi, syntax.
    pub fn standard() -> Self {
        Self::new(vec![
            BlockType {
                name: PALETTE,
                supports_nesting: true,
                self_referencing: true,
                strict_names: None,
                style_flags: false,
            },
            BlockType {
                name: "theme",
                supports_nesting: true,
                self_referencing: true,
                strict_names: None,
                style_flags: false,
            },
            BlockType {
                name: "ansi",
                supports_nesting: false,
                self_referencing: false,
                strict_names: Some(&ANSI_NAMES),
                style_flags: false,
            },
            BlockType {
                name: "syntax",
                supports_nesting: true,
                self_referencing: true,
                strict_names: None,
                style_flags: true,
            },
        ])
    }

    pub fn get(&self, name: &str) -> Option<&BlockType> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Blocks in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter()
    }

    /// Whether `name` is a color block or `meta`.
    pub fn is_known(&self, name: &str) -> bool {
        name == META || self.get(name).is_some()
    }

    /// All top-level block names, `meta` first.
    pub fn top_level_names(&self) -> Vec<&'static str> {
        std::iter::once(META)
            .chain(self.blocks.iter().map(|b| b.name))
            .collect()
    }
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::standard()
    }
}
