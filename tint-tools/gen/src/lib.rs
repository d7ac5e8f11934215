//! Tint Theme Generator
//!
//! Batch front end over the `tintc` analysis engine. A theme is analyzed,
//! checked against the generator's policy, and rendered by a [`Target`].
//!
//! # Pipeline
//!
//! ```text
//! source ──► tintc::analyze ──► Generator::validate ──► Target::render ──► file / stdout
//!                 │
//!                 └──► report::render (diagnostics on stderr)
//! ```

pub mod config;
pub mod report;
pub mod target;

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use tintc::blocks::ANSI_NAMES;
use tintc::{AnalysisResult, Analyzer, BlockTable, Node, Style};
use tracing::{debug, warn};

pub use config::Config;
pub use target::{FlatTarget, JsonTarget, Target, TargetKind};

/// Name of the block whose completeness `strict_ansi` enforces.
const ANSI: &str = "ansi";

/// Errors that stop a theme from being generated.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("theme has {count} error(s)")]
    Invalid { count: usize },

    #[error("theme has no `ansi` block")]
    MissingAnsi,

    #[error("`ansi` is missing {} color(s): {}", .missing.len(), .missing.join(", "))]
    IncompleteAnsi { missing: Vec<String> },
}

/// The resolved data a target renders.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub meta: IndexMap<String, String>,
    /// Resolved trees keyed by block name, in evaluation order.
    pub scopes: IndexMap<String, Node>,
    /// Styles of the style-flag block, keyed by path within it.
    pub styles: IndexMap<String, Style>,
    /// Name of the block the styles belong to.
    style_scope: Option<&'static str>,
}

impl Theme {
    fn new(result: AnalysisResult, table: &BlockTable) -> Self {
        Self {
            meta: result.meta,
            scopes: result.scopes,
            styles: result.styles,
            style_scope: table.iter().find(|b| b.style_flags).map(|b| b.name),
        }
    }

    /// Style of `path` inside `scope`, if that scope carries style flags.
    pub fn style_of(&self, scope: &str, path: &str) -> Option<&Style> {
        if self.style_scope != Some(scope) {
            return None;
        }
        self.styles.get(path)
    }
}

/// Analyzes themes and enforces the output policy.
pub struct Generator {
    config: Config,
    analyzer: Analyzer,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            analyzer: Analyzer::new(BlockTable::standard()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn analyze(&self, source: &str) -> AnalysisResult {
        self.analyzer.analyze(source)
    }

    /// Turns an analysis into a renderable theme.
    ///
    /// Any error diagnostic rejects the theme. With `strict_ansi`, a missing
    /// or incomplete `ansi` block does too, although analysis reports the
    /// latter only as a warning.
    pub fn validate(&self, result: AnalysisResult) -> Result<Theme, GenerateError> {
        let count = result.errors().count();
        if count > 0 {
            return Err(GenerateError::Invalid { count });
        }

        if self.config.strict_ansi {
            let ansi = result.scope(ANSI).ok_or(GenerateError::MissingAnsi)?;
            let missing: Vec<String> = ANSI_NAMES
                .iter()
                .filter(|name| !ansi.children.contains_key(**name))
                .map(|name| name.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(GenerateError::IncompleteAnsi { missing });
            }
        } else if result.scope(ANSI).is_none() {
            warn!("theme has no `ansi` block");
        }

        debug!(scopes = result.scopes.len(), "theme validated");
        Ok(Theme::new(result, self.analyzer.table()))
    }

    /// Analyzes, validates, and renders in one step.
    pub fn generate(&self, source: &str, target: &dyn Target) -> Result<String, GenerateError> {
        let theme = self.validate(self.analyze(source))?;
        target.render(&theme)
    }

    /// Where the output for `input` goes: `out_dir/<stem>.<ext>`, or `None`
    /// for stdout when no output directory is configured.
    pub fn output_path(&self, input: &Path, target: &dyn Target) -> Option<PathBuf> {
        let dir = self.config.out_dir.as_ref()?;
        let mut name = input.file_stem()?.to_os_string();
        name.push(".");
        name.push(target.extension());
        Some(dir.join(name))
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
