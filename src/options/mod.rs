//! Unified configuration and the per-stage normalizers.
//!
//! Callers describe a run with one loosely-typed [`Jsdoc2MdOptions`]. Each
//! downstream stage gets its own narrower view:
//! - [`ExtractOptions`] for the extractor (input selection, caching)
//! - [`ParseOptions`] for the structurer (visibility)
//! - [`RenderOptions`] for the renderer (template, formatting toggles)
//!
//! The normalizers only rename fields and fill in defaults. They never fail;
//! a bad value is forwarded and the stage that consumes it reports the error.
//!
//! # Configuration Files
//!
//! [`Jsdoc2MdOptions`] uses kebab-case keys, so the same struct loads from a
//! `.jsdoc2md.json` or `.jsdoc2md.toml` file:
//!
//! ```toml
//! files = ["src/**/*.js"]
//! heading-depth = 3
//! param-list-format = "list"
//! separators = true
//! ```

mod extract;
mod render;

pub use extract::ExtractOptions;
pub use render::{
    DEFAULT_TEMPLATE, IndexFormat, ListFormat, MemberIndexFormat, NameFormat, RenderOptions,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strsim::levenshtein;

use crate::core::DocError;
use crate::models::TemplateEntry;

/// Caller-facing configuration for every facade operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Jsdoc2MdOptions {
    /// Source file paths or glob patterns
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Inline source text, used instead of files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Pre-built template data; when set, extraction is skipped entirely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<TemplateEntry>>,
    /// Root template text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_lang: Option<String>,
    /// Directories or files whose templates override built-in partials
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugin: Vec<PathBuf>,
    /// Macro library files importable from templates
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub helper: Vec<PathBuf>,
    /// Partial template files, registered under their file stem
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partial: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_format: Option<NameFormat>,
    pub no_gfm: bool,
    pub separators: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_index_format: Option<IndexFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_index_format: Option<IndexFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_index_format: Option<MemberIndexFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_list_format: Option<ListFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_list_format: Option<ListFormat>,
    pub no_cache: bool,
    /// jsdoc-style JSON configuration file for the extractor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configure: Option<PathBuf>,
    /// Experimental: extract `<script>` blocks from `.html` files
    pub html: bool,
    /// Include `@private` identifiers in template data
    pub private: bool,
}

impl Jsdoc2MdOptions {
    /// Options reading the given files or glob patterns.
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Options reading inline source text.
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Options rendering pre-built template data.
    pub fn with_data(data: Vec<TemplateEntry>) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Set values in `overrides` win: non-empty lists, `Some` values and
    /// `true` flags. Used by the CLI to apply command-line flags over a
    /// configuration file.
    #[must_use]
    pub fn merge(mut self, overrides: Jsdoc2MdOptions) -> Self {
        fn take_vec<T>(base: &mut Vec<T>, over: Vec<T>) {
            if !over.is_empty() {
                *base = over;
            }
        }
        fn take_opt<T>(base: &mut Option<T>, over: Option<T>) {
            if over.is_some() {
                *base = over;
            }
        }

        take_vec(&mut self.files, overrides.files);
        take_opt(&mut self.source, overrides.source);
        take_opt(&mut self.data, overrides.data);
        take_opt(&mut self.template, overrides.template);
        take_opt(&mut self.heading_depth, overrides.heading_depth);
        take_opt(&mut self.example_lang, overrides.example_lang);
        take_vec(&mut self.plugin, overrides.plugin);
        take_vec(&mut self.helper, overrides.helper);
        take_vec(&mut self.partial, overrides.partial);
        take_opt(&mut self.name_format, overrides.name_format);
        self.no_gfm |= overrides.no_gfm;
        self.separators |= overrides.separators;
        take_opt(&mut self.module_index_format, overrides.module_index_format);
        take_opt(&mut self.global_index_format, overrides.global_index_format);
        take_opt(&mut self.member_index_format, overrides.member_index_format);
        take_opt(&mut self.param_list_format, overrides.param_list_format);
        take_opt(&mut self.property_list_format, overrides.property_list_format);
        self.no_cache |= overrides.no_cache;
        take_opt(&mut self.configure, overrides.configure);
        self.html |= overrides.html;
        self.private |= overrides.private;
        self
    }
}

/// Structurer options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Keep `@private` identifiers
    pub private: bool,
}

impl From<&Jsdoc2MdOptions> for ParseOptions {
    fn from(options: &Jsdoc2MdOptions) -> Self {
        Self {
            private: options.private,
        }
    }
}

/// Resolve `value` against a fixed table of choices, suggesting the closest
/// match when nothing fits.
pub(crate) fn parse_choice<T: Copy>(
    value: &str,
    choices: &[(&str, T)],
    what: &str,
) -> Result<T, DocError> {
    let wanted = value.trim().to_lowercase();
    if let Some((_, choice)) = choices.iter().find(|(name, _)| *name == wanted) {
        return Ok(*choice);
    }

    let closest = choices
        .iter()
        .map(|(name, _)| (*name, levenshtein(&wanted, name)))
        .min_by_key(|(_, distance)| *distance)
        .filter(|(name, distance)| *distance <= name.len() / 2);

    let message = match closest {
        Some((name, _)) => format!("Unknown {what} '{value}', did you mean '{name}'?"),
        None => {
            let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
            format!("Unknown {what} '{value}', expected one of: {}", names.join(", "))
        }
    };
    Err(DocError::Other {
        message,
    })
}
