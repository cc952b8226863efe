//! jsdoc2md - markdown API documentation from JSDoc-annotated JavaScript
//!
//! A three-stage pipeline behind a single facade:
//!
//! 1. **Extract**: scan `/** ... */` comments in source files (or inline
//!    source text) into raw [`Doclet`](models::Doclet) records
//! 2. **Structure**: filter and reshape doclets into render-ready
//!    [`TemplateEntry`](models::TemplateEntry) records
//! 3. **Render**: lay the entries out as markdown through Tera templates
//!
//! Each stage is a trait ([`Extractor`](extract::Extractor),
//! [`Structurer`](structure::Structurer), [`Renderer`](templating::Renderer))
//! with one built-in implementation, and [`Jsdoc2Md`] composes them. Nothing
//! is global: construct a facade, optionally attach a
//! [`UsageRecorder`](usage::UsageRecorder), and call it.
//!
//! # Core Modules
//!
//! - [`facade`] - [`Jsdoc2Md`] and the public operations
//! - [`options`] - unified [`Jsdoc2MdOptions`] and per-stage normalizers
//! - [`extract`] - comment scanning, tag parsing and name inference
//! - [`structure`] - doclet filtering, class/constructor split, ids
//! - [`templating`] - Tera renderer, built-in partials, custom filters
//! - [`models`] - doclet and template entry records
//!
//! ## Supporting Modules
//!
//! - [`cache`] - on-disk memoization for extraction and rendering
//! - [`config`] - option files and cache location
//! - [`core`] - error types and identifier kinds
//! - [`usage`] - call counters
//! - [`cli`] - the `jsdoc2md` command
//!
//! # Operations
//!
//! | Operation | Returns |
//! |-----------|---------|
//! | `render` / `render_sync` | markdown |
//! | `get_template_data` / `get_template_data_sync` | `Vec<TemplateEntry>` |
//! | `get_raw_data` / `get_raw_data_sync` | `Vec<Doclet>` |
//! | `get_namepaths` | longnames grouped by kind |
//! | `clear` | empties both caches |
//!
//! Pre-built template data passed in [`Jsdoc2MdOptions::data`] is rendered
//! directly; the extractor and structurer are not called.
//!
//! # Example
//!
//! ```rust,no_run
//! use jsdoc2md::{Jsdoc2Md, Jsdoc2MdOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let jsdoc2md = Jsdoc2Md::new();
//! let options = Jsdoc2MdOptions::with_source(
//!     "/**\n * Adds two numbers.\n * @param {number} a\n * @param {number} b\n */\nfunction add (a, b) {}",
//! );
//! let markdown = jsdoc2md.render_sync(&options)?;
//! assert!(markdown.contains("## add(a, b)"));
//! # Ok(())
//! # }
//! ```
//!
//! # Caching
//!
//! Extraction and render results are cached under `~/.cache/jsdoc2md`
//! (override with `JSDOC2MD_CACHE_DIR`). Keys hash the options together with
//! the content of every input file, so edits are always picked up. Pass
//! `no_cache` to bypass the caches for one call, or [`Jsdoc2Md::clear`] to
//! empty them.

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod extract;
pub mod facade;
pub mod models;
pub mod options;
pub mod structure;
pub mod templating;
pub mod usage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use facade::{Jsdoc2Md, Namepaths};
pub use options::Jsdoc2MdOptions;
