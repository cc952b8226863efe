//! The public entry point tying extraction, structuring and rendering together.
//!
//! [`Jsdoc2Md`] owns one implementation of each stage and maps a
//! [`Jsdoc2MdOptions`] onto the per-stage options. Stages run strictly in
//! sequence and errors are propagated unchanged, so a caller can always
//! `downcast_ref::<DocError>()` the failure raised by the stage itself.
//!
//! # Example
//!
//! ```rust,no_run
//! use jsdoc2md::{Jsdoc2Md, Jsdoc2MdOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let jsdoc2md = Jsdoc2Md::new();
//! let markdown = jsdoc2md.render(&Jsdoc2MdOptions::with_files(["lib/*.js"])).await?;
//! println!("{markdown}");
//! # Ok(())
//! # }
//! ```
//!
//! [`DocError`]: crate::core::DocError

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::core::Kind;
use crate::extract::{Extractor, JsdocExtractor};
use crate::models::{Doclet, TemplateEntry};
use crate::options::{ExtractOptions, Jsdoc2MdOptions, ParseOptions, RenderOptions};
use crate::structure::{Structurer, TemplateDataBuilder};
use crate::templating::{MarkdownRenderer, Renderer};
use crate::usage::UsageRecorder;

/// Longnames grouped by kind.
///
/// Always holds exactly the eleven kinds of [`Kind::NAMEPATH_KINDS`], in that
/// order; kinds with no identifiers map to an empty list.
pub type Namepaths = BTreeMap<Kind, Vec<String>>;

/// Group the longnames of `entries` by kind, keeping document order.
#[must_use]
pub fn namepaths_of(entries: &[TemplateEntry]) -> Namepaths {
    let mut namepaths: Namepaths = Kind::NAMEPATH_KINDS.iter().map(|kind| (*kind, Vec::new())).collect();
    for entry in entries {
        if let Some(names) = namepaths.get_mut(&entry.kind) {
            names.push(entry.longname.clone());
        }
    }
    namepaths
}

/// Documentation generator facade.
///
/// The type parameters default to the built-in stages; tests and embedders
/// can substitute their own through [`with_parts`](Self::with_parts).
pub struct Jsdoc2Md<E = JsdocExtractor, S = TemplateDataBuilder, R = MarkdownRenderer> {
    extractor: E,
    structurer: S,
    renderer: R,
    usage: Option<Arc<dyn UsageRecorder>>,
}

impl Jsdoc2Md {
    /// Facade with the built-in stages, caching under the default cache root.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(JsdocExtractor::new(), TemplateDataBuilder::new(), MarkdownRenderer::new())
    }
}

impl Default for Jsdoc2Md {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S, R> Jsdoc2Md<E, S, R>
where
    E: Extractor,
    S: Structurer,
    R: Renderer,
{
    pub fn with_parts(extractor: E, structurer: S, renderer: R) -> Self {
        Self {
            extractor,
            structurer,
            renderer,
            usage: None,
        }
    }

    /// Record every public call on `recorder`.
    #[must_use]
    pub fn with_usage(mut self, recorder: Arc<dyn UsageRecorder>) -> Self {
        self.usage = Some(recorder);
        self
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn structurer(&self) -> &S {
        &self.structurer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn record(&self, operation: &'static str) {
        if let Some(usage) = &self.usage {
            usage.record(operation);
        }
    }

    /// Render markdown documentation.
    ///
    /// When `options.data` is set it is rendered as is and the extractor and
    /// structurer are never called.
    ///
    /// # Errors
    ///
    /// Any error raised by a stage, unchanged.
    pub async fn render(&self, options: &Jsdoc2MdOptions) -> Result<String> {
        self.record("render");
        let render_options = RenderOptions::from(options);
        match &options.data {
            Some(data) => {
                debug!("Rendering {} supplied template entries", data.len());
                self.renderer.render(data, &render_options).await
            }
            None => {
                let data = self.template_data(options).await?;
                self.renderer.render(&data, &render_options).await
            }
        }
    }

    /// Blocking variant of [`render`](Self::render); output is identical.
    ///
    /// # Errors
    ///
    /// Any error raised by a stage, unchanged.
    pub fn render_sync(&self, options: &Jsdoc2MdOptions) -> Result<String> {
        self.record("render_sync");
        let render_options = RenderOptions::from(options);
        match &options.data {
            Some(data) => {
                debug!("Rendering {} supplied template entries", data.len());
                self.renderer.render_sync(data, &render_options)
            }
            None => {
                let data = self.template_data_sync(options)?;
                self.renderer.render_sync(&data, &render_options)
            }
        }
    }

    /// Template data: raw doclets run through the structurer.
    ///
    /// # Errors
    ///
    /// Any error raised by the extractor or structurer, unchanged.
    pub async fn get_template_data(&self, options: &Jsdoc2MdOptions) -> Result<Vec<TemplateEntry>> {
        self.record("get_template_data");
        self.template_data(options).await
    }

    /// Blocking variant of [`get_template_data`](Self::get_template_data).
    ///
    /// # Errors
    ///
    /// Any error raised by the extractor or structurer, unchanged.
    pub fn get_template_data_sync(&self, options: &Jsdoc2MdOptions) -> Result<Vec<TemplateEntry>> {
        self.record("get_template_data_sync");
        self.template_data_sync(options)
    }

    /// Raw doclets straight from the extractor.
    ///
    /// # Errors
    ///
    /// Any error raised by the extractor, unchanged.
    pub async fn get_raw_data(&self, options: &Jsdoc2MdOptions) -> Result<Vec<Doclet>> {
        self.record("get_raw_data");
        self.raw_data(options).await
    }

    /// Blocking variant of [`get_raw_data`](Self::get_raw_data).
    ///
    /// # Errors
    ///
    /// Any error raised by the extractor, unchanged.
    pub fn get_raw_data_sync(&self, options: &Jsdoc2MdOptions) -> Result<Vec<Doclet>> {
        self.record("get_raw_data_sync");
        self.extractor.explain_sync(&ExtractOptions::from(options))
    }

    /// Clear the extractor cache, then the renderer cache.
    ///
    /// # Errors
    ///
    /// The first failing clear; the renderer cache is left untouched when the
    /// extractor clear fails.
    pub async fn clear(&self) -> Result<()> {
        self.record("clear");
        self.extractor.clear_cache().await?;
        self.renderer.clear_cache().await?;
        debug!("Cleared extraction and render caches");
        Ok(())
    }

    /// Longnames of every documented identifier, grouped by kind.
    ///
    /// # Errors
    ///
    /// Any error raised by the extractor or structurer, unchanged.
    pub async fn get_namepaths(&self, options: &Jsdoc2MdOptions) -> Result<Namepaths> {
        self.record("get_namepaths");
        let data = self.template_data(options).await?;
        Ok(namepaths_of(&data))
    }

    async fn raw_data(&self, options: &Jsdoc2MdOptions) -> Result<Vec<Doclet>> {
        self.extractor.explain(&ExtractOptions::from(options)).await
    }

    async fn template_data(&self, options: &Jsdoc2MdOptions) -> Result<Vec<TemplateEntry>> {
        let doclets = self.raw_data(options).await?;
        self.structurer.structure(doclets, &ParseOptions::from(options))
    }

    fn template_data_sync(&self, options: &Jsdoc2MdOptions) -> Result<Vec<TemplateEntry>> {
        let doclets = self.extractor.explain_sync(&ExtractOptions::from(options))?;
        self.structurer.structure(doclets, &ParseOptions::from(options))
    }
}
