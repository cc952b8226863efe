//! Markdown rendering of template data.
//!
//! [`Renderer`] is the seam the facade depends on; [`MarkdownRenderer`] is the
//! built-in Tera implementation.
//!
//! # Templates
//!
//! The root template (the `template` option, `{% include "main" %}` by
//! default) is rendered with this context:
//!
//! - `data`: the template entries as returned by `get_template_data`
//! - `options`: the render options with defaults applied
//! - `sections`: one pre-formatted section per documented identifier, in
//!   document order, with `heading`, `level`, `anchor`, `meta`, `params`,
//!   `member_index` and friends
//! - `module_index`, `global_index`, `show_main_index`, `index_heading`
//! - `formats`: the index and list layouts actually in effect (GFM tables
//!   degrade to lists when `gfm` is off)
//!
//! The default layout is built from named partials (`main`, `main-index`,
//! `all-docs`, `docs`, `header`, `params`, `examples` and so on). Any of them
//! can be replaced by passing a file of the same stem through `partial` or a
//! `plugin` directory.
//!
//! # Custom Filters
//!
//! - `heading`: `{{ section.level | heading }}` → `##`
//! - `nest`: indentation for nested member index rows
//! - `code_block`: fenced or indented example code
//! - `anchor`: namepath to anchor name
//! - `linkify`: resolve `{@link}` tags against this render's anchors

mod error;
mod filters;
mod loader;
mod renderer;
mod view;

use anyhow::Result;
use std::future::Future;
use tracing::{debug, warn};

use crate::cache::FileCache;
use crate::config::RENDER_CACHE;
use crate::models::TemplateEntry;
use crate::options::RenderOptions;

use loader::UserTemplates;

/// Turns template data into markdown.
///
/// [`render`](Self::render) and [`render_sync`](Self::render_sync) must agree
/// for the same input.
pub trait Renderer: Send + Sync {
    /// Render without blocking the runtime on template file IO.
    fn render(&self, data: &[TemplateEntry], options: &RenderOptions) -> impl Future<Output = Result<String>> + Send;

    /// Blocking variant of [`render`](Self::render).
    fn render_sync(&self, data: &[TemplateEntry], options: &RenderOptions) -> Result<String>;

    /// Drop every memoized result.
    fn clear_cache(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Built-in [`Renderer`] on top of Tera.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    cache: Option<FileCache>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Renderer caching under the default cache root.
    ///
    /// When no cache root can be determined, caching is disabled.
    #[must_use]
    pub fn new() -> Self {
        let cache = match FileCache::in_default_root(RENDER_CACHE) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Render cache disabled: {e:#}");
                None
            }
        };
        Self {
            cache,
        }
    }

    #[must_use]
    pub fn with_cache(cache: FileCache) -> Self {
        Self {
            cache: Some(cache),
        }
    }

    #[must_use]
    pub fn without_cache() -> Self {
        Self {
            cache: None,
        }
    }

    fn active_cache(&self, options: &RenderOptions) -> Option<&FileCache> {
        self.cache.as_ref().filter(|_| options.cache)
    }

    fn cache_key(data: &[TemplateEntry], options: &RenderOptions, user: &UserTemplates) -> Result<String> {
        let mut parts = vec![
            env!("CARGO_PKG_VERSION").to_string(),
            serde_json::to_string(options)?,
            serde_json::to_string(data)?,
        ];
        for file in user.iter() {
            parts.push(file.name.clone());
            parts.push(file.content.clone());
        }
        Ok(FileCache::key(parts))
    }
}

impl Renderer for MarkdownRenderer {
    async fn render(&self, data: &[TemplateEntry], options: &RenderOptions) -> Result<String> {
        let user = UserTemplates::load_async(options).await?;

        let cache = self.active_cache(options);
        let key = Self::cache_key(data, options, &user)?;
        if let Some(cache) = cache
            && let Some(markdown) = cache.read_async::<String>(&key).await
        {
            debug!("Render cache hit {}", key);
            return Ok(markdown);
        }

        let markdown = renderer::render_markdown(data, options, &user)?;

        if let Some(cache) = cache
            && let Err(e) = cache.write_async(&key, &markdown).await
        {
            warn!("Failed to cache rendered markdown: {e:#}");
        }
        Ok(markdown)
    }

    fn render_sync(&self, data: &[TemplateEntry], options: &RenderOptions) -> Result<String> {
        let user = UserTemplates::load(options)?;

        let cache = self.active_cache(options);
        let key = Self::cache_key(data, options, &user)?;
        if let Some(cache) = cache
            && let Some(markdown) = cache.read::<String>(&key)
        {
            debug!("Render cache hit {}", key);
            return Ok(markdown);
        }

        let markdown = renderer::render_markdown(data, options, &user)?;

        if let Some(cache) = cache
            && let Err(e) = cache.write(&key, &markdown)
        {
            warn!("Failed to cache rendered markdown: {e:#}");
        }
        Ok(markdown)
    }

    async fn clear_cache(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.clear_async().await,
            None => Ok(()),
        }
    }
}
