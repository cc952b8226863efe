//! Doclet extraction from JavaScript source.
//!
//! The [`Extractor`] trait is the seam the facade depends on; [`JsdocExtractor`]
//! is the built-in implementation. It resolves the configured input (inline
//! source, glob patterns, or a jsdoc configuration file), scans every file for
//! doc comments and turns each one into a [`Doclet`]. The output always ends
//! with a `package` doclet listing the input files.
//!
//! # Caching
//!
//! Results are memoized in a [`FileCache`] keyed by the extraction options and
//! the content of every input file, so an edit to any file is a miss.
//! Disable caching per call with [`ExtractOptions::cache`].
//!
//! # Example
//!
//! ```rust,no_run
//! use jsdoc2md::extract::{Extractor, JsdocExtractor};
//! use jsdoc2md::options::ExtractOptions;
//!
//! # fn example() -> anyhow::Result<()> {
//! let extractor = JsdocExtractor::new();
//! let options = ExtractOptions {
//!     source: Some("/** Adds. */\nfunction add (a, b) {}".to_string()),
//!     ..ExtractOptions::default()
//! };
//! let doclets = extractor.explain_sync(&options)?;
//! assert_eq!(doclets[0].longname, "add");
//! # Ok(())
//! # }
//! ```

mod builder;
mod conf;
mod html;
mod scanner;
mod tags;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cache::FileCache;
use crate::config::EXPLAIN_CACHE;
use crate::core::DocError;
use crate::models::Doclet;
use crate::options::ExtractOptions;

use builder::DocletBuilder;
use conf::JsdocConf;

/// Source of raw doclets.
///
/// Implementations must return the same doclets from [`explain`](Self::explain)
/// and [`explain_sync`](Self::explain_sync) for the same options.
pub trait Extractor: Send + Sync {
    /// Extract doclets without blocking the runtime on file IO.
    fn explain(&self, options: &ExtractOptions) -> impl Future<Output = Result<Vec<Doclet>>> + Send;

    /// Blocking variant of [`explain`](Self::explain).
    fn explain_sync(&self, options: &ExtractOptions) -> Result<Vec<Doclet>>;

    /// Drop every memoized result.
    fn clear_cache(&self) -> impl Future<Output = Result<()>> + Send;
}

/// One loaded input; `path` is `None` for inline source.
#[derive(Debug)]
struct Input {
    path: Option<PathBuf>,
    text: String,
}

/// Where the input comes from once options are resolved.
#[derive(Debug, PartialEq, Eq)]
enum InputPlan {
    Source(String),
    Files(Vec<PathBuf>),
}

/// Built-in extractor for jsdoc-style comments.
#[derive(Debug, Clone)]
pub struct JsdocExtractor {
    cache: Option<FileCache>,
    base_dir: Option<PathBuf>,
}

impl Default for JsdocExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl JsdocExtractor {
    /// Extractor caching under the default cache root.
    ///
    /// When no cache root can be determined, caching is disabled.
    #[must_use]
    pub fn new() -> Self {
        let cache = match FileCache::in_default_root(EXPLAIN_CACHE) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Extraction cache disabled: {e:#}");
                None
            }
        };
        Self {
            cache,
            base_dir: None,
        }
    }

    /// Extractor using a specific cache.
    #[must_use]
    pub fn with_cache(cache: FileCache) -> Self {
        Self {
            cache: Some(cache),
            base_dir: None,
        }
    }

    /// Extractor that never caches.
    #[must_use]
    pub fn without_cache() -> Self {
        Self {
            cache: None,
            base_dir: None,
        }
    }

    /// Resolve relative globs and configuration includes against `dir`
    /// instead of the process working directory.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn base_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    fn active_cache(&self, options: &ExtractOptions) -> Option<&FileCache> {
        self.cache.as_ref().filter(|_| options.cache)
    }

    fn plan(&self, options: &ExtractOptions) -> Result<InputPlan> {
        if let Some(source) = &options.source {
            if !options.files.is_empty() {
                warn!("Both source and files were supplied; documenting the source text only");
            }
            return Ok(InputPlan::Source(source.clone()));
        }

        let base = self.base_dir()?;

        if !options.files.is_empty() {
            let files = expand_globs(&base, &options.files)?;
            if files.is_empty() {
                return Err(DocError::FilesNotFound {
                    patterns: options.files.clone(),
                }
                .into());
            }
            return Ok(InputPlan::Files(files));
        }

        if let Some(path) = &options.configure {
            let conf = JsdocConf::load(&base.join(path))?;
            let files = conf.collect_files(&base, options.html)?;
            if files.is_empty() {
                return Err(DocError::FilesNotFound {
                    patterns: conf.source.include,
                }
                .into());
            }
            return Ok(InputPlan::Files(files));
        }

        Err(DocError::NoInput.into())
    }

    fn cache_key(options: &ExtractOptions, inputs: &[Input]) -> Result<String> {
        let mut parts = vec![
            env!("CARGO_PKG_VERSION").to_string(),
            serde_json::to_string(&(options.html, &options.configure))
                .context("Failed to serialize extraction options")?,
        ];
        for input in inputs {
            parts.push(input.path.as_ref().map(|p| p.display().to_string()).unwrap_or_default());
            parts.push(input.text.clone());
        }
        Ok(FileCache::key(parts))
    }

    fn parse(inputs: &[Input], html: bool) -> Result<Vec<Doclet>> {
        let mut doclets = Vec::new();
        let mut files = Vec::new();

        for input in inputs {
            let label = input
                .path
                .as_ref()
                .map_or_else(|| "source".to_string(), |p| p.display().to_string());

            let is_html = html && input.path.as_deref().is_some_and(is_html_file);
            let text = if is_html {
                html::script_bodies(&input.text)
            } else {
                input.text.clone()
            };

            let blocks = scanner::scan(&text, &label)?;
            let mut builder = DocletBuilder::new(input.path.as_deref());
            for block in &blocks {
                builder.add(block);
            }
            let found = builder.finish();
            debug!("{}: {} doc comments, {} doclets", label, blocks.len(), found.len());
            doclets.extend(found);

            if input.path.is_some() {
                files.push(label);
            }
        }

        doclets.push(Doclet::package(files));
        Ok(doclets)
    }
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Expand glob patterns in order, dropping duplicates and directories.
fn expand_globs(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let full = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            base.join(pattern).to_string_lossy().into_owned()
        };

        let matches = glob::glob(&full).map_err(|e| DocError::InvalidGlob {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut found: Vec<PathBuf> = matches.filter_map(Result::ok).filter(|p| p.is_file()).collect();
        found.sort();
        if found.is_empty() {
            debug!("Pattern '{}' matched no files", pattern);
        }
        for path in found {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

impl Extractor for JsdocExtractor {
    async fn explain(&self, options: &ExtractOptions) -> Result<Vec<Doclet>> {
        let inputs = match self.plan(options)? {
            InputPlan::Source(text) => vec![Input {
                path: None,
                text,
            }],
            InputPlan::Files(paths) => {
                try_join_all(paths.into_iter().map(|path| async move {
                    let text = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
                    Ok::<_, anyhow::Error>(Input {
                        path: Some(path),
                        text,
                    })
                }))
                .await?
            }
        };

        let cache = self.active_cache(options);
        let key = Self::cache_key(options, &inputs)?;
        if let Some(cache) = cache
            && let Some(doclets) = cache.read_async::<Vec<Doclet>>(&key).await
        {
            debug!("Extraction cache hit {}", key);
            return Ok(doclets);
        }

        let doclets = Self::parse(&inputs, options.html)?;

        if let Some(cache) = cache
            && let Err(e) = cache.write_async(&key, &doclets).await
        {
            warn!("Failed to cache extraction result: {e:#}");
        }
        Ok(doclets)
    }

    fn explain_sync(&self, options: &ExtractOptions) -> Result<Vec<Doclet>> {
        let inputs = match self.plan(options)? {
            InputPlan::Source(text) => vec![Input {
                path: None,
                text,
            }],
            InputPlan::Files(paths) => paths
                .into_iter()
                .map(|path| {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
                    Ok(Input {
                        path: Some(path),
                        text,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        };

        let cache = self.active_cache(options);
        let key = Self::cache_key(options, &inputs)?;
        if let Some(cache) = cache
            && let Some(doclets) = cache.read::<Vec<Doclet>>(&key)
        {
            debug!("Extraction cache hit {}", key);
            return Ok(doclets);
        }

        let doclets = Self::parse(&inputs, options.html)?;

        if let Some(cache) = cache
            && let Err(e) = cache.write(&key, &doclets)
        {
            warn!("Failed to cache extraction result: {e:#}");
        }
        Ok(doclets)
    }

    async fn clear_cache(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.clear_async().await,
            None => Ok(()),
        }
    }
}
