//! Loading of user-supplied plugin, partial and helper files.
//!
//! Each path option accepts a file, a directory (its files are taken, not
//! recursively) or a glob pattern. Templates are registered under their file
//! name up to the first `.`, so `partials/header.hbs.tera` overrides the
//! built-in `header` partial.

use anyhow::Result;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::DocError;
use crate::options::RenderOptions;

/// A template read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TemplateFile {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Every user template for one render, grouped by role.
#[derive(Debug, Clone, Default)]
pub(crate) struct UserTemplates {
    pub plugins: Vec<TemplateFile>,
    pub partials: Vec<TemplateFile>,
    pub helpers: Vec<TemplateFile>,
}

/// Name a template is registered under.
pub(crate) fn template_name(path: &Path) -> String {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

fn missing(path: &Path, reason: impl Into<String>) -> DocError {
    DocError::TemplateFile {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn is_glob(path: &Path) -> bool {
    path.to_string_lossy().contains(['*', '?', '['])
}

/// Expand file, directory and glob arguments into files, in argument order.
pub(crate) fn expand(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let mut found: Vec<PathBuf> = if is_glob(path) {
            let pattern = path.to_string_lossy();
            let matches = glob::glob(&pattern).map_err(|e| missing(path, e.to_string()))?;
            let found: Vec<PathBuf> = matches.filter_map(Result::ok).filter(|p| p.is_file()).collect();
            if found.is_empty() {
                return Err(missing(path, "pattern matched no files").into());
            }
            found
        } else if path.is_dir() {
            std::fs::read_dir(path)
                .map_err(|e| missing(path, e.to_string()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .filter(|p| !p.file_name().is_some_and(|n| n.to_string_lossy().starts_with('.')))
                .collect()
        } else if path.is_file() {
            vec![path.clone()]
        } else {
            return Err(missing(path, "no such file or directory").into());
        };

        found.sort();
        for file in found {
            if !files.contains(&file) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

fn read_all(paths: &[PathBuf]) -> Result<Vec<TemplateFile>> {
    expand(paths)?
        .into_iter()
        .map(|path| {
            let content = std::fs::read_to_string(&path).map_err(|e| missing(&path, e.to_string()))?;
            Ok(TemplateFile {
                name: template_name(&path),
                path,
                content,
            })
        })
        .collect()
}

async fn read_all_async(paths: &[PathBuf]) -> Result<Vec<TemplateFile>> {
    try_join_all(expand(paths)?.into_iter().map(|path| async move {
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| missing(&path, e.to_string()))?;
        Ok::<_, anyhow::Error>(TemplateFile {
            name: template_name(&path),
            path,
            content,
        })
    }))
    .await
}

/// Plugins are directories of partial overrides; a plugin given as a bare
/// directory contributes its files, and one with a `partials/` subdirectory
/// contributes that instead.
fn plugin_paths(plugins: &[PathBuf]) -> Vec<PathBuf> {
    plugins
        .iter()
        .map(|plugin| {
            let nested = plugin.join("partials");
            if nested.is_dir() { nested } else { plugin.clone() }
        })
        .collect()
}

impl UserTemplates {
    pub(crate) fn load(options: &RenderOptions) -> Result<Self> {
        let templates = Self {
            plugins: read_all(&plugin_paths(&options.plugin))?,
            partials: read_all(&options.partial)?,
            helpers: read_all(&options.helper)?,
        };
        templates.log();
        Ok(templates)
    }

    pub(crate) async fn load_async(options: &RenderOptions) -> Result<Self> {
        let templates = Self {
            plugins: read_all_async(&plugin_paths(&options.plugin)).await?,
            partials: read_all_async(&options.partial).await?,
            helpers: read_all_async(&options.helper).await?,
        };
        templates.log();
        Ok(templates)
    }

    fn log(&self) {
        if !self.is_empty() {
            debug!(
                "Loaded {} plugin, {} partial and {} helper templates",
                self.plugins.len(),
                self.partials.len(),
                self.helpers.len()
            );
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.plugins.is_empty() && self.partials.is_empty() && self.helpers.is_empty()
    }

    /// Every file in load order, for cache keys.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TemplateFile> {
        self.plugins.iter().chain(&self.partials).chain(&self.helpers)
    }
}
