//! Input discovery from a jsdoc configuration file.
//!
//! Only the parts of the jsdoc conf format that select input files are
//! honoured: `source.include`, `source.exclude`, `source.includePattern`,
//! `source.excludePattern` and `opts.recurse`.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::parse_config;
use crate::core::DocError;

const DEFAULT_INCLUDE: &str = r".+\.js(doc|x)?$";
const DEFAULT_INCLUDE_HTML: &str = r".+\.(js(doc|x)?|html?)$";
const DEFAULT_EXCLUDE: &str = r"(^|\/|\\)_";
/// jsdoc's own depth limit for `--recurse`.
const RECURSE_DEPTH: usize = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct JsdocConf {
    pub source: SourceConf,
    pub opts: OptsConf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SourceConf {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub include_pattern: Option<String>,
    pub exclude_pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OptsConf {
    pub recurse: bool,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        DocError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

impl JsdocConf {
    /// Load a conf file: JSON for `.json` files, TOML otherwise.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        parse_config(path).with_context(|| format!("Failed to load jsdoc configuration: {}", path.display()))
    }

    /// Resolve the configured inputs, relative to `base`, into a sorted file list.
    pub(crate) fn collect_files(&self, base: &Path, html: bool) -> Result<Vec<PathBuf>> {
        let default_include = if html { DEFAULT_INCLUDE_HTML } else { DEFAULT_INCLUDE };
        let include = compile(self.source.include_pattern.as_deref().unwrap_or(default_include))?;
        let exclude = compile(self.source.exclude_pattern.as_deref().unwrap_or(DEFAULT_EXCLUDE))?;
        let excluded: Vec<PathBuf> = self.source.exclude.iter().map(|p| base.join(p)).collect();
        let depth = if self.opts.recurse { RECURSE_DEPTH } else { 1 };

        let mut files = Vec::new();
        for entry in &self.source.include {
            let root = base.join(entry);
            if root.is_file() {
                files.push(root);
                continue;
            }

            for item in WalkDir::new(&root).max_depth(depth).sort_by_file_name() {
                let item = item.with_context(|| format!("Failed to walk {}", root.display()))?;
                if !item.file_type().is_file() {
                    continue;
                }
                let text = item.path().to_string_lossy();
                if include.is_match(&text) && !exclude.is_match(&text) {
                    files.push(item.into_path());
                }
            }
        }

        files.retain(|file| !excluded.iter().any(|ex| file.starts_with(ex)));
        files.sort();
        files.dedup();
        debug!("jsdoc configuration selected {} files", files.len());
        Ok(files)
    }
}
