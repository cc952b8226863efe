//! Isolated test environment
//!
//! A temporary project directory for source files plus private cache
//! directories, so tests never touch the user's real cache.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::SourceFixture;
use crate::cache::FileCache;
use crate::config::{EXPLAIN_CACHE, RENDER_CACHE};
use crate::extract::JsdocExtractor;
use crate::facade::Jsdoc2Md;
use crate::structure::TemplateDataBuilder;
use crate::templating::MarkdownRenderer;

/// Temporary project with its own caches
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub project_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let cache_dir = temp_dir.path().join("cache");
        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&cache_dir)?;

        Ok(Self {
            temp_dir,
            project_dir,
            cache_dir,
        })
    }

    /// Environment with the given fixtures written to the project directory
    pub fn with_sources(fixtures: &[SourceFixture]) -> Result<Self> {
        let env = Self::new()?;
        for fixture in fixtures {
            fixture.write_to(&env.project_dir)?;
        }
        Ok(env)
    }

    pub fn explain_cache(&self) -> FileCache {
        FileCache::new(self.cache_dir.join(EXPLAIN_CACHE))
    }

    pub fn render_cache(&self) -> FileCache {
        FileCache::new(self.cache_dir.join(RENDER_CACHE))
    }

    /// Facade with the built-in stages, caching inside this environment and
    /// resolving globs against the project directory
    pub fn facade(&self) -> Jsdoc2Md {
        Jsdoc2Md::with_parts(
            JsdocExtractor::with_cache(self.explain_cache()).with_base_dir(&self.project_dir),
            TemplateDataBuilder::new(),
            MarkdownRenderer::with_cache(self.render_cache()),
        )
    }

    /// Path of a file inside the project directory
    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir.join(relative)
    }

    pub fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }
}
