//! Shared test doubles and helpers
//!
//! The recording stages log every call into one shared [`CallLog`], so a test
//! can assert both which stages ran and in what order.

// Not every helper is used by every test target.
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jsdoc2md::Jsdoc2Md;
use jsdoc2md::config::CACHE_DIR_ENV;
use jsdoc2md::core::{DocError, Kind};
use jsdoc2md::extract::Extractor;
use jsdoc2md::models::{Doclet, TemplateEntry};
use jsdoc2md::options::{ExtractOptions, ParseOptions, RenderOptions};
use jsdoc2md::structure::Structurer;
use jsdoc2md::templating::Renderer;

/// Ordered record of stage calls.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

/// Extractor returning fixed doclets, failing with `NoInput` like the real one.
pub struct RecordingExtractor {
    pub log: Arc<CallLog>,
    pub doclets: Vec<Doclet>,
    pub fail_clear: bool,
}

impl RecordingExtractor {
    pub fn new(log: Arc<CallLog>, doclets: Vec<Doclet>) -> Self {
        Self {
            log,
            doclets,
            fail_clear: false,
        }
    }

    fn result(&self, options: &ExtractOptions) -> Result<Vec<Doclet>> {
        if !options.has_input() {
            return Err(DocError::NoInput.into());
        }
        Ok(self.doclets.clone())
    }
}

impl Extractor for RecordingExtractor {
    async fn explain(&self, options: &ExtractOptions) -> Result<Vec<Doclet>> {
        self.log.push("explain");
        self.result(options)
    }

    fn explain_sync(&self, options: &ExtractOptions) -> Result<Vec<Doclet>> {
        self.log.push("explain_sync");
        self.result(options)
    }

    async fn clear_cache(&self) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if self.fail_clear {
            self.log.push("extractor.clear failed");
            return Err(DocError::Other {
                message: "cache is read-only".to_string(),
            }
            .into());
        }
        self.log.push("extractor.clear");
        Ok(())
    }
}

/// Structurer mapping every doclet to a bare entry.
pub struct RecordingStructurer {
    pub log: Arc<CallLog>,
}

impl Structurer for RecordingStructurer {
    fn structure(&self, doclets: Vec<Doclet>, _options: &ParseOptions) -> Result<Vec<TemplateEntry>> {
        self.log.push("structure");
        Ok(doclets
            .into_iter()
            .filter(|d| d.kind != Kind::Package)
            .map(|d| TemplateEntry::new(d.kind, d.name, d.longname))
            .collect())
    }
}

/// Renderer joining longnames, so output is a pure function of the data.
pub struct RecordingRenderer {
    pub log: Arc<CallLog>,
}

impl RecordingRenderer {
    fn output(data: &[TemplateEntry]) -> String {
        data.iter().map(|e| e.longname.as_str()).collect::<Vec<_>>().join(",")
    }
}

impl Renderer for RecordingRenderer {
    async fn render(&self, data: &[TemplateEntry], _options: &RenderOptions) -> Result<String> {
        self.log.push("render");
        Ok(Self::output(data))
    }

    fn render_sync(&self, data: &[TemplateEntry], _options: &RenderOptions) -> Result<String> {
        self.log.push("render_sync");
        Ok(Self::output(data))
    }

    async fn clear_cache(&self) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.log.push("renderer.clear");
        Ok(())
    }
}

pub type RecordingFacade = Jsdoc2Md<RecordingExtractor, RecordingStructurer, RecordingRenderer>;

/// Facade over recording doubles that share `log`.
pub fn recording_facade(log: &Arc<CallLog>, doclets: Vec<Doclet>) -> RecordingFacade {
    Jsdoc2Md::with_parts(
        RecordingExtractor::new(Arc::clone(log), doclets),
        RecordingStructurer {
            log: Arc::clone(log),
        },
        RecordingRenderer {
            log: Arc::clone(log),
        },
    )
}

/// The `jsdoc2md` binary, run in `dir` with its cache under `cache_dir`.
pub fn jsdoc2md_cmd(dir: &Path, cache_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jsdoc2md").unwrap();
    cmd.current_dir(dir).env(CACHE_DIR_ENV, cache_dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}
