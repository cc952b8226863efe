//! Command-line interface for jsdoc2md.
//!
//! The binary is a thin shell over [`Jsdoc2Md`]: it merges an options file
//! with command-line flags, picks one output mode and writes the result to
//! stdout. Logs go to stderr.
//!
//! # Output Modes
//!
//! | Flag | Output |
//! |------|--------|
//! | *(none)* | rendered markdown |
//! | `--json` | template data as pretty JSON |
//! | `--jsdoc` | raw doclets as pretty JSON |
//! | `--namepaths` | longnames grouped by kind as pretty JSON |
//! | `--clear` | clears both caches, prints nothing |
//! | `--print-config` | merged options as pretty JSON |
//!
//! # Options File
//!
//! `.jsdoc2md.toml` or `.jsdoc2md.json` in the working directory (or the file
//! given with `--config`) supplies defaults. Flags override it: a flag that is
//! set replaces the file value, a flag that is absent leaves it alone.
//!
//! # Example
//!
//! ```bash
//! # Render every module in lib/
//! jsdoc2md "lib/**/*.js" > API.md
//!
//! # Inspect what the extractor sees
//! jsdoc2md --jsdoc lib/shapes.js
//!
//! # Custom layout with a partial override and no GFM
//! jsdoc2md --partial docs/header.tera --no-gfm lib/*.js
//! ```

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::load_options;
use crate::extract::Extractor;
use crate::facade::Jsdoc2Md;
use crate::models::TemplateEntry;
use crate::options::{IndexFormat, Jsdoc2MdOptions, ListFormat, MemberIndexFormat, NameFormat};
use crate::structure::Structurer;
use crate::templating::Renderer;

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can run commands without touching the
/// process-wide logger.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` defers to `RUST_LOG`, then `warn`.
    pub log_level: Option<String>,
    /// Options file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr log subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// What a run prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Markdown,
    TemplateData,
    RawData,
    Namepaths,
    Clear,
    PrintConfig,
}

/// Generate markdown API documentation from JSDoc-annotated JavaScript.
#[derive(Parser, Debug, Default)]
#[command(name = "jsdoc2md", version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").args(["json", "jsdoc", "namepaths", "clear", "print_config"])))]
pub struct Cli {
    /// Source files or glob patterns to document.
    pub files: Vec<String>,

    /// Document this source text instead of files.
    #[arg(long)]
    pub source: Option<String>,

    /// jsdoc-style JSON configuration file selecting the input files.
    #[arg(short = 'c', long)]
    pub configure: Option<PathBuf>,

    /// Render pre-built template data from a JSON file (skips extraction).
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Root template file.
    #[arg(short = 't', long)]
    pub template: Option<PathBuf>,

    /// Print template data instead of markdown.
    #[arg(long)]
    pub json: bool,

    /// Print raw doclets instead of markdown.
    #[arg(long)]
    pub jsdoc: bool,

    /// Print the longnames of every identifier grouped by kind.
    #[arg(long)]
    pub namepaths: bool,

    /// Clear the extraction and render caches, then exit.
    #[arg(long)]
    pub clear: bool,

    /// Print the merged options and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Heading level of top-level sections.
    #[arg(short = 'd', long)]
    pub heading_depth: Option<usize>,

    /// Language tag for fenced example blocks.
    #[arg(long)]
    pub example_lang: Option<String>,

    /// Directories or files of partial overrides.
    #[arg(long, num_args = 1..)]
    pub plugin: Vec<PathBuf>,

    /// Macro library files importable from templates.
    #[arg(long, num_args = 1..)]
    pub helper: Vec<PathBuf>,

    /// Partial template files overriding built-ins of the same name.
    #[arg(long, num_args = 1..)]
    pub partial: Vec<PathBuf>,

    /// Identifier style: plain or backticks.
    #[arg(long)]
    pub name_format: Option<NameFormat>,

    /// Plain markdown: no tables and no fenced code.
    #[arg(long)]
    pub no_gfm: bool,

    /// Put a rule between identifiers.
    #[arg(long)]
    pub separators: bool,

    /// none, grouped, table or dl.
    #[arg(long)]
    pub module_index_format: Option<IndexFormat>,

    /// none, grouped, table or dl.
    #[arg(long)]
    pub global_index_format: Option<IndexFormat>,

    /// grouped or list.
    #[arg(long)]
    pub member_index_format: Option<MemberIndexFormat>,

    /// table or list.
    #[arg(long)]
    pub param_list_format: Option<ListFormat>,

    /// table or list.
    #[arg(long)]
    pub property_list_format: Option<ListFormat>,

    /// Bypass the caches for this run.
    #[arg(long)]
    pub no_cache: bool,

    /// Include identifiers marked @private.
    #[arg(long)]
    pub private: bool,

    /// Experimental: document <script> blocks of .html files.
    #[arg(long)]
    pub html: bool,

    /// Show debug output.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Options file to use instead of the discovered one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse arguments, set up logging and run against the built-in stages.
    ///
    /// # Errors
    ///
    /// Any error raised while loading options or running the operation.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(&Jsdoc2Md::new(), config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };
        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run with an explicit facade and print the result to stdout.
    ///
    /// # Errors
    ///
    /// Any error raised while loading options or running the operation.
    pub async fn execute_with_config<E, S, R>(&self, jsdoc2md: &Jsdoc2Md<E, S, R>, config: CliConfig) -> Result<()>
    where
        E: Extractor,
        S: Structurer,
        R: Renderer,
    {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let options = self.resolve_options(config.config_path.as_deref(), &cwd)?;

        if self.output_mode() == OutputMode::Clear {
            jsdoc2md.clear().await?;
            if !self.quiet {
                eprintln!("{}", "Cache cleared".green());
            }
            return Ok(());
        }

        let output = self.run(jsdoc2md, &options).await?;
        print!("{output}");
        Ok(())
    }

    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::TemplateData
        } else if self.jsdoc {
            OutputMode::RawData
        } else if self.namepaths {
            OutputMode::Namepaths
        } else if self.clear {
            OutputMode::Clear
        } else if self.print_config {
            OutputMode::PrintConfig
        } else {
            OutputMode::Markdown
        }
    }

    /// Produce the text for the selected output mode.
    ///
    /// # Errors
    ///
    /// Any error raised by the facade or while serializing its result.
    pub async fn run<E, S, R>(&self, jsdoc2md: &Jsdoc2Md<E, S, R>, options: &Jsdoc2MdOptions) -> Result<String>
    where
        E: Extractor,
        S: Structurer,
        R: Renderer,
    {
        let json = match self.output_mode() {
            OutputMode::Markdown => return jsdoc2md.render(options).await,
            OutputMode::Clear => {
                jsdoc2md.clear().await?;
                return Ok(String::new());
            }
            OutputMode::TemplateData => serde_json::to_string_pretty(&jsdoc2md.get_template_data(options).await?)?,
            OutputMode::RawData => serde_json::to_string_pretty(&jsdoc2md.get_raw_data(options).await?)?,
            OutputMode::Namepaths => serde_json::to_string_pretty(&jsdoc2md.get_namepaths(options).await?)?,
            OutputMode::PrintConfig => serde_json::to_string_pretty(options)?,
        };
        Ok(format!("{json}\n"))
    }

    /// Options file merged with the flags of this invocation.
    ///
    /// # Errors
    ///
    /// Fails if the options file, `--template` or `--data` cannot be read.
    pub fn resolve_options(&self, config_path: Option<&Path>, cwd: &Path) -> Result<Jsdoc2MdOptions> {
        let base = load_options(config_path, cwd)?;
        Ok(base.merge(self.flag_options()?))
    }

    fn flag_options(&self) -> Result<Jsdoc2MdOptions> {
        let template = self
            .template
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template: {}", path.display()))
            })
            .transpose()?;

        let data = self
            .data
            .as_ref()
            .map(|path| -> Result<Vec<TemplateEntry>> {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template data: {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse template data: {}", path.display()))
            })
            .transpose()?;

        Ok(Jsdoc2MdOptions {
            files: self.files.clone(),
            source: self.source.clone(),
            data,
            template,
            heading_depth: self.heading_depth,
            example_lang: self.example_lang.clone(),
            plugin: self.plugin.clone(),
            helper: self.helper.clone(),
            partial: self.partial.clone(),
            name_format: self.name_format,
            no_gfm: self.no_gfm,
            separators: self.separators,
            module_index_format: self.module_index_format,
            global_index_format: self.global_index_format,
            member_index_format: self.member_index_format,
            param_list_format: self.param_list_format,
            property_list_format: self.property_list_format,
            no_cache: self.no_cache,
            configure: self.configure.clone(),
            html: self.html,
            private: self.private,
        })
    }
}
