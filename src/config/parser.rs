//! Generic configuration parsing utilities.
//!
//! Configuration files are either TOML or JSON, chosen by extension. Any
//! [`serde::de::DeserializeOwned`] type can be loaded; read and parse failures
//! carry the file path in their context.
//!
//! ```rust,no_run
//! use jsdoc2md::config::parse_config;
//! use jsdoc2md::options::Jsdoc2MdOptions;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let options: Jsdoc2MdOptions = parse_config(Path::new(".jsdoc2md.toml"))?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::DocError;

/// Parse a TOML or JSON configuration file into the specified type.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or a [`DocError::ConfigParse`]
/// if its content does not deserialize into `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(path, &content)
}

/// Parse already-loaded configuration text, using `path` only to pick the format
/// and label errors.
pub(crate) fn parse_config_str<T>(path: &Path, content: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        toml::from_str(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| {
        DocError::ConfigParse {
            path: path.display().to_string(),
            reason,
        }
        .into()
    })
}
