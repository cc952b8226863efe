//! Configuration discovery and cache location.
//!
//! # Option Files
//!
//! The CLI looks for an options file in the working directory, first
//! `.jsdoc2md.toml` then `.jsdoc2md.json`. Its keys are the kebab-case
//! [`Jsdoc2MdOptions`] fields; command-line flags override them.
//!
//! # Cache Location
//!
//! 1. `JSDOC2MD_CACHE_DIR` environment variable (if set)
//! 2. The platform cache directory joined with `jsdoc2md`
//!    (`~/.cache/jsdoc2md` on Linux)
//!
//! The extractor and renderer each keep a subdirectory below it, see
//! [`EXPLAIN_CACHE`] and [`RENDER_CACHE`].

mod parser;

pub use parser::parse_config;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::options::Jsdoc2MdOptions;

/// Option file names searched in order.
pub const OPTION_FILES: [&str; 2] = [".jsdoc2md.toml", ".jsdoc2md.json"];

/// Subdirectory of the cache root used by the extractor.
pub const EXPLAIN_CACHE: &str = "explain";

/// Subdirectory of the cache root used by the renderer.
pub const RENDER_CACHE: &str = "render";

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "JSDOC2MD_CACHE_DIR";

/// Get the cache root for jsdoc2md.
///
/// The directory is not created here; caches create it on first write.
///
/// # Errors
///
/// Returns an error if no override is set and the platform cache directory
/// cannot be determined.
pub fn get_cache_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    let dir = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .ok_or_else(|| anyhow::anyhow!("Unable to determine cache directory"))?;

    Ok(dir.join("jsdoc2md"))
}

/// Find the first option file present in `dir`.
#[must_use]
pub fn find_options_file(dir: &Path) -> Option<PathBuf> {
    OPTION_FILES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

/// Load options from `explicit`, or from the option file discovered in `dir`.
///
/// Returns default options when no file is given and none is found.
///
/// # Errors
///
/// Fails if the chosen file cannot be read or parsed.
pub fn load_options(explicit: Option<&Path>, dir: &Path) -> Result<Jsdoc2MdOptions> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_options_file(dir),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading options from {}", path.display());
            parse_config(&path)
        }
        None => Ok(Jsdoc2MdOptions::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_options_file_prefers_toml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".jsdoc2md.json"), "{}").unwrap();
        assert_eq!(find_options_file(temp.path()), Some(temp.path().join(".jsdoc2md.json")));

        std::fs::write(temp.path().join(".jsdoc2md.toml"), "").unwrap();
        assert_eq!(find_options_file(temp.path()), Some(temp.path().join(".jsdoc2md.toml")));
    }

    #[test]
    fn test_load_options_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let options = load_options(None, temp.path()).unwrap();
        assert_eq!(options, Jsdoc2MdOptions::default());
    }

    #[test]
    fn test_load_options_from_json_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".jsdoc2md.json"),
            r#"{"files": ["src/*.js"], "separators": true}"#,
        )
        .unwrap();

        let options = load_options(None, temp.path()).unwrap();
        assert_eq!(options.files, vec!["src/*.js"]);
        assert!(options.separators);
    }

    #[test]
    fn test_cache_dir_ends_with_name() {
        if std::env::var(CACHE_DIR_ENV).is_ok() {
            return;
        }
        let dir = get_cache_dir().unwrap();
        assert!(dir.ends_with("jsdoc2md"));
    }
}
