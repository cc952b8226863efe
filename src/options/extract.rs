use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Jsdoc2MdOptions;

/// Extractor options.
///
/// Exactly one input source is expected: `source` is used when present,
/// otherwise `files`, otherwise the `source.include` list of the
/// `configure` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub files: Vec<String>,
    pub source: Option<String>,
    pub configure: Option<PathBuf>,
    pub html: bool,
    pub cache: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            source: None,
            configure: None,
            html: false,
            cache: true,
        }
    }
}

impl ExtractOptions {
    /// Whether any input source is configured at all.
    #[must_use]
    pub fn has_input(&self) -> bool {
        self.source.is_some() || !self.files.is_empty() || self.configure.is_some()
    }
}

impl From<&Jsdoc2MdOptions> for ExtractOptions {
    fn from(options: &Jsdoc2MdOptions) -> Self {
        Self {
            files: options.files.clone(),
            source: options.source.clone(),
            configure: options.configure.clone(),
            html: options.html,
            cache: !options.no_cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_from_unified() {
        let options = Jsdoc2MdOptions {
            files: vec!["src/*.js".to_string()],
            no_cache: true,
            html: true,
            heading_depth: Some(5),
            ..Jsdoc2MdOptions::default()
        };

        let extract = ExtractOptions::from(&options);
        assert_eq!(extract.files, vec!["src/*.js"]);
        assert!(!extract.cache);
        assert!(extract.html);
        assert!(extract.has_input());
    }

    #[test]
    fn test_extract_options_default_has_no_input() {
        let extract = ExtractOptions::from(&Jsdoc2MdOptions::default());
        assert!(extract.cache);
        assert!(!extract.has_input());
    }
}
