//! Error handling for jsdoc2md
//!
//! Two types make up the error layer:
//! - [`DocError`] - Enumerated failures raised by the extractor, structurer and renderer
//! - [`ErrorContext`] - Wrapper that adds user-facing details and suggestions for the CLI
//!
//! The facade never translates errors. A [`DocError`] raised by the extractor
//! reaches the caller as-is inside the [`anyhow::Error`] chain.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jsdoc2md::core::{DocError, user_friendly_error};
//!
//! let error = anyhow::Error::from(DocError::NoInput);
//! let ctx = user_friendly_error(error);
//! ctx.display(); // Colored error with a suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failures raised by the documentation pipeline.
///
/// Variants carry owned strings instead of wrapped I/O errors so the type
/// stays [`Clone`]; the underlying cause is kept in the `anyhow` context chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocError {
    /// None of files, source or configure was supplied to the extractor
    #[error("Must set either files, source or configure")]
    NoInput,

    /// File globs resolved to no readable files
    #[error("None of the input files exist: {}", patterns.join(", "))]
    FilesNotFound {
        /// The patterns as supplied by the caller
        patterns: Vec<String>,
    },

    /// A file glob could not be parsed
    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidGlob {
        /// The offending pattern
        pattern: String,
        /// Parser message
        reason: String,
    },

    /// Source text could not be scanned
    #[error("Syntax error in {file} at line {line}: {reason}")]
    Syntax {
        /// File name, or `<source>` for inline text
        file: String,
        /// 1-based line number
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// A configuration file could not be read or parsed
    #[error("Invalid configuration file {path}: {reason}")]
    ConfigParse {
        /// Path to the configuration file
        path: String,
        /// Parser message
        reason: String,
    },

    /// Template compilation or rendering failed
    #[error("Template error in '{name}': {message}")]
    Template {
        /// Name of the template or partial
        name: String,
        /// Cleaned-up Tera message
        message: String,
    },

    /// A partial, helper or plugin file could not be loaded
    #[error("Cannot load template file {path}: {reason}")]
    TemplateFile {
        /// Path to the file
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// Catch-all used when wrapping foreign errors for display
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
///
/// Displayed on stderr by the CLI with the error in red, details in yellow and
/// the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DocError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DocError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// [`DocError`] values anywhere in the chain get a tailored suggestion. Other
/// errors are flattened into [`DocError::Other`] with the full context chain
/// as the message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let found = error.chain().find_map(|cause| cause.downcast_ref::<DocError>()).cloned();

    let Some(doc_error) = found else {
        return ErrorContext::new(DocError::Other {
            message: format!("{error:#}"),
        });
    };

    let headline = doc_error.to_string();
    let details = error
        .chain()
        .map(ToString::to_string)
        .filter(|message| *message != headline)
        .collect::<Vec<_>>()
        .join(": ");

    let ctx = match &doc_error {
        DocError::NoInput => ErrorContext::new(doc_error.clone())
            .with_suggestion("Pass one or more files, --source <text> or --configure <conf.json>"),
        DocError::FilesNotFound { .. } => ErrorContext::new(doc_error.clone())
            .with_suggestion("Check the file paths and glob patterns; quote globs so the shell does not expand them"),
        DocError::InvalidGlob { .. } => ErrorContext::new(doc_error.clone())
            .with_suggestion("Glob patterns support *, ** and ? wildcards and [abc] character classes"),
        DocError::Syntax { .. } => ErrorContext::new(doc_error.clone())
            .with_suggestion("Make sure every /** doc comment is closed with */"),
        DocError::ConfigParse { .. } => ErrorContext::new(doc_error.clone())
            .with_suggestion("Validate the configuration file syntax and option names"),
        DocError::Template { .. } | DocError::TemplateFile { .. } => {
            ErrorContext::new(doc_error.clone())
                .with_suggestion("Check the template, partial and helper files passed on the command line")
        }
        DocError::Other { .. } => ErrorContext::new(doc_error.clone()),
    };

    if details.is_empty() {
        ctx
    } else {
        ctx.with_details(details)
    }
}
