//! Translation of Tera failures into [`DocError::Template`].

use regex::Regex;
use std::error::Error;
use std::sync::LazyLock;

use crate::core::DocError;

static RE_TEMPLATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:render|parse) '([^']+)'").unwrap());

/// Format a Tera error with every cause in its chain.
///
/// Tera wraps the useful message in one or more "Failed to render 'x'"
/// layers; those are dropped unless nothing else is left.
pub(crate) fn format_tera_error(error: &tera::Error) -> String {
    let mut all_messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        all_messages.push(err.to_string());
        current = err.source();
    }

    let useful: Vec<String> = all_messages
        .iter()
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty() && !msg.starts_with("Failed to render") && !msg.starts_with("Failed to parse"))
        .collect();

    if useful.is_empty() {
        all_messages.join(": ")
    } else {
        useful.join("\n  → ")
    }
}

/// Name of the innermost template mentioned in the error chain.
fn failing_template(error: &tera::Error) -> Option<String> {
    let mut name = None;
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        if let Some(caps) = RE_TEMPLATE_NAME.captures(&err.to_string()) {
            name = Some(caps[1].to_string());
        }
        current = err.source();
    }
    name
}

/// Convert a Tera error, naming `fallback` when the error does not say which
/// template failed.
pub(crate) fn template_error(fallback: &str, error: &tera::Error) -> DocError {
    DocError::Template {
        name: failing_template(error).unwrap_or_else(|| fallback.to_string()),
        message: format_tera_error(error),
    }
}
