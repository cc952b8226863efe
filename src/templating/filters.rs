//! Custom Tera filters available to every template.
//!
//! | Filter | Input | Output |
//! |---|---|---|
//! | `heading` | level number | `##...` (clamped to 1..=6) |
//! | `nest` | depth number | four spaces per level |
//! | `code_block` | example code | fenced block, or indented when `gfm=false` |
//! | `anchor` | namepath | anchor name used in links |
//! | `linkify` | text | `{@link}` tags turned into markdown links |

use std::collections::HashMap;
use tera::{Tera, Value};

use super::view::{Links, sanitize_anchor};

fn number_arg(filter: &str, value: &Value) -> tera::Result<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| tera::Error::msg(format!("Filter `{filter}` expects a number, got {value}")))
}

fn string_arg<'a>(filter: &str, value: &'a Value) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("Filter `{filter}` expects a string, got {value}")))
}

pub(crate) fn heading(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let level = number_arg("heading", value)?.clamp(1, 6);
    Ok(Value::String("#".repeat(level)))
}

pub(crate) fn nest(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String("    ".repeat(number_arg("nest", value)?)))
}

pub(crate) fn anchor(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(sanitize_anchor(string_arg("anchor", value)?)))
}

/// Wrap example code in a fenced block tagged with `lang`, or indent it
/// by four spaces when `gfm` is false.
pub(crate) fn code_block(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let code = string_arg("code_block", value)?;
    let gfm = args.get("gfm").and_then(Value::as_bool).unwrap_or(true);
    let lang = args.get("lang").and_then(Value::as_str).unwrap_or_default();

    let block = if gfm {
        format!("```{lang}\n{code}\n```")
    } else {
        let indented: Vec<String> = code
            .lines()
            .map(|line| if line.trim().is_empty() { String::new() } else { format!("    {line}") })
            .collect();
        format!("\n{}", indented.join("\n"))
    };
    Ok(Value::String(block))
}

/// Build the `linkify` filter over the anchors of the current render.
pub(crate) fn create_linkify_filter(links: Links) -> impl tera::Filter + 'static {
    move |value: &Value, _args: &HashMap<String, Value>| -> tera::Result<Value> {
        Ok(Value::String(links.linkify(string_arg("linkify", value)?)))
    }
}

/// Register every custom filter on `tera`.
pub(crate) fn register(tera: &mut Tera, links: Links) {
    tera.register_filter("heading", heading);
    tera.register_filter("nest", nest);
    tera.register_filter("anchor", anchor);
    tera.register_filter("code_block", code_block);
    tera.register_filter("linkify", create_linkify_filter(links));
}
