//! Tera engine assembly and the markdown render pass.
//!
//! Every render builds a fresh [`Tera`] instance because the registered
//! templates depend on the options (user partials, plugins and helpers) and
//! the `linkify` filter depends on the data being rendered.
//!
//! Registration order decides which template wins a name:
//!
//! 1. built-in partials
//! 2. plugin partials
//! 3. `--partial` files
//! 4. helpers (imported by name, e.g. `{% import "helpers" as h %}`)
//! 5. the root template, registered as [`ROOT_TEMPLATE`]

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context as TeraContext, Tera};
use tracing::debug;

use super::error::template_error;
use super::filters;
use super::loader::UserTemplates;
use super::view::{Links, build_view};
use crate::models::TemplateEntry;
use crate::options::RenderOptions;

/// Name the caller's root template is registered under.
pub(crate) const ROOT_TEMPLATE: &str = "jsdoc2md-root";

/// Partials that make up the default layout.
pub(crate) const BUILTIN_PARTIALS: &[(&str, &str)] = &[
    ("main", include_str!("partials/main.tera")),
    ("main-index", include_str!("partials/main-index.tera")),
    ("module-index", include_str!("partials/module-index.tera")),
    ("global-index", include_str!("partials/global-index.tera")),
    ("all-docs", include_str!("partials/all-docs.tera")),
    ("docs", include_str!("partials/docs.tera")),
    ("header", include_str!("partials/header.tera")),
    ("meta", include_str!("partials/meta.tera")),
    ("returns", include_str!("partials/returns.tera")),
    ("throws", include_str!("partials/throws.tera")),
    ("params", include_str!("partials/params.tera")),
    ("properties", include_str!("partials/properties.tera")),
    ("member-index", include_str!("partials/member-index.tera")),
    ("examples", include_str!("partials/examples.tera")),
];

/// Collect templates by name; later layers replace earlier ones.
fn layered_templates<'a>(options: &'a RenderOptions, user: &'a UserTemplates) -> Vec<(&'a str, &'a str)> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_name: HashMap<&str, &str> = HashMap::new();

    let builtin = BUILTIN_PARTIALS.iter().map(|(name, body)| (*name, *body));
    let files = user
        .plugins
        .iter()
        .chain(&user.partials)
        .chain(&user.helpers)
        .map(|file| (file.name.as_str(), file.content.as_str()));

    for (name, body) in builtin.chain(files).chain([(ROOT_TEMPLATE, options.template.as_str())]) {
        if by_name.insert(name, body).is_none() {
            order.push(name);
        }
    }
    order.into_iter().map(|name| (name, by_name[name])).collect()
}

/// Render `data` to markdown with already-loaded user templates.
pub(crate) fn render_markdown(
    data: &[TemplateEntry],
    options: &RenderOptions,
    user: &UserTemplates,
) -> Result<String> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(layered_templates(options, user))
        .map_err(|e| template_error(ROOT_TEMPLATE, &e))?;
    filters::register(&mut tera, Links::new(data));

    let view = build_view(data, options);
    let context = TeraContext::from_serialize(&view).map_err(|e| template_error(ROOT_TEMPLATE, &e))?;
    let rendered = tera.render(ROOT_TEMPLATE, &context).map_err(|e| template_error(ROOT_TEMPLATE, &e))?;

    debug!("Rendered {} entries into {} bytes", data.len(), rendered.len());
    Ok(tidy(&rendered))
}

/// Normalize whitespace in rendered markdown.
///
/// Runs of blank lines outside code blocks collapse to one, leading and
/// trailing blank lines are dropped, and non-empty output ends with a newline.
/// Code blocks are fenced blocks and blank lines between two indented lines.
pub(crate) fn tidy(text: &str) -> String {
    let is_indented = |line: &str| line.starts_with("    ") || line.starts_with('\t');
    let lines: Vec<&str> = text.lines().collect();

    // next_indented[i]: the first non-blank line at or after i is indented code
    let mut next_indented = vec![false; lines.len() + 1];
    for (i, line) in lines.iter().enumerate().rev() {
        next_indented[i] = if line.trim().is_empty() { next_indented[i + 1] } else { is_indented(line) };
    }

    let mut out: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut prev_indented = false;

    for (i, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        let blank = line.trim().is_empty();
        if blank && !in_fence {
            let in_indented_code = prev_indented && next_indented[i];
            if !in_indented_code && out.last().is_none_or(|prev| prev.is_empty()) {
                continue;
            }
            out.push("");
        } else {
            prev_indented = is_indented(line);
            out.push(line);
        }
    }
    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }

    if out.is_empty() {
        String::new()
    } else {
        let mut joined = out.join("\n");
        joined.push('\n');
        joined
    }
}
