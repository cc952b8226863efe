//! Doclet to template data transformation.
//!
//! [`TemplateDataBuilder`] reshapes the extractor's raw doclets into the
//! records the renderer walks:
//!
//! - drops doclets that should never be rendered (undocumented, `@ignore`,
//!   `package`, `file`, and `@private` unless requested)
//! - splits every class into a `class` entry followed by a `constructor` entry
//! - gives each entry a unique `id` and its position as `order`
//! - marks module exports with `is_exported`
//! - splits `<caption>` markup off `@example` blocks

use anyhow::Result;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

use crate::core::{Access, Kind, Scope};
use crate::models::{Doclet, Example, TemplateEntry};
use crate::options::ParseOptions;

static RE_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*<caption>(.*?)</caption>\s*").unwrap());

/// Turns raw doclets into template data.
pub trait Structurer: Send + Sync {
    /// Transform `doclets`, preserving their relative order.
    fn structure(&self, doclets: Vec<Doclet>, options: &ParseOptions) -> Result<Vec<TemplateEntry>>;
}

/// Built-in [`Structurer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDataBuilder;

impl TemplateDataBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn keep(doclet: &Doclet, options: &ParseOptions) -> bool {
        if doclet.undocumented || doclet.ignore || doclet.longname.is_empty() {
            return false;
        }
        if matches!(doclet.kind, Kind::Package | Kind::File) {
            return false;
        }
        options.private || doclet.tags.access != Some(Access::Private)
    }
}

/// Split `<caption>Title</caption>` off the front of an example.
pub(crate) fn parse_example(raw: &str) -> Example {
    match RE_CAPTION.captures(raw) {
        Some(caps) => {
            let caption = caps[1].trim();
            Example {
                caption: (!caption.is_empty()).then(|| caption.to_string()),
                code: raw[caps[0].len()..].trim_end().to_string(),
            }
        }
        None => Example {
            caption: None,
            code: raw.trim_end().to_string(),
        },
    }
}

fn to_entry(doclet: Doclet) -> TemplateEntry {
    TemplateEntry {
        id: doclet.longname.clone(),
        kind: doclet.kind,
        name: doclet.name,
        longname: doclet.longname,
        memberof: doclet.memberof,
        scope: doclet.scope,
        tags: doclet.tags,
        examples: doclet.examples.iter().map(|raw| parse_example(raw)).collect(),
        is_exported: false,
        order: 0,
        meta: doclet.meta,
    }
}

/// Split a class entry into the class itself and its constructor.
fn split_class(mut class: TemplateEntry) -> (TemplateEntry, Option<TemplateEntry>) {
    if class.tags.hideconstructor {
        if let Some(classdesc) = class.tags.classdesc.take() {
            class.tags.description = Some(classdesc);
        }
        return (class, None);
    }

    let mut ctor = TemplateEntry::new(Kind::Constructor, class.name.clone(), class.longname.clone());
    ctor.id = format!("{}()", class.longname);
    ctor.memberof = Some(class.longname.clone());
    ctor.meta = class.meta.clone();
    ctor.tags.access = class.tags.access;
    ctor.tags.params = std::mem::take(&mut class.tags.params);
    ctor.tags.exceptions = std::mem::take(&mut class.tags.exceptions);

    if let Some(classdesc) = class.tags.classdesc.take() {
        ctor.tags.description = class.tags.description.replace(classdesc);
    }
    (class, Some(ctor))
}

impl Structurer for TemplateDataBuilder {
    fn structure(&self, doclets: Vec<Doclet>, options: &ParseOptions) -> Result<Vec<TemplateEntry>> {
        let total = doclets.len();
        let mut entries = Vec::with_capacity(total);

        for doclet in doclets.into_iter().filter(|d| Self::keep(d, options)) {
            let entry = to_entry(doclet);
            if entry.kind == Kind::Class {
                let (class, ctor) = split_class(entry);
                entries.push(class);
                entries.extend(ctor);
            } else {
                entries.push(entry);
            }
        }

        let modules: HashSet<String> = entries
            .iter()
            .filter(|e| e.kind == Kind::Module)
            .map(|e| e.longname.clone())
            .collect();

        let mut seen: HashMap<String, usize> = HashMap::new();
        for (order, entry) in entries.iter_mut().enumerate() {
            let count = seen.entry(entry.id.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                entry.id = format!("{}_{}", entry.id, count);
            }
            entry.order = order;

            let module_static = entry.scope == Some(Scope::Static)
                && entry.memberof.as_deref().is_some_and(|m| m.starts_with("module:"));
            entry.is_exported = module_static
                || (entry.kind != Kind::Module && modules.contains(&entry.longname));
        }

        debug!("Structured {} doclets into {} entries", total, entries.len());
        Ok(entries)
    }
}
