//! Render-ready view of template data.
//!
//! Tera has no recursion-friendly way to walk a tree of members, so the tree is
//! flattened here: every entry becomes one [`Section`] with its heading level,
//! anchor, formatted type strings and member index already worked out. The
//! built-in partials only lay these strings out.

use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::core::{Access, Kind, Scope};
use crate::models::{Example, Param, TemplateEntry, TypeExpr};
use crate::options::{IndexFormat, ListFormat, MemberIndexFormat, NameFormat, RenderOptions};

static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\[([^\]]+)\])?\{@(link|linkcode|linkplain)\s+([^}|\s]+)(?:\s*\|\s*|\s+)?([^}]*)\}")
        .unwrap()
});

const MAX_HEADING: usize = 6;

/// Turn a namepath into the anchor name used in links.
pub(crate) fn sanitize_anchor(name: &str) -> String {
    name.replace("module:", "module_")
        .replace("event:", "event_")
        .replace("external:", "external_")
        .replace('~', "..")
        .replace('#', "+")
        .replace(':', "_")
        .replace(' ', "_")
        .replace('"', "")
}

/// Anchor for an entry; constructors get their own so they never clash with the class.
pub(crate) fn anchor_id(entry: &TemplateEntry) -> String {
    if entry.kind == Kind::Constructor {
        format!("new_{}_new", sanitize_anchor(&entry.longname))
    } else if entry.id.is_empty() {
        sanitize_anchor(&entry.longname)
    } else {
        sanitize_anchor(&entry.id)
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Longname to anchor lookup for everything documented in this render.
#[derive(Debug, Default, Clone)]
pub(crate) struct Links {
    anchors: HashMap<String, String>,
}

impl Links {
    pub(crate) fn new(entries: &[TemplateEntry]) -> Self {
        let mut anchors = HashMap::new();
        for entry in entries.iter().filter(|e| e.kind != Kind::Constructor) {
            anchors.entry(entry.longname.clone()).or_insert_with(|| anchor_id(entry));
        }
        Self {
            anchors,
        }
    }

    pub(crate) fn get(&self, longname: &str) -> Option<&str> {
        self.anchors.get(longname).map(String::as_str)
    }

    /// Replace inline `{@link}` tags with markdown links.
    pub(crate) fn linkify(&self, text: &str) -> String {
        RE_LINK
            .replace_all(text, |caps: &Captures<'_>| {
                let target = &caps[3];
                let label = caps
                    .get(1)
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str().trim())
                    .filter(|label| !label.is_empty())
                    .unwrap_or(target);
                let label = if &caps[2] == "linkcode" {
                    format!("<code>{label}</code>")
                } else {
                    label.to_string()
                };

                if target.contains("://") {
                    format!("[{label}]({target})")
                } else if let Some(anchor) = self.get(target) {
                    format!("[{label}](#{anchor})")
                } else {
                    format!("<code>{}</code>", escape_html(target))
                }
            })
            .into_owned()
    }

    /// Format a type expression as linked `<code>` spans joined by `|`.
    pub(crate) fn format_type(&self, expr: &TypeExpr) -> String {
        expr.names
            .iter()
            .map(|name| {
                let code = format!("<code>{}</code>", escape_html(name));
                match self.get(name) {
                    Some(anchor) => format!("[{code}](#{anchor})"),
                    None => code,
                }
            })
            .collect::<Vec<_>>()
            .join(" \\| ")
    }
}

fn first_paragraph(text: &str) -> String {
    text.split("\n\n").next().unwrap_or_default().trim().to_string()
}

/// Flatten text for a table cell.
fn cell(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").replace('|', "\\|")
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_callable(entry: &TemplateEntry) -> bool {
    matches!(entry.kind, Kind::Function | Kind::Constructor)
}

/// Comma-separated top-level parameter names, `[optional]` and `...variadic`.
fn param_signature(params: &[Param]) -> String {
    params
        .iter()
        .filter(|p| !p.name.contains('.'))
        .map(|p| {
            let name = if p.variable { format!("...{}", p.name) } else { p.name.clone() };
            if p.optional { format!("[{name}]") } else { name }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn kind_label(entry: &TemplateEntry, is_member: bool) -> &'static str {
    match entry.kind {
        Kind::Function if is_member => "method",
        Kind::Member if entry.tags.is_enum => "enum",
        Kind::Member if is_member => "property",
        Kind::Member => "variable",
        kind => kind.as_str(),
    }
}

fn group_title(kind: Kind) -> &'static str {
    match kind {
        Kind::Class => "Classes",
        Kind::Mixin => "Mixins",
        Kind::Member => "Members",
        Kind::Namespace => "Namespaces",
        Kind::Constant => "Constants",
        Kind::Function => "Functions",
        Kind::Event => "Events",
        Kind::Typedef => "Typedefs",
        Kind::External => "Externals",
        Kind::Interface => "Interfaces",
        Kind::Module => "Modules",
        Kind::Constructor => "Constructors",
        Kind::File => "Files",
        Kind::Package => "Packages",
        Kind::Unknown => "Other",
    }
}

/// Layout choices after applying the `gfm` toggle.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Formats {
    pub module_index: IndexFormat,
    pub global_index: IndexFormat,
    pub member_index: MemberIndexFormat,
    pub param_list: ListFormat,
    pub property_list: ListFormat,
}

impl Formats {
    fn new(options: &RenderOptions) -> Self {
        let index = |format: IndexFormat| match format {
            IndexFormat::Table if !options.gfm => IndexFormat::Grouped,
            other => other,
        };
        let list = |format: ListFormat| if options.gfm { format } else { ListFormat::List };
        Self {
            module_index: index(options.module_index_format),
            global_index: index(options.global_index_format),
            member_index: options.member_index_format,
            param_list: list(options.param_list_format),
            property_list: list(options.property_list_format),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct IndexRow {
    pub name: String,
    pub anchor: String,
    /// Return or member type, already prefixed with its separator
    pub suffix: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct IndexGroup {
    pub title: String,
    pub rows: Vec<IndexRow>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MemberRow {
    pub depth: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ParamRow {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub default: String,
    pub description: String,
}

/// One documented entry, ready to print.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Section {
    pub id: String,
    pub anchor: String,
    pub kind: Kind,
    pub level: usize,
    pub heading: String,
    pub deprecated: Option<String>,
    pub description: Option<String>,
    pub meta: Vec<String>,
    pub returns: Vec<String>,
    pub throws: Vec<String>,
    pub params: Vec<ParamRow>,
    pub param_defaults: bool,
    pub properties: Vec<ParamRow>,
    pub property_defaults: bool,
    pub member_index: Vec<MemberRow>,
    pub examples: Vec<Example>,
}

/// The full template context.
#[derive(Debug, Serialize)]
pub(crate) struct View<'a> {
    pub options: &'a RenderOptions,
    pub formats: Formats,
    pub index_heading: String,
    pub show_main_index: bool,
    pub module_index: Vec<IndexRow>,
    pub global_index: Vec<IndexGroup>,
    pub sections: Vec<Section>,
    pub data: &'a [TemplateEntry],
}

struct ViewBuilder<'a> {
    entries: &'a [TemplateEntry],
    options: &'a RenderOptions,
    formats: Formats,
    links: Links,
    by_longname: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ViewBuilder<'a> {
    fn new(entries: &'a [TemplateEntry], options: &'a RenderOptions) -> Self {
        let mut by_longname = HashMap::new();
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.kind != Kind::Constructor {
                by_longname.entry(entry.longname.as_str()).or_insert(i);
            }
            if let Some(parent) = entry.memberof.as_deref() {
                children.entry(parent).or_default().push(i);
            }
        }
        Self {
            entries,
            options,
            formats: Formats::new(options),
            links: Links::new(entries),
            by_longname,
            children,
        }
    }

    fn parent(&self, entry: &TemplateEntry) -> Option<&'a TemplateEntry> {
        let parent = entry.memberof.as_deref()?;
        self.by_longname.get(parent).map(|&i| &self.entries[i])
    }

    fn is_top_level(&self, entry: &TemplateEntry) -> bool {
        match entry.kind {
            Kind::Constructor => entry.memberof.is_none(),
            _ => self.parent(entry).is_none(),
        }
    }

    /// Children of `index`, constructors first.
    fn child_indexes(&self, index: usize) -> Vec<usize> {
        let entry = &self.entries[index];
        if entry.kind == Kind::Constructor {
            return Vec::new();
        }
        let mut kids: Vec<usize> = self
            .children
            .get(entry.longname.as_str())
            .map(|kids| kids.iter().copied().filter(|&i| i != index).collect())
            .unwrap_or_default();
        kids.sort_by_key(|&i| (self.entries[i].kind != Kind::Constructor, i));
        kids
    }

    fn format_name(&self, name: &str) -> String {
        match self.options.name_format {
            NameFormat::Plain => name.to_string(),
            NameFormat::Backticks => format!("`{name}`"),
        }
    }

    /// Name part of a signature: `name(a, [b])`, `new Name(a)`, `"event"`.
    fn signature_name(&self, entry: &TemplateEntry) -> String {
        let params = param_signature(&entry.tags.params);
        let name = match entry.kind {
            Kind::Constructor => format!("new {}({params})", entry.name),
            Kind::Function => format!("{}({params})", entry.name),
            Kind::Event => format!("\"{}\"", entry.name),
            _ => entry.name.clone(),
        };
        self.format_name(&name)
    }

    /// Return type after `⇒` for callables, value type after `:` for the rest.
    fn signature_suffix(&self, entry: &TemplateEntry) -> String {
        if is_callable(entry) {
            let types: Vec<String> = entry
                .tags
                .returns
                .iter()
                .filter_map(|r| r.type_.as_ref())
                .map(|t| self.links.format_type(t))
                .collect();
            if types.is_empty() { String::new() } else { format!(" ⇒ {}", types.join(" \\| ")) }
        } else {
            match (&entry.tags.type_, entry.kind) {
                (Some(expr), Kind::Member | Kind::Constant | Kind::Typedef) => {
                    format!(" : {}", self.links.format_type(expr))
                }
                _ => String::new(),
            }
        }
    }

    fn scope_prefix(entry: &TemplateEntry) -> &'static str {
        match entry.scope {
            Some(Scope::Inner) => "~",
            Some(Scope::Static | Scope::Instance) => ".",
            _ => "",
        }
    }

    fn heading(&self, entry: &TemplateEntry) -> String {
        let name = self.signature_name(entry);
        let suffix = self.signature_suffix(entry);
        let prefix = match (entry.kind, self.parent(entry)) {
            (Kind::Constructor | Kind::Module, _) | (_, None) => String::new(),
            (_, Some(parent)) => {
                let parent_name = match (parent.kind, entry.scope) {
                    (Kind::Module, _) => parent.name.clone(),
                    (_, Some(Scope::Instance)) => lower_first(&parent.name),
                    _ => parent.name.clone(),
                };
                format!("{parent_name}{}", Self::scope_prefix(entry))
            }
        };
        format!("{prefix}{name}{suffix}")
    }

    fn parent_link(&self, entry: &TemplateEntry) -> Option<String> {
        let memberof = entry.memberof.as_deref()?;
        Some(match self.parent(entry) {
            Some(parent) => format!("[<code>{}</code>](#{})", escape_html(&parent.name), anchor_id(parent)),
            None => format!("<code>{}</code>", escape_html(memberof)),
        })
    }

    fn kind_line(&self, entry: &TemplateEntry) -> Option<String> {
        if matches!(entry.kind, Kind::Module | Kind::Constructor) {
            return None;
        }
        Some(match self.parent_link(entry) {
            Some(link) if entry.kind == Kind::Event => format!("**Kind**: event emitted by {link}"),
            Some(link) => {
                let scope = entry.scope.map(|s| format!("{s} ")).unwrap_or_default();
                format!("**Kind**: {scope}{} of {link}", kind_label(entry, true))
            }
            None => format!("**Kind**: global {}", kind_label(entry, false)),
        })
    }

    fn linked_names(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|name| match self.links.get(name) {
                Some(anchor) => format!("[<code>{}</code>](#{anchor})", escape_html(name)),
                None => format!("<code>{}</code>", escape_html(name)),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn meta_lines(&self, entry: &TemplateEntry) -> Vec<String> {
        let tags = &entry.tags;
        let mut lines = Vec::new();
        lines.extend(self.kind_line(entry));

        if !tags.augments.is_empty() {
            lines.push(format!("**Extends**: {}", self.linked_names(&tags.augments)));
        }
        if !tags.mixes.is_empty() {
            lines.push(format!("**Mixes**: {}", self.linked_names(&tags.mixes)));
        }
        if !tags.fires.is_empty() {
            lines.push(format!("**Emits**: {}", self.linked_names(&tags.fires)));
        }
        if tags.readonly {
            lines.push("**Read only**: true".to_string());
        }
        if let Some(value) = &tags.defaultvalue {
            lines.push(format!("**Default**: <code>{}</code>", escape_html(value)));
        }
        if let Some(access) = tags.access.filter(|a| *a != Access::Public) {
            lines.push(format!("**Access**: {access}"));
        }
        if let Some(category) = &tags.category {
            lines.push(format!("**Category**: {category}"));
        }
        if let Some(since) = &tags.since {
            lines.push(format!("**Since**: {since}"));
        }
        if let Some(version) = &tags.version {
            lines.push(format!("**Version**: {version}"));
        }
        for author in &tags.author {
            lines.push(format!("**Author**: {}", escape_html(author)));
        }
        for see in &tags.see {
            let text = if see.contains("{@link") { self.links.linkify(see) } else { self.linked_names(std::slice::from_ref(see)) };
            lines.push(format!("**See**: {text}"));
        }
        for todo in &tags.todo {
            lines.push(format!("**Todo**: {}", self.links.linkify(todo)));
        }
        for custom in &tags.custom_tags {
            let mut label = custom.tag.clone();
            if let Some(first) = label.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            lines.push(format!("**{label}**: {}", custom.value));
        }
        lines
    }

    fn typed_text(&self, expr: Option<&TypeExpr>, description: Option<&str>) -> String {
        let type_text = expr.map(|t| self.links.format_type(t)).unwrap_or_default();
        let description = description.map(|d| self.links.linkify(d)).unwrap_or_default();
        match (type_text.is_empty(), description.is_empty()) {
            (false, false) => format!("{type_text} - {description}"),
            (false, true) => type_text,
            _ => description,
        }
    }

    fn param_rows(&self, params: &[Param], format: ListFormat) -> (Vec<ParamRow>, bool) {
        let rows = params
            .iter()
            .map(|p| {
                let mut name = if p.variable { format!("...{}", p.name) } else { p.name.clone() };
                if p.optional {
                    name = format!("[{name}]");
                }
                let description = p.description.as_deref().map(|d| self.links.linkify(d)).unwrap_or_default();
                ParamRow {
                    name,
                    type_: p.type_.as_ref().map(|t| self.links.format_type(t)).unwrap_or_default(),
                    default: p
                        .defaultvalue
                        .as_deref()
                        .map(|d| format!("<code>{}</code>", escape_html(d)))
                        .unwrap_or_default(),
                    description: match format {
                        ListFormat::Table => cell(&description),
                        ListFormat::List => description,
                    },
                }
            })
            .collect();
        (rows, params.iter().any(|p| p.defaultvalue.is_some()))
    }

    fn member_row_text(&self, entry: &TemplateEntry) -> String {
        let prefix = if entry.kind == Kind::Constructor { "" } else { Self::scope_prefix(entry) };
        format!(
            "[{prefix}{}](#{}){}",
            self.signature_name(entry),
            anchor_id(entry),
            self.signature_suffix(entry)
        )
    }

    fn member_rows(&self, index: usize, depth: usize, rows: &mut Vec<MemberRow>, seen: &mut HashSet<usize>) {
        let kids = self.child_indexes(index);
        let (ctors, members): (Vec<usize>, Vec<usize>) =
            kids.into_iter().partition(|&i| self.entries[i].kind == Kind::Constructor);

        for i in ctors {
            rows.push(MemberRow {
                depth,
                text: self.member_row_text(&self.entries[i]),
            });
        }

        let group_of = |i: &usize| {
            let entry = &self.entries[*i];
            if entry.kind == Kind::Event { "events" } else { entry.scope.map_or("", scope_label) }
        };
        let mut labels: Vec<&str> = Vec::new();
        for label in members.iter().map(group_of) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        let grouped = self.formats.member_index == MemberIndexFormat::Grouped && labels.len() > 1;
        labels.sort_by_key(|label| ["static", "instance", "inner", "events", ""].iter().position(|l| l == label));

        let groups: Vec<(Option<&str>, Vec<usize>)> = if grouped {
            labels
                .iter()
                .map(|label| (Some(*label), members.iter().copied().filter(|i| group_of(i) == *label).collect()))
                .collect()
        } else {
            vec![(None, members)]
        };

        for (label, group) in groups {
            let item_depth = match label {
                Some(label) => {
                    rows.push(MemberRow {
                        depth,
                        text: format!("_{label}_"),
                    });
                    depth + 1
                }
                None => depth,
            };
            for i in group {
                if !seen.insert(i) {
                    continue;
                }
                rows.push(MemberRow {
                    depth: item_depth,
                    text: self.member_row_text(&self.entries[i]),
                });
                self.member_rows(i, item_depth + 1, rows, seen);
            }
        }
    }

    fn member_index(&self, index: usize) -> Vec<MemberRow> {
        let entry = &self.entries[index];
        if self.child_indexes(index).is_empty() {
            return Vec::new();
        }
        let mut rows = vec![MemberRow {
            depth: 0,
            text: format!("[{}](#{})", self.format_name(&entry.name), anchor_id(entry)),
        }];
        let mut seen = HashSet::from([index]);
        self.member_rows(index, 1, &mut rows, &mut seen);
        rows
    }

    fn section(&self, index: usize, level: usize) -> Section {
        let entry = &self.entries[index];
        let tags = &entry.tags;
        let (params, param_defaults) = self.param_rows(&tags.params, self.formats.param_list);
        let (properties, property_defaults) = self.param_rows(&tags.properties, self.formats.property_list);

        Section {
            id: entry.id.clone(),
            anchor: anchor_id(entry),
            kind: entry.kind,
            level: level.min(MAX_HEADING),
            heading: self.heading(entry),
            deprecated: tags.deprecated.as_deref().map(|note| {
                let note = note.trim();
                if note.is_empty() {
                    "***Deprecated***".to_string()
                } else {
                    format!("***Deprecated***: {}", self.links.linkify(note))
                }
            }),
            description: tags.description.as_deref().map(|d| self.links.linkify(d)),
            meta: self.meta_lines(entry),
            returns: tags
                .returns
                .iter()
                .map(|r| self.typed_text(r.type_.as_ref(), r.description.as_deref()))
                .filter(|text| !text.is_empty())
                .collect(),
            throws: tags
                .exceptions
                .iter()
                .map(|t| self.typed_text(t.type_.as_ref(), t.description.as_deref()))
                .filter(|text| !text.is_empty())
                .collect(),
            params,
            param_defaults,
            properties,
            property_defaults,
            member_index: self.member_index(index),
            examples: entry.examples.clone(),
        }
    }

    fn push_sections(&self, index: usize, level: usize, out: &mut Vec<Section>, seen: &mut HashSet<usize>) {
        if !seen.insert(index) {
            return;
        }
        out.push(self.section(index, level));
        for child in self.child_indexes(index) {
            self.push_sections(child, level.saturating_add(1), out, seen);
        }
    }

    fn index_row(&self, entry: &TemplateEntry, table: bool) -> IndexRow {
        let summary = entry
            .tags
            .description
            .as_deref()
            .map(|d| first_paragraph(&self.links.linkify(d)))
            .unwrap_or_default();
        IndexRow {
            name: self.signature_name(entry),
            anchor: anchor_id(entry),
            suffix: self.signature_suffix(entry),
            summary: if table { cell(&summary) } else { summary },
        }
    }

    fn build(self, data: &'a [TemplateEntry]) -> View<'a> {
        let top: Vec<usize> = (0..self.entries.len())
            .filter(|&i| self.is_top_level(&self.entries[i]))
            .collect();

        let module_table = self.formats.module_index == IndexFormat::Table;
        let module_index = top
            .iter()
            .map(|&i| &self.entries[i])
            .filter(|e| e.kind == Kind::Module)
            .map(|e| self.index_row(e, module_table))
            .collect();

        let global_table = self.formats.global_index == IndexFormat::Table;
        let mut kinds: Vec<Kind> = top
            .iter()
            .map(|&i| self.entries[i].kind)
            .filter(|k| *k != Kind::Module)
            .collect();
        kinds.sort();
        kinds.dedup();
        let global_index = kinds
            .into_iter()
            .map(|kind| IndexGroup {
                title: group_title(kind).to_string(),
                rows: top
                    .iter()
                    .map(|&i| &self.entries[i])
                    .filter(|e| e.kind == kind)
                    .map(|e| self.index_row(e, global_table))
                    .collect(),
            })
            .collect();

        let mut sections = Vec::new();
        let mut seen = HashSet::new();
        let depth = self.options.heading_depth.clamp(1, MAX_HEADING);
        for &i in &top {
            self.push_sections(i, depth, &mut sections, &mut seen);
        }

        View {
            options: self.options,
            index_heading: "#".repeat(depth),
            show_main_index: top.len() > 1,
            module_index,
            global_index,
            sections,
            formats: self.formats,
            data,
        }
    }
}

fn scope_label(scope: Scope) -> &'static str {
    match scope {
        Scope::Global => "",
        Scope::Static => "static",
        Scope::Instance => "instance",
        Scope::Inner => "inner",
    }
}

/// Build the template context for `data`.
pub(crate) fn build_view<'a>(data: &'a [TemplateEntry], options: &'a RenderOptions) -> View<'a> {
    ViewBuilder::new(data, options).build(data)
}
