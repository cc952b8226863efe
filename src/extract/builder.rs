//! Turns scanned doc blocks into doclets.
//!
//! Naming follows jsdoc's rules: explicit tags (`@name`, `@memberof`,
//! `@alias`, scope tags) win over whatever the following line of code says,
//! and the code wins over the surrounding `@module` or class context.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use super::scanner::{ClassContext, DocBlock};
use super::tags::{
    ParsedComment, clean_comment, parse_comment, parse_param, parse_returns, parse_type,
    parse_typed_name, split_type,
};
use crate::core::{Access, Kind, Scope};
use crate::models::{CustomTag, Doclet, Meta, TypeExpr};

const IDENT: &str = r"[A-Za-z_$][\w$]*";

static RE_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s+(?:default\s+)?").unwrap());
static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(async\s+)?function\s*(\*)?\s*({IDENT})")).unwrap()
});
static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^class\s+({IDENT})(?:\s+extends\s+([\w$.]+))?")).unwrap()
});
static RE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(const|let|var)\s+({IDENT})\s*(?:=\s*(.*))?$")).unwrap()
});
static RE_EXPORTS_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:module\.)?exports\.({IDENT})\s*=\s*(.*)$")).unwrap()
});
static RE_PROTOTYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^([\w$.]+)\.prototype\.({IDENT})\s*=\s*(.*)$")).unwrap()
});
static RE_THIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^this\.({IDENT})\s*=\s*(.*)$")).unwrap());
static RE_STATIC_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^({IDENT}(?:\.{IDENT})*)\.({IDENT})\s*=\s*(.*)$")).unwrap()
});
static RE_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({IDENT})\s*=\s*(.*)$")).unwrap());
static RE_CLASS_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(static\s+)?(async\s+)?(\*\s*)?(?:(get|set)\s+)?(#?{IDENT})\s*\("
    ))
    .unwrap()
});
static RE_CLASS_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(static\s+)?(#?{IDENT})\s*(?:=\s*(.*))?$")).unwrap()
});
static RE_ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(async\s+)?(?:\([^)]*\)|{IDENT})\s*=>")).unwrap()
});
static RE_FUNCTION_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(async\s+)?function\b\s*(\*)?").unwrap());
static RE_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(-?\d[\d_.eE+-]*|'[^']*'|"[^"]*"|true|false|null)$"#).unwrap()
});

/// Tags that set the kind, and whether their value starts with a `{type}`.
const KIND_TAGS: &[(&str, Kind, bool)] = &[
    ("module", Kind::Module, false),
    ("exports", Kind::Module, false),
    ("class", Kind::Class, false),
    ("constructor", Kind::Class, false),
    ("mixin", Kind::Mixin, false),
    ("namespace", Kind::Namespace, true),
    ("function", Kind::Function, false),
    ("func", Kind::Function, false),
    ("method", Kind::Function, false),
    ("member", Kind::Member, true),
    ("var", Kind::Member, true),
    ("constant", Kind::Constant, true),
    ("const", Kind::Constant, true),
    ("event", Kind::Event, false),
    ("typedef", Kind::Typedef, true),
    ("callback", Kind::Typedef, false),
    ("external", Kind::External, false),
    ("host", Kind::External, false),
    ("interface", Kind::Interface, false),
    ("enum", Kind::Member, true),
    ("file", Kind::File, false),
    ("fileoverview", Kind::File, false),
    ("overview", Kind::File, false),
];

/// Tags understood by the builder that carry nothing beyond their own field.
const STRUCTURAL_TAGS: &[&str] = &[
    "name", "memberof", "alias", "static", "instance", "inner", "global", "kind", "lends",
    "abstract", "virtual", "override", "inheritdoc", "this", "variation", "constructs",
];

/// What the line after a doc comment declares.
#[derive(Debug, Default, PartialEq, Eq)]
struct CodeInfo {
    kind: Option<Kind>,
    name: String,
    /// Parent symbol as written in the code
    parent: Option<String>,
    scope: Option<Scope>,
    exported: bool,
    is_async: bool,
    generator: bool,
    augments: Option<String>,
    literal: Option<String>,
    constructor: bool,
}

fn classify_rhs(rhs: &str, info: &mut CodeInfo, fallback: Kind) {
    let rhs = rhs.trim().trim_end_matches([';', ',']).trim();
    if let Some(caps) = RE_FUNCTION_EXPR.captures(rhs) {
        info.kind = Some(Kind::Function);
        info.is_async = caps.get(1).is_some();
        info.generator = caps.get(2).is_some();
    } else if let Some(caps) = RE_ARROW.captures(rhs) {
        info.kind = Some(Kind::Function);
        info.is_async = caps.get(1).is_some();
    } else if rhs.starts_with("class") && !rhs[5..].starts_with(|c: char| c.is_alphanumeric()) {
        info.kind = Some(Kind::Class);
    } else {
        info.kind = Some(fallback);
        if RE_LITERAL.is_match(rhs) {
            info.literal = Some(rhs.to_string());
        }
    }
}

fn read_code(code: &str, class: Option<&ClassContext>) -> CodeInfo {
    let mut info = CodeInfo::default();

    if let Some(ctx) = class {
        if ctx.direct {
            if let Some(caps) = RE_CLASS_METHOD.captures(code) {
                let name = &caps[5];
                info.parent = Some(ctx.name.clone());
                if name == "constructor" {
                    info.constructor = true;
                    return info;
                }
                info.name = name.to_string();
                info.scope = Some(if caps.get(1).is_some() { Scope::Static } else { Scope::Instance });
                info.is_async = caps.get(2).is_some();
                info.generator = caps.get(3).is_some();
                info.kind = Some(if caps.get(4).is_some() { Kind::Member } else { Kind::Function });
                return info;
            }
            if let Some(caps) = RE_CLASS_FIELD.captures(code.trim_end_matches(';')) {
                info.name = caps[2].to_string();
                info.parent = Some(ctx.name.clone());
                info.scope = Some(if caps.get(1).is_some() { Scope::Static } else { Scope::Instance });
                match caps.get(3) {
                    Some(rhs) => classify_rhs(rhs.as_str(), &mut info, Kind::Member),
                    None => info.kind = Some(Kind::Member),
                }
                return info;
            }
        } else if let Some(caps) = RE_THIS.captures(code) {
            info.name = caps[1].to_string();
            info.parent = Some(ctx.name.clone());
            info.scope = Some(Scope::Instance);
            classify_rhs(&caps[2], &mut info, Kind::Member);
            return info;
        }
    }

    let mut code = code;
    if let Some(m) = RE_EXPORT.find(code) {
        info.exported = true;
        code = &code[m.end()..];
    }

    if let Some(caps) = RE_FUNCTION.captures(code) {
        info.kind = Some(Kind::Function);
        info.name = caps[3].to_string();
        info.is_async = caps.get(1).is_some();
        info.generator = caps.get(2).is_some();
    } else if let Some(caps) = RE_CLASS.captures(code) {
        info.kind = Some(Kind::Class);
        info.name = caps[1].to_string();
        info.augments = caps.get(2).map(|m| m.as_str().to_string());
    } else if let Some(caps) = RE_VAR.captures(code) {
        info.name = caps[2].to_string();
        let fallback = if &caps[1] == "const" { Kind::Constant } else { Kind::Member };
        match caps.get(3) {
            Some(rhs) => classify_rhs(rhs.as_str(), &mut info, fallback),
            None => info.kind = Some(fallback),
        }
    } else if let Some(caps) = RE_EXPORTS_MEMBER.captures(code) {
        info.name = caps[1].to_string();
        info.exported = true;
        classify_rhs(&caps[2], &mut info, Kind::Member);
    } else if let Some(caps) = RE_PROTOTYPE.captures(code) {
        info.name = caps[2].to_string();
        info.parent = Some(caps[1].to_string());
        info.scope = Some(Scope::Instance);
        classify_rhs(&caps[3], &mut info, Kind::Member);
    } else if let Some(caps) = RE_STATIC_ASSIGN.captures(code) {
        if &caps[1] != "module" {
            info.name = caps[2].to_string();
            info.parent = Some(caps[1].to_string());
            info.scope = Some(Scope::Static);
            classify_rhs(&caps[3], &mut info, Kind::Member);
        }
    } else if let Some(caps) = RE_ASSIGN.captures(code) {
        info.name = caps[1].to_string();
        classify_rhs(&caps[2], &mut info, Kind::Member);
    }

    info
}

/// Split `parent<sep>child` on the last scope separator outside quotes.
pub(crate) fn split_namepath(path: &str) -> Option<(&str, Scope, &str)> {
    let mut in_quote = false;
    let mut split = None;
    for (i, c) in path.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '.' if !in_quote => split = Some((i, Scope::Static)),
            '#' if !in_quote => split = Some((i, Scope::Instance)),
            '~' if !in_quote => split = Some((i, Scope::Inner)),
            _ => {}
        }
    }
    let (i, scope) = split?;
    let (parent, child) = (&path[..i], &path[i + 1..]);
    (!parent.is_empty() && !child.is_empty()).then_some((parent, scope, child))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Per-file state for building doclets.
pub(crate) struct DocletBuilder {
    module: Option<String>,
    symbols: HashMap<String, String>,
    doclets: Vec<Doclet>,
    meta: Option<Meta>,
    default_module: String,
}

impl DocletBuilder {
    /// Start a file; `path` is `None` for in-memory source.
    pub(crate) fn new(path: Option<&Path>) -> Self {
        let meta = path.map(|p| Meta {
            filename: p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            lineno: 0,
            path: p.parent().map(|d| d.display().to_string()).unwrap_or_default(),
        });
        let default_module = path
            .and_then(Path::file_stem)
            .map_or_else(|| "source".to_string(), |s| s.to_string_lossy().into_owned());
        Self {
            module: None,
            symbols: HashMap::new(),
            doclets: Vec::new(),
            meta,
            default_module,
        }
    }

    pub(crate) fn finish(self) -> Vec<Doclet> {
        self.doclets
    }

    fn resolve_symbol(&self, raw: &str) -> String {
        if let Some(longname) = self.symbols.get(raw) {
            return longname.clone();
        }
        // `Foo.bar` where `Foo` is known resolves through its longname
        if let Some((head, rest)) = raw.split_once('.')
            && let Some(longname) = self.symbols.get(head)
        {
            return format!("{longname}.{rest}");
        }
        raw.to_string()
    }

    /// Add the doclet for one block, if it documents anything nameable.
    pub(crate) fn add(&mut self, block: &DocBlock) {
        let parsed = parse_comment(&clean_comment(&block.raw));
        let code = block
            .code
            .as_deref()
            .map(|line| read_code(line, block.class.as_ref()))
            .unwrap_or_default();

        if code.constructor && self.merge_constructor(&parsed, block, &code) {
            return;
        }

        let Some(doclet) = self.build(&parsed, block, code) else {
            debug!("Skipping doc comment at line {} with nothing to name", block.line);
            return;
        };

        if doclet.kind == Kind::Module {
            self.module = Some(doclet.longname.clone());
        }
        let top_level = doclet.memberof.is_none() || doclet.memberof == self.module;
        if top_level && !matches!(doclet.kind, Kind::Module | Kind::File | Kind::Event) {
            self.symbols.insert(doclet.name.clone(), doclet.longname.clone());
        }
        self.doclets.push(doclet);
    }

    /// Fold a documented `constructor` into its class doclet.
    ///
    /// Returns false when the class itself was not documented; the caller
    /// then documents the class from the constructor comment.
    fn merge_constructor(&mut self, parsed: &ParsedComment, block: &DocBlock, code: &CodeInfo) -> bool {
        let Some(class_name) = code.parent.as_deref() else {
            return false;
        };
        let longname = self.resolve_symbol(class_name);
        let Some(class) = self
            .doclets
            .iter_mut()
            .rev()
            .find(|d| d.kind == Kind::Class && d.longname == longname)
        else {
            return false;
        };

        let ctor = Self::fill_tags(parsed, Doclet::default());
        if ctor.tags.description.is_some() {
            if class.tags.classdesc.is_none() {
                class.tags.classdesc = class.tags.description.take();
            }
            class.tags.description = ctor.tags.description;
        }
        if !ctor.tags.params.is_empty() {
            class.tags.params = ctor.tags.params;
        }
        class.tags.exceptions.extend(ctor.tags.exceptions);
        class.tags.hideconstructor |= ctor.tags.hideconstructor;
        class.examples.extend(ctor.examples);
        if let Some(access) = ctor.tags.access {
            class.tags.access.get_or_insert(access);
        }
        debug!("Merged constructor docs at line {} into {}", block.line, longname);
        true
    }

    fn build(&self, parsed: &ParsedComment, block: &DocBlock, mut code: CodeInfo) -> Option<Doclet> {
        if code.constructor {
            // Undocumented class with a documented constructor
            code.kind = Some(Kind::Class);
            code.name = code.parent.take().unwrap_or_default();
            code.scope = None;
        }

        let kind_tag = parsed.tags.iter().find_map(|tag| {
            KIND_TAGS
                .iter()
                .find(|(title, _, _)| *title == tag.title)
                .map(|(_, kind, typed)| (tag, *kind, *typed))
        });

        let mut kind = kind_tag.map(|(_, kind, _)| kind).or(code.kind);
        if let Some(tag) = parsed.first(&["kind"])
            && let Ok(explicit) = tag.value.parse::<Kind>()
        {
            kind = Some(explicit);
        }

        let mut tag_type = None;
        let mut tag_name = None;
        if let Some((tag, _, typed)) = kind_tag {
            if typed {
                let (ty, name, _) = parse_typed_name(&tag.value);
                tag_type = ty;
                tag_name = name;
            } else {
                tag_name = tag.value.split_whitespace().next().map(str::to_string);
            }
        }

        let kind = match kind {
            Some(kind) => kind,
            None if parsed.has("name") => {
                if parsed.has("param") || parsed.has("returns") || parsed.has("return") {
                    Kind::Function
                } else {
                    Kind::Member
                }
            }
            None => return None,
        };

        let explicit_name = parsed.first(&["name"]).and_then(|t| non_empty(&t.value));
        let mut name = match kind {
            Kind::File => self.meta.as_ref().map_or_else(
                || self.default_module.clone(),
                |meta| meta.filename.clone(),
            ),
            Kind::Module => explicit_name
                .or(tag_name)
                .map(|n| n.trim_start_matches("module:").to_string())
                .unwrap_or_else(|| self.default_module.clone()),
            _ => explicit_name.or(tag_name).or_else(|| non_empty(&code.name))?,
        };

        let mut doclet = Doclet::new(kind, String::new(), String::new());
        doclet.exported = code.exported;
        doclet.tags.is_async = code.is_async;
        doclet.tags.generator = code.generator;
        doclet = Self::fill_tags(parsed, doclet);
        if doclet.tags.type_.is_none() {
            doclet.tags.type_ = tag_type;
        }
        if parsed.has("callback") {
            doclet.tags.type_ = Some(TypeExpr::new(["function"]));
        }
        if parsed.has("enum") {
            doclet.tags.is_enum = true;
        }
        if doclet.tags.augments.is_empty()
            && let Some(base) = code.augments.take()
        {
            doclet.tags.augments.push(base);
        }
        if doclet.tags.defaultvalue.is_none() && parsed.has("default") {
            doclet.tags.defaultvalue = code.literal.take();
        }
        if kind == Kind::File
            && let Some(tag) = parsed.first(&["file", "fileoverview", "overview"])
            && let Some(text) = non_empty(&tag.value)
        {
            doclet.tags.description = Some(text);
        }
        if kind == Kind::Typedef
            && doclet.tags.description.is_none()
            && let Some((tag, _, true)) = kind_tag
        {
            doclet.tags.description = parse_typed_name(&tag.value).2;
        }

        match kind {
            Kind::Module => {
                doclet.longname = format!("module:{name}");
            }
            Kind::File => {
                doclet.longname = self
                    .meta
                    .as_ref()
                    .map_or_else(|| name.clone(), |meta| format!("{}/{}", meta.path, meta.filename));
            }
            Kind::External => {
                name = name.trim_start_matches("external:").to_string();
                doclet.longname = format!("external:{name}");
            }
            _ => self.place(&mut doclet, parsed, &code, &mut name),
        }

        if let Some(alias) = parsed.first(&["alias"]).and_then(|t| non_empty(&t.value)) {
            match split_namepath(&alias) {
                Some((_, _, child)) => name = child.to_string(),
                None => name = alias.clone(),
            }
            doclet.longname = alias;
        }

        doclet.name = name;
        doclet.comment = block.raw.clone();
        doclet.meta = self.meta.clone().map(|mut meta| {
            meta.lineno = block.code_line;
            meta
        });
        Some(doclet)
    }

    /// Work out memberof, scope and longname for a non-root doclet.
    fn place(&self, doclet: &mut Doclet, parsed: &ParsedComment, code: &CodeInfo, name: &mut String) {
        let is_event = doclet.kind == Kind::Event;
        let mut memberof = None;
        let mut scope = None;

        if let Some((parent, sep, child)) = split_namepath(name) {
            memberof = Some(self.resolve_symbol(parent));
            scope = Some(sep);
            *name = child.to_string();
        }
        if is_event {
            *name = name.trim_start_matches("event:").to_string();
        }

        if let Some(tag) = parsed.first(&["memberof"]).and_then(|t| non_empty(&t.value)) {
            memberof = Some(self.resolve_symbol(&tag));
        } else if memberof.is_none()
            && let Some(parent) = code.parent.as_deref()
        {
            memberof = Some(self.resolve_symbol(parent));
            scope = code.scope;
        }

        let scope_tag = parsed.tags.iter().find_map(|tag| match tag.title.as_str() {
            "static" => Some(Scope::Static),
            "instance" => Some(Scope::Instance),
            "inner" => Some(Scope::Inner),
            "global" => Some(Scope::Global),
            _ => None,
        });
        if let Some(explicit) = scope_tag {
            scope = Some(explicit);
        }

        if scope == Some(Scope::Global) {
            memberof = None;
        } else if memberof.is_none()
            && let Some(module) = &self.module
        {
            memberof = Some(module.clone());
            if scope.is_none() {
                scope = Some(if code.exported { Scope::Static } else { Scope::Inner });
            }
        }

        let label = if is_event { format!("event:{name}") } else { name.clone() };
        match memberof {
            Some(parent) => {
                let scope = scope.filter(|s| *s != Scope::Global).unwrap_or(Scope::Static);
                doclet.longname = format!("{parent}{}{label}", scope.punctuation());
                doclet.scope = Some(scope);
                doclet.memberof = Some(parent);
            }
            None => {
                doclet.longname = label;
                doclet.scope = Some(Scope::Global);
            }
        }
    }

    /// Copy descriptive tags onto a doclet.
    fn fill_tags(parsed: &ParsedComment, mut doclet: Doclet) -> Doclet {
        let tags = &mut doclet.tags;
        tags.description = parsed.description.clone();

        for tag in &parsed.tags {
            let value = tag.value.as_str();
            match tag.title.as_str() {
                "description" | "desc" => tags.description = non_empty(value),
                "classdesc" => tags.classdesc = non_empty(value),
                "summary" => tags.summary = non_empty(value),
                "param" | "arg" | "argument" => tags.params.push(parse_param(value)),
                "property" | "prop" => tags.properties.push(parse_param(value)),
                "returns" | "return" => tags.returns.push(parse_returns(value)),
                "throws" | "exception" => tags.exceptions.push(parse_returns(value)),
                "type" => {
                    let raw = split_type(value).0.unwrap_or(value);
                    let expr = parse_type(raw).expr;
                    if !expr.names.is_empty() {
                        tags.type_ = Some(expr);
                    }
                }
                "access" => tags.access = value.parse::<Access>().ok(),
                "private" => tags.access = Some(Access::Private),
                "protected" => tags.access = Some(Access::Protected),
                "public" => tags.access = Some(Access::Public),
                "package" => tags.access = Some(Access::Package),
                "deprecated" => tags.deprecated = Some(value.to_string()),
                "since" => tags.since = non_empty(value),
                "version" => tags.version = non_empty(value),
                "see" => tags.see.extend(non_empty(value)),
                "todo" => tags.todo.extend(non_empty(value)),
                "author" => tags.author.extend(non_empty(value)),
                "augments" | "extends" => tags.augments.extend(non_empty(value)),
                "mixes" => tags.mixes.extend(non_empty(value)),
                "fires" | "emits" => tags.fires.extend(non_empty(value)),
                "default" | "defaultvalue" => tags.defaultvalue = non_empty(value),
                "readonly" => tags.readonly = true,
                "async" => tags.is_async = true,
                "generator" => tags.generator = true,
                "category" => tags.category = non_empty(value),
                "hideconstructor" => tags.hideconstructor = true,
                "example" => doclet.examples.push(value.to_string()),
                "ignore" => doclet.ignore = true,
                title if STRUCTURAL_TAGS.contains(&title)
                    || KIND_TAGS.iter().any(|(kind_title, _, _)| *kind_title == title) => {}
                title => tags.custom_tags.push(CustomTag {
                    tag: title.to_string(),
                    value: value.to_string(),
                }),
            }
        }
        doclet
    }
}
