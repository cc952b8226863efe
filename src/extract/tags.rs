//! Doc comment cleaning and tag value parsing.

use crate::models::{Param, Returns, TypeExpr};

/// One `@tag value` occurrence; `value` may span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    pub title: String,
    pub value: String,
}

/// A cleaned doc comment split into its leading description and tags.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedComment {
    pub description: Option<String>,
    pub tags: Vec<Tag>,
}

impl ParsedComment {
    pub fn has(&self, title: &str) -> bool {
        self.tags.iter().any(|tag| tag.title == title)
    }

    /// Value of the first tag with any of the given titles.
    pub fn first(&self, titles: &[&str]) -> Option<&Tag> {
        self.tags.iter().find(|tag| titles.contains(&tag.title.as_str()))
    }
}

/// Strip the comment delimiters and the leading ` * ` decoration of each line.
pub(crate) fn clean_comment(raw: &str) -> String {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => trimmed,
            }
        })
        .map(str::trim_end)
        .collect();

    trim_blank_lines(&lines.join("\n")).to_string()
}

fn trim_blank_lines(text: &str) -> &str {
    let start = text
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(text.len(), |(i, _)| text[..i].rfind('\n').map_or(0, |nl| nl + 1));
    text[start..].trim_end()
}

/// Split cleaned comment text into description and tags.
pub(crate) fn parse_comment(cleaned: &str) -> ParsedComment {
    let mut description = String::new();
    let mut tags: Vec<Tag> = Vec::new();

    for line in cleaned.lines() {
        if let Some((title, value)) = tag_start(line) {
            tags.push(Tag {
                title,
                value: value.to_string(),
            });
            continue;
        }

        match tags.last_mut() {
            Some(tag) => {
                tag.value.push('\n');
                tag.value.push_str(line);
            }
            None => {
                if !description.is_empty() {
                    description.push('\n');
                }
                description.push_str(line);
            }
        }
    }

    for tag in &mut tags {
        tag.value = if tag.title == "example" {
            trim_blank_lines(&tag.value).to_string()
        } else {
            tag.value.trim().to_string()
        };
    }

    let description = description.trim();
    ParsedComment {
        description: (!description.is_empty()).then(|| description.to_string()),
        tags,
    }
}

fn tag_start(line: &str) -> Option<(String, &str)> {
    let rest = line.trim_start().strip_prefix('@')?;
    let end = rest
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '!'))
        .map_or(rest.len(), |(i, _)| i);
    if end == 0 || !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let title = rest[..end].trim_end_matches('!').to_string();
    Some((title, rest[end..].trim_start()))
}

/// Split a leading `{type}` off a tag value, honouring nested braces.
pub(crate) fn split_type(value: &str) -> (Option<&str>, &str) {
    let value = value.trim_start();
    if !value.starts_with('{') {
        return (None, value);
    }

    let mut depth = 0usize;
    for (i, c) in value.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (Some(value[1..i].trim()), value[i + 1..].trim_start());
                }
            }
            _ => {}
        }
    }
    (None, value)
}

/// Modifiers read off a type expression.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct TypeInfo {
    pub expr: TypeExpr,
    pub optional: bool,
    pub nullable: bool,
    pub variable: bool,
}

/// Parse `...?(string|number)=` style type text.
pub(crate) fn parse_type(raw: &str) -> TypeInfo {
    let mut text = raw.trim();
    let mut info = TypeInfo::default();

    if let Some(rest) = text.strip_prefix("...") {
        info.variable = true;
        text = rest;
    }
    if let Some(rest) = text.strip_suffix('=') {
        info.optional = true;
        text = rest;
    }
    if let Some(rest) = text.strip_prefix('?') {
        info.nullable = true;
        text = rest;
    } else if let Some(rest) = text.strip_prefix('!') {
        text = rest;
    }
    if text.starts_with('(') && text.ends_with(')') {
        text = &text[1..text.len() - 1];
    }

    let mut names = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '<' | '{' | '[' => depth += 1,
            ')' | '>' | '}' | ']' => depth -= 1,
            '|' if depth == 0 => {
                names.push(text[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    names.push(text[start..].trim().to_string());
    names.retain(|name| !name.is_empty());

    info.expr = TypeExpr {
        names,
    };
    info
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Strip the optional `-` separating a name from its description.
fn description_after_name(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    non_empty(rest)
}

/// Parse `{Type} [name=default] - description` as used by `@param` and `@property`.
pub(crate) fn parse_param(value: &str) -> Param {
    let (raw_type, rest) = split_type(value);
    let type_info = raw_type.map(parse_type);

    let (name_part, rest, bracketed) = if let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => (&inner[..close], &inner[close + 1..], true),
            None => (inner, "", true),
        }
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], &rest[end..], false)
    };

    let (name, defaultvalue) = match name_part.split_once('=') {
        Some((name, default)) if bracketed => (name.trim(), non_empty(default)),
        _ => (name_part.trim(), None),
    };

    let mut param = Param {
        name: name.to_string(),
        description: description_after_name(rest),
        optional: bracketed,
        defaultvalue,
        ..Param::default()
    };

    if let Some(info) = type_info {
        param.optional |= info.optional;
        param.nullable = info.nullable;
        param.variable = info.variable;
        if !info.expr.names.is_empty() {
            param.type_ = Some(info.expr);
        }
    }
    param
}

/// Parse `{Type} description` as used by `@returns` and `@throws`.
pub(crate) fn parse_returns(value: &str) -> Returns {
    let (raw_type, rest) = split_type(value);
    Returns {
        type_: raw_type.map(|raw| parse_type(raw).expr).filter(|expr| !expr.names.is_empty()),
        description: non_empty(rest),
    }
}

/// Parse `{Type} name description` as used by `@member`, `@typedef`, `@constant`.
///
/// Returns the type, the first word as name, and the remaining text.
pub(crate) fn parse_typed_name(value: &str) -> (Option<TypeExpr>, Option<String>, Option<String>) {
    let (raw_type, rest) = split_type(value);
    let type_expr = raw_type.map(|raw| parse_type(raw).expr).filter(|expr| !expr.names.is_empty());

    let rest = rest.trim();
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = non_empty(&rest[..end]);
    let remainder = non_empty(&rest[end..]);
    (type_expr, name, remainder)
}
