//! Lexical scan for doc comments and the code they document.
//!
//! This is not a JavaScript parser. It skips strings, template literals,
//! regular expression literals and ordinary comments, tracks brace depth, and remembers which `class` body it
//! is in. That is enough to attach each `/** ... */` block to the first code
//! line after it and to know whether that line is a class member.

use crate::core::DocError;

/// A doc comment with the context needed to build a doclet from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocBlock {
    /// Full comment text including delimiters
    pub raw: String,
    /// 1-based line the comment starts on
    pub line: usize,
    /// First code line after the comment, trimmed
    pub code: Option<String>,
    /// 1-based line of `code`, or the comment's last line when there is none
    pub code_line: usize,
    /// Innermost enclosing class, if any
    pub class: Option<ClassContext>,
}

/// The class body a doc comment sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassContext {
    pub name: String,
    /// The comment is directly in the class body, not nested in a method
    pub direct: bool,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Keywords after which a `/` starts a regular expression, not a division.
const REGEX_KEYWORDS: [&str; 14] = [
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do", "else",
    "yield", "await",
];

/// Index just past the regular expression literal whose opening `/` is at `start`.
///
/// Stops at the end of the line when the literal is never closed.
fn skip_regex(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    let mut in_class = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1).is_some_and(|&c| c != b'\n') => i += 1,
            b'\n' => return i,
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => return i + 1,
            _ => {}
        }
        i += 1;
    }
    i
}

/// Scan `source` and return its doc comments in order.
///
/// # Errors
///
/// Returns [`DocError::Syntax`] when a block comment is never closed.
pub(crate) fn scan(source: &str, file: &str) -> Result<Vec<DocBlock>, DocError> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();

    let mut i = 0;
    let mut line = 1;
    let mut depth = 0usize;
    let mut classes: Vec<(String, usize)> = Vec::new();
    let mut pending_class: Option<String> = None;
    let mut prev_word = String::new();
    // Whether an expression may start here, so that `/` opens a regex
    let mut regex_ok = true;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                let start_line = line;
                let is_doc = bytes.get(i + 2) == Some(&b'*')
                    && bytes.get(i + 3) != Some(&b'*')
                    && bytes.get(i + 3) != Some(&b'/');
                i += 2;

                let mut closed = false;
                while i < bytes.len() {
                    if bytes[i] == b'\n' {
                        line += 1;
                    } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        i += 2;
                        closed = true;
                        break;
                    }
                    i += 1;
                }

                if !closed {
                    return Err(DocError::Syntax {
                        file: file.to_string(),
                        line: start_line,
                        reason: "unterminated comment".to_string(),
                    });
                }

                if is_doc {
                    let (code, code_line) = code_after(&source[i..], line);
                    let class = classes.last().map(|(name, body_depth)| ClassContext {
                        name: name.clone(),
                        direct: *body_depth == depth,
                    });
                    blocks.push(DocBlock {
                        raw: source[start..i].to_string(),
                        line: start_line,
                        code,
                        code_line,
                        class,
                    });
                }
            }
            b'/' if regex_ok => {
                i = skip_regex(bytes, i);
                regex_ok = false;
            }
            b'\'' | b'"' | b'`' => {
                let quote = b;
                let start_line = line;
                i += 1;
                let mut closed = false;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => {
                            if bytes.get(i + 1) == Some(&b'\n') {
                                line += 1;
                            }
                            i += 1;
                        }
                        b'\n' => {
                            line += 1;
                            if quote != b'`' {
                                // Unterminated string literal; resume scanning on the next line
                                closed = true;
                                i += 1;
                                break;
                            }
                        }
                        c if c == quote => {
                            closed = true;
                            i += 1;
                            break;
                        }
                        _ => {}
                    }
                    i += 1;
                }
                if !closed && quote == b'`' {
                    return Err(DocError::Syntax {
                        file: file.to_string(),
                        line: start_line,
                        reason: "unterminated template literal".to_string(),
                    });
                }
                regex_ok = false;
            }
            b'{' => {
                depth += 1;
                if let Some(name) = pending_class.take() {
                    classes.push((name, depth));
                }
                prev_word.clear();
                regex_ok = true;
                i += 1;
            }
            b'}' => {
                if classes.last().is_some_and(|(_, body_depth)| *body_depth == depth) {
                    classes.pop();
                }
                depth = depth.saturating_sub(1);
                prev_word.clear();
                regex_ok = true;
                i += 1;
            }
            _ if is_ident_byte(b) => {
                let start = i;
                while i < bytes.len() && is_ident_byte(bytes[i]) {
                    i += 1;
                }
                let word = &source[start..i];
                if prev_word == "class" {
                    pending_class = Some(word.to_string());
                }
                regex_ok = REGEX_KEYWORDS.contains(&word);
                prev_word = word.to_string();
            }
            b';' => {
                pending_class = None;
                prev_word.clear();
                regex_ok = true;
                i += 1;
            }
            b' ' | b'\t' | b'\r' => i += 1,
            _ => {
                regex_ok = !matches!(b, b')' | b']');
                i += 1;
            }
        }
    }

    Ok(blocks)
}

/// Find the first code line after a comment.
///
/// `rest` starts right after `*/`; `line` is the line `*/` is on.
fn code_after(rest: &str, mut line: usize) -> (Option<String>, usize) {
    let end_line = line;
    for (n, text) in rest.split('\n').enumerate() {
        if n > 0 {
            line += 1;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if trimmed.starts_with("/*") {
            return (None, end_line);
        }
        return (Some(trimmed.to_string()), line);
    }
    (None, end_line)
}
