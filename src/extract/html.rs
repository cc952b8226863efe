//! Experimental support for documenting scripts embedded in HTML files.

use regex::Regex;
use std::sync::LazyLock;

static RE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").unwrap());

/// Keep only the bodies of `<script>` elements.
///
/// Everything outside a script body is replaced by the newlines it contained,
/// so line numbers in doclets still point into the HTML file.
pub(crate) fn script_bodies(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for caps in RE_SCRIPT.captures_iter(html) {
        let Some(body) = caps.get(1) else {
            continue;
        };
        push_newlines(&mut out, &html[last..body.start()]);
        out.push_str(body.as_str());
        last = body.end();
    }
    push_newlines(&mut out, &html[last..]);
    out
}

fn push_newlines(out: &mut String, skipped: &str) {
    out.extend(skipped.chars().filter(|c| *c == '\n'));
}
