//! Markup-to-text conversion for HTML bodies.
//!
//! Rendering is done by `html2text` in rich mode so that link targets and
//! images can be dropped by annotation rather than by string surgery.

use std::sync::LazyLock;

use html2text::render::RichAnnotation;
use regex::Regex;

/// Column at which converted text is wrapped.
pub const WRAP_WIDTH: usize = 100;

static BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|\z)").unwrap());
static HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").unwrap());
// Spans whose newlines must not be touched: raw-text elements, comments and tags.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<pre\b.*?</pre\s*>|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<textarea\b.*?</textarea\s*>|<!--.*?-->|<[A-Za-z/!][^>]*>",
    )
    .unwrap()
});

/// Convert an HTML document to plain text.
///
/// - wraps at [`WRAP_WIDTH`] columns
/// - lays out table cells without borders
/// - keeps anchor text, drops link targets
/// - omits images, alt text included
/// - keeps line breaks that appear in the source text
/// - renders only the `<body>` when one is present
pub fn html_to_text(html: &str) -> String {
    let fragment = preserve_source_newlines(&select_body(html));

    let rendered = html2text::config::rich()
        .no_table_borders()
        .lines_from_read(fragment.as_bytes(), WRAP_WIDTH);
    match rendered {
        Ok(lines) => {
            let rendered: Vec<String> = lines
                .iter()
                .map(|line| {
                    let text: String = line
                        .tagged_strings()
                        .filter(|ts| !ts.tag.iter().any(|a| matches!(a, RichAnnotation::Image(_))))
                        .map(|ts| ts.s.as_str())
                        .collect();
                    text.trim_end().to_string()
                })
                .collect();
            rendered.join("\n").trim_end().to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "HTML rendering failed, stripping tags instead");
            strip_tags(&fragment)
        }
    }
}

/// The inner content of `<body>`, or the whole document minus `<head>`.
fn select_body(html: &str) -> String {
    let html = html.replace("\r\n", "\n");
    match BODY.captures(&html).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().to_string(),
        None => HEAD.replace_all(&html, "").into_owned(),
    }
}

/// Turn newlines in text content into `<br>` so the renderer keeps them.
fn preserve_source_newlines(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut last = 0;
    for m in MARKUP.find_iter(fragment) {
        out.push_str(&fragment[last..m.start()].replace('\n', "<br>"));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&fragment[last..].replace('\n', "<br>"));
    out
}

/// Last-resort tag stripper used when rendering fails.
fn strip_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}
