//! Inline span scanner: `code` and **bold**

use serde::Serialize;

/// A run of inline content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Code(String),
    Bold(String),
}

fn push_literal(spans: &mut Vec<Inline>, literal: &str) {
    if let Some(Inline::Text(last)) = spans.last_mut() {
        last.push_str(literal);
    } else {
        spans.push(Inline::Text(literal.to_string()));
    }
}

/// Body of an inline code span starting at `rest`, if it closes
fn code_span(rest: &str) -> Option<&str> {
    let inner = rest.strip_prefix('`')?;
    let end = inner.find('`')?;
    let body = &inner[..end];
    (!body.is_empty()).then_some(body)
}

/// Body of a bold span starting at `rest`, if it closes cleanly
///
/// A code span opening inside the body wins, even when it closes past the
/// bold marker. A lone backtick is plain text.
fn bold_span(rest: &str) -> Option<&str> {
    let inner = rest.strip_prefix("**")?;
    let end = inner.find("**")?;
    let body = &inner[..end];
    if body.is_empty() || body.contains('*') {
        return None;
    }
    let opens_code = body
        .match_indices('`')
        .any(|(i, _)| code_span(&inner[i..]).is_some());
    (!opens_code).then_some(body)
}

/// Splits a paragraph or list item into inline spans
///
/// Code spans win over bold: a bold marker whose body would start a code
/// span is literal text. Unmatched markers are literal. Adjacent
/// literal runs are merged.
///
/// # Examples
///
/// ```
/// use chatdesk::markdown::{parse_inline, Inline};
///
/// let spans = parse_inline("Run `cargo test` **now**");
/// assert_eq!(
///     spans,
///     vec![
///         Inline::Text("Run ".to_string()),
///         Inline::Code("cargo test".to_string()),
///         Inline::Text(" ".to_string()),
///         Inline::Bold("now".to_string()),
///     ]
/// );
/// ```
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if let Some(body) = code_span(rest) {
            spans.push(Inline::Code(body.to_string()));
            pos += body.len() + 2;
            continue;
        }
        if let Some(body) = bold_span(rest) {
            spans.push(Inline::Bold(body.to_string()));
            pos += body.len() + 4;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        let width = ch.len_utf8();
        push_literal(&mut spans, &rest[..width]);
        pos += width;
    }

    spans
}
