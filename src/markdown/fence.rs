//! Fenced code block extraction
//!
//! Splits raw assistant text into code and prose segments with a line
//! scanner. Only fully closed fences become code; an unterminated fence is
//! folded back into the surrounding prose.

use serde::Serialize;

const FENCE: &str = "```";

/// A closed, fenced code region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Tag written right after the opening fence, e.g. `js`
    pub language: Option<String>,
    /// Trimmed content between the fences
    pub body: String,
}

/// One top-level piece of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Code(CodeBlock),
    Text(String),
}

enum FenceState<'a> {
    OutsideFence,
    InsideFence {
        opening: &'a str,
        language: Option<String>,
        body: Vec<&'a str>,
    },
}

/// Returns the language tag if `line` opens a fence
///
/// `Some(None)` is a bare fence, `Some(Some(tag))` a tagged one.
fn opening_fence(line: &str) -> Option<Option<String>> {
    let rest = line.trim().strip_prefix(FENCE)?;
    if rest.is_empty() {
        return Some(None);
    }
    if rest.chars().any(|c| c.is_whitespace() || c == '`') {
        return None;
    }
    Some(Some(rest.to_string()))
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == FENCE
}

fn flush_text(lines: &mut Vec<&str>, segments: &mut Vec<Segment>) {
    let text = lines.join("\n");
    lines.clear();
    let text = text.trim();
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Splits `text` into code and text segments in original order
///
/// Text segments are trimmed and whitespace-only ones are dropped. Code
/// bodies are trimmed.
///
/// # Examples
///
/// ```
/// use chatdesk::markdown::{parse_segments, CodeBlock, Segment};
///
/// let segments = parse_segments("pre\n```js\nconsole.log(1)\n```\npost");
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Text("pre".to_string()),
///         Segment::Code(CodeBlock {
///             language: Some("js".to_string()),
///             body: "console.log(1)".to_string(),
///         }),
///         Segment::Text("post".to_string()),
///     ]
/// );
/// ```
pub fn parse_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pending_text: Vec<&str> = Vec::new();
    let mut state = FenceState::OutsideFence;

    for line in text.lines() {
        state = match state {
            FenceState::OutsideFence => match opening_fence(line) {
                Some(language) => FenceState::InsideFence {
                    opening: line,
                    language,
                    body: Vec::new(),
                },
                None => {
                    pending_text.push(line);
                    FenceState::OutsideFence
                }
            },
            FenceState::InsideFence {
                opening,
                language,
                mut body,
            } => {
                if is_closing_fence(line) {
                    flush_text(&mut pending_text, &mut segments);
                    segments.push(Segment::Code(CodeBlock {
                        language,
                        body: body.join("\n").trim().to_string(),
                    }));
                    FenceState::OutsideFence
                } else {
                    body.push(line);
                    FenceState::InsideFence {
                        opening,
                        language,
                        body,
                    }
                }
            }
        };
    }

    // Unterminated fence: keep what was read as prose
    if let FenceState::InsideFence { opening, body, .. } = state {
        pending_text.push(opening);
        pending_text.extend(body);
    }
    flush_text(&mut pending_text, &mut segments);

    segments
}
