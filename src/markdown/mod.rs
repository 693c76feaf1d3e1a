//! Text block parser for assistant messages
//!
//! Parsing runs in three passes, each a small scanner with named states:
//!
//! 1. [`parse_segments`] separates fenced code from prose
//! 2. [`parse_blocks`] splits prose into paragraphs and lists
//! 3. [`parse_inline`] finds inline code and bold spans
//!
//! [`parse_document`] runs all three. Parsing is pure: the same text always
//! yields the same elements.

pub mod block;
pub mod fence;
pub mod inline;

use serde::Serialize;

pub use block::{parse_blocks, Block};
pub use fence::{parse_segments, CodeBlock, Segment};
pub use inline::{parse_inline, Inline};

/// A fully parsed, renderable element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Code {
        language: Option<String>,
        body: String,
    },
    Paragraph {
        spans: Vec<Inline>,
    },
    UnorderedList {
        items: Vec<Vec<Inline>>,
    },
    OrderedList {
        items: Vec<Vec<Inline>>,
    },
}

impl From<Block> for Element {
    fn from(block: Block) -> Self {
        let parse_items = |items: Vec<String>| -> Vec<Vec<Inline>> {
            items.iter().map(|item| parse_inline(item)).collect()
        };
        match block {
            Block::Paragraph(text) => Element::Paragraph {
                spans: parse_inline(&text),
            },
            Block::UnorderedList(items) => Element::UnorderedList {
                items: parse_items(items),
            },
            Block::OrderedList(items) => Element::OrderedList {
                items: parse_items(items),
            },
        }
    }
}

/// Parses a whole message into renderable elements
///
/// # Examples
///
/// ```
/// use chatdesk::markdown::{parse_document, Element, Inline};
///
/// let elements = parse_document("Hello **there**");
/// assert_eq!(
///     elements,
///     vec![Element::Paragraph {
///         spans: vec![
///             Inline::Text("Hello ".to_string()),
///             Inline::Bold("there".to_string()),
///         ],
///     }]
/// );
/// ```
pub fn parse_document(text: &str) -> Vec<Element> {
    let mut elements = Vec::new();
    for segment in parse_segments(text) {
        match segment {
            Segment::Code(CodeBlock { language, body }) => {
                elements.push(Element::Code { language, body });
            }
            Segment::Text(prose) => {
                elements.extend(parse_blocks(&prose).into_iter().map(Element::from));
            }
        }
    }
    elements
}
