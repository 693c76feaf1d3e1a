//! Block-level scanner for prose segments
//!
//! Recognises paragraphs, unordered lists (`- item`, `* item`) and ordered
//! lists (`1. item`). Blank lines end whatever block is open.

/// A block of prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Lines joined with single spaces
    Paragraph(String),
    UnorderedList(Vec<String>),
    OrderedList(Vec<String>),
}

enum BlockState {
    Idle,
    InParagraph(Vec<String>),
    InUnorderedList(Vec<String>),
    InOrderedList(Vec<String>),
}

impl BlockState {
    fn finish(self) -> Option<Block> {
        match self {
            BlockState::Idle => None,
            BlockState::InParagraph(lines) => Some(Block::Paragraph(lines.join(" "))),
            BlockState::InUnorderedList(items) => Some(Block::UnorderedList(items)),
            BlockState::InOrderedList(items) => Some(Block::OrderedList(items)),
        }
    }
}

enum LineKind<'a> {
    Blank,
    UnorderedItem(&'a str),
    OrderedItem(&'a str),
    Prose(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(item) = unordered_item(line) {
        return LineKind::UnorderedItem(item);
    }
    if let Some(item) = ordered_item(line) {
        return LineKind::OrderedItem(item);
    }
    LineKind::Prose(line)
}

/// `-` or `*` followed by whitespace
fn unordered_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-').or_else(|| line.strip_prefix('*'))?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

/// One or more ASCII digits, a period, then whitespace
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

/// Splits one prose segment into blocks
///
/// # Examples
///
/// ```
/// use chatdesk::markdown::{parse_blocks, Block};
///
/// let blocks = parse_blocks("- a\n- b\n\nc");
/// assert_eq!(
///     blocks,
///     vec![
///         Block::UnorderedList(vec!["a".to_string(), "b".to_string()]),
///         Block::Paragraph("c".to_string()),
///     ]
/// );
/// ```
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut state = BlockState::Idle;

    for line in text.lines() {
        state = match (state, classify(line)) {
            (current, LineKind::Blank) => {
                blocks.extend(current.finish());
                BlockState::Idle
            }
            (BlockState::InUnorderedList(mut items), LineKind::UnorderedItem(item)) => {
                items.push(item.to_string());
                BlockState::InUnorderedList(items)
            }
            (current, LineKind::UnorderedItem(item)) => {
                blocks.extend(current.finish());
                BlockState::InUnorderedList(vec![item.to_string()])
            }
            (BlockState::InOrderedList(mut items), LineKind::OrderedItem(item)) => {
                items.push(item.to_string());
                BlockState::InOrderedList(items)
            }
            (current, LineKind::OrderedItem(item)) => {
                blocks.extend(current.finish());
                BlockState::InOrderedList(vec![item.to_string()])
            }
            (BlockState::InParagraph(mut lines), LineKind::Prose(line)) => {
                lines.push(line.to_string());
                BlockState::InParagraph(lines)
            }
            (current, LineKind::Prose(line)) => {
                blocks.extend(current.finish());
                BlockState::InParagraph(vec![line.to_string()])
            }
        };
    }
    blocks.extend(state.finish());

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_list_then_paragraph() {
        assert_eq!(
            parse_blocks("- a\n- b\n\nc"),
            vec![
                Block::UnorderedList(items(&["a", "b"])),
                Block::Paragraph("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_paragraph_lines_are_space_joined() {
        assert_eq!(
            parse_blocks("  first line  \nsecond line"),
            vec![Block::Paragraph("first line second line".to_string())]
        );
    }

    #[test]
    fn test_asterisk_bullets_and_ordered_items() {
        assert_eq!(
            parse_blocks("* one\n*  two\n1. first\n10.\tsecond"),
            vec![
                Block::UnorderedList(items(&["one", "two"])),
                Block::OrderedList(items(&["first", "second"])),
            ]
        );
    }

    #[test]
    fn test_prose_after_list_closes_list() {
        assert_eq!(
            parse_blocks("1. a\nthen prose"),
            vec![
                Block::OrderedList(items(&["a"])),
                Block::Paragraph("then prose".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_item_after_prose_closes_paragraph() {
        assert_eq!(
            parse_blocks("intro\n- a"),
            vec![
                Block::Paragraph("intro".to_string()),
                Block::UnorderedList(items(&["a"])),
            ]
        );
    }

    #[test]
    fn test_markers_without_space_are_prose() {
        assert_eq!(
            parse_blocks("-a\n**bold** start\n3.14 is pi"),
            vec![Block::Paragraph("-a **bold** start 3.14 is pi".to_string())]
        );
    }

    #[test]
    fn test_indented_items_are_recognised() {
        assert_eq!(
            parse_blocks("   - nested"),
            vec![Block::UnorderedList(items(&["nested"]))]
        );
    }

    #[test]
    fn test_blank_lines_only() {
        assert!(parse_blocks("\n  \n\t\n").is_empty());
    }
}
