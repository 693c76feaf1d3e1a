//! Terminal rendering of messages, documents and notices

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::chat::{Conversation, Message, Notice, NoticeLevel, Role};
use crate::helpers::format_timestamp;
use crate::markdown::{parse_document, Element, Inline};

fn render_spans(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(text) => text.clone(),
            Inline::Code(code) => format!("`{}`", code).yellow().to_string(),
            Inline::Bold(text) => text.bold().to_string(),
        })
        .collect()
}

fn render_code(language: Option<&str>, body: &str) -> Vec<String> {
    let label = language.unwrap_or("code");
    let mut lines = vec![format!("┌─ {}", label).dimmed().to_string()];
    lines.extend(
        body.lines()
            .map(|line| format!("{} {}", "│".dimmed(), line.green())),
    );
    lines.push("└─".dimmed().to_string());
    lines
}

/// Renders parsed elements as terminal lines
///
/// Elements are separated by a blank line. Code blocks are framed with
/// their language label, lists are indented.
pub fn render_document(elements: &[Element]) -> String {
    let blocks: Vec<String> = elements
        .iter()
        .map(|element| match element {
            Element::Code { language, body } => render_code(language.as_deref(), body).join("\n"),
            Element::Paragraph { spans } => render_spans(spans),
            Element::UnorderedList { items } => items
                .iter()
                .map(|item| format!("  • {}", render_spans(item)))
                .collect::<Vec<_>>()
                .join("\n"),
            Element::OrderedList { items } => items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("  {}. {}", i + 1, render_spans(item)))
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect();
    blocks.join("\n\n")
}

/// Renders one message with its author and a relative timestamp
///
/// User text is shown as typed; assistant text goes through the markdown
/// parser.
pub fn render_message(message: &Message, now: DateTime<Utc>) -> String {
    let stamp = format_timestamp(message.timestamp(), now).dimmed();
    match message.role() {
        Role::User => format!("{} {}\n{}", "You".blue().bold(), stamp, message.content()),
        Role::Assistant => format!(
            "{} {}\n{}",
            "Assistant".green().bold(),
            stamp,
            render_document(&parse_document(message.content()))
        ),
    }
}

/// Renders every message of a conversation under a title line
pub fn render_conversation(conversation: &Conversation, now: DateTime<Utc>) -> String {
    let mut out = format!("{}\n", conversation.title().bold().underline());
    if conversation.is_empty() {
        out.push_str(&"No messages yet.".dimmed().to_string());
        return out;
    }
    let messages: Vec<String> = conversation
        .messages()
        .iter()
        .map(|m| render_message(m, now))
        .collect();
    out.push_str(&messages.join("\n\n"));
    out
}

/// Renders a notice as `Title: description`
pub fn render_notice(notice: &Notice) -> String {
    let title = match notice.level {
        NoticeLevel::Info => notice.title.green().bold(),
        NoticeLevel::Error => notice.title.red().bold(),
    };
    format!("{}: {}", title, notice.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_document_plain() {
        plain();
        let elements = parse_document(
            "Intro with `code` and **bold**\n\n- one\n- two\n\n1. first\n\n```rs\nlet x = 1;\n```",
        );
        assert_eq!(
            render_document(&elements),
            "Intro with `code` and bold\n\n  • one\n  • two\n\n  1. first\n\n┌─ rs\n│ let x = 1;\n└─"
        );
    }

    #[test]
    fn test_code_without_language_is_labelled() {
        plain();
        let elements = parse_document("```\nx\n```");
        assert!(render_document(&elements).starts_with("┌─ code"));
    }

    #[test]
    fn test_render_notice() {
        plain();
        let notice = Notice::info("Chat deleted", "The conversation has been removed.");
        assert_eq!(
            render_notice(&notice),
            "Chat deleted: The conversation has been removed."
        );
    }

    #[test]
    fn test_render_empty_conversation() {
        plain();
        let conversation = Conversation::new("New Chat");
        assert_eq!(
            render_conversation(&conversation, Utc::now()),
            "New Chat\nNo messages yet."
        );
    }

    #[test]
    fn test_render_user_message_is_not_parsed() {
        plain();
        let message = Message::user("**not bold**");
        let rendered = render_message(&message, message.timestamp());
        assert_eq!(rendered, "You Just now\n**not bold**");
    }
}
