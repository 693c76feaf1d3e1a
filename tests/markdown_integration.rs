use chatdesk::markdown::{parse_document, Element, Inline};

fn text(s: &str) -> Inline {
    Inline::Text(s.to_string())
}

#[test]
fn test_reply_with_code_list_and_prose() {
    let reply = "Here are the steps:\n\n\
                 1. Install the **toolchain**\n\
                 2. Run `make`\n\n\
                 ```bash\n\
                 make install\n\
                 ```\n\n\
                 - done\n\
                 - enjoy";

    let elements = parse_document(reply);

    assert_eq!(
        elements,
        vec![
            Element::Paragraph {
                spans: vec![text("Here are the steps:")],
            },
            Element::OrderedList {
                items: vec![
                    vec![text("Install the "), Inline::Bold("toolchain".to_string())],
                    vec![text("Run "), Inline::Code("make".to_string())],
                ],
            },
            Element::Code {
                language: Some("bash".to_string()),
                body: "make install".to_string(),
            },
            Element::UnorderedList {
                items: vec![vec![text("done")], vec![text("enjoy")]],
            },
        ]
    );
}

#[test]
fn test_text_without_markup_is_a_single_paragraph() {
    for sample in ["hello", "a plain sentence.", "numbers 1 2 3 and dashes-in-words"] {
        assert_eq!(
            parse_document(sample),
            vec![Element::Paragraph {
                spans: vec![text(sample)],
            }]
        );
    }
}

#[test]
fn test_unterminated_fence_is_kept_as_text() {
    let elements = parse_document("```rust\nfn main() {}");

    assert!(elements
        .iter()
        .all(|e| !matches!(e, Element::Code { .. })));
    let rendered = serde_json::to_string(&elements).unwrap();
    assert!(rendered.contains("fn main() {}"));
}

#[test]
fn test_every_demo_reply_parses_deterministically() {
    for reply in chatdesk::providers::demo::DEMO_RESPONSES {
        let first = parse_document(reply);
        assert!(!first.is_empty());
        assert_eq!(first, parse_document(reply));
    }
}

#[test]
fn test_empty_and_blank_input_yield_nothing() {
    assert!(parse_document("").is_empty());
    assert!(parse_document("  \n\n\t\n").is_empty());
}
