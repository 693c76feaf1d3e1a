use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::commands::display::render_document;
use crate::error::{ChatdeskError, Result};
use crate::markdown::parse_document;

/// Parse markdown from a file or stdin and print it
///
/// # Arguments
///
/// * `file` - Source file; stdin when `None`
/// * `json` - Print the parsed elements as JSON instead of styled text
///
/// # Errors
///
/// Returns error if the input cannot be read
pub fn run_render(file: Option<&Path>, json: bool) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(ChatdeskError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(ChatdeskError::from)?;
            buffer
        }
    };

    let elements = parse_document(&text);
    tracing::debug!(elements = elements.len(), "Parsed document");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&elements).map_err(ChatdeskError::from)?
        );
    } else {
        println!("{}", render_document(&elements));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.md");

        let err = run_render(Some(&path), false).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ChatdeskError>(),
            Some(ChatdeskError::Io(_))
        ));
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_renders_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reply.md");
        std::fs::write(&path, "- one\n- two").unwrap();

        assert!(run_render(Some(&path), true).is_ok());
    }
}
