//! Text extraction from job description files

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Strip Markdown to plain text, one block per line. List items keep a
/// leading dash and headings keep their trailing text (e.g. `Requirements:`).
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::Start(Tag::Item) => text.push_str("- "),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                text.push('\n')
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_markdown_to_text() {
        let markdown = "# Senior Engineer\n\nWe build **Rust** services.\n\n## Requirements:\n\n- Kafka\n- `Docker`\n";
        let text = markdown_to_text(markdown);
        assert_eq!(
            text,
            "Senior Engineer\nWe build Rust services.\nRequirements:\n- Kafka\n- Docker"
        );
    }

    #[test]
    fn test_markdown_links_keep_label() {
        let text = markdown_to_text("See [our stack](https://example.com) page");
        assert_eq!(text, "See our stack page");
    }

    #[tokio::test]
    async fn test_plain_text_extraction() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Rust engineer wanted").unwrap();
        let text = PlainTextExtractor.extract(file.path()).await.unwrap();
        assert_eq!(text, "Rust engineer wanted");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = PlainTextExtractor
            .extract(Path::new("/nonexistent/job.txt"))
            .await;
        assert!(matches!(result, Err(crate::error::AtsError::Io(_))));
    }
}
