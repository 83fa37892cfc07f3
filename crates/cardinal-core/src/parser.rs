// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::DEFAULT_EASINESS;
use crate::types::card::Easiness;

/// Metadata that can be specified at the top of a card file.
#[derive(Debug, Deserialize)]
struct FileMetadata {
    /// Overrides the category derived from the file name.
    category: Option<String>,
    /// Initial easiness for every card in the file.
    easiness: Option<Easiness>,
}

/// Extract TOML frontmatter from a card file.
/// Returns (frontmatter_metadata, content_without_frontmatter)
fn extract_frontmatter(text: &str) -> Fallible<(FileMetadata, &str)> {
    let mut lines = text.lines().enumerate().peekable();

    // Check if the file starts with frontmatter delimiter
    match lines.peek() {
        Some((_, line)) if line.trim() == "---" => {}
        _ => {
            return Ok((
                FileMetadata {
                    category: None,
                    easiness: None,
                },
                text,
            ));
        }
    };
    lines.next(); // consume the opening delimiter

    // Collect frontmatter lines and find closing delimiter
    let mut frontmatter_lines = Vec::new();
    let mut closing_line_idx = None;

    for (idx, line) in lines {
        if line.trim() == "---" {
            closing_line_idx = Some(idx);
            break;
        }
        frontmatter_lines.push(line);
    }

    let closing_line_idx = closing_line_idx.ok_or_else(|| {
        ErrorReport::new(ErrorKind::Parse(
            "Frontmatter opening '---' found but no closing '---'".to_string(),
        ))
    })?;

    // Parse TOML from frontmatter
    let frontmatter_str = frontmatter_lines.join("\n");
    let metadata: FileMetadata = toml::from_str(&frontmatter_str).map_err(|e| {
        ErrorReport::new(ErrorKind::Parse(format!(
            "Failed to parse TOML frontmatter: {e}"
        )))
    })?;

    // Find byte offset where content starts (line after closing delimiter)
    let content_start_line = closing_line_idx + 1;
    let mut current_line = 0;
    let mut byte_pos = None;

    for (pos, ch) in text.char_indices() {
        if ch == '\n' {
            current_line += 1;
            if current_line == content_start_line {
                byte_pos = Some(pos + 1); // Start after the newline
                break;
            }
        }
    }

    // If byte_pos was never set, content starts at end of text (empty content)
    let content = match byte_pos {
        Some(pos) if pos < text.len() => &text[pos..],
        _ => "",
    };

    Ok((metadata, content))
}

/// Parse a single card file into cards.
///
/// # Arguments
/// * `category` - Category label for the file's cards, overridable by frontmatter
/// * `source_path` - A reference path for error messages
/// * `text` - The file content to parse
pub fn parse_card_file(category: &str, source_path: &str, text: &str) -> Fallible<Vec<Card>> {
    let (metadata, content) = extract_frontmatter(text)?;
    let category = metadata.category.unwrap_or_else(|| category.to_string());
    let easiness = metadata.easiness.unwrap_or(DEFAULT_EASINESS);
    let parser = Parser::new(category, easiness, source_path.to_string());
    Ok(parser.parse(content)?)
}

pub struct Parser {
    category: String,
    easiness: Easiness,
    source_path: String,
}

#[derive(Debug, PartialEq)]
pub struct ParserError {
    pub message: String,
    pub source_path: String,
    pub line_num: usize,
}

impl ParserError {
    fn new(message: impl Into<String>, source_path: String, line_num: usize) -> Self {
        ParserError {
            message: message.into(),
            source_path,
            line_num,
        }
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.source_path, self.line_num, self.message
        )
    }
}

impl Error for ParserError {}

/// Which part of a card the parser is currently filling.
enum Section {
    Title,
    Front,
    Back,
}

/// Accumulator for the card being parsed.
struct Partial {
    title: String,
    front: String,
    back: String,
}

impl Partial {
    fn new() -> Self {
        Partial {
            title: String::new(),
            front: String::new(),
            back: String::new(),
        }
    }

    /// A card needs a title and at least one non-empty side.
    fn is_empty(&self) -> bool {
        self.title.is_empty() || (self.front.trim().is_empty() && self.back.trim().is_empty())
    }
}

impl Parser {
    pub fn new(category: String, easiness: Easiness, source_path: String) -> Self {
        Parser {
            category,
            easiness,
            source_path,
        }
    }

    /// Cards are delimited by `#` headings; the first `##` heading within a
    /// card opens the front, the second opens the back. Further `##`
    /// headings and text before the front are ignored.
    pub fn parse(&self, text: &str) -> Result<Vec<Card>, ParserError> {
        let mut cards: Vec<Card> = Vec::new();
        let mut partial = Partial::new();
        let mut section = Section::Title;

        for (idx, line) in text.lines().enumerate() {
            if let Some(stripped) = line.strip_prefix("# ") {
                if !partial.is_empty() {
                    cards.push(self.complete(&partial));
                }
                partial = Partial::new();
                section = Section::Title;
                partial.title = stripped.trim().to_string();
            } else if line.starts_with("## ") {
                if partial.title.is_empty() {
                    return Err(ParserError::new(
                        "section heading before any card title",
                        self.source_path.clone(),
                        idx + 1,
                    ));
                }
                match section {
                    Section::Title => section = Section::Front,
                    Section::Front => section = Section::Back,
                    Section::Back => {}
                }
            } else {
                match section {
                    Section::Title => {}
                    Section::Front => {
                        partial.front.push_str(line);
                        partial.front.push('\n');
                    }
                    Section::Back => {
                        partial.back.push_str(line);
                        partial.back.push('\n');
                    }
                }
            }
        }
        if !partial.is_empty() {
            cards.push(self.complete(&partial));
        }

        Ok(cards)
    }

    fn complete(&self, partial: &Partial) -> Card {
        Card::new(
            partial.title.trim(),
            partial.front.trim(),
            partial.back.trim(),
            self.category.as_str(),
            self.easiness,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card::EASINESS_FLOOR;

    fn parse(text: &str) -> Fallible<Vec<Card>> {
        parse_card_file("Test", "test.md", text)
    }

    #[test]
    fn test_parse_two_cards() -> Fallible<()> {
        let text = "\
# First
## Question
What is one plus one?
## Answer
Two.

# Second
## Question
2 + 2?
## Answer
4
";
        let cards = parse(text)?;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title(), "First");
        assert_eq!(cards[0].front(), "What is one plus one?");
        assert_eq!(cards[0].back(), "Two.");
        assert_eq!(cards[0].category(), "Test");
        assert_eq!(cards[1].title(), "Second");
        assert_eq!(cards[1].front(), "2 + 2?");
        assert_eq!(cards[1].back(), "4");
        Ok(())
    }

    #[test]
    fn test_multi_line_sections() -> Fallible<()> {
        let text = "\
# Card
## Front
line one
line two
## Back
answer
";
        let cards = parse(text)?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front(), "line one\nline two");
        assert_eq!(cards[0].back(), "answer");
        Ok(())
    }

    #[test]
    fn test_section_before_title_is_an_error() {
        let text = "## Front\nstray\n";
        let err = parse(text).err().unwrap();
        assert!(err.to_string().contains("test.md:1"));
        assert!(err.to_string().contains("section heading before any card title"));
    }

    #[test]
    fn test_extra_sections_ignored() -> Fallible<()> {
        let text = "\
# Card
## Front
f
## Back
b
## Extra
more
";
        let cards = parse(text)?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].back(), "b\nmore");
        Ok(())
    }

    #[test]
    fn test_cards_without_content_are_skipped() -> Fallible<()> {
        let text = "\
# Only a title

# Real
## Q
q
## A
a
";
        let cards = parse(text)?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title(), "Real");
        Ok(())
    }

    #[test]
    fn test_empty_text() -> Fallible<()> {
        assert!(parse("")?.is_empty());
        assert!(parse("preamble with no headings\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_frontmatter_overrides() -> Fallible<()> {
        let text = "\
---
category = \"Chemistry\"
easiness = 2.0
---
# Card
## Q
q
## A
a
";
        let cards = parse(text)?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].category(), "Chemistry");
        assert_eq!(cards[0].easiness(), 2.0);
        Ok(())
    }

    #[test]
    fn test_frontmatter_easiness_clamped_to_floor() -> Fallible<()> {
        let text = "\
---
easiness = 0.1
---
# Card
## Q
q
## A
a
";
        let cards = parse(text)?;
        assert_eq!(cards[0].easiness(), EASINESS_FLOOR);
        assert_eq!(cards[0].category(), "Test");
        Ok(())
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let text = "---\ncategory = \"X\"\n# Card\n";
        let err = parse(text).err().unwrap();
        assert!(err.to_string().contains("no closing"));
    }

    #[test]
    fn test_invalid_frontmatter_toml() {
        let text = "---\ncategory =\n---\n# Card\n";
        let err = parse(text).err().unwrap();
        assert!(err.to_string().contains("TOML frontmatter"));
    }
}
