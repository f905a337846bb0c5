//! Line-oriented block parsing.
//!
//! This is the first stage of document rendering: raw markdown text is
//! split into a flat sequence of typed blocks. The grammar is
//! deliberately small - headings, bullets, fenced code, blank lines,
//! and paragraphs - because the help documents this engine serves are
//! written against exactly that subset.
//!
//! Parsing is total: any input string, including an empty one or one
//! with an unterminated code fence, produces a block sequence. There
//! is no error path.

use std::borrow::Cow;

/// One lexical unit of parsed markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// An ATX heading (`# `, `## `, or `### `). Level is 1, 2 or 3.
    Heading { level: u8, text: String },
    /// A plain line of body text.
    Paragraph { text: String },
    /// A `- ` or `* ` list line.
    Bullet { text: String },
    /// The contents of a fenced code block, trailing newline trimmed.
    Code { text: String },
    /// A blank or whitespace-only line, kept as a spacing marker.
    Blank,
}

impl Block {
    /// Text that participates in inline formatting.
    ///
    /// Bullets carry their `- ` prefix so it takes part in bold and
    /// highlight scanning like any other text. Code renders raw and
    /// blank lines carry nothing, so both yield `None`.
    pub fn inline_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text } => {
                Some(Cow::Borrowed(text.as_str()))
            }
            Block::Bullet { text } => Some(Cow::Owned(format!("- {text}"))),
            Block::Code { .. } | Block::Blank => None,
        }
    }
}

/// Marker that opens and closes a fenced code block.
const FENCE: &str = "```";

/// Parses raw markdown text into an ordered block sequence.
///
/// Single pass over the lines with two states: normal, and inside a
/// code fence. A fence line toggles the state; everything between the
/// markers is collected verbatim. An unterminated fence still yields
/// its collected content as a final `Code` block.
///
/// Line endings are normalized (`\r\n` handled like `\n`), and empty
/// input yields an empty sequence.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    // `Some` while inside a fence, holding the collected code lines.
    let mut fence: Option<String> = None;

    for line in text.lines() {
        if line.starts_with(FENCE) {
            match fence.take() {
                None => fence = Some(String::new()),
                Some(code) => blocks.push(Block::Code {
                    text: code.trim_end_matches('\n').to_string(),
                }),
            }
            continue;
        }

        if let Some(code) = fence.as_mut() {
            code.push_str(line);
            code.push('\n');
            continue;
        }

        blocks.push(classify_line(line));
    }

    // Tolerate an unterminated fence rather than dropping its content.
    if let Some(code) = fence
        && !code.is_empty()
    {
        blocks.push(Block::Code {
            text: code.trim_end_matches('\n').to_string(),
        });
    }

    blocks
}

/// Classifies a single line outside any code fence.
///
/// Heading prefixes are checked longest first so `### ` is not taken
/// for `# `.
fn classify_line(line: &str) -> Block {
    if line.trim().is_empty() {
        return Block::Blank;
    }

    for (prefix, level) in [("### ", 3u8), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Block::Heading {
                level,
                text: rest.trim().to_string(),
            };
        }
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Block::Bullet {
            text: rest.trim().to_string(),
        };
    }

    Block::Paragraph {
        text: line.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            text: text.to_string(),
        }
    }

    fn heading(level: u8, text: &str) -> Block {
        Block::Heading {
            level,
            text: text.to_string(),
        }
    }

    #[test]
    fn parse_empty_input() {
        assert_eq!(parse_blocks(""), vec![]);
    }

    #[test]
    fn parse_single_paragraph() {
        assert_eq!(parse_blocks("hello"), vec![paragraph("hello")]);
    }

    #[test]
    fn parse_trims_paragraph_whitespace() {
        assert_eq!(parse_blocks("  hello  "), vec![paragraph("hello")]);
    }

    #[rstest]
    #[case("# Title", 1, "Title")]
    #[case("## Setup", 2, "Setup")]
    #[case("### Details", 3, "Details")]
    #[case("##   padded  ", 2, "padded")]
    fn parse_heading_levels(#[case] line: &str, #[case] level: u8, #[case] text: &str) {
        assert_eq!(parse_blocks(line), vec![heading(level, text)]);
    }

    #[test]
    fn heading_without_space_is_a_paragraph() {
        assert_eq!(parse_blocks("#nospace"), vec![paragraph("#nospace")]);
    }

    #[rstest]
    #[case("- item")]
    #[case("* item")]
    fn parse_bullet_markers(#[case] line: &str) {
        assert_eq!(
            parse_blocks(line),
            vec![Block::Bullet {
                text: "item".to_string()
            }]
        );
    }

    #[test]
    fn blank_and_whitespace_lines_become_blank_blocks() {
        assert_eq!(
            parse_blocks("a\n\n   \nb"),
            vec![paragraph("a"), Block::Blank, Block::Blank, paragraph("b")]
        );
    }

    #[test]
    fn trailing_newline_does_not_add_a_block() {
        assert_eq!(parse_blocks("a\n"), vec![paragraph("a")]);
    }

    #[test]
    fn crlf_line_endings_are_normalized() {
        assert_eq!(
            parse_blocks("# Title\r\nbody\r\n"),
            vec![heading(1, "Title"), paragraph("body")]
        );
    }

    #[test]
    fn parse_fenced_code_block() {
        let blocks = parse_blocks("```\nlet x = 1;\nlet y = 2;\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                text: "let x = 1;\nlet y = 2;".to_string()
            }]
        );
    }

    #[test]
    fn fence_language_tag_is_ignored() {
        let blocks = parse_blocks("```rust\ncode\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                text: "code".to_string()
            }]
        );
    }

    #[test]
    fn blank_lines_inside_fence_are_kept() {
        let blocks = parse_blocks("```\na\n\nb\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                text: "a\n\nb".to_string()
            }]
        );
    }

    #[test]
    fn markdown_inside_fence_is_not_classified() {
        let blocks = parse_blocks("```\n# not a heading\n- not a bullet\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                text: "# not a heading\n- not a bullet".to_string()
            }]
        );
    }

    #[test]
    fn unterminated_fence_still_yields_code() {
        assert_eq!(
            parse_blocks("```\ncode\n"),
            vec![Block::Code {
                text: "code".to_string()
            }]
        );
    }

    #[test]
    fn unterminated_empty_fence_yields_nothing() {
        assert_eq!(parse_blocks("```\n"), vec![]);
    }

    #[test]
    fn code_indentation_is_preserved() {
        let blocks = parse_blocks("```\n    indented\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                text: "    indented".to_string()
            }]
        );
    }

    #[test]
    fn parse_mixed_document() {
        let input = "# Guide\n\n## Setup\nInstall it.\n- step one\n```\ncargo run\n```\n";
        assert_eq!(
            parse_blocks(input),
            vec![
                heading(1, "Guide"),
                Block::Blank,
                heading(2, "Setup"),
                paragraph("Install it."),
                Block::Bullet {
                    text: "step one".to_string()
                },
                Block::Code {
                    text: "cargo run".to_string()
                },
            ]
        );
    }

    #[test]
    fn bullet_inline_text_carries_prefix() {
        let bullet = Block::Bullet {
            text: "item".to_string(),
        };
        assert_eq!(bullet.inline_text().unwrap(), "- item");
    }

    #[test]
    fn code_and_blank_have_no_inline_text() {
        assert_eq!(
            Block::Code {
                text: "x".to_string()
            }
            .inline_text(),
            None
        );
        assert_eq!(Block::Blank.inline_text(), None);
    }
}
