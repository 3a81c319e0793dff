//! Line-oriented block parser for the editor's Markdown dialect.
//!
//! One pass, no backtracking. Each line is matched against the rules below in
//! order and the first match wins:
//!
//! 1. line 0 starting with `# ` is the document title
//! 2. `## ` subtitle
//! 3. `> ` quote
//! 4. `-`, `*` or `N.` followed by a space is a list item, indented in 2-column steps
//! 5. a line containing `[text](url)` is split into link references, with
//!    any text around them kept as paragraphs
//! 6. a blank line ends the current paragraph
//! 7. anything else is appended to the current paragraph
//!
//! Malformed markup just falls through to a later rule; parsing never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::inline::{StyledRun, tokenize};
use crate::link::{LinkKind, classify};

/// Title used when the input has no `# ` first line.
pub const DEFAULT_TITLE: &str = "Untitled";

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-*]|\d+\.) (.*)$").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Title {
        text: String,
    },
    Subtitle {
        text: String,
    },
    Quote {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    ListItem {
        text: String,
        ordered: bool,
        indent_level: usize,
        runs: Vec<StyledRun>,
    },
    #[serde(rename_all = "camelCase")]
    LinkRef {
        display_text: String,
        url: String,
        kind: LinkKind,
    },
    Paragraph {
        text: String,
        runs: Vec<StyledRun>,
    },
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = tokenize(&text);
        Block::Paragraph { text, runs }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub title: String,
    /// Body blocks in input order. The title line is not repeated here.
    pub blocks: Vec<Block>,
}

#[derive(Default)]
struct ParagraphBuffer {
    lines: Vec<String>,
}

impl ParagraphBuffer {
    fn push(&mut self, line: &str) {
        self.lines.push(line.trim().to_string());
    }

    fn flush_into(&mut self, blocks: &mut Vec<Block>) {
        if self.lines.is_empty() {
            return;
        }
        let text = self.lines.join(" ");
        self.lines.clear();
        blocks.push(Block::paragraph(text));
    }
}

/// Leading whitespace width, counting a tab as one indent step.
fn indent_width(leading: &str) -> usize {
    leading.chars().map(|c| if c == '\t' { 2 } else { 1 }).sum()
}

fn parse_list_item(line: &str) -> Option<Block> {
    let caps = LIST_ITEM_RE.captures(line)?;
    let leading = caps.get(1).map_or("", |m| m.as_str());
    let marker = caps.get(2)?.as_str();
    let text = caps.get(3).map_or("", |m| m.as_str()).trim_end().to_string();
    let runs = tokenize(&text);
    Some(Block::ListItem {
        ordered: marker.ends_with('.'),
        indent_level: indent_width(leading) / 2,
        runs,
        text,
    })
}

fn push_text(blocks: &mut Vec<Block>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        blocks.push(Block::paragraph(text));
    }
}

/// Every `[text](url)` on the line becomes a link block; the text between
/// links is kept as paragraphs, in order.
fn parse_links(line: &str) -> Option<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut last = 0;
    for caps in LINK_RE.captures_iter(line) {
        let (Some(whole), Some(text), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        // `![alt](url)` is treated like `[alt](url)`
        let before = &line[last..whole.start()];
        push_text(&mut blocks, before.strip_suffix('!').unwrap_or(before));
        let url = url.as_str().to_string();
        let kind = classify(&url);
        tracing::debug!(%url, ?kind, "classified link");
        blocks.push(Block::LinkRef {
            display_text: text.as_str().to_string(),
            url,
            kind,
        });
        last = whole.end();
    }
    if last == 0 {
        return None;
    }
    push_text(&mut blocks, &line[last..]);
    Some(blocks)
}

/// Parse Markdown into a title and an ordered list of blocks.
pub fn parse(markdown: &str) -> ParsedDocument {
    let mut title = None;
    let mut blocks = Vec::new();
    let mut paragraph = ParagraphBuffer::default();

    for (index, raw) in markdown.lines().enumerate() {
        let line = raw.trim_end();

        if index == 0 {
            if let Some(text) = line.strip_prefix("# ") {
                title = Some(text.trim().to_string());
                continue;
            }
        }

        if let Some(text) = line.strip_prefix("## ") {
            paragraph.flush_into(&mut blocks);
            blocks.push(Block::Subtitle {
                text: text.trim().to_string(),
            });
        } else if let Some(text) = line.strip_prefix("> ") {
            paragraph.flush_into(&mut blocks);
            blocks.push(Block::Quote {
                text: text.trim().to_string(),
            });
        } else if let Some(item) = parse_list_item(line) {
            paragraph.flush_into(&mut blocks);
            blocks.push(item);
        } else if let Some(links) = parse_links(line) {
            paragraph.flush_into(&mut blocks);
            blocks.extend(links);
        } else if line.trim().is_empty() {
            paragraph.flush_into(&mut blocks);
        } else {
            paragraph.push(line);
        }
    }
    paragraph.flush_into(&mut blocks);

    ParsedDocument {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::inline::RunStyle;

    fn paragraph_text(block: &Block) -> &str {
        match block {
            Block::Paragraph { text, .. } => text,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn title_and_body() {
        let doc = parse("# Title\n\nBody");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(paragraph_text(&doc.blocks[0]), "Body");
    }

    #[test]
    fn missing_title_uses_placeholder() {
        let doc = parse("Body only");
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn title_only_on_first_line() {
        let doc = parse("intro\n# not a title");
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(paragraph_text(&doc.blocks[0]), "intro # not a title");
    }

    #[test]
    fn empty_input() {
        let doc = parse("");
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn quote_line() {
        let doc = parse("> Quoted line");
        assert_eq!(
            doc.blocks,
            vec![Block::Quote {
                text: "Quoted line".into()
            }]
        );
    }

    #[test]
    fn subtitle_flushes_paragraph() {
        let doc = parse("first\nsecond\n## Section\nafter");
        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(paragraph_text(&doc.blocks[0]), "first second");
        assert_eq!(
            doc.blocks[1],
            Block::Subtitle {
                text: "Section".into()
            }
        );
        assert_eq!(paragraph_text(&doc.blocks[2]), "after");
    }

    #[test]
    fn unordered_list_items() {
        let doc = parse("- item one\n- item two");
        assert_eq!(doc.blocks.len(), 2);
        for block in &doc.blocks {
            match block {
                Block::ListItem {
                    ordered,
                    indent_level,
                    ..
                } => {
                    assert!(!ordered);
                    assert_eq!(*indent_level, 0);
                }
                other => panic!("expected list item, got {other:?}"),
            }
        }
    }

    #[test]
    fn ordered_and_nested_list_items() {
        let doc = parse("1. one\n    * deep **bold**\n\t2. tabbed");
        let summary: Vec<(bool, usize)> = doc
            .blocks
            .iter()
            .map(|b| match b {
                Block::ListItem {
                    ordered,
                    indent_level,
                    ..
                } => (*ordered, *indent_level),
                other => panic!("expected list item, got {other:?}"),
            })
            .collect();
        assert_eq!(summary, vec![(true, 0), (false, 2), (true, 1)]);

        let Block::ListItem { runs, .. } = &doc.blocks[1] else {
            unreachable!()
        };
        assert_eq!(runs[1].style, RunStyle::Bold);
    }

    #[test]
    fn marker_without_space_is_text() {
        let doc = parse("-notalist\n1.nope");
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(paragraph_text(&doc.blocks[0]), "-notalist 1.nope");
    }

    #[test]
    fn link_lines_are_classified() {
        let doc = parse("[pic](https://x.com/a.png)\n[clip](https://youtu.be/xyz)\n[site](https://example.com)");
        let kinds: Vec<LinkKind> = doc
            .blocks
            .iter()
            .map(|b| match b {
                Block::LinkRef { kind, .. } => *kind,
                other => panic!("expected link, got {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![LinkKind::Image, LinkKind::Video, LinkKind::Generic]);
    }

    #[test]
    fn image_bang_syntax_is_a_link() {
        let doc = parse("![alt](https://x.com/a.jpg)");
        assert_eq!(
            doc.blocks,
            vec![Block::LinkRef {
                display_text: "alt".into(),
                url: "https://x.com/a.jpg".into(),
                kind: LinkKind::Image,
            }]
        );
    }

    #[test]
    fn every_link_on_a_line_is_kept() {
        let doc = parse("see [a](https://a.com) and [b](https://b.com/x.png) end");
        assert_eq!(
            doc.blocks,
            vec![
                Block::paragraph("see"),
                Block::LinkRef {
                    display_text: "a".into(),
                    url: "https://a.com".into(),
                    kind: LinkKind::Generic,
                },
                Block::paragraph("and"),
                Block::LinkRef {
                    display_text: "b".into(),
                    url: "https://b.com/x.png".into(),
                    kind: LinkKind::Image,
                },
                Block::paragraph("end"),
            ]
        );
    }

    #[test]
    fn trailing_bang_after_link_is_text() {
        let doc = parse("look ![pic](https://x.com/a.jpg) wow!");
        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(paragraph_text(&doc.blocks[0]), "look");
        assert_eq!(paragraph_text(&doc.blocks[2]), "wow!");
    }

    #[test]
    fn adjacent_links_have_no_text_between() {
        let doc = parse("[a](https://a.com)[b](https://b.com)");
        assert_eq!(doc.blocks.len(), 2);
        assert!(doc.blocks.iter().all(|b| matches!(b, Block::LinkRef { .. })));
    }

    #[test]
    fn broken_link_is_text() {
        let doc = parse("[unclosed](http://x.com");
        assert_eq!(paragraph_text(&doc.blocks[0]), "[unclosed](http://x.com");
    }

    #[test]
    fn blank_runs_do_not_produce_blocks() {
        let doc = parse("a\n\n\n\nb\n   \nc\n");
        assert_eq!(doc.blocks.len(), 3);
    }

    #[test]
    fn windows_line_endings() {
        let doc = parse("# T\r\n\r\nline one\r\nline two\r\n");
        assert_eq!(doc.title, "T");
        assert_eq!(paragraph_text(&doc.blocks[0]), "line one line two");
    }
}
