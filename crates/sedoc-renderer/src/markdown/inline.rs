//! Inline style tokenizer.
//!
//! Recognises two constructs inside a span of text:
//!
//! - `**bold**`
//! - `word(#RRGGBB)` which colours the word immediately before the annotation
//!
//! Everything else is passed through as [`RunStyle::Normal`]. Bold and colour
//! never nest; a run carries exactly one style.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const BOLD_DELIM: &str = "**";

/// The coloured span is the run of non-space characters right before `(#hex)`.
static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s()*]+)\(#([0-9A-Fa-f]{6})\)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RunStyle {
    Normal,
    Bold,
    /// `#rrggbb`, lowercased
    Color(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

impl StyledRun {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::Normal,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::Bold,
        }
    }

    pub fn color(text: impl Into<String>, hex: &str) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::Color(format!("#{}", hex.to_ascii_lowercase())),
        }
    }
}

/// Concatenate the text of a run list, dropping the styles.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

enum Next<'a> {
    Bold { start: usize },
    Color { start: usize, end: usize, text: &'a str, hex: &'a str },
}

fn next_construct(rest: &str) -> Option<Next<'_>> {
    let bold = rest.find(BOLD_DELIM);
    let color = COLOR_RE.captures(rest).and_then(|caps| {
        let whole = caps.get(0)?;
        Some(Next::Color {
            start: whole.start(),
            end: whole.end(),
            text: caps.get(1)?.as_str(),
            hex: caps.get(2)?.as_str(),
        })
    });

    match (bold, color) {
        (None, None) => None,
        (Some(start), None) => Some(Next::Bold { start }),
        (None, Some(color)) => Some(color),
        (Some(start), Some(color)) => match color {
            Next::Color { start: c, .. } if c < start => Some(color),
            _ => Some(Next::Bold { start }),
        },
    }
}

fn push_run(runs: &mut Vec<StyledRun>, run: StyledRun) {
    if !run.text.is_empty() {
        runs.push(run);
    }
}

/// Split `text` into styled runs, left to right.
///
/// An opening `**` with no closing partner ends scanning: the rest of the
/// text, marker included, becomes one normal run.
pub fn tokenize(text: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match next_construct(rest) {
            None => {
                push_run(&mut runs, StyledRun::normal(rest));
                break;
            }
            Some(Next::Bold { start }) => {
                let inner_start = start + BOLD_DELIM.len();
                let Some(close) = rest[inner_start..].find(BOLD_DELIM) else {
                    push_run(&mut runs, StyledRun::normal(rest));
                    break;
                };
                let inner_end = inner_start + close;
                push_run(&mut runs, StyledRun::normal(&rest[..start]));
                push_run(&mut runs, StyledRun::bold(&rest[inner_start..inner_end]));
                rest = &rest[inner_end + BOLD_DELIM.len()..];
            }
            Some(Next::Color {
                start,
                end,
                text,
                hex,
            }) => {
                push_run(&mut runs, StyledRun::normal(&rest[..start]));
                push_run(&mut runs, StyledRun::color(text, hex));
                rest = &rest[end..];
            }
        }
    }

    runs
}
