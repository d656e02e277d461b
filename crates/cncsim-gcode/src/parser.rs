//! G-code line parser
//!
//! Parsing never fails. Every input line yields exactly one [`Block`];
//! text that does not tokenize is recorded on the block as a syntax error
//! and the interpreter refuses to execute that block.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A single letter/value pair such as `X-12.5`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub letter: char,
    pub value: f64,
}

/// One parsed source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based line number in the source text
    pub line_number: usize,
    /// Line as written, comments included
    pub raw_text: String,
    /// Line after comment removal, trimming and uppercasing
    pub cleaned_text: String,
    /// Words in order of appearance, duplicates included
    pub words: Vec<Word>,
    /// Syntax errors found while tokenizing
    pub errors: Vec<String>,
}

impl Block {
    /// A block with nothing to execute and nothing to report
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// First value written for `letter`, later duplicates are ignored
    pub fn value_of(&self, letter: char) -> Option<f64> {
        self.words
            .iter()
            .find(|w| w.letter == letter)
            .map(|w| w.value)
    }
}

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"\([^)]*\)|;.*$").expect("invalid regex pattern"))
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX
        .get_or_init(|| Regex::new(r"([A-Z])([+\-]?\d*\.?\d+)").expect("invalid regex pattern"))
}

/// Remove `( ... )` comments and everything from `;` onward
pub fn strip_comments(line: &str) -> String {
    comment_regex().replace_all(line, "").into_owned()
}

/// Parse one source line
pub fn parse_block(raw: &str, line_number: usize) -> Block {
    let cleaned = strip_comments(raw).trim().to_uppercase();
    let mut block = Block {
        line_number,
        raw_text: raw.to_string(),
        cleaned_text: cleaned,
        words: Vec::new(),
        errors: Vec::new(),
    };
    if block.cleaned_text.is_empty() {
        return block;
    }

    let compact: String = block
        .cleaned_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let mut cursor = 0;

    for caps in word_regex().captures_iter(&compact) {
        let (Some(whole), Some(letter), Some(number)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() != cursor {
            block.errors.push(format!(
                "Unexpected token near '{}'",
                &compact[cursor..whole.start()]
            ));
        }
        cursor = whole.end();

        match number.as_str().parse::<f64>() {
            Ok(value) => block.words.push(Word {
                letter: letter.as_str().chars().next().unwrap_or('?'),
                value,
            }),
            Err(_) => block
                .errors
                .push(format!("Invalid number '{}'", number.as_str())),
        }
    }

    if cursor != compact.len() {
        block
            .errors
            .push(format!("Cannot parse tail '{}'", &compact[cursor..]));
    }

    if block.has_errors() {
        tracing::trace!("Line {}: {:?}", line_number, block.errors);
    }
    block
}

/// Parse a whole program, one block per line (`\n` or `\r\n`)
pub fn parse_program(source: &str) -> Vec<Block> {
    let blocks: Vec<Block> = source
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            parse_block(line, idx + 1)
        })
        .collect();
    tracing::debug!("Parsed {} blocks", blocks.len());
    blocks
}
