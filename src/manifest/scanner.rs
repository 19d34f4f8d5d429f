//! Brace-depth block scanner for Terraform-style configuration text
//!
//! Produces candidate declaration blocks without building a syntax tree:
//! - `keyword "label" ... {` block headers (`module "vpc" {`, `terraform {`)
//! - `name = {` object headers (legacy `terragrunt = { ... }` in `.tfvars`)
//! - the first `source = "..."` and `version = "..."` assignment of each block
//!
//! Quoted strings (with `${...}` / `%{...}` templates), comments and
//! heredocs are skipped so braces inside them never affect depth.

use std::ops::Range;
use tracing::debug;

/// A `key = "value"` assignment captured inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Raw text between the quotes
    pub value: String,
    /// Byte span of the full assignment, from key to closing quote
    pub span: Range<usize>,
    /// Byte span of the value, excluding quotes
    pub value_span: Range<usize>,
}

/// A closed declaration block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Header keyword (`module`, `terraform`, `terragrunt`, ...)
    pub keyword: String,
    /// Header labels with quotes removed
    pub labels: Vec<String>,
    /// Byte span from the header keyword to the closing brace inclusive
    pub span: Range<usize>,
    /// First `source` assignment directly inside this block
    pub source: Option<Attribute>,
    /// First `version` assignment directly inside this block
    pub version: Option<Attribute>,
}

impl Block {
    /// Returns the first header label, e.g. the module name
    pub fn label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Ident { start: usize, end: usize },
    Str { start: usize, end: usize },
    Equals,
    Other,
}

#[derive(Debug)]
struct OpenBlock {
    keyword: Option<String>,
    labels: Vec<String>,
    start: usize,
    source: Option<Attribute>,
    version: Option<Attribute>,
}

/// Lazy scanner over one file's content
///
/// Blocks are yielded as their closing brace is reached, so nested blocks
/// come before their parent. Blocks left open at end of input are dropped.
pub struct BlockScanner<'a> {
    content: &'a str,
    pos: usize,
    stack: Vec<OpenBlock>,
    pending: Vec<Token>,
}

impl<'a> BlockScanner<'a> {
    /// Creates a scanner positioned at the start of `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            pos: 0,
            stack: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn text(&self, range: Range<usize>) -> String {
        self.content[range].to_string()
    }

    fn open_block(&mut self, brace: usize) {
        let block = match self.pending.as_slice() {
            [Token::Ident { start, end }, labels @ ..]
                if labels
                    .iter()
                    .all(|t| matches!(t, Token::Ident { .. } | Token::Str { .. })) =>
            {
                OpenBlock {
                    keyword: Some(self.text(*start..*end)),
                    labels: labels.iter().filter_map(|t| self.label_text(t)).collect(),
                    start: *start,
                    source: None,
                    version: None,
                }
            }
            [Token::Ident { start, end }, Token::Equals] => OpenBlock {
                keyword: Some(self.text(*start..*end)),
                labels: Vec::new(),
                start: *start,
                source: None,
                version: None,
            },
            _ => OpenBlock {
                keyword: None,
                labels: Vec::new(),
                start: brace,
                source: None,
                version: None,
            },
        };
        self.pending.clear();
        self.stack.push(block);
    }

    fn label_text(&self, token: &Token) -> Option<String> {
        match *token {
            Token::Ident { start, end } => Some(self.text(start..end)),
            Token::Str { start, end } => Some(self.text(start + 1..end - 1)),
            _ => None,
        }
    }

    fn close_block(&mut self, brace: usize) -> Option<Block> {
        self.pending.clear();
        let open = self.stack.pop()?;
        let keyword = open.keyword?;
        Some(Block {
            keyword,
            labels: open.labels,
            span: open.start..brace + 1,
            source: open.source,
            version: open.version,
        })
    }

    fn record_attribute(&mut self) {
        let (key_start, key_end, str_start, str_end) = match self.pending.as_slice() {
            [Token::Ident { start, end }, Token::Equals, Token::Str {
                start: s,
                end: e,
            }] => (*start, *end, *s, *e),
            _ => return,
        };
        let key = &self.content[key_start..key_end];
        let attribute = Attribute {
            key: key.to_string(),
            value: self.text(str_start + 1..str_end - 1),
            span: key_start..str_end,
            value_span: str_start + 1..str_end - 1,
        };
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        match key {
            "source" if top.source.is_none() => top.source = Some(attribute),
            "version" if top.version.is_none() => top.version = Some(attribute),
            _ => {}
        }
    }
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let content: &'a str = self.content;
        let bytes = content.as_bytes();

        while self.pos < bytes.len() {
            let start = self.pos;
            match bytes[start] {
                b'\n' => {
                    self.pending.clear();
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'#' => self.pos = line_end(bytes, start),
                b'/' if bytes.get(start + 1) == Some(&b'/') => self.pos = line_end(bytes, start),
                b'/' if bytes.get(start + 1) == Some(&b'*') => {
                    self.pos = comment_end(bytes, start + 2)
                }
                b'"' => {
                    let (end, closed) = string_end(bytes, start + 1);
                    self.pos = end;
                    if closed {
                        self.pending.push(Token::Str { start, end });
                        self.record_attribute();
                    } else {
                        self.pending.push(Token::Other);
                    }
                }
                b'<' if bytes.get(start + 1) == Some(&b'<') => match heredoc_end(bytes, start) {
                    Some(end) => {
                        self.pos = end;
                        self.pending.push(Token::Other);
                    }
                    None => {
                        self.pos += 2;
                        self.pending.push(Token::Other);
                    }
                },
                b'=' => {
                    if matches!(bytes.get(start + 1), Some(b'=') | Some(b'>')) {
                        self.pos += 2;
                        self.pending.push(Token::Other);
                    } else {
                        self.pos += 1;
                        self.pending.push(Token::Equals);
                    }
                }
                b'{' => {
                    self.open_block(start);
                    self.pos += 1;
                }
                b'}' => {
                    self.pos += 1;
                    if let Some(block) = self.close_block(start) {
                        return Some(block);
                    }
                }
                b',' => {
                    self.pending.clear();
                    self.pos += 1;
                }
                b if is_ident_start(b) => {
                    let end = ident_end(bytes, start);
                    self.pos = end;
                    self.pending.push(Token::Ident { start, end });
                }
                _ => {
                    self.pos += 1;
                    self.pending.push(Token::Other);
                }
            }
        }

        if !self.stack.is_empty() {
            debug!(
                unclosed = self.stack.len(),
                "dropping blocks left open at end of input"
            );
            self.stack.clear();
        }
        None
    }
}

/// Scan `content` for declaration blocks
pub fn scan_blocks(content: &str) -> BlockScanner<'_> {
    BlockScanner::new(content)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn ident_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| !is_ident_char(b))
        .map(|p| from + p)
        .unwrap_or(bytes.len())
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| from + p)
        .unwrap_or(bytes.len())
}

fn comment_end(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| rest.windows(2).position(|w| w == b"*/"))
        .map(|p| from + p + 2)
        .unwrap_or(bytes.len())
}

/// Returns the index after the closing quote and whether the string closed.
/// An unclosed string stops at the end of its line.
fn string_end(bytes: &[u8], from: usize) -> (usize, bool) {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return (i + 1, true),
            b'\n' => return (i, false),
            marker @ (b'$' | b'%') => match bytes.get(i + 1) {
                Some(&next) if next == marker => i += 2,
                Some(b'{') => i = template_end(bytes, i + 2),
                _ => i += 1,
            },
            _ => i += 1,
        }
    }
    (bytes.len(), false)
}

fn template_end(bytes: &[u8], from: usize) -> usize {
    let mut depth = 1usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = string_end(bytes, i + 1).0,
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Returns the end of the heredoc's closing marker line, or None if the
/// `<<` at `start` does not open a heredoc.
fn heredoc_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 2;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    if !bytes.get(i).copied().is_some_and(is_ident_start) {
        return None;
    }
    let ident_start = i;
    i = ident_end(bytes, i);
    let marker = &bytes[ident_start..i];

    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\r') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] != b'\n' {
        return None;
    }

    while i < bytes.len() {
        let line_start = i + 1;
        let end = line_end(bytes, line_start.min(bytes.len()));
        if bytes[line_start.min(end)..end].trim_ascii() == marker {
            return Some(end);
        }
        i = end;
    }
    Some(bytes.len())
}
