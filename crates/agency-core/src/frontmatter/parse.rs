//! Recursive-descent parser over the token stream produced by [`tokenize`].

use serde_json::{Map, Value};

use super::token::{tokenize, Token};
use super::{Document, Metadata, DELIMITER};
use crate::error::ParseError;

/// Parse a frontmatter document into metadata and body.
///
/// Never fails: a document without a well-formed delimiter pair comes back
/// with empty metadata and the entire input as its body.
#[must_use]
pub fn parse(document: &str) -> Document {
    match split_document(document) {
        Ok((block, body)) => Document {
            metadata: parse_block(block),
            body: body.to_string(),
        },
        Err(err) => {
            tracing::debug!(error = %err, "treating document as body text");
            Document {
                metadata: Metadata::new(),
                body: document.to_string(),
            }
        }
    }
}

/// Locate the metadata block and the body that follows the closing
/// delimiter. The body is returned byte-for-byte.
fn split_document(document: &str) -> Result<(&str, &str), ParseError> {
    let input = document.strip_prefix('\u{feff}').unwrap_or(document);

    let (first, rest) = input
        .split_once('\n')
        .ok_or(ParseError::MissingOpeningDelimiter)?;
    if first.trim_end() != DELIMITER {
        return Err(ParseError::MissingOpeningDelimiter);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((block, body));
        }
        offset += line.len();
    }

    Err(ParseError::UnclosedFrontmatter)
}

fn parse_block(block: &str) -> Metadata {
    let tokens = tokenize(block);
    let mut parser = Parser { tokens, pos: 0 };
    let indent = parser.next_entry_indent().unwrap_or(0);
    let metadata = parser.mapping(indent);

    for token in &parser.tokens[parser.pos..] {
        if !matches!(token, Token::Blank) {
            tracing::debug!(?token, "ignoring frontmatter line outside any block");
        }
    }
    metadata
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Next token that is not blank or unrecognised text, without consuming.
    fn peek(&mut self) -> Option<Token<'a>> {
        while let Some(token) = self.tokens.get(self.pos) {
            match token {
                Token::Blank => self.pos += 1,
                Token::Text { line, raw } => {
                    tracing::debug!(line, raw, "skipping unrecognised frontmatter line");
                    self.pos += 1;
                }
                other => return Some(*other),
            }
        }
        None
    }

    fn next_entry_indent(&mut self) -> Option<usize> {
        match self.peek()? {
            Token::Entry { indent, .. } => Some(indent),
            _ => None,
        }
    }

    /// `mapping := (Entry(indent >= base) value)*`
    ///
    /// Items at or under `base` that no key owns are dropped.
    fn mapping(&mut self, base: usize) -> Metadata {
        let mut map = Map::new();

        while let Some(token) = self.peek() {
            match token {
                Token::Entry { indent, key, value } if indent >= base => {
                    self.pos += 1;
                    let parsed = if value.is_empty() {
                        self.block_value(indent)
                    } else {
                        scalar(value)
                    };
                    map.insert(key.to_string(), parsed);
                }
                Token::Item { indent, value } if indent >= base => {
                    tracing::debug!(value, "dropping array item with no owning key");
                    self.pos += 1;
                }
                _ => break,
            }
        }

        map
    }

    /// Value of a `key:` entry with nothing after the colon: an item list,
    /// a nested mapping, or an empty string.
    fn block_value(&mut self, owner_indent: usize) -> Value {
        match self.peek() {
            Some(Token::Item { indent, .. }) if indent >= owner_indent => {
                Value::Array(self.items(owner_indent))
            }
            Some(Token::Entry { indent, .. }) if indent > owner_indent => {
                Value::Object(self.mapping(indent))
            }
            _ => Value::String(String::new()),
        }
    }

    /// `items := (Item(indent >= owner))+`
    fn items(&mut self, owner_indent: usize) -> Vec<Value> {
        let mut items = Vec::new();
        while let Some(Token::Item { indent, value }) = self.peek() {
            if indent < owner_indent {
                break;
            }
            self.pos += 1;
            items.push(Value::String(strip_quotes(value).to_string()));
        }
        items
    }
}

/// Interpret a non-empty inline value.
fn scalar(raw: &str) -> Value {
    if let Some(inner) = quoted(raw) {
        return Value::String(inner.to_string());
    }
    if raw.starts_with('[') && raw.ends_with(']') {
        return inline_array(raw);
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if is_plain_integer(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::from(n);
        }
    }
    Value::String(raw.to_string())
}

/// `[a, b]` as JSON first; on malformed JSON split on commas and strip
/// quotes from each element.
fn inline_array(raw: &str) -> Value {
    if let Ok(Value::Array(values)) = serde_json::from_str::<Value>(raw) {
        return Value::Array(values);
    }

    let inner = raw[1..raw.len() - 1].trim();
    let values = inner
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Value::String(strip_quotes(part).to_string()))
        .collect();
    Value::Array(values)
}

fn quoted(raw: &str) -> Option<&str> {
    if raw.len() < 2 {
        return None;
    }
    ['"', '\'']
        .into_iter()
        .find_map(|q| raw.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)))
}

pub(crate) fn strip_quotes(raw: &str) -> &str {
    quoted(raw).unwrap_or(raw)
}

pub(crate) fn is_plain_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
