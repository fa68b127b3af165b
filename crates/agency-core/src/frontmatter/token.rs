//! Line tokenizer for the metadata block of a frontmatter document.
//!
//! Each line of the block maps to exactly one [`Token`]; indentation is kept
//! on the token so the parser can rebuild nesting without any mode flags.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// `key: value` or `key:` (empty value opens a block).
    Entry {
        indent: usize,
        key: &'a str,
        value: &'a str,
    },
    /// `- value` array element.
    Item { indent: usize, value: &'a str },
    /// Empty line or `#` comment.
    Blank,
    /// Anything the grammar does not recognise.
    Text { line: usize, raw: &'a str },
}

/// Tokenize the lines between the opening and closing delimiters.
pub(crate) fn tokenize(block: &str) -> Vec<Token<'_>> {
    block
        .lines()
        .enumerate()
        .map(|(idx, line)| classify(idx + 1, line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

fn classify(line_no: usize, line: &str) -> Token<'_> {
    let content = line.trim_start_matches([' ', '\t']);
    let indent = line.len() - content.len();
    let content = content.trim_end();

    if content.is_empty() || content.starts_with('#') {
        return Token::Blank;
    }

    if content == "-" {
        return Token::Item { indent, value: "" };
    }
    if let Some(rest) = content.strip_prefix("- ") {
        return Token::Item {
            indent,
            value: rest.trim(),
        };
    }

    match split_key(content) {
        Some((key, value)) => Token::Entry { indent, key, value },
        None => Token::Text {
            line: line_no,
            raw: content,
        },
    }
}

/// Split `key: value` at the first colon that ends the key, i.e. a colon
/// followed by whitespace or the end of the line. `https://…` values are
/// therefore never split.
fn split_key(content: &str) -> Option<(&str, &str)> {
    let bytes = content.as_bytes();
    let colon = bytes.iter().enumerate().find_map(|(i, &b)| {
        let ends_key = bytes.get(i + 1).is_none_or(|next| next.is_ascii_whitespace());
        (b == b':' && ends_key).then_some(i)
    })?;

    let key = content[..colon].trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, content[colon + 1..].trim()))
}
